//! Error types for playback and the training catalog.

use thiserror::Error;

/// Errors raised by the playback engine.
///
/// Every variant describes a rejected transition or an invalid session; the
/// engine state is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// A step duration of zero seconds was supplied to the clock
    #[error("step duration must be positive, got {0}s")]
    InvalidDuration(u32),

    /// A jump outside `[0, len)`
    #[error("step index {index} out of range for a session of {len} steps")]
    IndexOutOfRange { index: usize, len: usize },

    /// Step selection while the countdown is running
    #[error("cannot change step while the countdown is running")]
    ClockRunning,

    /// Start requested after the session was completed
    #[error("session already completed, restart it first")]
    SessionCompleted,

    #[error("a session needs at least one step")]
    EmptySession,

    #[error("duplicate step id: {0}")]
    DuplicateStep(String),
}

/// Errors raised while loading sessions or editing trainings.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No training is published under the share identifier
    #[error("no playable session for share id '{0}'")]
    SessionNotFound(String),

    #[error("training '{0}' not found")]
    TrainingNotFound(String),

    #[error("exercise '{0}' not found in catalog")]
    UnknownExercise(String),

    #[error("add at least one exercise to the training")]
    EmptyPlan,

    #[error("a training name is required")]
    MissingName,

    #[error("invalid catalog data: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}
