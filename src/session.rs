use std::collections::HashSet;

use crate::error::PlaybackError;

/// One timed unit of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: String,
    pub label: String,
    pub description: String,
    pub category: Option<String>,
    duration_seconds: u32,
}

impl Step {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        duration_seconds: u32,
    ) -> Result<Self, PlaybackError> {
        if duration_seconds == 0 {
            return Err(PlaybackError::InvalidDuration(duration_seconds));
        }

        Ok(Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
            category: None,
            duration_seconds,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}

/// An ordered, non-empty list of steps loaded for playback.
///
/// Read-only once constructed: the engine only reads step durations when it
/// re-initializes the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub title: String,
    pub share_id: String,
    pub notes: String,
    steps: Vec<Step>,
    total_duration_seconds: u32,
}

impl Session {
    pub fn new(title: impl Into<String>, steps: Vec<Step>) -> Result<Self, PlaybackError> {
        if steps.is_empty() {
            return Err(PlaybackError::EmptySession);
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if step.duration_seconds == 0 {
                return Err(PlaybackError::InvalidDuration(0));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(PlaybackError::DuplicateStep(step.id.clone()));
            }
        }

        let total_duration_seconds = steps.iter().map(Step::duration_seconds).sum();

        Ok(Self {
            title: title.into(),
            share_id: String::new(),
            notes: String::new(),
            steps,
            total_duration_seconds,
        })
    }

    pub fn with_share_id(mut self, share_id: impl Into<String>) -> Self {
        self.share_id = share_id.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Overrides the informational total; the engine never checks it
    /// against the step durations.
    pub fn with_total_duration(mut self, seconds: u32) -> Self {
        self.total_duration_seconds = seconds;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    // Never true for a constructed session, kept for clippy's len_without_is_empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_duration_seconds(&self) -> u32 {
        self.total_duration_seconds
    }
}
