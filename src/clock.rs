use crate::error::PlaybackError;

/// Signal returned by [`DurationClock::tick`] when the countdown hits zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired;

/// Countdown for the currently selected step.
///
/// `remaining_seconds` never exceeds the duration the clock was last
/// initialized with. Expiry stops the clock, so a countdown can only expire
/// once until it is reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationClock {
    duration_seconds: u32,
    remaining_seconds: u32,
    running: bool,
}

impl DurationClock {
    pub fn new(duration_seconds: u32) -> Result<Self, PlaybackError> {
        let mut clock = Self {
            duration_seconds: 0,
            remaining_seconds: 0,
            running: false,
        };
        clock.initialize(duration_seconds)?;
        Ok(clock)
    }

    pub fn initialize(&mut self, duration_seconds: u32) -> Result<(), PlaybackError> {
        if duration_seconds == 0 {
            return Err(PlaybackError::InvalidDuration(duration_seconds));
        }
        self.duration_seconds = duration_seconds;
        self.remaining_seconds = duration_seconds;
        self.running = false;
        Ok(())
    }

    /// Discards any in-flight countdown
    pub fn reset(&mut self, duration_seconds: u32) -> Result<(), PlaybackError> {
        self.initialize(duration_seconds)
    }

    pub fn start(&mut self) {
        if self.remaining_seconds > 0 {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) -> Option<Expired> {
        if !self.running || self.remaining_seconds == 0 {
            return None;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.running = false;
            return Some(Expired);
        }
        None
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Share of the current step already consumed, in `[0, 1]`
    pub fn elapsed_fraction(&self) -> f64 {
        let elapsed = self.duration_seconds - self.remaining_seconds;
        elapsed as f64 / self.duration_seconds as f64
    }
}
