use crate::error::PlaybackError;

/// Where the sequencer currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Step(usize),
    /// Advanced beyond the last step; the session is complete
    PastLast,
}

/// Owns step order and the current index for a session of `len` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequencer {
    len: usize,
    index: usize,
    completed: bool,
}

impl StepSequencer {
    pub fn new(len: usize) -> Result<Self, PlaybackError> {
        if len == 0 {
            return Err(PlaybackError::EmptySession);
        }
        Ok(Self {
            len,
            index: 0,
            completed: false,
        })
    }

    /// Raw index of the active step. Stays on the last step after completion.
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Position {
        if self.completed {
            Position::PastLast
        } else {
            Position::Step(self.index)
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    /// Moves to the next step and returns its index, or marks the session
    /// completed when already on the last step.
    pub fn advance(&mut self) -> Option<usize> {
        if self.index + 1 < self.len {
            self.index += 1;
            Some(self.index)
        } else {
            self.completed = true;
            None
        }
    }

    /// Steps back one position. Returns the new index, or `None` at index 0.
    pub fn retreat(&mut self) -> Option<usize> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.completed = false;
        Some(self.index)
    }

    pub fn jump_to(&mut self, index: usize) -> Result<usize, PlaybackError> {
        if index >= self.len {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.index = index;
        self.completed = false;
        Ok(index)
    }

    /// Fraction of whole steps consumed: `(index + (remaining == 0 ? 1 : 0)) / len`
    pub fn progress(&self, remaining_seconds: u32) -> f64 {
        let consumed = self.index + usize::from(remaining_seconds == 0);
        (consumed as f64 / self.len as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_new_starts_at_first_step() {
        let seq = StepSequencer::new(3).unwrap();
        assert_eq!(seq.current_index(), 0);
        assert_eq!(seq.position(), Position::Step(0));
        assert!(!seq.is_completed());
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert_matches!(StepSequencer::new(0), Err(PlaybackError::EmptySession));
    }

    #[test]
    fn test_advance_until_completed() {
        let mut seq = StepSequencer::new(3).unwrap();
        assert_eq!(seq.advance(), Some(1));
        assert_eq!(seq.advance(), Some(2));
        assert!(seq.is_last());
        assert_eq!(seq.advance(), None);
        assert!(seq.is_completed());
        assert_eq!(seq.current_index(), 2);
        assert_eq!(seq.position(), Position::PastLast);
    }

    #[test]
    fn test_retreat_at_zero_is_noop() {
        let mut seq = StepSequencer::new(3).unwrap();
        assert_eq!(seq.retreat(), None);
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_retreat_reenters_from_completed() {
        let mut seq = StepSequencer::new(2).unwrap();
        seq.advance();
        seq.advance();
        assert!(seq.is_completed());

        assert_eq!(seq.retreat(), Some(0));
        assert!(!seq.is_completed());
        assert_eq!(seq.position(), Position::Step(0));
    }

    #[test]
    fn test_jump_to_bounds() {
        let mut seq = StepSequencer::new(3).unwrap();
        assert_eq!(seq.jump_to(2), Ok(2));
        assert_eq!(
            seq.jump_to(5),
            Err(PlaybackError::IndexOutOfRange { index: 5, len: 3 })
        );
        // rejected jump leaves the index alone
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_jump_clears_completed() {
        let mut seq = StepSequencer::new(1).unwrap();
        seq.advance();
        assert!(seq.is_completed());
        seq.jump_to(0).unwrap();
        assert!(!seq.is_completed());
    }

    #[test]
    fn test_progress_counts_whole_steps() {
        let mut seq = StepSequencer::new(4).unwrap();
        assert_eq!(seq.progress(30), 0.0);
        assert_eq!(seq.progress(0), 0.25);
        seq.jump_to(3).unwrap();
        assert_eq!(seq.progress(10), 0.75);
        assert_eq!(seq.progress(0), 1.0);
    }
}
