use std::time::{Duration, Instant};

pub const DEFAULT_ALERT_SECS: u64 = 5;

/// "Exercise completed" notice raised on expiry.
///
/// Dismissal runs on its own deadline and is independent of the playback
/// state machine: the controller only raises and clears it.
#[derive(Debug, Clone)]
pub struct CompletionAlert {
    raised_at: Option<Instant>,
    dismiss_after: Duration,
}

impl CompletionAlert {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            raised_at: None,
            dismiss_after,
        }
    }

    pub fn raise(&mut self, now: Instant) {
        self.raised_at = Some(now);
    }

    pub fn clear(&mut self) {
        self.raised_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.raised_at.is_some()
    }

    /// Drops the alert once its display time has passed. Returns true if it
    /// was dismissed by this call.
    pub fn update(&mut self, now: Instant) -> bool {
        match self.raised_at {
            Some(at) if now.saturating_duration_since(at) >= self.dismiss_after => {
                self.raised_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }
}

impl Default for CompletionAlert {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_ALERT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dismiss_delay() {
        let alert = CompletionAlert::default();
        assert_eq!(alert.dismiss_after(), Duration::from_secs(5));
        assert!(!alert.is_pending());
    }

    #[test]
    fn test_alert_auto_dismisses_after_delay() {
        let mut alert = CompletionAlert::new(Duration::from_secs(5));
        let t0 = Instant::now();
        alert.raise(t0);
        assert!(alert.is_pending());

        assert!(!alert.update(t0 + Duration::from_secs(4)));
        assert!(alert.is_pending());

        assert!(alert.update(t0 + Duration::from_secs(5)));
        assert!(!alert.is_pending());

        // nothing left to dismiss
        assert!(!alert.update(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_raise_again_restarts_delay() {
        let mut alert = CompletionAlert::new(Duration::from_secs(2));
        let t0 = Instant::now();
        alert.raise(t0);
        alert.raise(t0 + Duration::from_secs(1));
        assert!(!alert.update(t0 + Duration::from_secs(2)));
        assert!(alert.update(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_clear() {
        let mut alert = CompletionAlert::default();
        alert.raise(Instant::now());
        alert.clear();
        assert!(!alert.is_pending());
    }
}
