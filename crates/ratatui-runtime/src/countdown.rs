use std::time::Duration;

/// One-shot delay driven by tick durations.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use ratatui_runtime::Countdown;
///
/// let mut timer = Countdown::default();
/// timer.start(Duration::from_millis(300));
///
/// assert!(!timer.advance(Duration::from_millis(200)));
/// assert!(timer.advance(Duration::from_millis(200)));
/// assert!(!timer.is_running());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: Option<Duration>,
}

impl Countdown {
    /// (Re)starts the countdown.
    pub fn start(&mut self, duration: Duration) {
        self.remaining = Some(duration);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advances by `elapsed`.
    ///
    /// Returns `true` exactly once, on the call that reaches zero.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        if let Some(left) = remaining.checked_sub(elapsed)
            && !left.is_zero()
        {
            self.remaining = Some(left);
            return false;
        }
        self.remaining = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_idle_never_fires() {
        let mut timer = Countdown::default();
        assert!(!timer.advance(MS * 1000));
        assert!(!timer.is_running());
    }

    #[test]
    fn test_fires_once_at_exact_expiry() {
        let mut timer = Countdown::default();
        timer.start(MS * 100);
        assert!(!timer.advance(MS * 50));
        assert!(timer.advance(MS * 50));
        assert!(!timer.advance(MS * 50));
    }

    #[test]
    fn test_restart_and_cancel() {
        let mut timer = Countdown::default();
        timer.start(MS * 100);
        assert!(!timer.advance(MS * 90));
        timer.start(MS * 100);
        assert!(!timer.advance(MS * 90), "restart resets the remaining time");
        timer.cancel();
        assert!(!timer.advance(MS * 100));
    }

    #[test]
    fn test_zero_duration_fires_on_next_tick() {
        let mut timer = Countdown::default();
        timer.start(Duration::ZERO);
        assert!(timer.is_running());
        assert!(timer.advance(Duration::ZERO));
    }
}
