use std::time::{Duration, Instant};

/// counts down whole seconds from the moment it was started.
///
/// owned by the screen that started it, dropping the screen drops the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    started: Instant,
    total: Duration,
}

impl Cooldown {
    pub fn start(now: Instant, total: Duration) -> Self {
        Cooldown { started: now, total }
    }

    /// seconds left, `total - floor(elapsed)`. never below zero
    pub fn remaining(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs();

        self.total.as_secs().saturating_sub(elapsed)
    }
}

/// stands in for work that has not been wired to a real endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay(Duration);

impl Delay {
    pub fn from_millis(ms: u64) -> Self {
        Delay(Duration::from_millis(ms))
    }

    pub fn wait(&self) {
        if !self.0.is_zero() {
            std::thread::sleep(self.0);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts_down_whole_seconds() {
        let start = Instant::now();
        let cooldown = Cooldown::start(start, Duration::from_secs(30));

        assert_eq!(cooldown.remaining(start), 30);
        assert_eq!(cooldown.remaining(start + Duration::from_millis(999)), 30);
        assert_eq!(cooldown.remaining(start + Duration::from_secs(1)), 29);
        assert_eq!(cooldown.remaining(start + Duration::from_millis(29_500)), 1);
        assert_eq!(cooldown.remaining(start + Duration::from_secs(30)), 0);
        assert_eq!(cooldown.remaining(start + Duration::from_secs(300)), 0);
    }

    #[test]
    fn earlier_instant_is_not_elapsed() {
        let start = Instant::now() + Duration::from_secs(5);
        let cooldown = Cooldown::start(start, Duration::from_secs(30));

        assert_eq!(cooldown.remaining(Instant::now()), 30);
    }

    #[test]
    fn zero_delay_returns() {
        let delay = Delay::from_millis(0);
        let start = Instant::now();

        delay.wait();

        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
