//! Exponential backoff with jitter for the event-channel reconnect loop.
//!
//! Keeps an unavailable distribution endpoint from turning into a tight
//! reconnect loop and a log storm.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const JITTER_RATIO: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
    next_attempt_at: Instant,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
            next_attempt_at: Instant::now(),
        }
    }

    /// Whether enough time has passed to try again.
    pub fn ready(&self) -> bool {
        Instant::now() >= self.next_attempt_at
    }

    /// Back to the base delay after a success.
    pub fn reset(&mut self) {
        self.current = self.base;
        self.next_attempt_at = Instant::now();
    }

    /// Record a failure: double the delay up to the cap, schedule the next
    /// attempt, and return the applied delay (jitter included).
    pub fn fail(&mut self) -> Duration {
        self.current = self.current.saturating_mul(2).min(self.max);
        let delay = with_jitter(self.current);
        self.next_attempt_at = Instant::now() + delay;
        delay
    }
}

fn with_jitter(delay: Duration) -> Duration {
    let delay_ms = delay.as_millis();
    let jitter_max_ms = ((delay_ms as f64) * JITTER_RATIO) as u128;
    if jitter_max_ms == 0 {
        return delay;
    }

    // Subsecond clock nanos as a cheap entropy source; no need for a real RNG.
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u128)
        .unwrap_or(0);
    delay + Duration::from_millis((nanos % (jitter_max_ms + 1)) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_backoff_is_ready() {
        let backoff = Backoff::new(Duration::from_millis(10), Duration::from_secs(1));
        assert!(backoff.ready());
    }

    #[test]
    fn failure_blocks_until_reset() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(1));

        let delay = backoff.fail();
        assert!(delay >= Duration::from_millis(200));
        assert!(!backoff.ready());

        backoff.reset();
        assert!(backoff.ready());
    }

    #[test]
    fn delay_saturates_at_cap() {
        let mut backoff = Backoff::new(Duration::from_millis(10), Duration::from_millis(20));

        for _ in 0..4 {
            let delay = backoff.fail();
            assert!(delay >= Duration::from_millis(20));
            assert!(delay <= Duration::from_millis(24));
        }
    }
}
