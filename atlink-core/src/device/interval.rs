//! Elapsed-time gate

use atlink_hal::clock::elapsed_ms;

/// Fires at most once per period
///
/// The first poll fires immediately; afterwards the gate opens again once
/// `period_ms` has elapsed since it last fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u32,
    last_ms: Option<u32>,
}

impl Interval {
    /// Create a gate that fires on its first poll
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: None,
        }
    }

    /// Configured period
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Check the gate, arming the next period when it fires
    pub fn poll(&mut self, now_ms: u32) -> bool {
        match self.last_ms {
            Some(last) if elapsed_ms(now_ms, last) < self.period_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// Restart the period at `now`
    pub fn reset(&mut self, now_ms: u32) {
        self.last_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_fires() {
        let mut interval = Interval::new(100);
        assert!(interval.poll(5));
        assert!(!interval.poll(6));
    }

    #[test]
    fn test_fires_each_period() {
        let mut interval = Interval::new(100);
        assert!(interval.poll(0));
        assert!(!interval.poll(99));
        assert!(interval.poll(100));
        assert!(!interval.poll(150));
        assert!(interval.poll(230));
    }

    #[test]
    fn test_reset_delays_next_fire() {
        let mut interval = Interval::new(1_000);
        interval.reset(500);
        assert!(!interval.poll(1_499));
        assert!(interval.poll(1_500));
    }

    #[test]
    fn test_wraps() {
        let mut interval = Interval::new(100);
        interval.reset(u32::MAX - 10);
        assert!(!interval.poll(50));
        assert!(interval.poll(89));
    }
}
