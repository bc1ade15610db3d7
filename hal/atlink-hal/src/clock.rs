//! Monotonic time source

/// Millisecond clock
///
/// Values wrap at `u32::MAX` (about 49.7 days). Consumers compare
/// timestamps with `wrapping_sub`, never with `<`.
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u32;
}

/// Milliseconds elapsed from `since` to `now`, tolerant of wrap-around
#[inline]
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_simple() {
        assert_eq!(elapsed_ms(1500, 1000), 500);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        assert_eq!(elapsed_ms(99, u32::MAX - 100), 200);
    }
}
