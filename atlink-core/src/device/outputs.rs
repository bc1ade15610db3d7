//! Actuator output bank

use atlink_hal::OutputPin;
use atlink_protocol::Command;

use super::interval::Interval;
use crate::traits::{Channels, CommandOutcome};

/// Blink cycles used when `blinkLed` carries no positive count
pub const DEFAULT_BLINK_COUNT: u16 = 5;

/// Actuator outputs driven by platform commands
///
/// All outputs start OFF. Blinking outputs toggle together on a shared
/// half-period and always end OFF.
pub struct OutputBank<P, const N: usize> {
    pins: [P; N],
    states: [bool; N],
    /// Remaining toggles per output
    blink_remaining: [u16; N],
    blink_interval: Interval,
}

impl<P: OutputPin, const N: usize> OutputBank<P, N> {
    /// Create the bank with every output OFF
    pub fn new(pins: [P; N], blink_ms: u32) -> Self {
        let mut bank = Self {
            pins,
            states: [false; N],
            blink_remaining: [0; N],
            blink_interval: Interval::new(blink_ms),
        };
        for pin in bank.pins.iter_mut() {
            pin.set_low();
        }
        bank
    }

    /// Switch one output; returns `false` for an out-of-range index
    pub fn set(&mut self, index: usize, on: bool) -> bool {
        let Some(pin) = self.pins.get_mut(index) else {
            return false;
        };
        pin.set_state(on);
        self.states[index] = on;
        debug!("output {} {}", index, if on { "ON" } else { "OFF" });
        true
    }

    /// Switch every output
    pub fn set_all(&mut self, on: bool) {
        for index in 0..N {
            self.set(index, on);
        }
    }

    /// Start blinking an output `count` times (`count * 2` toggles)
    pub fn blink(&mut self, index: usize, count: u16) -> bool {
        match self.blink_remaining.get_mut(index) {
            Some(remaining) => {
                *remaining = count.saturating_mul(2);
                debug!("output {} blinking {} times", index, count);
                true
            }
            None => false,
        }
    }

    /// Check if an output is blinking
    pub fn is_blinking(&self, index: usize) -> bool {
        self.blink_remaining.get(index).is_some_and(|&n| n > 0)
    }

    fn blink_step(&mut self) -> bool {
        let mut changed = false;
        for index in 0..N {
            if self.blink_remaining[index] == 0 {
                continue;
            }
            let on = !self.states[index];
            self.set(index, on);
            self.blink_remaining[index] -= 1;
            if self.blink_remaining[index] == 0 {
                self.set(index, false);
            }
            changed = true;
        }
        changed
    }
}

impl<P: OutputPin, const N: usize> Channels for OutputBank<P, N> {
    fn len(&self) -> usize {
        N
    }

    fn states(&self) -> &[bool] {
        &self.states
    }

    fn tick(&mut self, now_ms: u32) -> bool {
        if self.blink_remaining.iter().all(|&n| n == 0) {
            return false;
        }
        self.blink_interval.poll(now_ms) && self.blink_step()
    }

    fn apply(&mut self, command: &Command, _now_ms: u32) -> CommandOutcome {
        let index = command.index().filter(|&i| i < N);
        let value = command.value();

        match command.name() {
            // Bare index/value is shorthand for `output`
            "" | "output" => match (index, value) {
                (Some(index), Some(value)) => {
                    self.set(index, value > 0);
                    CommandOutcome::Changed
                }
                _ => CommandOutcome::Ignored,
            },
            "output-all" => match value {
                Some(value) => {
                    self.set_all(value > 0);
                    CommandOutcome::Changed
                }
                None => CommandOutcome::Ignored,
            },
            "blinkLed" => match index {
                Some(index) => {
                    let count = match value {
                        Some(n) if n > 0 => u16::try_from(n).unwrap_or(u16::MAX),
                        _ => DEFAULT_BLINK_COUNT,
                    };
                    self.blink(index, count);
                    CommandOutcome::Accepted
                }
                None => CommandOutcome::Ignored,
            },
            "sync" => CommandOutcome::Sync,
            "reboot" => CommandOutcome::Reboot,
            _other => {
                warn!("unknown command {}", _other);
                CommandOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            // Start high so the tests see the bank drive it low
            Self { high: true }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    fn bank() -> OutputBank<MockPin, 3> {
        OutputBank::new([MockPin::new(), MockPin::new(), MockPin::new()], 500)
    }

    fn levels(bank: &OutputBank<MockPin, 3>) -> [bool; 3] {
        [
            bank.pins[0].is_set_high(),
            bank.pins[1].is_set_high(),
            bank.pins[2].is_set_high(),
        ]
    }

    fn cmd(name: &str, index: i32, value: i32) -> Command {
        Command::new(name, index, value).unwrap()
    }

    #[test]
    fn test_starts_off() {
        let bank = bank();
        assert_eq!(bank.states(), [false; 3]);
        assert_eq!(levels(&bank), [false; 3]);
    }

    #[test]
    fn test_output_command() {
        let mut bank = bank();
        assert_eq!(bank.apply(&cmd("output", 1, 1), 0), CommandOutcome::Changed);
        assert_eq!(bank.states(), [false, true, false]);
        assert_eq!(levels(&bank), [false, true, false]);

        assert_eq!(bank.apply(&cmd("output", 1, 0), 0), CommandOutcome::Changed);
        assert_eq!(bank.states(), [false; 3]);
    }

    #[test]
    fn test_bare_index_value_shorthand() {
        let mut bank = bank();
        assert_eq!(bank.apply(&cmd("", 2, 7), 0), CommandOutcome::Changed);
        assert_eq!(bank.states(), [false, false, true]);
    }

    #[test]
    fn test_output_out_of_range() {
        let mut bank = bank();
        assert_eq!(bank.apply(&cmd("output", 3, 1), 0), CommandOutcome::Ignored);
        assert_eq!(bank.apply(&cmd("output", 0, -1), 0), CommandOutcome::Ignored);
        assert_eq!(bank.apply(&Command::default(), 0), CommandOutcome::Ignored);
        assert_eq!(bank.states(), [false; 3]);
    }

    #[test]
    fn test_output_all() {
        let mut bank = bank();
        assert_eq!(bank.apply(&cmd("output-all", -1, 1), 0), CommandOutcome::Changed);
        assert_eq!(levels(&bank), [true; 3]);
        assert_eq!(bank.apply(&cmd("output-all", -1, -1), 0), CommandOutcome::Ignored);
        assert_eq!(bank.apply(&cmd("output-all", -1, 0), 0), CommandOutcome::Changed);
        assert_eq!(levels(&bank), [false; 3]);
    }

    #[test]
    fn test_blink_toggles_and_ends_off() {
        let mut bank = bank();
        assert_eq!(bank.apply(&cmd("blinkLed", 0, 2), 0), CommandOutcome::Accepted);
        assert!(bank.is_blinking(0));

        // 2 blinks = 4 toggles, one per half-period
        let mut seen = [false; 4];
        for (step, state) in seen.iter_mut().enumerate() {
            assert!(bank.tick(step as u32 * 500));
            *state = bank.states()[0];
        }
        assert_eq!(seen, [true, false, true, false]);
        assert!(!bank.is_blinking(0));
        assert!(!bank.tick(2_000));
        assert!(!bank.pins[0].is_set_high());
    }

    #[test]
    fn test_blink_waits_for_half_period() {
        let mut bank = bank();
        bank.blink(1, 1);
        assert!(bank.tick(0));
        assert!(!bank.tick(499));
        assert!(bank.tick(500));
        assert_eq!(bank.states(), [false; 3]);
    }

    #[test]
    fn test_blink_default_count() {
        let mut bank = bank();
        bank.apply(&cmd("blinkLed", 2, -1), 0);
        let mut toggles = 0;
        let mut now = 0;
        while bank.tick(now) {
            toggles += 1;
            now += 500;
        }
        assert_eq!(toggles, DEFAULT_BLINK_COUNT * 2);
        assert_eq!(bank.states(), [false; 3]);
    }

    #[test]
    fn test_blink_bad_index() {
        let mut bank = bank();
        assert_eq!(bank.apply(&cmd("blinkLed", 5, 1), 0), CommandOutcome::Ignored);
        assert!(!bank.tick(0));
    }

    #[test]
    fn test_sync_reboot_unknown() {
        let mut bank = bank();
        assert_eq!(bank.apply(&cmd("sync", -1, -1), 0), CommandOutcome::Sync);
        assert_eq!(bank.apply(&cmd("reboot", -1, -1), 0), CommandOutcome::Reboot);
        assert_eq!(bank.apply(&cmd("dance", 0, 1), 0), CommandOutcome::Ignored);
    }
}
