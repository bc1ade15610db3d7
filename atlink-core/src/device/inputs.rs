//! Sensor input bank
//!
//! Contacts are wired to pulled-up inputs, so a closed contact reads low
//! and is reported as active (`1`).

use atlink_hal::InputPin;
use atlink_protocol::Command;

use super::interval::Interval;
use crate::traits::{Channels, CommandOutcome};

/// Command names that force a sensor state
const FORCE_COMMANDS: [&str; 2] = ["output", "clear-call-bell"];

/// Scanned sensor inputs
pub struct InputBank<P, const N: usize> {
    pins: [P; N],
    states: [bool; N],
    scan_interval: Interval,
}

impl<P: InputPin, const N: usize> InputBank<P, N> {
    /// Create the bank, taking the initial states from the pins
    pub fn new(pins: [P; N], scan_ms: u32) -> Self {
        let mut bank = Self {
            pins,
            states: [false; N],
            scan_interval: Interval::new(scan_ms),
        };
        for (state, pin) in bank.states.iter_mut().zip(bank.pins.iter_mut()) {
            *state = pin.is_low();
        }
        bank
    }

    /// Read every pin now
    ///
    /// Returns `true` if any channel changed since the last scan.
    pub fn scan(&mut self) -> bool {
        let mut changed = false;
        for (_i, (state, pin)) in self.states.iter_mut().zip(self.pins.iter_mut()).enumerate() {
            let active = pin.is_low();
            if active != *state {
                debug!("input {} changed: {} -> {}", _i, *state, active);
                *state = active;
                changed = true;
            }
        }
        changed
    }

    /// Force a channel state until the next scan disagrees
    pub fn force(&mut self, index: usize, active: bool) -> bool {
        match self.states.get_mut(index) {
            Some(state) => {
                *state = active;
                true
            }
            None => false,
        }
    }
}

impl<P: InputPin, const N: usize> Channels for InputBank<P, N> {
    fn len(&self) -> usize {
        N
    }

    fn states(&self) -> &[bool] {
        &self.states
    }

    fn tick(&mut self, now_ms: u32) -> bool {
        self.scan_interval.poll(now_ms) && self.scan()
    }

    fn apply(&mut self, command: &Command, _now_ms: u32) -> CommandOutcome {
        if !FORCE_COMMANDS.contains(&command.name()) {
            return CommandOutcome::Ignored;
        }
        // A missing value clears the channel
        let active = command.value().unwrap_or(0) == 1;
        match command.index() {
            Some(index) if self.force(index, active) => CommandOutcome::Changed,
            _ => {
                warn!(
                    "{} ignored: index {} value {}",
                    command.name(),
                    command.field_index,
                    command.field_value
                );
                CommandOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Mock input pin; the level is shared so tests can change it after
    /// the pin has moved into the bank
    struct MockPin<'a> {
        high: &'a Cell<bool>,
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> bool {
            self.high.get()
        }
    }

    fn levels() -> [Cell<bool>; 3] {
        [Cell::new(true), Cell::new(true), Cell::new(true)]
    }

    fn bank(levels: &[Cell<bool>; 3]) -> InputBank<MockPin<'_>, 3> {
        InputBank::new(
            [
                MockPin { high: &levels[0] },
                MockPin { high: &levels[1] },
                MockPin { high: &levels[2] },
            ],
            100,
        )
    }

    #[test]
    fn test_initial_states_from_pins() {
        let levels = levels();
        levels[1].set(false);
        let bank = bank(&levels);
        assert_eq!(bank.states(), [false, true, false]);
    }

    #[test]
    fn test_low_is_active() {
        let levels = levels();
        let mut bank = bank(&levels);
        assert!(!bank.scan());

        levels[2].set(false);
        assert!(bank.scan());
        assert_eq!(bank.states(), [false, false, true]);
        assert!(!bank.scan());
    }

    #[test]
    fn test_tick_respects_scan_period() {
        let levels = levels();
        let mut bank = bank(&levels);
        assert!(!bank.tick(0));

        levels[0].set(false);
        assert!(!bank.tick(50));
        assert!(bank.tick(100));
    }

    #[test]
    fn test_force_command() {
        let levels = levels();
        let mut bank = bank(&levels);

        let cmd = Command::new("clear-call-bell", 1, 1).unwrap();
        assert_eq!(bank.apply(&cmd, 0), CommandOutcome::Changed);
        assert_eq!(bank.states(), [false, true, false]);

        let cmd = Command::new("output", 1, 0).unwrap();
        assert_eq!(bank.apply(&cmd, 0), CommandOutcome::Changed);
        assert_eq!(bank.states(), [false, false, false]);
    }

    #[test]
    fn test_clear_without_value() {
        let levels = levels();
        let mut bank = bank(&levels);
        bank.force(1, true);

        let cmd = Command::decode(r#"{"operation":{"customCmd":"clear-call-bell","fieldIndex":1}}"#)
            .unwrap();
        assert_eq!(bank.apply(&cmd, 0), CommandOutcome::Changed);
        assert_eq!(bank.states(), [false, false, false]);
    }

    #[test]
    fn test_forced_state_reverts_on_scan() {
        let levels = levels();
        let mut bank = bank(&levels);
        bank.apply(&Command::new("output", 0, 1).unwrap(), 0);
        assert!(bank.scan());
        assert_eq!(bank.states(), [false, false, false]);
    }

    #[test]
    fn test_bad_commands_ignored() {
        let levels = levels();
        let mut bank = bank(&levels);
        for cmd in [
            Command::new("output", 3, 1).unwrap(),
            Command::new("output", -1, 1).unwrap(),
            Command::new("blinkLed", 0, 1).unwrap(),
            Command::default(),
        ] {
            assert_eq!(bank.apply(&cmd, 0), CommandOutcome::Ignored);
        }
        assert_eq!(bank.states(), [false, false, false]);
    }
}
