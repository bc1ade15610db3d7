//! Device channel abstraction

use atlink_protocol::Command;

/// Effect of applying a command to a channel bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Channel states changed; a `dev-data` update is due
    Changed,
    /// Command accepted; states change later (e.g. a blink started)
    Accepted,
    /// The platform asked for the current states
    Sync,
    /// The platform asked for a restart
    Reboot,
    /// Unknown command or out-of-range arguments
    Ignored,
}

/// A fixed set of on/off channels reported to the platform
///
/// Implemented by the sensor input bank and the actuator output bank so the
/// controller can drive either device variant.
pub trait Channels {
    /// Number of channels
    fn len(&self) -> usize;

    /// Check if there are no channels
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current states in declared order
    fn states(&self) -> &[bool];

    /// Periodic work (input scan, blink step)
    ///
    /// Returns `true` if any state changed since the last call.
    fn tick(&mut self, now_ms: u32) -> bool;

    /// Apply an application command
    fn apply(&mut self, command: &Command, now_ms: u32) -> CommandOutcome;
}
