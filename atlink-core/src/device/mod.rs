//! Device-side behavior
//!
//! The two device variants share one control loop and differ only in their
//! channel bank:
//!
//! - [`InputBank`]: sensor contacts reported to the platform
//! - [`OutputBank`]: actuators switched by platform commands
//!
//! [`Controller`] ties a bank to the [`Link`](crate::link::Link) through the
//! [`CommandQueue`] listener.

pub mod controller;
pub mod inputs;
pub mod interval;
pub mod outputs;
pub mod queue;

pub use crate::traits::{Channels, CommandOutcome};
pub use controller::{Controller, StepReport};
pub use inputs::InputBank;
pub use interval::Interval;
pub use outputs::{OutputBank, DEFAULT_BLINK_COUNT};
pub use queue::{CommandQueue, COMMAND_QUEUE_LEN};
