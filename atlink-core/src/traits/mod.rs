//! Application-facing traits
//!
//! These traits define the seams between the link, the device I/O and
//! whatever the application plugs in.

pub mod channels;
pub mod listener;

pub use channels::{Channels, CommandOutcome};
pub use listener::Listener;
