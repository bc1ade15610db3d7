//! Board-agnostic core logic for atlink device firmware
//!
//! This crate contains all device logic that does not depend on a
//! specific board or network stack:
//!
//! - Connection state machine for the Socket.IO device link
//! - Session bookkeeping and liveness monitoring
//! - Listener trait for link notifications
//! - Sensor input / actuator output banks and command handling
//! - Cooperative control loop step
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

// This must go first so the logging macros are visible to the other modules
mod fmt;

pub mod config;
pub mod device;
pub mod link;
pub mod traits;
