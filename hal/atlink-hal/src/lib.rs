//! atlink Hardware Abstraction Layer
//!
//! This crate defines the platform traits the device logic is written
//! against. The ESP32 firmware implements them on top of ESP-IDF; host
//! tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (atlink-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  atlink-core / atlink-display           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  atlink-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`transport::Transport`] - Text-frame connection to the cloud
//! - [`clock::Clock`] - Monotonic millisecond time

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod clock;
pub mod gpio;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use gpio::{InputPin, OutputPin};
pub use transport::{Transport, TransportEvent};
