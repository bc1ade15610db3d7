//! Device configuration
//!
//! Configuration is authored as TOML on the build host and embedded into
//! the firmware image; these are the typed values the device logic reads.

pub mod types;

pub use types::*;
