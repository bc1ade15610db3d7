//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in atlink-hal and
//! atlink-display on top of `embedded-hal` 1.0:
//!
//! - SPI status panels (ST7789, ILI9341)
//! - Digital pin adapters for the channel banks

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod gpio;
pub mod panel;

pub use gpio::{InputAdapter, OutputAdapter};
pub use panel::{Panel, PanelModel};
