//! Status panel abstraction and dashboard renderer for atlink devices
//!
//! This crate provides:
//! - `DisplaySurface` trait for addressable-pixel panels (ST7789, ILI9341, ...)
//! - Window clipping geometry and RGB565 colors
//! - A fixed 5x7 bitmap font and scaled text rasterization
//! - `UiSnapshot`, the per-tick dashboard state
//! - `UiRenderer`, which turns snapshots into minimal surface traffic
//!
//! # Architecture
//!
//! The panel's own RAM is the frame buffer. Every drawing operation is an
//! addressing window followed by a burst of one color, so the renderer
//! never needs a local buffer:
//!
//! ```text
//! UiSnapshot ──► UiRenderer ──► DisplaySurface ──► SPI panel
//!                 (diff vs.        (window +
//!                  previous)        color burst)
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod color;
pub mod font;
pub mod geometry;
pub mod icons;
pub mod layout;
pub mod renderer;
pub mod snapshot;
pub mod surface;
pub mod text;

// Re-export key types
pub use color::{rgb565, Rgb565};
pub use geometry::{Rect, Window};
pub use renderer::UiRenderer;
pub use snapshot::{UiSnapshot, MAX_SENSORS};
pub use surface::{DisplayError, DisplaySurface};
