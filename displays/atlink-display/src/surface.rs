//! Display surface trait
//!
//! Defines the interface for addressable-pixel panels driven over a
//! command/data bus.

use crate::color::Rgb565;
use crate::geometry::{Rect, Window};

/// Display surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus (SPI or control pin) failure
    Bus,
    /// Drawing attempted before `begin`
    NotInitialized,
}

/// Addressable-pixel panel
///
/// Implementations provide the two bus primitives (addressing window and
/// color burst); every drawing operation is built from them. Coordinates
/// are logical, i.e. already rotated, and anything off-panel is clipped.
pub trait DisplaySurface {
    /// Logical width at the current rotation
    fn width(&self) -> u16;

    /// Logical height at the current rotation
    fn height(&self) -> u16;

    /// Current rotation (0-3)
    fn rotation(&self) -> u8;

    /// Set the rotation (0/2 portrait, 1/3 landscape); values wrap mod 4
    fn set_rotation(&mut self, rotation: u8) -> Result<(), DisplayError>;

    /// Set the backlight level (0-255)
    ///
    /// Independent of pixel operations.
    fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Select the window subsequent pixel data fills
    fn write_window(&mut self, window: Window) -> Result<(), DisplayError>;

    /// Write `count` pixels of one color into the current window
    fn write_color(&mut self, color: Rgb565, count: u32) -> Result<(), DisplayError>;

    /// Clamp inclusive corners to the panel and select the window
    ///
    /// Returns the window actually selected, or `None` when nothing of it is
    /// on the panel (no bus traffic in that case).
    fn set_address_window(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    ) -> Result<Option<Window>, DisplayError> {
        match Window::clamped(x0, y0, x1, y1, self.width(), self.height()) {
            Some(window) => {
                self.write_window(window)?;
                Ok(Some(window))
            }
            None => Ok(None),
        }
    }

    /// Fill a rectangle, clipped to the panel
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) -> Result<(), DisplayError> {
        match Rect::new(x, y, w, h).clip(self.width(), self.height()) {
            Some(window) => {
                self.write_window(window)?;
                self.write_color(color, window.area())
            }
            None => Ok(()),
        }
    }

    /// Set one pixel
    fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), DisplayError> {
        self.fill_rect(x, y, 1, 1, color)
    }

    /// Draw a one-pixel rectangle outline
    fn draw_rect_outline(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        self.fill_rect(x, y, w, 1, color)?;
        self.fill_rect(x, y + h - 1, w, 1, color)?;
        self.fill_rect(x, y, 1, h, color)?;
        self.fill_rect(x + w - 1, y, 1, h, color)
    }

    /// Fill the whole panel
    fn fill_screen(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        let (w, h) = (i32::from(self.width()), i32::from(self.height()));
        self.fill_rect(0, 0, w, h, color)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording surface shared by the crate's tests

    use super::*;
    use std::vec::Vec;

    /// One bus-level operation
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Op {
        Window(Window),
        Color(Rgb565, u32),
        Backlight(u8),
    }

    /// Surface that records every operation and keeps no pixels
    pub struct RecordingSurface {
        pub width: u16,
        pub height: u16,
        pub rotation: u8,
        pub ops: Vec<Op>,
        /// Fail every window write with a bus error
        pub fail: bool,
    }

    impl RecordingSurface {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                rotation: 0,
                ops: Vec::new(),
                fail: false,
            }
        }

        /// Windows written so far
        pub fn windows(&self) -> Vec<Window> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Window(window) => Some(*window),
                    _ => None,
                })
                .collect()
        }
    }

    impl DisplaySurface for RecordingSurface {
        fn width(&self) -> u16 {
            self.width
        }

        fn height(&self) -> u16 {
            self.height
        }

        fn rotation(&self) -> u8 {
            self.rotation
        }

        fn set_rotation(&mut self, rotation: u8) -> Result<(), DisplayError> {
            let rotation = rotation % 4;
            if (rotation % 2) != (self.rotation % 2) {
                core::mem::swap(&mut self.width, &mut self.height);
            }
            self.rotation = rotation;
            Ok(())
        }

        fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError> {
            self.ops.push(Op::Backlight(level));
            Ok(())
        }

        fn write_window(&mut self, window: Window) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Bus);
            }
            self.ops.push(Op::Window(window));
            Ok(())
        }

        fn write_color(&mut self, color: Rgb565, count: u32) -> Result<(), DisplayError> {
            self.ops.push(Op::Color(color, count));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{Op, RecordingSurface};
    use super::*;
    use crate::color::{RED, WHITE};

    #[test]
    fn test_fill_rect_is_window_plus_burst() {
        let mut surface = RecordingSurface::new(240, 320);
        surface.fill_rect(10, 20, 30, 2, RED).unwrap();
        assert_eq!(
            surface.ops,
            [
                Op::Window(Window { x0: 10, y0: 20, x1: 39, y1: 21 }),
                Op::Color(RED, 60)
            ]
        );
    }

    #[test]
    fn test_fill_rect_clips_to_width() {
        let mut surface = RecordingSurface::new(240, 320);
        surface.fill_rect(235, 0, 20, 1, RED).unwrap();
        assert_eq!(surface.ops[1], Op::Color(RED, 5));
    }

    #[test]
    fn test_set_address_window_clamps() {
        let mut surface = RecordingSurface::new(240, 320);
        let window = surface.set_address_window(235, 0, 254, 9).unwrap().unwrap();
        assert_eq!(window.width(), 5);
        assert_eq!(surface.set_address_window(300, 0, 310, 9).unwrap(), None);
        assert_eq!(surface.ops.len(), 1);
    }

    #[test]
    fn test_off_panel_is_noop() {
        let mut surface = RecordingSurface::new(240, 320);
        surface.fill_rect(-50, -50, 10, 10, RED).unwrap();
        surface.draw_pixel(240, 0, RED).unwrap();
        surface.draw_rect_outline(0, 0, 0, 0, RED).unwrap();
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_outline_draws_four_edges() {
        let mut surface = RecordingSurface::new(240, 320);
        surface.draw_rect_outline(10, 10, 5, 4, WHITE).unwrap();
        assert_eq!(
            surface.windows(),
            [
                Window { x0: 10, y0: 10, x1: 14, y1: 10 },
                Window { x0: 10, y0: 13, x1: 14, y1: 13 },
                Window { x0: 10, y0: 10, x1: 10, y1: 13 },
                Window { x0: 14, y0: 10, x1: 14, y1: 13 },
            ]
        );
    }

    #[test]
    fn test_fill_screen_follows_rotation() {
        let mut surface = RecordingSurface::new(240, 320);
        surface.set_rotation(1).unwrap();
        surface.fill_screen(RED).unwrap();
        assert_eq!(
            surface.ops[0],
            Op::Window(Window { x0: 0, y0: 0, x1: 319, y1: 239 })
        );
    }
}
