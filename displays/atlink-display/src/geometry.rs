//! Panel geometry and clipping
//!
//! Drawing coordinates are signed so callers can describe shapes that hang
//! off the panel edge. Clipping turns them into an inclusive [`Window`]
//! inside the panel, or nothing when no pixel remains.

/// A rectangle in logical panel coordinates (may be partly off-panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Create a rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Check if `other` lies completely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink by `by` pixels on every side
    pub const fn inset(&self, by: i32) -> Self {
        Self::new(self.x + by, self.y + by, self.w - 2 * by, self.h - 2 * by)
    }

    /// Clip to a `width` x `height` panel
    ///
    /// Returns `None` for an empty or fully off-panel rectangle.
    pub fn clip(&self, width: u16, height: u16) -> Option<Window> {
        if self.w <= 0 || self.h <= 0 {
            return None;
        }
        Window::clamped(
            self.x,
            self.y,
            self.x.saturating_add(self.w - 1),
            self.y.saturating_add(self.h - 1),
            width,
            height,
        )
    }
}

/// An inclusive addressing window, always inside the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// Clamp inclusive corners to a `width` x `height` panel
    ///
    /// Corners may come in either order. Out-of-range coordinates are
    /// clamped to the panel edge; a window that ends up with no pixel on
    /// the panel yields `None`.
    pub fn clamped(x0: i32, y0: i32, x1: i32, y1: i32, width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let max_x = i32::from(width) - 1;
        let max_y = i32::from(height) - 1;

        if x1 < 0 || y1 < 0 || x0 > max_x || y0 > max_y {
            return None;
        }

        // In range after clamping, the casts cannot truncate
        Some(Self {
            x0: x0.clamp(0, max_x) as u16,
            y0: y0.clamp(0, max_y) as u16,
            x1: x1.clamp(0, max_x) as u16,
            y1: y1.clamp(0, max_y) as u16,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixels
    pub fn area(&self) -> u32 {
        u32::from(self.width()) * u32::from(self.height())
    }

    /// Same window as a [`Rect`]
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            i32::from(self.x0),
            i32::from(self.y0),
            i32::from(self.width()),
            i32::from(self.height()),
        )
    }
}

/// Logical `(width, height)` of a panel at a rotation
///
/// Rotations 0 and 2 are portrait (physical dimensions), 1 and 3 swap them.
pub fn rotated_size(rotation: u8, width: u16, height: u16) -> (u16, u16) {
    if rotation % 2 == 0 {
        (width, height)
    } else {
        (height, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clip_right_edge() {
        let window = Rect::new(235, 10, 20, 4).clip(240, 320).unwrap();
        assert_eq!(window.x0, 235);
        assert_eq!(window.x1, 239);
        assert_eq!(window.width(), 5);
        assert_eq!(window.height(), 4);
    }

    #[test]
    fn test_clip_negative_origin() {
        let window = Rect::new(-5, -5, 10, 10).clip(240, 320).unwrap();
        assert_eq!(window, Window { x0: 0, y0: 0, x1: 4, y1: 4 });
    }

    #[test]
    fn test_clip_off_panel_is_none() {
        assert_eq!(Rect::new(240, 0, 10, 10).clip(240, 320), None);
        assert_eq!(Rect::new(0, 320, 10, 10).clip(240, 320), None);
        assert_eq!(Rect::new(-20, 0, 10, 10).clip(240, 320), None);
        assert_eq!(Rect::new(0, 0, 0, 10).clip(240, 320), None);
        assert_eq!(Rect::new(0, 0, 10, -1).clip(240, 320), None);
    }

    #[test]
    fn test_clamped_swapped_corners() {
        let window = Window::clamped(10, 20, 5, 2, 240, 320).unwrap();
        assert_eq!(window, Window { x0: 5, y0: 2, x1: 10, y1: 20 });
    }

    #[test]
    fn test_full_screen_area() {
        let window = Rect::new(0, 0, 240, 320).clip(240, 320).unwrap();
        assert_eq!(window.area(), 240 * 320);
        assert_eq!(window.to_rect(), Rect::new(0, 0, 240, 320));
    }

    #[test]
    fn test_rotated_size() {
        assert_eq!(rotated_size(0, 240, 320), (240, 320));
        assert_eq!(rotated_size(1, 240, 320), (320, 240));
        assert_eq!(rotated_size(2, 240, 320), (240, 320));
        assert_eq!(rotated_size(3, 240, 320), (320, 240));
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains(&Rect::new(10, 10, 90, 90)));
        assert!(!outer.contains(&Rect::new(10, 10, 91, 90)));
    }

    proptest! {
        #[test]
        fn prop_clip_stays_on_panel(
            x in -500i32..500, y in -500i32..500,
            w in -10i32..600, h in -10i32..600,
        ) {
            if let Some(window) = Rect::new(x, y, w, h).clip(240, 320) {
                prop_assert!(window.x0 <= window.x1 && window.x1 < 240);
                prop_assert!(window.y0 <= window.y1 && window.y1 < 320);
                prop_assert!(i32::from(window.width()) <= w);
                prop_assert!(i32::from(window.height()) <= h);
            }
        }
    }
}
