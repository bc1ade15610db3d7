//! Scaled text rasterization
//!
//! Each set glyph cell becomes a `scale` x `scale` filled square. Cells are
//! merged into vertical runs per column so a glyph costs a handful of
//! windows instead of one per cell.

use crate::color::Rgb565;
use crate::font::{cell, glyph, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::geometry::Rect;
use crate::surface::{DisplayError, DisplaySurface};

/// Width in pixels of `text` at `scale` (including the trailing gap)
pub fn text_width(text: &str, scale: u8) -> i32 {
    text.chars().count() as i32 * i32::from(GLYPH_ADVANCE) * i32::from(scale)
}

/// Height in pixels of one text line at `scale`
pub fn text_height(scale: u8) -> i32 {
    i32::from(GLYPH_HEIGHT) * i32::from(scale)
}

/// Bounding box of `text` drawn at (`x`, `y`)
pub fn text_box(x: i32, y: i32, text: &str, scale: u8) -> Rect {
    Rect::new(x, y, text_width(text, scale), text_height(scale))
}

/// Draw `text` with its top-left corner at (`x`, `y`)
///
/// Only set cells are painted; the background is left alone. Returns the
/// x coordinate after the last glyph.
pub fn draw_text<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    x: i32,
    y: i32,
    text: &str,
    color: Rgb565,
    scale: u8,
) -> Result<i32, DisplayError> {
    let scale_px = i32::from(scale.max(1));
    let advance = i32::from(GLYPH_ADVANCE) * scale_px;
    let mut cursor = x;

    for ch in text.chars() {
        let bits = glyph(ch);
        for col in 0..GLYPH_WIDTH {
            let mut row = 0;
            while row < GLYPH_HEIGHT {
                if !cell(bits, col, row) {
                    row += 1;
                    continue;
                }
                let start = row;
                while row < GLYPH_HEIGHT && cell(bits, col, row) {
                    row += 1;
                }
                surface.fill_rect(
                    cursor + i32::from(col) * scale_px,
                    y + i32::from(start) * scale_px,
                    scale_px,
                    i32::from(row - start) * scale_px,
                    color,
                )?;
            }
        }
        cursor += advance;
    }

    Ok(cursor)
}
