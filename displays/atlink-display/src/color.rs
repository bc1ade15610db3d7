//! RGB565 colors

/// 16-bit packed color: 5 bits red, 6 bits green, 5 bits blue
pub type Rgb565 = u16;

/// Pack 8-bit channels into RGB565 (low bits are dropped)
pub const fn rgb565(r: u8, g: u8, b: u8) -> Rgb565 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

pub const BLACK: Rgb565 = 0x0000;
pub const WHITE: Rgb565 = 0xFFFF;
pub const RED: Rgb565 = 0xF800;
pub const GREEN: Rgb565 = 0x07E0;
pub const BLUE: Rgb565 = 0x001F;
pub const YELLOW: Rgb565 = 0xFFE0;
pub const GRAY: Rgb565 = rgb565(0x80, 0x80, 0x80);
pub const DARK_GRAY: Rgb565 = rgb565(0x30, 0x30, 0x30);

/// Dashboard theme
pub mod theme {
    use super::*;

    pub const BACKGROUND: Rgb565 = BLACK;
    pub const TEXT: Rgb565 = WHITE;
    pub const MUTED_TEXT: Rgb565 = GRAY;
    pub const BADGE: Rgb565 = rgb565(0x10, 0x40, 0x80);
    pub const CARD_BORDER: Rgb565 = GRAY;
    pub const SENSOR_ON: Rgb565 = rgb565(0x00, 0xA0, 0x40);
    pub const SENSOR_OFF: Rgb565 = DARK_GRAY;
    pub const ICON_ACTIVE: Rgb565 = GREEN;
    pub const ICON_IDLE: Rgb565 = DARK_GRAY;
    pub const ICON_DISCONNECTED: Rgb565 = RED;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(rgb565(0xFF, 0, 0), RED);
        assert_eq!(rgb565(0, 0xFF, 0), GREEN);
        assert_eq!(rgb565(0, 0, 0xFF), BLUE);
        assert_eq!(rgb565(0xFF, 0xFF, 0xFF), WHITE);
    }

    #[test]
    fn test_low_bits_dropped() {
        assert_eq!(rgb565(0x07, 0x03, 0x07), BLACK);
        assert_eq!(rgb565(0x08, 0x04, 0x08), 0x0821);
    }
}
