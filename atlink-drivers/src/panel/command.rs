//! MIPI DCS commands shared by the ST7789 and ILI9341

/// Software reset
pub const SWRESET: u8 = 0x01;
/// Sleep out
pub const SLPOUT: u8 = 0x11;
/// Display on
pub const DISPON: u8 = 0x29;
/// Column address set
pub const CASET: u8 = 0x2A;
/// Page (row) address set
pub const PASET: u8 = 0x2B;
/// Memory write
pub const RAMWR: u8 = 0x2C;
/// Memory access control
pub const MADCTL: u8 = 0x36;
/// Pixel format
pub const COLMOD: u8 = 0x3A;

/// 16 bits per pixel on both interfaces
pub const COLMOD_RGB565: u8 = 0x55;

/// MADCTL bits
pub mod madctl {
    /// Row address order
    pub const MY: u8 = 0x80;
    /// Column address order
    pub const MX: u8 = 0x40;
    /// Row/column exchange
    pub const MV: u8 = 0x20;
    /// BGR subpixel order
    pub const BGR: u8 = 0x08;
}
