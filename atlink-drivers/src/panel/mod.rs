//! SPI TFT panel driver (ST7789 / ILI9341)
//!
//! Both controllers speak the same MIPI DCS command set over a 4-wire SPI
//! bus: the D/C line selects command (low) or data (high) for every byte
//! that follows. Pixels are RGB565, most significant byte first.
//!
//! # Usage
//!
//! ```ignore
//! let mut panel = Panel::new(spi, dc, rst, backlight, PanelModel::St7789, 240, 320);
//! panel.set_rotation(2)?;
//! panel.begin(&mut delay)?;
//! panel.fill_screen(BLACK)?;
//! ```
//!
//! The panel RAM is the frame buffer; the driver keeps only rotation,
//! logical size and backlight level.

pub mod command;

use atlink_core::config::PanelController;
use atlink_display::{DisplayError, DisplaySurface, Rgb565, Window};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiDevice;

use command::madctl;

/// Pixels buffered per SPI write while streaming a color
const CHUNK_PIXELS: usize = 32;

/// Panel controller variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelModel {
    St7789,
    Ili9341,
}

impl PanelModel {
    /// MADCTL value for rotation 0
    pub const fn madctl_base(self) -> u8 {
        match self {
            PanelModel::St7789 => 0x00,
            PanelModel::Ili9341 => madctl::MX | madctl::BGR,
        }
    }

    /// MADCTL value for a rotation (quarter turns, wraps mod 4)
    pub const fn madctl(self, rotation: u8) -> u8 {
        let turn = match rotation % 4 {
            0 => 0,
            1 => madctl::MX | madctl::MV,
            2 => madctl::MX | madctl::MY,
            _ => madctl::MY | madctl::MV,
        };
        self.madctl_base() ^ turn
    }
}

impl From<PanelController> for PanelModel {
    fn from(controller: PanelController) -> Self {
        match controller {
            PanelController::St7789 => PanelModel::St7789,
            PanelController::Ili9341 => PanelModel::Ili9341,
        }
    }
}

/// SPI panel with D/C, reset and PWM backlight lines
pub struct Panel<SPI, DC, RST, BL> {
    spi: SPI,
    dc: DC,
    rst: RST,
    backlight: BL,
    model: PanelModel,
    /// Size at rotation 0
    native_width: u16,
    native_height: u16,
    rotation: u8,
    backlight_level: u8,
    initialized: bool,
}

impl<SPI, DC, RST, BL> Panel<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: SetDutyCycle,
{
    /// Create a driver for a panel of the given native (portrait) size
    ///
    /// Nothing is sent until [`Panel::begin`].
    pub fn new(
        spi: SPI,
        dc: DC,
        rst: RST,
        backlight: BL,
        model: PanelModel,
        width: u16,
        height: u16,
    ) -> Self {
        Self {
            spi,
            dc,
            rst,
            backlight,
            model,
            native_width: width,
            native_height: height,
            rotation: 0,
            backlight_level: 0,
            initialized: false,
        }
    }

    /// Hardware reset and init sequence, then backlight full on
    ///
    /// Runs once; later calls return immediately.
    pub fn begin<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        if self.initialized {
            return Ok(());
        }

        self.rst.set_high().map_err(|_| DisplayError::Bus)?;
        delay.delay_ms(5);
        self.rst.set_low().map_err(|_| DisplayError::Bus)?;
        delay.delay_ms(20);
        self.rst.set_high().map_err(|_| DisplayError::Bus)?;
        delay.delay_ms(150);

        self.command(command::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(command::SLPOUT, &[])?;
        delay.delay_ms(120);
        self.command(command::COLMOD, &[command::COLMOD_RGB565])?;
        delay.delay_ms(10);
        self.command(command::MADCTL, &[self.model.madctl(self.rotation)])?;
        delay.delay_ms(10);
        self.command(command::DISPON, &[])?;
        delay.delay_ms(100);

        self.initialized = true;
        self.set_backlight(u8::MAX)
    }

    /// Check if the init sequence has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn model(&self) -> PanelModel {
        self.model
    }

    /// Last backlight level set
    pub fn backlight_level(&self) -> u8 {
        self.backlight_level
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, RST, BL) {
        (self.spi, self.dc, self.rst, self.backlight)
    }

    fn command(&mut self, cmd: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Bus)?;
        self.spi.write(&[cmd]).map_err(|_| DisplayError::Bus)?;
        if !data.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Bus)?;
            self.spi.write(data).map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

/// Big-endian start/end pair for CASET/PASET
fn range_bytes(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

impl<SPI, DC, RST, BL> DisplaySurface for Panel<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: SetDutyCycle,
{
    fn width(&self) -> u16 {
        if self.rotation % 2 == 0 {
            self.native_width
        } else {
            self.native_height
        }
    }

    fn height(&self) -> u16 {
        if self.rotation % 2 == 0 {
            self.native_height
        } else {
            self.native_width
        }
    }

    fn rotation(&self) -> u8 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), DisplayError> {
        let rotation = rotation % 4;
        if self.initialized {
            self.command(command::MADCTL, &[self.model.madctl(rotation)])?;
        }
        self.rotation = rotation;
        Ok(())
    }

    fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError> {
        self.backlight
            .set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX))
            .map_err(|_| DisplayError::Bus)?;
        self.backlight_level = level;
        Ok(())
    }

    fn write_window(&mut self, window: Window) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.command(command::CASET, &range_bytes(window.x0, window.x1))?;
        self.command(command::PASET, &range_bytes(window.y0, window.y1))?;
        self.command(command::RAMWR, &[])
    }

    fn write_color(&mut self, color: Rgb565, count: u32) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        if count == 0 {
            return Ok(());
        }

        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        for pixel in chunk.chunks_exact_mut(2) {
            pixel[0] = hi;
            pixel[1] = lo;
        }

        self.dc.set_high().map_err(|_| DisplayError::Bus)?;
        let mut remaining = count as usize;
        while remaining > 0 {
            let pixels = remaining.min(CHUNK_PIXELS);
            self.spi
                .write(&chunk[..pixels * 2])
                .map_err(|_| DisplayError::Bus)?;
            remaining -= pixels;
        }
        Ok(())
    }
}
