//! Status panel wiring
//!
//! SPI2 at 40 MHz for the panel, LEDC timer 0 / channel 0 at 5 kHz with
//! 8-bit resolution for the backlight.

use anyhow::{anyhow, Result};
use atlink_core::config::PanelConfig;
use atlink_display::color::BLACK;
use atlink_display::DisplaySurface;
use atlink_drivers::Panel;
use esp_idf_hal::delay::Delay;
use esp_idf_hal::gpio::{AnyIOPin, Output, PinDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution, CHANNEL0, TIMER0};
use esp_idf_hal::prelude::*;
use esp_idf_hal::spi::{config::Config as SpiConfig, SpiDeviceDriver, SpiDriver, SpiDriverConfig, SPI2};
use log::info;

use crate::board::gpio;

pub type StatusPanel = Panel<
    SpiDeviceDriver<'static, SpiDriver<'static>>,
    PinDriver<'static, AnyIOPin, Output>,
    PinDriver<'static, AnyIOPin, Output>,
    LedcDriver<'static>,
>;

/// Bring the panel up: reset, init, rotation, black fill
pub fn init(config: &PanelConfig, spi: SPI2, timer: TIMER0, channel: CHANNEL0) -> Result<StatusPanel> {
    let driver = SpiDriver::new(
        spi,
        gpio(config.sck_pin),
        gpio(config.mosi_pin),
        Some(gpio(config.miso_pin)),
        &SpiDriverConfig::new(),
    )?;
    let device = SpiDeviceDriver::new(
        driver,
        Some(gpio(config.cs_pin)),
        &SpiConfig::new().baudrate(40.MHz().into()),
    )?;

    let dc = PinDriver::output(gpio(config.dc_pin))?;
    let rst = PinDriver::output(gpio(config.rst_pin))?;

    let timer = LedcTimerDriver::new(
        timer,
        &TimerConfig::new()
            .frequency(5.kHz().into())
            .resolution(Resolution::Bits8),
    )?;
    let backlight = LedcDriver::new(channel, timer, gpio(config.backlight_pin))?;

    let mut panel = Panel::new(
        device,
        dc,
        rst,
        backlight,
        config.controller.into(),
        config.width,
        config.height,
    );
    let display_err = |e| anyhow!("panel: {e:?}");
    panel.set_rotation(config.rotation).map_err(display_err)?;
    panel.begin(&mut Delay::new_default()).map_err(display_err)?;
    panel.fill_screen(BLACK).map_err(display_err)?;

    info!(
        target: "lcd",
        "{:?} ready, {}x{} rotation {}",
        panel.model(),
        panel.width(),
        panel.height(),
        panel.rotation()
    );
    Ok(panel)
}
