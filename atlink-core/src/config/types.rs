//! Configuration type definitions

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Maximum number of sensor / actuator channels per device
pub const MAX_CHANNELS: usize = 8;

/// Maximum length of URL and path strings
pub const MAX_URL_LEN: usize = 64;

/// Maximum length of the device serial number
pub const MAX_SERIAL_LEN: usize = 32;

/// Default reconnect delay after a lost connection
pub const DEFAULT_RECONNECT_INTERVAL_MS: u32 = 5_000;

/// Inbound silence after which the link is torn down
pub const HEARTBEAT_TIMEOUT_MS: u32 = 70_000;

/// What to announce after a handshake that is not the first since power-on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReconnectStatus {
    /// Emit a `"Reconnected"` status event
    Announce,
    /// Emit nothing
    Silent,
}

/// Cloud endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServerConfig {
    /// Base URL including scheme, e.g. `https://atcloud365.com`
    pub url: String<MAX_URL_LEN>,
    /// TLS port of the socket endpoint
    pub port: u16,
    /// Socket.IO mount path
    pub path: String<MAX_URL_LEN>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let mut url = String::new();
        let _ = url.push_str("https://atcloud365.com");
        let mut path = String::new();
        let _ = path.push_str("/api/dev/io/");
        Self {
            url,
            port: 443,
            path,
        }
    }
}

/// Device identity announced to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct DeviceIdentity {
    /// Serial number
    pub serial: String<MAX_SERIAL_LEN>,
    /// Id of the first channel; the others follow consecutively
    #[cfg_attr(feature = "serde", serde(default = "default_base_sensor_id"))]
    pub base_sensor_id: u32,
    /// Number of channels (sensors or outputs)
    #[cfg_attr(feature = "serde", serde(default = "default_channel_count"))]
    pub channel_count: u8,
}

#[cfg(feature = "serde")]
fn default_base_sensor_id() -> u32 {
    0x0f1234
}

#[cfg(feature = "serde")]
fn default_channel_count() -> u8 {
    3
}

/// Connection behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct LinkConfig {
    /// Delay before reconnecting after a disconnect
    #[cfg_attr(feature = "serde", serde(default = "default_reconnect_interval"))]
    pub reconnect_interval_ms: u32,
    /// Inbound silence that forces a teardown
    ///
    /// Defaults to [`HEARTBEAT_TIMEOUT_MS`] (70 s). Only tests override it.
    #[cfg_attr(feature = "serde", serde(default = "default_heartbeat_timeout"))]
    pub heartbeat_timeout_ms: u32,
    /// Status announcement after a reconnect. Deliberately has no default.
    pub reconnect_status: ReconnectStatus,
}

#[cfg(feature = "serde")]
fn default_reconnect_interval() -> u32 {
    DEFAULT_RECONNECT_INTERVAL_MS
}

#[cfg(feature = "serde")]
fn default_heartbeat_timeout() -> u32 {
    HEARTBEAT_TIMEOUT_MS
}

impl LinkConfig {
    /// Standard timings with the given reconnect announcement policy
    pub const fn new(reconnect_status: ReconnectStatus) -> Self {
        Self {
            reconnect_interval_ms: DEFAULT_RECONNECT_INTERVAL_MS,
            heartbeat_timeout_ms: HEARTBEAT_TIMEOUT_MS,
            reconnect_status,
        }
    }
}

/// Periods of the cooperative loop's local checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Input scan period
    pub gpio_scan_ms: u32,
    /// Unconditional `dev-data` period while connected
    pub data_send_ms: u32,
    /// Status panel refresh period
    pub ui_refresh_ms: u32,
    /// Output blink half-period
    pub blink_ms: u32,
    /// Offset of the displayed wall clock from UTC, in seconds
    pub utc_offset_s: i32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            gpio_scan_ms: 100,
            data_send_ms: 60_000,
            ui_refresh_ms: 1_000,
            blink_ms: 500,
            utc_offset_s: 9 * 3600,
        }
    }
}

/// Panel controller family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PanelController {
    #[default]
    St7789,
    Ili9341,
}

/// SPI status panel wiring and geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    pub controller: PanelController,
    pub width: u16,
    pub height: u16,
    /// Rotation 0-3 (quarter turns)
    pub rotation: u8,
    pub sck_pin: u8,
    pub mosi_pin: u8,
    pub miso_pin: u8,
    pub cs_pin: u8,
    pub dc_pin: u8,
    pub rst_pin: u8,
    pub backlight_pin: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        // ESP32-32E module wiring
        Self {
            controller: PanelController::St7789,
            width: 240,
            height: 320,
            rotation: 2,
            sck_pin: 14,
            mosi_pin: 13,
            miso_pin: 12,
            cs_pin: 15,
            dc_pin: 2,
            rst_pin: 22,
            backlight_pin: 21,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct DeviceConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub server: ServerConfig,
    pub device: DeviceIdentity,
    pub link: LinkConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub timing: TimingConfig,
    /// Status panel, absent on headless boards
    #[cfg_attr(feature = "serde", serde(default))]
    pub panel: Option<PanelConfig>,
    /// GPIO numbers of the channels, in declared order
    pub channel_pins: Vec<u8, MAX_CHANNELS>,
}

impl DeviceConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.device.channel_count as usize;
        if count == 0 || count > MAX_CHANNELS {
            return Err(ConfigError::ChannelCount);
        }
        if self.channel_pins.len() != count {
            return Err(ConfigError::ChannelPins);
        }
        if self.device.serial.is_empty() {
            return Err(ConfigError::MissingSerial);
        }
        if let Some(panel) = &self.panel {
            if panel.rotation > 3 || panel.width == 0 || panel.height == 0 {
                return Err(ConfigError::PanelGeometry);
            }
        }
        if self.link.heartbeat_timeout_ms == 0
            || self.timing.gpio_scan_ms == 0
            || self.timing.data_send_ms == 0
            || self.timing.blink_ms == 0
        {
            return Err(ConfigError::Timing);
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel count is zero or above [`MAX_CHANNELS`]
    ChannelCount,
    /// Number of channel pins differs from the channel count
    ChannelPins,
    /// Serial number is empty
    MissingSerial,
    /// Panel rotation or dimensions out of range
    PanelGeometry,
    /// A timing value is zero where it must not be
    Timing,
}
