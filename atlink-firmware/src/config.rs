//! Embedded device configuration
//!
//! device.toml is compiled into the image. The shared tables deserialize
//! into [`DeviceConfig`]; the board-only parts (role, credentials) are read
//! from the same document here.

use anyhow::{anyhow, ensure, Context, Result};
use atlink_core::config::DeviceConfig;
use serde::Deserialize;

use crate::board::CHANNEL_COUNT;

/// Embedded configuration (checked by build.rs)
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

/// What the channels are wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Pulled-up contact inputs
    Sensor,
    /// Actuator outputs
    Output,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSecret {
    pub client_secret_key: String,
}

#[derive(Deserialize)]
struct BoardSection {
    role: Role,
    wifi: WifiCredentials,
    auth: AuthSecret,
}

/// Everything the boot sequence needs
pub struct Settings {
    pub role: Role,
    pub wifi: WifiCredentials,
    pub auth: AuthSecret,
    pub device: DeviceConfig,
}

/// Parse and validate the embedded configuration
pub fn load() -> Result<Settings> {
    let device: DeviceConfig =
        toml::from_str(EMBEDDED_CONFIG).context("device.toml does not match DeviceConfig")?;
    device
        .validate()
        .map_err(|e| anyhow!("device.toml rejected: {e:?}"))?;
    ensure!(
        device.channel_pins.len() == CHANNEL_COUNT,
        "firmware built for {CHANNEL_COUNT} channels, config has {}",
        device.channel_pins.len()
    );

    let board: BoardSection =
        toml::from_str(EMBEDDED_CONFIG).context("device.toml board section")?;

    Ok(Settings {
        role: board.role,
        wifi: board.wifi,
        auth: board.auth,
        device,
    })
}
