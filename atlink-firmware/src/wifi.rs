//! WiFi station management

use std::net::Ipv4Addr;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{debug, info, warn};

use crate::config::WifiCredentials;

/// Association attempts before giving up
pub const CONNECT_ATTEMPTS: u32 = 30;

/// Pause between association attempts
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Station link as shown on the status panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WifiStatus {
    pub connected: bool,
    /// Signal strength in dBm, 0 while disconnected
    pub rssi: i32,
    pub ip: Ipv4Addr,
}

/// Associated station interface
pub struct Station {
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl Station {
    /// Join the configured network and wait for a DHCP lease
    pub fn connect(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        credentials: &WifiCredentials,
    ) -> Result<Self> {
        if credentials.ssid.is_empty() {
            bail!("WiFi SSID cannot be empty");
        }

        let auth_method = if credentials.password.is_empty() {
            info!(target: "wifi", "password is empty, using open network");
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: credentials
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("SSID too long (max 32 chars)"))?,
            password: credentials
                .password
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("password too long (max 64 chars)"))?,
            auth_method,
            ..Default::default()
        }))?;
        wifi.start()?;

        info!(target: "wifi", "connecting to '{}'", credentials.ssid);
        let mut associated = false;
        for attempt in 1..=CONNECT_ATTEMPTS {
            match wifi.connect() {
                Ok(()) => {
                    associated = true;
                    break;
                }
                Err(e) => {
                    debug!(target: "wifi", "attempt {attempt}/{CONNECT_ATTEMPTS} failed: {e}");
                    thread::sleep(RETRY_DELAY);
                }
            }
        }
        if !associated {
            bail!("'{}' not joined after {CONNECT_ATTEMPTS} attempts", credentials.ssid);
        }

        wifi.wait_netif_up()?;

        let station = Self { wifi };
        let status = station.status();
        info!(target: "wifi", "connected, IP {} RSSI {} dBm", status.ip, status.rssi);
        Ok(station)
    }

    /// Current link state
    pub fn status(&self) -> WifiStatus {
        let connected = self.wifi.is_connected().unwrap_or(false);
        let rssi = if connected {
            self.wifi.wifi().driver().get_rssi().unwrap_or(0)
        } else {
            0
        };
        let ip = self
            .wifi
            .wifi()
            .sta_netif()
            .get_ip_info()
            .map(|info| info.ip)
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        WifiStatus {
            connected,
            rssi,
            ip,
        }
    }

    /// Start a background re-association if the station dropped
    ///
    /// Does not block; the outcome shows up in [`Station::status`].
    pub fn ensure_connected(&mut self) {
        if self.wifi.is_connected().unwrap_or(false) {
            return;
        }
        warn!(target: "wifi", "station disconnected, re-associating");
        if let Err(e) = self.wifi.wifi_mut().connect() {
            warn!(target: "wifi", "re-association failed to start: {e}");
        }
    }
}
