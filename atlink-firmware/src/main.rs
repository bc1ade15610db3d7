//! atlink - atCloud365 device firmware for ESP32 boards
//!
//! Boot sequence:
//!
//! 1. Logger and embedded device.toml
//! 2. WiFi station (restart if the network cannot be joined)
//! 3. HTTPS token exchange (restart after 10 s if rejected)
//! 4. Status panel, when the board has one
//! 5. Socket.IO link, then the cooperative control loop
//!
//! The loop owns the link, the channel bank and the panel; nothing else
//! touches them.

mod auth;
mod board;
mod channels;
mod clock;
mod config;
mod panel;
mod transport;
mod wifi;

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use atlink_core::device::{Channels, CommandQueue, Controller, Interval};
use atlink_core::link::Link;
use atlink_display::{UiRenderer, UiSnapshot};
use atlink_hal::Clock;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info};

use crate::channels::Bank;
use crate::clock::{BootClock, WallClock};
use crate::panel::StatusPanel;
use crate::transport::{endpoint_uri, WsTransport};
use crate::wifi::Station;

/// Wait before restarting when the WiFi network cannot be joined or the
/// boot sequence fails otherwise
const BOOT_FAILURE_DELAY: Duration = Duration::from_secs(5);

/// Wait before restarting when the token exchange fails
const AUTH_FAILURE_DELAY: Duration = Duration::from_secs(10);

/// Time for the `"Rebooting"` status to leave before a commanded restart
const REBOOT_DELAY: Duration = Duration::from_secs(1);

/// Pause between loop iterations
const LOOP_DELAY_MS: u32 = 10;

/// Station health check period
const WIFI_CHECK_MS: u32 = 10_000;

type DeviceController = Controller<WsTransport, Bank>;

fn main() {
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();

    info!("atlink firmware v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        error!("boot failed: {e:#}");
        restart_after(BOOT_FAILURE_DELAY);
    }
}

fn restart_after(delay: Duration) -> ! {
    info!("restarting in {} s", delay.as_secs());
    thread::sleep(delay);
    esp_idf_hal::reset::restart()
}

fn run() -> Result<()> {
    let settings = config::load()?;
    info!(
        "device {} ({:?}, {} channels)",
        settings.device.device.serial, settings.role, settings.device.device.channel_count
    );

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut station = match Station::connect(peripherals.modem, sysloop, nvs, &settings.wifi) {
        Ok(station) => station,
        Err(e) => {
            error!(target: "wifi", "{e:#}");
            restart_after(BOOT_FAILURE_DELAY)
        }
    };

    let token = match auth::request_token(&settings) {
        Ok(token) => token,
        Err(e) => {
            error!(target: "auth", "authentication failed: {e:#}");
            restart_after(AUTH_FAILURE_DELAY)
        }
    };

    let bank = Bank::build(
        settings.role,
        &settings.device.channel_pins,
        &settings.device.timing,
    )?;

    let mut display = match &settings.device.panel {
        Some(panel_config) => Some(panel::init(
            panel_config,
            peripherals.spi2,
            peripherals.ledc.timer0,
            peripherals.ledc.channel0,
        )?),
        None => None,
    };
    let mut renderer = UiRenderer::new();
    let mut wall_clock = WallClock::start(settings.device.timing.utc_offset_s)?;

    let uri = endpoint_uri(&settings.device);
    info!(target: "socket", "endpoint {uri}");
    let mut link = Link::new(WsTransport::new(uri), CommandQueue::new(), settings.device.link);
    link.set_token(&token)
        .map_err(|e| anyhow!("token rejected by link: {e:?}"))?;

    let clock = BootClock::new();
    let mut controller = Controller::new(link, bank, &settings.device.timing);

    if let Some(panel) = display.as_mut() {
        let snapshot = collect_ui_state(&station, &controller, &mut wall_clock);
        renderer.render(panel, &snapshot);
    }

    controller
        .link_mut()
        .begin(clock.now_ms())
        .map_err(|e| anyhow!("link start: {e:?}"))?;

    let mut wifi_check = Interval::new(WIFI_CHECK_MS);
    loop {
        let now = clock.now_ms();
        let report = controller.step(now);

        if report.reboot {
            restart_after(REBOOT_DELAY);
        }

        if wifi_check.poll(now) {
            station.ensure_connected();
        }

        if report.refresh_ui {
            refresh(display.as_mut(), &mut renderer, &station, &controller, &mut wall_clock);
        }

        FreeRtos::delay_ms(LOOP_DELAY_MS);
    }
}

fn collect_ui_state(station: &Station, controller: &DeviceController, wall_clock: &mut WallClock) -> UiSnapshot {
    let wifi = station.status();
    let mut snapshot = UiSnapshot::with_sensors(controller.channels().states());
    snapshot.wifi_connected = wifi.connected;
    snapshot.wifi_rssi = wifi.rssi;
    snapshot.ip = wifi.ip;
    snapshot.socket_connected = controller.link().is_ready();
    if let Some((date, time)) = wall_clock.local_texts() {
        snapshot.set_date(&date);
        snapshot.set_time(&time);
    }
    snapshot
}

fn refresh(
    display: Option<&mut StatusPanel>,
    renderer: &mut UiRenderer,
    station: &Station,
    controller: &DeviceController,
    wall_clock: &mut WallClock,
) {
    if let Some(panel) = display {
        let snapshot = collect_ui_state(station, controller, wall_clock);
        renderer.render(panel, &snapshot);
    }
}
