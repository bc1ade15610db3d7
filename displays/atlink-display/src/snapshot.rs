//! Dashboard state for one render tick

use core::net::Ipv4Addr;

use heapless::{String, Vec};

/// Maximum number of sensor / output cards
pub const MAX_SENSORS: usize = 8;

/// Maximum length of the date and time texts
pub const MAX_CLOCK_TEXT: usize = 16;

/// Date shown before the wall clock is synchronized
pub const DATE_PLACEHOLDER: &str = "--";

/// Time shown before the wall clock is synchronized
pub const TIME_PLACEHOLDER: &str = "--:--:--";

/// Everything the dashboard shows
///
/// Built fresh for every render; the renderer keeps only the previous one
/// for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSnapshot {
    pub wifi_connected: bool,
    /// Signal strength in dBm, meaningful only while connected
    pub wifi_rssi: i32,
    pub socket_connected: bool,
    /// Channel states in declared order (`true` = ON / active)
    pub sensors: Vec<bool, MAX_SENSORS>,
    /// e.g. `2026-02-13`
    pub date_text: String<MAX_CLOCK_TEXT>,
    /// e.g. `10:24:30`
    pub time_text: String<MAX_CLOCK_TEXT>,
    pub ip: Ipv4Addr,
}

impl Default for UiSnapshot {
    fn default() -> Self {
        let mut snapshot = Self {
            wifi_connected: false,
            wifi_rssi: 0,
            socket_connected: false,
            sensors: Vec::new(),
            date_text: String::new(),
            time_text: String::new(),
            ip: Ipv4Addr::UNSPECIFIED,
        };
        snapshot.set_date(DATE_PLACEHOLDER);
        snapshot.set_time(TIME_PLACEHOLDER);
        snapshot
    }
}

impl UiSnapshot {
    /// Snapshot with `states` as the sensor list (extra states are dropped)
    pub fn with_sensors(states: &[bool]) -> Self {
        let mut snapshot = Self::default();
        snapshot.set_sensors(states);
        snapshot
    }

    /// Replace the sensor list, keeping at most [`MAX_SENSORS`] entries
    pub fn set_sensors(&mut self, states: &[bool]) {
        self.sensors.clear();
        for &state in states.iter().take(MAX_SENSORS) {
            let _ = self.sensors.push(state);
        }
    }

    /// Set the date text, truncated to fit
    pub fn set_date(&mut self, text: &str) {
        copy_truncated(&mut self.date_text, text);
    }

    /// Set the time text, truncated to fit
    pub fn set_time(&mut self, text: &str) {
        copy_truncated(&mut self.time_text, text);
    }
}

fn copy_truncated<const N: usize>(dst: &mut String<N>, src: &str) {
    dst.clear();
    for ch in src.chars() {
        if dst.push(ch).is_err() {
            break;
        }
    }
}
