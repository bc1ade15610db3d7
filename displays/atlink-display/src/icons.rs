//! Status icons

use crate::color::{theme, Rgb565};
use crate::geometry::Rect;
use crate::surface::{DisplayError, DisplaySurface};

/// Number of bars in the WiFi indicator
pub const WIFI_BAR_COUNT: u8 = 4;

/// Active WiFi bars for a signal strength
///
/// -50 dBm and stronger is 4 bars, -60 is 3, -70 is 2, anything weaker
/// (while connected) is 1. Disconnected is always 0.
pub fn wifi_bars(connected: bool, rssi_dbm: i32) -> u8 {
    match (connected, rssi_dbm) {
        (false, _) => 0,
        (true, rssi) if rssi >= -50 => 4,
        (true, rssi) if rssi >= -60 => 3,
        (true, rssi) if rssi >= -70 => 2,
        (true, _) => 1,
    }
}

/// Draw the WiFi bar indicator inside `area`
pub fn draw_wifi<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    area: Rect,
    connected: bool,
    bars: u8,
) -> Result<(), DisplayError> {
    surface.fill_rect(area.x, area.y, area.w, area.h, theme::BACKGROUND)?;

    let count = i32::from(WIFI_BAR_COUNT);
    let pitch = area.w / count;
    let bar_w = (pitch - 2).max(1);
    for i in 0..count {
        let bar_h = area.h * (i + 1) / count;
        let color: Rgb565 = if !connected {
            theme::ICON_DISCONNECTED
        } else if i < i32::from(bars) {
            theme::ICON_ACTIVE
        } else {
            theme::ICON_IDLE
        };
        surface.fill_rect(area.x + i * pitch, area.bottom() - bar_h, bar_w, bar_h, color)?;
    }
    Ok(())
}

/// Draw the cloud-link indicator inside `area`
///
/// A framed block: green while the socket is connected, red otherwise.
pub fn draw_socket<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    area: Rect,
    connected: bool,
) -> Result<(), DisplayError> {
    let color = if connected {
        theme::ICON_ACTIVE
    } else {
        theme::ICON_DISCONNECTED
    };
    surface.fill_rect(area.x, area.y, area.w, area.h, theme::BACKGROUND)?;
    surface.draw_rect_outline(area.x, area.y, area.w, area.h, color)?;
    let core = area.inset(area.h.min(area.w) / 4);
    surface.fill_rect(core.x, core.y, core.w, core.h, color)
}
