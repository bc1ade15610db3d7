//! Dashboard renderer
//!
//! The first render (and the first after [`UiRenderer::reset`]) paints the
//! static layout: background, title, clock badge and every card in its OFF
//! state. Later renders compare each region's input fields with the
//! previous snapshot and repaint only the regions whose fields changed.

use crate::color::{theme, Rgb565};
use crate::geometry::Rect;
use crate::icons::{draw_socket, draw_wifi, wifi_bars};
use crate::layout::{Layout, DATE_SCALE, FOOTER_SCALE, TIME_SCALE, TITLE_SCALE};
use crate::snapshot::UiSnapshot;
use crate::surface::{DisplayError, DisplaySurface};
use crate::text::{draw_text, text_height, text_width};

/// Title shown in the status bar
pub const TITLE: &str = "ATCLOUD365";

/// Snapshot-diffing dashboard renderer
#[derive(Debug, Default)]
pub struct UiRenderer {
    previous: Option<UiSnapshot>,
    layout: Option<Layout>,
}

impl UiRenderer {
    /// Create a renderer; the first render is a full one
    pub const fn new() -> Self {
        Self {
            previous: None,
            layout: None,
        }
    }

    /// Forget the previous snapshot so the next render is a full one
    pub fn reset(&mut self) {
        self.previous = None;
        self.layout = None;
    }

    /// Check if the next render repaints everything
    pub fn needs_full_render(&self) -> bool {
        self.previous.is_none()
    }

    /// Current layout, once something has been rendered
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Render a snapshot
    ///
    /// Best effort: a bus error abandons this render and forces a full
    /// repaint next time.
    pub fn render<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S, snapshot: &UiSnapshot) {
        if self.try_render(surface, snapshot).is_err() {
            self.reset();
        }
    }

    fn try_render<S: DisplaySurface + ?Sized>(
        &mut self,
        surface: &mut S,
        snapshot: &UiSnapshot,
    ) -> Result<(), DisplayError> {
        let stale = match (&self.previous, &self.layout) {
            (Some(previous), Some(layout)) => {
                previous.sensors.len() != snapshot.sensors.len()
                    || layout.width != surface.width()
                    || layout.height != surface.height()
            }
            _ => true,
        };
        if stale {
            let layout = Layout::new(surface.width(), surface.height(), snapshot.sensors.len());
            draw_static(surface, &layout)?;
            self.layout = Some(layout);
            self.previous = None;
        }

        let Some(layout) = self.layout.as_ref() else {
            return Ok(());
        };
        let previous = self.previous.as_ref();

        if previous.map_or(true, |p| {
            p.date_text != snapshot.date_text || p.time_text != snapshot.time_text
        }) {
            draw_clock(surface, layout, snapshot)?;
        }

        if previous.map_or(true, |p| {
            p.wifi_connected != snapshot.wifi_connected || p.wifi_rssi != snapshot.wifi_rssi
        }) {
            let bars = wifi_bars(snapshot.wifi_connected, snapshot.wifi_rssi);
            draw_wifi(surface, layout.wifi, snapshot.wifi_connected, bars)?;
        }

        if previous.map_or(true, |p| p.socket_connected != snapshot.socket_connected) {
            draw_socket(surface, layout.socket, snapshot.socket_connected)?;
        }

        for (index, &on) in snapshot.sensors.iter().enumerate() {
            let unchanged = previous.is_some_and(|p| p.sensors.get(index) == Some(&on));
            // Cards were pre-painted OFF by the static layout
            let prepainted = previous.is_none() && !on;
            if unchanged || prepainted {
                continue;
            }
            if let Some(card) = layout.card(index) {
                draw_card(surface, card, layout.card_scale, index, on)?;
            }
        }

        if previous.map_or(true, |p| p.ip != snapshot.ip) {
            draw_footer(surface, layout.footer, snapshot)?;
        }

        self.previous = Some(snapshot.clone());
        Ok(())
    }
}

fn draw_static<S: DisplaySurface + ?Sized>(surface: &mut S, layout: &Layout) -> Result<(), DisplayError> {
    surface.fill_screen(theme::BACKGROUND)?;
    draw_text(surface, layout.title.x, layout.title.y, TITLE, theme::TEXT, TITLE_SCALE)?;
    fill(surface, layout.badge, theme::BADGE)?;
    for (index, card) in layout.cards.iter().enumerate() {
        draw_card(surface, *card, layout.card_scale, index, false)?;
    }
    Ok(())
}

fn draw_clock<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    layout: &Layout,
    snapshot: &UiSnapshot,
) -> Result<(), DisplayError> {
    fill(surface, layout.date, theme::BADGE)?;
    fill(surface, layout.time, theme::BADGE)?;
    draw_text(
        surface,
        layout.date.x,
        layout.date.y,
        &snapshot.date_text,
        theme::TEXT,
        DATE_SCALE,
    )?;
    draw_text(
        surface,
        layout.time.x,
        layout.time.y,
        &snapshot.time_text,
        theme::TEXT,
        TIME_SCALE,
    )?;
    Ok(())
}

fn draw_card<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    card: Rect,
    scale: u8,
    index: usize,
    on: bool,
) -> Result<(), DisplayError> {
    let background = if on { theme::SENSOR_ON } else { theme::SENSOR_OFF };
    fill(surface, card, background)?;
    surface.draw_rect_outline(card.x, card.y, card.w, card.h, theme::CARD_BORDER)?;

    let mut label: heapless::String<12> = heapless::String::new();
    let _ = core::fmt::write(&mut label, format_args!("SENSOR {}", index + 1));
    let state = if on { "ON" } else { "OFF" };

    let text_y = card.y + (card.h - text_height(scale)) / 2;
    draw_text(surface, card.x + 10, text_y, &label, theme::TEXT, scale)?;
    let state_x = card.right() - 10 - text_width(state, scale);
    draw_text(surface, state_x, text_y, state, theme::TEXT, scale)?;
    Ok(())
}

fn draw_footer<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    footer: Rect,
    snapshot: &UiSnapshot,
) -> Result<(), DisplayError> {
    fill(surface, footer, theme::BACKGROUND)?;

    let mut text: heapless::String<24> = heapless::String::new();
    let _ = core::fmt::write(&mut text, format_args!("IP {}", snapshot.ip));
    let y = footer.y + (footer.h - text_height(FOOTER_SCALE)) / 2;
    draw_text(surface, 8, y, &text, theme::MUTED_TEXT, FOOTER_SCALE)?;
    Ok(())
}

fn fill<S: DisplaySurface + ?Sized>(surface: &mut S, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
    surface.fill_rect(rect.x, rect.y, rect.w, rect.h, color)
}
