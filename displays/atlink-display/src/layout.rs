//! Dashboard regions
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ ATCLOUD365        [wifi][io] │  status bar
//! │ ┌──────────────────────────┐ │
//! │ │ 2026-02-13               │ │  clock badge
//! │ │ 10:24:30                 │ │
//! │ └──────────────────────────┘ │
//! │ ┌──────────────────────────┐ │
//! │ │ SENSOR 1             OFF │ │  one card per channel
//! │ └──────────────────────────┘ │
//! │ ...                          │
//! │ IP 192.168.1.10              │  footer
//! └──────────────────────────────┘
//! ```
//!
//! Regions are derived from the logical panel size so both orientations
//! work.

use heapless::Vec;

use crate::geometry::Rect;
use crate::snapshot::MAX_SENSORS;
use crate::text::text_height;

pub const MARGIN: i32 = 8;
pub const STATUS_BAR_HEIGHT: i32 = 32;
pub const ICON_WIDTH: i32 = 28;
pub const ICON_HEIGHT: i32 = 24;
pub const BADGE_HEIGHT: i32 = 64;
pub const FOOTER_HEIGHT: i32 = 20;
pub const CARD_GAP: i32 = 8;

/// Text scales
pub const TITLE_SCALE: u8 = 2;
pub const DATE_SCALE: u8 = 2;
pub const TIME_SCALE: u8 = 3;
pub const FOOTER_SCALE: u8 = 1;

/// Region rectangles for one panel size and sensor count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub title: Rect,
    pub wifi: Rect,
    pub socket: Rect,
    pub badge: Rect,
    pub date: Rect,
    pub time: Rect,
    pub footer: Rect,
    pub cards: Vec<Rect, MAX_SENSORS>,
    /// Scale of the card labels, 2 when the cards are tall enough
    pub card_scale: u8,
}

impl Layout {
    /// Compute the regions for a `width` x `height` panel
    pub fn new(width: u16, height: u16, sensor_count: usize) -> Self {
        let w = i32::from(width);
        let h = i32::from(height);

        let socket = Rect::new(w - MARGIN - ICON_WIDTH, 4, ICON_WIDTH, ICON_HEIGHT);
        let wifi = Rect::new(socket.x - MARGIN - ICON_WIDTH, 4, ICON_WIDTH, ICON_HEIGHT);
        let title = Rect::new(MARGIN, 9, wifi.x - 2 * MARGIN, text_height(TITLE_SCALE));

        let badge = Rect::new(MARGIN, STATUS_BAR_HEIGHT + MARGIN, w - 2 * MARGIN, BADGE_HEIGHT);
        let date = Rect::new(
            badge.x + 12,
            badge.y + 8,
            badge.w - 24,
            text_height(DATE_SCALE),
        );
        let time = Rect::new(
            badge.x + 12,
            badge.y + 30,
            badge.w - 24,
            text_height(TIME_SCALE),
        );

        let footer = Rect::new(0, h - FOOTER_HEIGHT, w, FOOTER_HEIGHT);

        let count = sensor_count.min(MAX_SENSORS) as i32;
        let top = badge.bottom() + 12;
        let available = footer.y - MARGIN - top;
        let card_h = if count > 0 {
            ((available - CARD_GAP * (count - 1)) / count).max(0)
        } else {
            0
        };
        let mut cards = Vec::new();
        for i in 0..count {
            let card = Rect::new(MARGIN, top + i * (card_h + CARD_GAP), w - 2 * MARGIN, card_h);
            let _ = cards.push(card);
        }
        let card_scale = if card_h >= text_height(2) + 8 { 2 } else { 1 };

        Self {
            width,
            height,
            title,
            wifi,
            socket,
            badge,
            date,
            time,
            footer,
            cards,
            card_scale,
        }
    }

    /// Card rectangle of channel `index`
    pub fn card(&self, index: usize) -> Option<Rect> {
        self.cards.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_three_cards() {
        let layout = Layout::new(240, 320, 3);
        assert_eq!(layout.cards.len(), 3);
        assert_eq!(layout.card_scale, 2);
        assert_eq!(layout.socket, Rect::new(204, 4, 28, 24));
        assert_eq!(layout.wifi, Rect::new(168, 4, 28, 24));
        assert!(layout.card(3).is_none());
    }

    #[test]
    fn test_regions_do_not_overlap() {
        for (w, h, n) in [(240, 320, 3), (320, 240, 3), (240, 320, 8)] {
            let layout = Layout::new(w, h, n);
            let mut regions = std::vec![layout.title, layout.wifi, layout.socket, layout.badge, layout.footer];
            regions.extend(layout.cards.iter().copied());

            for (i, a) in regions.iter().enumerate() {
                for b in regions.iter().skip(i + 1) {
                    let disjoint = a.right() <= b.x
                        || b.right() <= a.x
                        || a.bottom() <= b.y
                        || b.bottom() <= a.y;
                    assert!(disjoint, "{a:?} overlaps {b:?} on {w}x{h}");
                }
            }
        }
    }

    #[test]
    fn test_clock_text_inside_badge() {
        let layout = Layout::new(240, 320, 3);
        assert!(layout.badge.contains(&layout.date));
        assert!(layout.badge.contains(&layout.time));
    }

    #[test]
    fn test_many_cards_use_small_text() {
        let layout = Layout::new(320, 240, 8);
        assert_eq!(layout.cards.len(), 8);
        assert_eq!(layout.card_scale, 1);
    }
}
