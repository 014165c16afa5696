//! Text metrics and the three-region screen template
//!
//! The device font is 6x8 pixels per glyph at size 1 and scales by integer
//! multiples. All helpers use floor division, so centring text that is wider
//! than the screen yields a negative x.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::client::HoloCube;

/// Glyph width at size 1.
pub const CHAR_WIDTH: i32 = 6;
/// Glyph height at size 1.
pub const CHAR_HEIGHT: i32 = 8;

/// Pixel width of `text` at `size`.
pub fn text_width(text: &str, size: u8) -> i32 {
    let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
    chars.saturating_mul(CHAR_WIDTH).saturating_mul(i32::from(size))
}

/// Pixel height of one line at `size`.
pub fn text_height(size: u8) -> i32 {
    CHAR_HEIGHT * i32::from(size)
}

/// X that centres `text` horizontally on the screen.
pub fn center_x(text: &str, size: u8) -> i32 {
    (HoloCube::SCREEN_WIDTH - text_width(text, size)).div_euclid(2)
}

/// Y that centres one line vertically on the screen.
pub fn center_y(size: u8) -> i32 {
    (HoloCube::SCREEN_HEIGHT - text_height(size)).div_euclid(2)
}

fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle {
    Rectangle::new(
        Point::new(x, y),
        Size::new(w.max(0).unsigned_abs(), h.max(0).unsigned_abs()),
    )
}

/// Height of a rectangle as a signed pixel count.
pub(crate) fn height(r: &Rectangle) -> i32 {
    i32::try_from(r.size.height).unwrap_or(i32::MAX)
}

/// Width of a rectangle as a signed pixel count.
pub(crate) fn width(r: &Rectangle) -> i32 {
    i32::try_from(r.size.width).unwrap_or(i32::MAX)
}

/// Status bar on top, app body in the middle, mascot footer at the bottom.
///
/// Static regions are drawn once; apps then redraw only the small dynamic
/// parts (counters, timer digits) to keep request counts low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Screen width in pixels.
    pub screen_w: i32,
    /// Screen height in pixels.
    pub screen_h: i32,
    /// Inset from the screen edges.
    pub padding: i32,
    /// Space between stacked elements.
    pub gap: i32,
    /// Status bar height.
    pub status_h: i32,
    /// Footer height.
    pub footer_h: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            screen_w: HoloCube::SCREEN_WIDTH,
            screen_h: HoloCube::SCREEN_HEIGHT,
            padding: 10,
            gap: 6,
            status_h: 64,
            footer_h: 70,
        }
    }
}

impl Layout {
    /// Status band at the top of the screen.
    pub fn status_rect(&self) -> Rectangle {
        rect(0, 0, self.screen_w, self.status_h.min(self.screen_h))
    }

    /// Footer band at the bottom of the screen.
    pub fn footer_rect(&self) -> Rectangle {
        let h = self.footer_h.min(self.screen_h);
        rect(0, self.screen_h - h, self.screen_w, h)
    }

    /// Whatever is left between status bar and footer (possibly empty).
    pub fn body_rect(&self) -> Rectangle {
        let top = self.status_h.min(self.screen_h);
        let bottom = self.footer_h.min(self.screen_h);
        rect(0, top, self.screen_w, (self.screen_h - top - bottom).max(0))
    }

    /// Top y of a single text line centred in the status bar.
    pub fn status_text_y(&self, size: u8) -> i32 {
        let bar = self.status_rect();
        bar.top_left.y + ((height(&bar) - text_height(size)) / 2).max(0)
    }

    /// Anchor for the mascot in the footer.
    pub fn mascot_anchor(&self) -> Point {
        let footer = self.footer_rect();
        Point::new(self.screen_w / 2, footer.top_left.y + 20)
    }

    /// Top y for a big timer string, vertically centred in the body.
    pub fn timer_y(&self, size: u8) -> i32 {
        let body = self.body_rect();
        body.top_left.y + ((height(&body) - text_height(size)) / 2).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_metrics() {
        assert_eq!(text_width("HELLO", 2), 60);
        assert_eq!(text_height(3), 24);
        assert_eq!(center_x("HELLO", 2), 90);
        assert_eq!(center_y(2), 112);
    }

    #[test]
    fn test_center_x_floors_negative() {
        // 41 glyphs at size 1 = 246 px, 6 px wider than the screen.
        let wide = "x".repeat(41);
        assert_eq!(center_x(&wide, 1), -3);
        // 7 px over: floor(-7 / 2) = -4
        assert_eq!((HoloCube::SCREEN_WIDTH - 247).div_euclid(2), -4);
    }

    #[test]
    fn test_default_regions() {
        let layout = Layout::default();
        assert_eq!(layout.status_rect(), rect(0, 0, 240, 64));
        assert_eq!(layout.footer_rect(), rect(0, 170, 240, 70));
        assert_eq!(layout.body_rect(), rect(0, 64, 240, 106));
    }

    #[test]
    fn test_body_clamps_to_zero() {
        let layout = Layout {
            status_h: 200,
            footer_h: 100,
            ..Layout::default()
        };
        assert_eq!(layout.body_rect().size.height, 0);
    }

    #[test]
    fn test_anchor_and_text_positions() {
        let layout = Layout::default();
        assert_eq!(layout.mascot_anchor(), Point::new(120, 190));
        assert_eq!(layout.status_text_y(1), 28);
        assert_eq!(layout.timer_y(5), 64 + 33);
    }
}
