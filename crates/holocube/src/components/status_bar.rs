//! Status bar with WiFi and battery indicators

use embedded_graphics::prelude::Point;

use crate::color::Color;
use crate::command::{Canvas, DrawCommand, TextStyle};
use crate::layout::{self, Layout};

const ICON_H: i32 = 10;
const WIFI_W: i32 = 14;
const BATTERY_W: i32 = 20;
const BATTERY_BODY_W: i32 = 16;
const BATTERY_NUB_W: i32 = 3;
const BATTERY_NUB_H: i32 = 4;
const WIFI_BARS: i32 = 4;

/// Top status bar: optional left/right text, WiFi bars and a battery gauge.
///
/// Only the status region is redrawn, never the full screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar {
    left_text: String,
    right_text: String,
    wifi_connected: bool,
    wifi_bars: i32,
    battery_pct: i32,
    charging: bool,
    fg: Color,
    bg: Color,
    clear_bg: bool,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self {
            left_text: String::new(),
            right_text: String::new(),
            wifi_connected: true,
            wifi_bars: WIFI_BARS,
            battery_pct: 100,
            charging: false,
            fg: Color::WHITE,
            bg: Color::BLACK,
            clear_bg: true,
        }
    }
}

impl StatusBar {
    /// Empty bar, connected WiFi at full strength, full battery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text at the left edge.
    pub fn left_text(mut self, text: impl Into<String>) -> Self {
        self.left_text = text.into();
        self
    }

    /// Text placed just left of the icons (a clock, usually).
    pub fn right_text(mut self, text: impl Into<String>) -> Self {
        self.right_text = text.into();
        self
    }

    /// Connection state and signal strength in bars (clamped to 0..=4).
    pub fn wifi(mut self, connected: bool, bars: i32) -> Self {
        self.wifi_connected = connected;
        self.wifi_bars = bars;
        self
    }

    /// Charge level (clamped to 0..=100) and whether to draw the bolt.
    pub fn battery(mut self, pct: i32, charging: bool) -> Self {
        self.battery_pct = pct;
        self.charging = charging;
        self
    }

    /// Text and background colours.
    pub fn colors(mut self, fg: Color, bg: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// Wipe the bar before drawing (default on).
    pub fn clear_background(mut self, clear: bool) -> Self {
        self.clear_bg = clear;
        self
    }

    /// Draw the bar into the status band.
    pub fn render<C: Canvas>(&self, layout: &Layout, canvas: &mut C) {
        let bar = layout.status_rect();
        let (bx, by) = (bar.top_left.x, bar.top_left.y);
        let (bw, bh) = (layout::width(&bar), layout::height(&bar));
        let pad = layout.padding;
        let icon_y = by + ((bh - ICON_H) / 2).max(0);
        let text_y = layout.status_text_y(1);
        let icons_w = WIFI_W + layout.gap + BATTERY_W;

        if self.clear_bg {
            canvas.draw(DrawCommand::fill_rect(bx, by, bw, bh, self.bg));
        }
        // separator on the last row
        canvas.draw(DrawCommand::fill_rect(bx, by + bh - 1, bw, 1, Color::DARK_GRAY));

        let battery_x = bx + bw - pad - BATTERY_W;
        self.render_battery(canvas, Point::new(battery_x, icon_y));

        let wifi_x = battery_x - layout.gap - WIFI_W;
        self.render_wifi(canvas, Point::new(wifi_x, icon_y));

        let text = TextStyle::new().size(1).color(self.fg).background(self.bg);
        if !self.right_text.is_empty() {
            let tw = layout::text_width(&self.right_text, 1);
            let tx = bx + bw - pad - icons_w - layout.gap - tw;
            canvas.draw(DrawCommand::text(tx, text_y, self.right_text.as_str(), text));
        }
        if !self.left_text.is_empty() {
            canvas.draw(DrawCommand::text(bx + pad, text_y, self.left_text.as_str(), text));
        }
    }

    fn render_battery<C: Canvas>(&self, canvas: &mut C, at: Point) {
        let nub_y = at.y + (ICON_H - BATTERY_NUB_H) / 2;
        canvas.draw(DrawCommand::stroke_rect(at.x, at.y, BATTERY_BODY_W, ICON_H, self.fg));
        canvas.draw(DrawCommand::fill_rect(
            at.x + BATTERY_BODY_W,
            nub_y,
            BATTERY_NUB_W,
            BATTERY_NUB_H,
            self.fg,
        ));

        let pct = self.battery_pct.clamp(0, 100);
        let fill_w = (BATTERY_BODY_W - 2) * pct / 100;
        if fill_w > 0 {
            canvas.draw(DrawCommand::fill_rect(at.x + 1, at.y + 1, fill_w, ICON_H - 2, self.fg));
        }

        if self.charging {
            // bolt, cut out of the gauge in the background colour
            let cx = at.x + BATTERY_BODY_W / 2;
            let cy = at.y + ICON_H / 2;
            canvas.draw_all([
                DrawCommand::line(Point::new(cx - 2, cy - 3), Point::new(cx, cy), self.bg),
                DrawCommand::line(Point::new(cx, cy), Point::new(cx - 1, cy + 3), self.bg),
                DrawCommand::line(Point::new(cx + 2, cy - 3), Point::new(cx, cy), self.bg),
            ]);
        }
    }

    fn render_wifi<C: Canvas>(&self, canvas: &mut C, at: Point) {
        canvas.draw(DrawCommand::fill_rect(at.x, at.y, WIFI_W, ICON_H, self.bg));
        if !self.wifi_connected {
            canvas.draw(DrawCommand::stroke_rect(at.x, at.y, WIFI_W, ICON_H, Color::GRAY));
        }

        let lit = self.wifi_bars.clamp(0, WIFI_BARS);
        for i in 0..WIFI_BARS {
            let (bar_w, gap) = (2, 1);
            let bar_h = 2 + i * 2;
            let color = if self.wifi_connected && i < lit {
                self.fg
            } else {
                Color::GRAY
            };
            canvas.draw(DrawCommand::fill_rect(
                at.x + 1 + i * (bar_w + gap),
                at.y + ICON_H - bar_h,
                bar_w,
                bar_h,
                color,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bar: &StatusBar) -> Vec<DrawCommand> {
        let mut cmds = Vec::new();
        bar.render(&Layout::default(), &mut cmds);
        cmds
    }

    fn rect_colors(cmds: &[DrawCommand]) -> Vec<(i32, i32, Color)> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { x, h, color, fill: true, .. } => Some((*x, *h, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_default_bar_layout() {
        let cmds = render(&StatusBar::new());
        // clear, separator, battery body + nub + fill, wifi bg, 4 bars
        assert_eq!(cmds.len(), 10);
        assert_eq!(cmds[0], DrawCommand::fill_rect(0, 0, 240, 64, Color::BLACK));
        assert_eq!(cmds[1], DrawCommand::fill_rect(0, 63, 240, 1, Color::DARK_GRAY));
        // battery flush against the right padding
        assert_eq!(cmds[2], DrawCommand::stroke_rect(210, 27, 16, 10, Color::WHITE));
        assert_eq!(cmds[4], DrawCommand::fill_rect(211, 28, 14, 8, Color::WHITE));
    }

    #[test]
    fn test_battery_fill_clamped() {
        let full = render(&StatusBar::new().battery(250, false));
        assert!(full.contains(&DrawCommand::fill_rect(211, 28, 14, 8, Color::WHITE)));

        let empty = render(&StatusBar::new().battery(-5, false));
        assert!(!empty.iter().any(|c| matches!(c, DrawCommand::Rect { x: 211, .. })));
    }

    #[test]
    fn test_charging_draws_bolt() {
        let cmds = render(&StatusBar::new().battery(50, true));
        let lines = cmds.iter().filter(|c| c.kind() == "line").count();
        assert_eq!(lines, 3);
    }

    #[test]
    fn test_wifi_bars_lit_only_when_connected() {
        let two = rect_colors(&render(&StatusBar::new().wifi(true, 2)));
        let bars: Vec<Color> = two.iter().rev().take(4).rev().map(|(_, _, c)| *c).collect();
        assert_eq!(bars, vec![Color::WHITE, Color::WHITE, Color::GRAY, Color::GRAY]);

        let offline = render(&StatusBar::new().wifi(false, 4));
        assert!(offline.contains(&DrawCommand::stroke_rect(190, 27, 14, 10, Color::GRAY)));
        let bars = rect_colors(&offline);
        assert!(bars.iter().rev().take(4).all(|(_, _, c)| *c == Color::GRAY));
    }

    #[test]
    fn test_texts_positioned() {
        let cmds = render(&StatusBar::new().left_text("FOCUS").right_text("12:30"));
        let texts: Vec<(i32, i32, String)> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, y, text, .. } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .collect();
        // right text ends one gap before the icon cluster (240 - 10 - 40 - 6)
        assert_eq!(texts[0], (184 - 30, 28, "12:30".to_string()));
        assert_eq!(texts[1], (10, 28, "FOCUS".to_string()));
    }

    #[test]
    fn test_no_clear() {
        let cmds = render(&StatusBar::new().clear_background(false));
        assert_eq!(cmds[0], DrawCommand::fill_rect(0, 63, 240, 1, Color::DARK_GRAY));
    }
}
