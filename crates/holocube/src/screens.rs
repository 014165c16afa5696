//! Composite screens
//!
//! Each screen exists twice: a pure builder returning the command list (used
//! by the preview renderer and tests) and a `HoloCube` method that sends the
//! list through [`send_batched`](HoloCube::send_batched).

use std::time::Duration;

use embedded_graphics::prelude::Point;
use tracing::debug;

use crate::client::{ApiResponse, HoloCube};
use crate::color::Color;
use crate::command::{DrawCommand, TextStyle};
use crate::components::progress_bar::ProgressBar;
use crate::components::status_bar::StatusBar;
use crate::components::tracker_bar::{OsHeader, TrackerBar};
use crate::error::Result;
use crate::layout::{self, Layout};

/// Pause between the alert flash and its message.
const ALERT_FLASH: Duration = Duration::from_millis(100);

const PROGRESS_W: u32 = 200;
const PROGRESS_H: u32 = 30;
const PROGRESS_Y: i32 = 100;

/// `MM:SS`, or `H:MM:SS` from one hour upward.
pub fn format_time(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Text centred horizontally at `y`.
pub fn centered(y: i32, text: &str, style: TextStyle) -> DrawCommand {
    DrawCommand::text(layout::center_x(text, style.size), y, text, style)
}

/// Lines of centred text, the block vertically centred. Lines without a
/// matching colour are white.
pub fn message_screen(lines: &[&str], colors: &[Color], size: u8, bg: Color) -> Vec<DrawCommand> {
    let line_height = layout::text_height(size) + 10;
    let count = i32::try_from(lines.len()).unwrap_or(i32::MAX);
    let start_y = (HoloCube::SCREEN_HEIGHT - line_height.saturating_mul(count)).div_euclid(2);

    let mut cmds = vec![DrawCommand::clear(bg)];
    for (i, line) in (0i32..).zip(lines) {
        let color = usize::try_from(i)
            .ok()
            .and_then(|i| colors.get(i))
            .copied()
            .unwrap_or(Color::WHITE);
        let style = TextStyle::new().size(size).color(color);
        cmds.push(centered(start_y + i * line_height, line, style));
    }
    cmds
}

/// A big size-5 number at y=80 with an optional size-2 label at y=180.
pub fn big_number_screen(number: &str, label: Option<&str>, color: Color, bg: Color) -> Vec<DrawCommand> {
    let mut cmds = vec![
        DrawCommand::clear(bg),
        centered(80, number, TextStyle::new().size(5).color(color)),
    ];
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        cmds.push(centered(180, label, TextStyle::new()));
    }
    cmds
}

/// Centred 200x30 progress bar with a percentage below and a label above.
///
/// The bar is clamped to 0..=1; the percentage is `progress * 100`
/// truncated, without clamping.
#[allow(clippy::cast_possible_truncation)]
pub fn progress_screen(progress: f32, label: Option<&str>, fg: Color, bg: Color) -> Vec<DrawCommand> {
    let mut cmds = vec![DrawCommand::clear(bg)];
    let bar_x = (HoloCube::SCREEN_WIDTH - PROGRESS_W as i32) / 2;
    ProgressBar::new(PROGRESS_W, PROGRESS_H)
        .progress(progress)
        .colors(Color::DARK_GRAY, fg)
        .render(&mut cmds, Point::new(bar_x, PROGRESS_Y));

    // `as` saturates and maps NaN to 0
    let pct = ((progress * 100.0).trunc() as i64).to_string();
    cmds.push(centered(PROGRESS_Y + PROGRESS_H as i32 + 20, &pct, TextStyle::new().size(3)));

    if let Some(label) = label.filter(|l| !l.is_empty()) {
        cmds.push(centered(60, label, TextStyle::new()));
    }
    cmds
}

/// How [`HoloCube::show_timer`] draws the time.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    /// Label above the time.
    pub label: Option<String>,
    /// Colour of the digits.
    pub color: Color,
    /// Background behind the digits.
    pub bg: Color,
    /// Clear the screen (and draw the label) first. Set only on the first frame.
    pub clear_screen: bool,
    /// Top y of the time; 90 when unset.
    pub y: Option<i32>,
    /// Font multiplier for the time.
    pub size: u8,
}

impl Default for TimerView {
    fn default() -> Self {
        Self {
            label: None,
            color: Color::CYAN,
            bg: Color::BLACK,
            clear_screen: false,
            y: None,
            size: 5,
        }
    }
}

impl TimerView {
    /// Cyan 5x time on black at y 90.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text drawn above the time on a cleared screen.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Time and background colours.
    pub fn colors(mut self, color: Color, bg: Color) -> Self {
        self.color = color;
        self.bg = bg;
        self
    }

    /// Clear and draw the label before the time.
    pub fn clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Top y of the time.
    pub fn at(mut self, y: i32) -> Self {
        self.y = Some(y);
        self
    }

    /// Font multiplier for the time.
    pub fn size(mut self, size: u8) -> Self {
        self.size = size;
        self
    }
}

/// Commands for one timer frame.
pub fn timer_screen(seconds: u64, view: &TimerView) -> Vec<DrawCommand> {
    let mut cmds = Vec::new();
    if view.clear_screen {
        cmds.push(DrawCommand::clear(view.bg));
        if let Some(label) = view.label.as_deref().filter(|l| !l.is_empty()) {
            cmds.push(centered(40, label, TextStyle::new()));
        }
    }
    let time = format_time(seconds);
    let style = TextStyle::new()
        .size(view.size)
        .color(view.color)
        .cleared(view.bg);
    cmds.push(centered(view.y.unwrap_or(90), &time, style));
    cmds
}

impl HoloCube {
    /// Draw horizontally centred text (one request).
    pub async fn centered_text(&self, y: i32, text: &str, style: TextStyle) -> Result<ApiResponse> {
        self.draw(&centered(y, text, style)).await
    }

    /// Clear to `bg` and show centred lines.
    pub async fn show_message(
        &self,
        lines: &[&str],
        colors: &[Color],
        size: u8,
        bg: Color,
    ) -> Result<ApiResponse> {
        self.send_batched(&message_screen(lines, colors, size, bg)).await
    }

    /// Large centred number with an optional label.
    pub async fn show_big_number(
        &self,
        number: &str,
        label: Option<&str>,
        color: Color,
        bg: Color,
    ) -> Result<ApiResponse> {
        self.send_batched(&big_number_screen(number, label, color, bg))
            .await
    }

    /// Progress from 0.0 to 1.0.
    pub async fn show_progress(
        &self,
        progress: f32,
        label: Option<&str>,
        fg: Color,
        bg: Color,
    ) -> Result<ApiResponse> {
        self.send_batched(&progress_screen(progress, label, fg, bg))
            .await
    }

    /// Flash the whole screen in `color`, then show `message` on it.
    pub async fn alert(&self, message: &str, color: Color) -> Result<ApiResponse> {
        debug!(message, %color, "alert");
        self.clear(color).await?;
        tokio::time::sleep(ALERT_FLASH).await;
        self.show_message(&[message], &[Color::WHITE], 3, color).await
    }

    /// Draw one timer frame.
    pub async fn show_timer(&self, seconds: u64, view: &TimerView) -> Result<ApiResponse> {
        self.send_batched(&timer_screen(seconds, view)).await
    }

    /// Redraw only the status region.
    pub async fn draw_status_bar(&self, layout: &Layout, bar: &StatusBar) -> Result<ApiResponse> {
        let mut cmds = Vec::new();
        bar.render(layout, &mut cmds);
        self.send_batched(&cmds).await
    }

    /// Redraw only the tracker bar.
    pub async fn draw_tracker_bar(&self, layout: &Layout, bar: &TrackerBar<'_>) -> Result<ApiResponse> {
        let mut cmds = Vec::new();
        bar.render(layout, &mut cmds);
        self.send_batched(&cmds).await
    }

    /// Redraw only the OS header.
    pub async fn draw_os_header(&self, layout: &Layout, header: &OsHeader<'_>) -> Result<ApiResponse> {
        let mut cmds = Vec::new();
        header.render(layout, &mut cmds);
        self.send_batched(&cmds).await
    }

    /// Render components into a command list and send it batched.
    pub async fn render<F>(&self, draw: F) -> Result<ApiResponse>
    where
        F: FnOnce(&mut Vec<DrawCommand>),
    {
        let mut cmds: Vec<DrawCommand> = Vec::new();
        draw(&mut cmds);
        self.send_batched(&cmds).await
    }
}
