//! Habit tracker header: four icon cells with counts
//!
//! Two variants share the same data: [`TrackerBar`] fills the status region
//! with one row of large icons, [`OsHeader`] packs small icons above a
//! title/clock row.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use embedded_graphics::prelude::Point;
use tracing::warn;

use crate::color::Color;
use crate::command::{Canvas, DrawCommand, TextStyle};
use crate::components::icon::{Icon, IconBitmap, IconCache};
use crate::error::Error;
use crate::layout::{self, Layout};

/// Source icon edge length in pixels.
const ICON_SIZE: i32 = 16;

/// One of the four tracked habits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tracker {
    Water,
    Exercise,
    Focus,
    Supplements,
}

impl Tracker {
    /// Display order, left to right.
    pub const ALL: [Tracker; 4] = [
        Tracker::Water,
        Tracker::Exercise,
        Tracker::Focus,
        Tracker::Supplements,
    ];

    /// Lower-case name used in commands and icon file names.
    pub fn name(self) -> &'static str {
        match self {
            Tracker::Water => "water",
            Tracker::Exercise => "exercise",
            Tracker::Focus => "focus",
            Tracker::Supplements => "supplements",
        }
    }

    /// Icon file name inside the 16x16 RPG icon pack.
    pub fn icon_file(self) -> &'static str {
        match self {
            Tracker::Water => "potion_03b.png",
            Tracker::Exercise => "sword_02c.png",
            Tracker::Focus => "book_05g.png",
            Tracker::Supplements => "candy_02g.png",
        }
    }

    fn index(self) -> usize {
        match self {
            Tracker::Water => 0,
            Tracker::Exercise => 1,
            Tracker::Focus => 2,
            Tracker::Supplements => 3,
        }
    }
}

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tracker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" | "w" => Ok(Tracker::Water),
            "exercise" | "ex" | "e" => Ok(Tracker::Exercise),
            "focus" | "f" => Ok(Tracker::Focus),
            "supplements" | "pills" | "pill" | "p" => Ok(Tracker::Supplements),
            _ => Err(Error::InvalidTracker(s.to_string())),
        }
    }
}

/// Current tracker values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerCounts {
    /// Water count.
    pub water: u32,
    /// Exercise count.
    pub exercise: u32,
    /// Completed focus sessions.
    pub focus: u32,
    /// Whether today's supplements are taken.
    pub supplements_done: bool,
}

impl TrackerCounts {
    /// Count for a numeric tracker; supplements reads as 0 or 1.
    pub fn get(&self, tracker: Tracker) -> u32 {
        match tracker {
            Tracker::Water => self.water,
            Tracker::Exercise => self.exercise,
            Tracker::Focus => self.focus,
            Tracker::Supplements => u32::from(self.supplements_done),
        }
    }

    /// Add one; supplements toggles instead.
    pub fn bump(&mut self, tracker: Tracker) {
        match tracker {
            Tracker::Water => self.water = self.water.saturating_add(1),
            Tracker::Exercise => self.exercise = self.exercise.saturating_add(1),
            Tracker::Focus => self.focus = self.focus.saturating_add(1),
            Tracker::Supplements => self.supplements_done = !self.supplements_done,
        }
    }

    /// Set a numeric tracker. Supplements becomes done for any non-zero value.
    pub fn set(&mut self, tracker: Tracker, value: u32) {
        match tracker {
            Tracker::Water => self.water = value,
            Tracker::Exercise => self.exercise = value,
            Tracker::Focus => self.focus = value,
            Tracker::Supplements => self.supplements_done = value != 0,
        }
    }
}

/// Decoded icons for the four trackers. A missing icon leaves its cell
/// without artwork; the value is still drawn.
#[derive(Debug, Clone, Default)]
pub struct TrackerIcons {
    icons: [Option<Arc<IconBitmap>>; 4],
}

impl TrackerIcons {
    /// No artwork at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load each tracker's [`Tracker::icon_file`] from `dir`.
    ///
    /// Failures are logged and skipped.
    pub fn load_dir(dir: &Path, cache: &mut IconCache) -> Self {
        let mut icons = Self::empty();
        for tracker in Tracker::ALL {
            let path = dir.join(tracker.icon_file());
            match cache.load(&path) {
                Ok(icon) => icons.set(tracker, icon),
                Err(e) => warn!(%tracker, error = %e, "tracker icon unavailable"),
            }
        }
        icons
    }

    /// Use `icon` for `tracker`.
    pub fn set(&mut self, tracker: Tracker, icon: Arc<IconBitmap>) {
        self.icons[tracker.index()] = Some(icon);
    }

    /// Artwork for `tracker`, if it loaded.
    pub fn get(&self, tracker: Tracker) -> Option<&IconBitmap> {
        self.icons[tracker.index()].as_deref()
    }

    /// Number of trackers with artwork.
    pub fn loaded(&self) -> usize {
        self.icons.iter().filter(|i| i.is_some()).count()
    }
}

fn check_mark<C: Canvas>(canvas: &mut C, x: i32, y: i32, arm: i32) {
    canvas.draw_all([
        DrawCommand::line(Point::new(x, y), Point::new(x + arm, y + arm), Color::GREEN),
        DrawCommand::line(
            Point::new(x + arm, y + arm),
            Point::new(x + 3 * arm, y - arm),
            Color::GREEN,
        ),
    ]);
}

fn scaled(scale: u32) -> i32 {
    i32::try_from(scale).unwrap_or(i32::MAX)
}

/// Big tracker row filling the status region.
#[derive(Debug, Clone)]
pub struct TrackerBar<'a> {
    icons: &'a TrackerIcons,
    counts: TrackerCounts,
    icon_scale: u32,
    content_inset: i32,
    count_offset_y: i32,
    x_shift: i32,
    value_gap: i32,
    border: Option<Color>,
    fg: Color,
    bg: Color,
    clear_bg: bool,
}

impl<'a> TrackerBar<'a> {
    /// Bar showing `counts` with the default spacing and 2x icons.
    pub fn new(icons: &'a TrackerIcons, counts: TrackerCounts) -> Self {
        Self {
            icons,
            counts,
            icon_scale: 2,
            content_inset: 6,
            count_offset_y: -6,
            x_shift: 0,
            value_gap: 6,
            border: None,
            fg: Color::WHITE,
            bg: Color::BLACK,
            clear_bg: true,
        }
    }

    /// Integer icon scale (minimum 1).
    pub fn icon_scale(mut self, scale: u32) -> Self {
        self.icon_scale = scale.max(1);
        self
    }

    /// Distance of icons from the cell's left edge and the bar's top edge.
    pub fn content_inset(mut self, inset: i32) -> Self {
        self.content_inset = inset;
        self
    }

    /// Vertical nudge for the value text.
    pub fn count_offset_y(mut self, dy: i32) -> Self {
        self.count_offset_y = dy;
        self
    }

    /// Horizontal offset applied to every cell's content.
    pub fn x_shift(mut self, dx: i32) -> Self {
        self.x_shift = dx;
        self
    }

    /// Space between an icon and its value.
    pub fn value_gap(mut self, gap: i32) -> Self {
        self.value_gap = gap;
        self
    }

    /// HUD frame in the given colour: double outline and a 2px base.
    pub fn border(mut self, color: Option<Color>) -> Self {
        self.border = color;
        self
    }

    /// Text and background colours.
    pub fn colors(mut self, fg: Color, bg: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// Fill the band with the background colour first (default on).
    pub fn clear_background(mut self, clear: bool) -> Self {
        self.clear_bg = clear;
        self
    }

    /// Top y of the value text, never closer than 6px to the bar top.
    pub fn value_y(&self, layout: &Layout) -> i32 {
        let bar = layout.status_rect();
        let top = bar.top_left.y;
        let y = top + layout::height(&bar) - layout::text_height(2) - self.content_inset
            + self.count_offset_y;
        y.max(top + 6)
    }

    /// Draw the bar into the status band.
    pub fn render<C: Canvas>(&self, layout: &Layout, canvas: &mut C) {
        let bar = layout.status_rect();
        let (bx, by) = (bar.top_left.x, bar.top_left.y);
        let (bw, bh) = (layout::width(&bar), layout::height(&bar));
        let pad = layout.padding;

        if self.clear_bg {
            canvas.draw(DrawCommand::fill_rect(bx, by, bw, bh, self.bg));
        }
        if let Some(frame) = self.border {
            canvas.draw_all([
                DrawCommand::stroke_rect(bx, by, bw, bh, frame),
                DrawCommand::stroke_rect(bx + 1, by + 1, bw - 2, bh - 2, Color::DARK_GRAY),
                DrawCommand::fill_rect(bx + 1, by + bh - 3, bw - 2, 2, frame),
            ]);
        }
        canvas.draw(DrawCommand::fill_rect(bx, by + bh - 1, bw, 1, Color::DARK_GRAY));

        let cell_w = (bw - 2 * pad) / 4;
        let scale = scaled(self.icon_scale);
        let value_y = self.value_y(layout);
        let value = TextStyle::new().size(2).color(self.fg).cleared(self.bg);

        for (i, tracker) in (0i32..).zip(Tracker::ALL) {
            let icon_x = bx + pad + i * cell_w + self.content_inset + self.x_shift;
            let icon_y = by + self.content_inset;
            if let Some(bitmap) = self.icons.get(tracker) {
                Icon::new(bitmap)
                    .scale(self.icon_scale)
                    .render(canvas, Point::new(icon_x, icon_y));
            }

            let tx = icon_x + ICON_SIZE * scale + self.value_gap;
            match tracker {
                Tracker::Supplements if self.counts.supplements_done => {
                    check_mark(canvas, tx, value_y + 10, 4);
                }
                Tracker::Supplements => {
                    canvas.draw(DrawCommand::text(tx, value_y, "0", value.color(Color::GRAY)));
                }
                _ => {
                    let count = self.counts.get(tracker).to_string();
                    canvas.draw(DrawCommand::text(tx, value_y, count, value));
                }
            }
        }
    }
}

/// Compact two-row header: small icons with counts, then title and clock.
#[derive(Debug, Clone)]
pub struct OsHeader<'a> {
    icons: &'a TrackerIcons,
    counts: TrackerCounts,
    title: String,
    clock: String,
    active_tab: Option<Tracker>,
    fg: Color,
    bg: Color,
    clear_bg: bool,
}

impl<'a> OsHeader<'a> {
    /// Header for `counts`, with the focus tab active.
    pub fn new(icons: &'a TrackerIcons, counts: TrackerCounts) -> Self {
        Self {
            icons,
            counts,
            title: String::new(),
            clock: String::new(),
            active_tab: Some(Tracker::Focus),
            fg: Color::WHITE,
            bg: Color::BLACK,
            clear_bg: true,
        }
    }

    /// Left-aligned text on the second row.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Right-aligned text on the second row.
    pub fn clock(mut self, clock: impl Into<String>) -> Self {
        self.clock = clock.into();
        self
    }

    /// Tracker underlined in cyan (default focus).
    pub fn active_tab(mut self, tab: Option<Tracker>) -> Self {
        self.active_tab = tab;
        self
    }

    /// Text and background colours.
    pub fn colors(mut self, fg: Color, bg: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// Fill the band with the background colour first (default on).
    pub fn clear_background(mut self, clear: bool) -> Self {
        self.clear_bg = clear;
        self
    }

    /// Draw both header rows into the status band.
    pub fn render<C: Canvas>(&self, layout: &Layout, canvas: &mut C) {
        let bar = layout.status_rect();
        let (bx, by) = (bar.top_left.x, bar.top_left.y);
        let (bw, bh) = (layout::width(&bar), layout::height(&bar));
        let pad = layout.padding;

        if self.clear_bg {
            canvas.draw(DrawCommand::fill_rect(bx, by, bw, bh, self.bg));
        }
        canvas.draw(DrawCommand::fill_rect(bx, by + bh - 1, bw, 1, Color::DARK_GRAY));

        let row1_y = by + 4;
        let row2_y = by + 24;
        let cell_w = (bw - 2 * pad) / 4;
        let count = TextStyle::new().size(1).color(self.fg).cleared(self.bg);

        for (i, tracker) in (0i32..).zip(Tracker::ALL) {
            let ix = bx + pad + i * cell_w;
            if let Some(bitmap) = self.icons.get(tracker) {
                Icon::new(bitmap).render(canvas, Point::new(ix, row1_y));
            }
            if self.active_tab == Some(tracker) {
                canvas.draw(DrawCommand::fill_rect(ix, row1_y + ICON_SIZE + 1, ICON_SIZE, 2, Color::CYAN));
            }

            let tx = ix + ICON_SIZE + 3;
            match tracker {
                Tracker::Supplements if self.counts.supplements_done => {
                    check_mark(canvas, tx, row1_y + 12, 3);
                }
                Tracker::Supplements => {
                    canvas.draw(DrawCommand::text(tx, row1_y + 6, "0", count.color(Color::GRAY)));
                }
                _ => {
                    let value = self.counts.get(tracker).to_string();
                    canvas.draw(DrawCommand::text(tx, row1_y + 6, value, count));
                }
            }
        }

        let row2 = TextStyle::new().size(2).color(self.fg).cleared(self.bg);
        canvas.draw(DrawCommand::text(bx + pad, row2_y, self.title.as_str(), row2));
        let clock_x = bx + bw - pad - layout::text_width(&self.clock, 2);
        canvas.draw(DrawCommand::text(clock_x, row2_y, self.clock.as_str(), row2));
    }
}
