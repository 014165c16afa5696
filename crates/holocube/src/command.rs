//! Draw commands as the device understands them
//!
//! A [`DrawCommand`] serialises to the JSON object the device accepts inside
//! `/api/v1/draw/batch`, tagged by `"type"`. The same object minus the tag is
//! the body of the matching single-shot endpoint (`/api/v1/draw/<type>`).

use embedded_graphics::prelude::Point;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};

/// One device drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawCommand {
    /// Fill the whole screen.
    Clear { color: Color },
    /// Single pixel.
    Pixel {
        x: i32,
        y: i32,
        color: Color,
    },
    /// Line from `(x0, y0)` to `(x1, y1)`.
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    },
    /// Rectangle with top-left `(x, y)`, filled or outlined.
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
        fill: bool,
    },
    /// Circle around `(x, y)` with radius `r`.
    Circle {
        x: i32,
        y: i32,
        r: i32,
        color: Color,
        fill: bool,
    },
    /// Triangle through three vertices.
    Triangle {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        fill: bool,
    },
    /// Ellipse around `(x, y)` with radii `rx`, `ry`.
    Ellipse {
        x: i32,
        y: i32,
        rx: i32,
        ry: i32,
        color: Color,
        fill: bool,
    },
    /// Rectangle with corner radius `r`.
    RoundRect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        r: i32,
        color: Color,
        fill: bool,
    },
    /// Text in the device's 6x8 font, multiplied by `size`.
    ///
    /// With `bg` set the glyph cells are painted in that colour; `clear`
    /// additionally wipes the whole text box first. `clear` goes out
    /// whenever `bg` does and is omitted otherwise.
    Text {
        x: i32,
        y: i32,
        text: String,
        size: u8,
        color: Color,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bg: Option<Color>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        clear: Option<bool>,
    },
}

impl DrawCommand {
    /// The `type` tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Clear { .. } => "clear",
            Self::Pixel { .. } => "pixel",
            Self::Line { .. } => "line",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Triangle { .. } => "triangle",
            Self::Ellipse { .. } => "ellipse",
            Self::RoundRect { .. } => "roundrect",
            Self::Text { .. } => "text",
        }
    }

    /// Single-shot endpoint for this command.
    pub fn endpoint(&self) -> String {
        format!("/api/v1/draw/{}", self.kind())
    }

    /// JSON body for the single-shot endpoint (the batch object without `type`).
    pub fn body(&self) -> Result<serde_json::Value> {
        let mut value = serde_json::to_value(self).map_err(Error::Encode)?;
        if let Some(map) = value.as_object_mut() {
            map.remove("type");
        }
        Ok(value)
    }

    /// Fill the screen with `color`.
    pub fn clear(color: Color) -> Self {
        Self::Clear { color }
    }

    /// Set one pixel.
    pub fn pixel(at: Point, color: Color) -> Self {
        Self::Pixel {
            x: at.x,
            y: at.y,
            color,
        }
    }

    /// Line between two points.
    pub fn line(from: Point, to: Point, color: Color) -> Self {
        Self::Line {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            color,
        }
    }

    /// Filled rectangle.
    pub fn fill_rect(x: i32, y: i32, w: i32, h: i32, color: Color) -> Self {
        Self::Rect {
            x,
            y,
            w,
            h,
            color,
            fill: true,
        }
    }

    /// One-pixel rectangle outline.
    pub fn stroke_rect(x: i32, y: i32, w: i32, h: i32, color: Color) -> Self {
        Self::Rect {
            x,
            y,
            w,
            h,
            color,
            fill: false,
        }
    }

    /// Circle around `center`.
    pub fn circle(center: Point, r: i32, color: Color, fill: bool) -> Self {
        Self::Circle {
            x: center.x,
            y: center.y,
            r,
            color,
            fill,
        }
    }

    /// Triangle through `p0`, `p1` and `p2`.
    pub fn triangle(p0: Point, p1: Point, p2: Point, color: Color, fill: bool) -> Self {
        Self::Triangle {
            x0: p0.x,
            y0: p0.y,
            x1: p1.x,
            y1: p1.y,
            x2: p2.x,
            y2: p2.y,
            color,
            fill,
        }
    }

    /// Ellipse around `center` with radii `rx`, `ry`.
    pub fn ellipse(center: Point, rx: i32, ry: i32, color: Color, fill: bool) -> Self {
        Self::Ellipse {
            x: center.x,
            y: center.y,
            rx,
            ry,
            color,
            fill,
        }
    }

    /// Text with its top-left corner at `(x, y)`.
    pub fn text(x: i32, y: i32, text: impl Into<String>, style: TextStyle) -> Self {
        Self::Text {
            x,
            y,
            text: text.into(),
            size: style.size,
            color: style.color,
            bg: style.bg,
            clear: style.bg.map(|_| style.clear),
        }
    }
}

/// Size and colours for a text command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Font multiplier.
    pub size: u8,
    /// Glyph colour.
    pub color: Color,
    /// Background behind the glyph cells, transparent when `None`.
    pub bg: Option<Color>,
    /// Wipe the text box before drawing. Only sent with a background.
    pub clear: bool,
}

impl TextStyle {
    /// Size 2, white, transparent background.
    pub const fn new() -> Self {
        Self {
            size: 2,
            color: Color::WHITE,
            bg: None,
            clear: false,
        }
    }

    /// Set the font multiplier (1 = 6x8 px glyphs)
    pub const fn size(mut self, size: u8) -> Self {
        self.size = size;
        self
    }

    /// Set the glyph colour.
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Paint glyph cells in `bg` so the text overwrites what was there.
    pub const fn background(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Paint `bg` behind the text and wipe the full text box first.
    pub const fn cleared(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self.clear = true;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new()
    }
}

/// Destination for rendered draw commands.
///
/// Components render into any canvas: a `Vec` that is later sent in
/// batches, or a [`PreviewCanvas`](crate::preview::PreviewCanvas).
pub trait Canvas {
    /// Accept one command.
    fn draw(&mut self, command: DrawCommand);

    /// Accept every command in order.
    fn draw_all<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = DrawCommand>,
    {
        for command in commands {
            self.draw(command);
        }
    }
}

impl Canvas for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}
