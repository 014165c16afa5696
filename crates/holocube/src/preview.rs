//! Offline preview renderer
//!
//! Paints draw commands into an in-memory 240x240 framebuffer with
//! embedded-graphics, so screens can be checked without a device. Output is
//! close to the device but not pixel-exact: text uses the 6x10 mono font
//! scaled by block replication.

use std::convert::Infallible;
use std::path::Path;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Ellipse, Line, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle,
};
use embedded_graphics::text::{Baseline, Text};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::client::HoloCube;
use crate::color::Color;
use crate::command::{Canvas, DrawCommand};
use crate::error::{Error, Result};
use crate::layout;

fn extent(v: i32) -> u32 {
    v.max(0).unsigned_abs()
}

fn style(color: Color, fill: bool) -> PrimitiveStyle<Rgb888> {
    if fill {
        PrimitiveStyle::with_fill(color.to_rgb888())
    } else {
        PrimitiveStyle::with_stroke(color.to_rgb888(), 1)
    }
}

/// Collects the lit pixels of size-1 text.
#[derive(Default)]
struct GlyphMask {
    points: Vec<Point>,
}

impl OriginDimensions for GlyphMask {
    fn size(&self) -> Size {
        Size::new(u32::MAX / 2, u32::MAX / 2)
    }
}

impl DrawTarget for GlyphMask {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.points.extend(pixels.into_iter().map(|Pixel(p, _)| p));
        Ok(())
    }
}

/// Framebuffer the size of the device screen.
#[derive(Debug, Clone)]
pub struct PreviewCanvas {
    image: RgbaImage,
}

impl Default for PreviewCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewCanvas {
    /// Black 240x240 canvas.
    pub fn new() -> Self {
        let side = extent(HoloCube::SCREEN_WIDTH);
        Self {
            image: RgbaImage::from_pixel(side, extent(HoloCube::SCREEN_HEIGHT), Rgba([0, 0, 0, 255])),
        }
    }

    /// The framebuffer.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Colour at `(x, y)`, or `None` off screen.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        let [r, g, b, _] = self.image.get_pixel_checked(x, y)?.0;
        Some(Color::rgb(r, g, b))
    }

    /// Paint one command. Anything off screen is clipped.
    pub fn apply(&mut self, command: &DrawCommand) {
        let result = match *command {
            DrawCommand::Clear { color } => self.clear(color.to_rgb888()),
            DrawCommand::Pixel { x, y, color } => {
                Pixel(Point::new(x, y), color.to_rgb888()).draw(self)
            }
            DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                color,
            } => Line::new(Point::new(x0, y0), Point::new(x1, y1))
                .into_styled(style(color, false))
                .draw(self),
            DrawCommand::Rect {
                x,
                y,
                w,
                h,
                color,
                fill,
            } => Rectangle::new(Point::new(x, y), Size::new(extent(w), extent(h)))
                .into_styled(style(color, fill))
                .draw(self),
            DrawCommand::Circle {
                x,
                y,
                r,
                color,
                fill,
            } => Circle::with_center(Point::new(x, y), extent(r) * 2 + 1)
                .into_styled(style(color, fill))
                .draw(self),
            DrawCommand::Triangle {
                x0,
                y0,
                x1,
                y1,
                x2,
                y2,
                color,
                fill,
            } => Triangle::new(Point::new(x0, y0), Point::new(x1, y1), Point::new(x2, y2))
                .into_styled(style(color, fill))
                .draw(self),
            DrawCommand::Ellipse {
                x,
                y,
                rx,
                ry,
                color,
                fill,
            } => Ellipse::with_center(
                Point::new(x, y),
                Size::new(extent(rx) * 2 + 1, extent(ry) * 2 + 1),
            )
            .into_styled(style(color, fill))
            .draw(self),
            DrawCommand::RoundRect {
                x,
                y,
                w,
                h,
                r,
                color,
                fill,
            } => RoundedRectangle::with_equal_corners(
                Rectangle::new(Point::new(x, y), Size::new(extent(w), extent(h))),
                Size::new(extent(r), extent(r)),
            )
            .into_styled(style(color, fill))
            .draw(self),
            DrawCommand::Text {
                x,
                y,
                ref text,
                size,
                color,
                bg,
                ..
            } => {
                self.text(Point::new(x, y), text, size, color, bg);
                Ok(())
            }
        };
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn text(&mut self, at: Point, text: &str, size: u8, color: Color, bg: Option<Color>) {
        let scale = i32::from(size.max(1));
        if let Some(bg) = bg {
            let w = layout::text_width(text, size.max(1));
            let h = layout::text_height(size.max(1));
            self.fill_solid(
                &Rectangle::new(at, Size::new(extent(w), extent(h))),
                bg.to_rgb888(),
            )
            .ok();
        }

        let mut mask = GlyphMask::default();
        let glyphs = MonoTextStyle::new(&FONT_6X10, color.to_rgb888());
        Text::with_baseline(text, Point::zero(), glyphs, Baseline::Top)
            .draw(&mut mask)
            .ok();

        let block = Size::new(extent(scale), extent(scale));
        for p in mask.points {
            let origin = at + Point::new(p.x * scale, p.y * scale);
            self.fill_solid(&Rectangle::new(origin, block), color.to_rgb888())
                .ok();
        }
    }

    /// Write the framebuffer as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "writing preview");
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| Error::Preview {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl OriginDimensions for PreviewCanvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for PreviewCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(p.x), u32::try_from(p.y)) else {
                continue;
            };
            if x < self.image.width() && y < self.image.height() {
                self.image.put_pixel(x, y, Rgba([c.r(), c.g(), c.b(), 255]));
            }
        }
        Ok(())
    }
}

impl Canvas for PreviewCanvas {
    fn draw(&mut self, command: DrawCommand) {
        self.apply(&command);
    }
}
