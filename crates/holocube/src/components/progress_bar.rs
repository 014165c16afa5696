//! Progress bar component

use embedded_graphics::prelude::{Point, Size};

use crate::color::Color;
use crate::command::{Canvas, DrawCommand};

/// Progress bar component
pub struct ProgressBar {
    width: u32,
    height: u32,
    progress: f32, // 0.0 to 1.0
    background: Color,
    foreground: Color,
    border: Option<Color>,
}

impl ProgressBar {
    /// Create a new progress bar
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            progress: 0.0,
            background: Color::DARK_GRAY,
            foreground: Color::GREEN,
            border: Some(Color::WHITE),
        }
    }

    /// Set progress (0.0 to 1.0)
    pub fn progress(mut self, progress: f32) -> Self {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self
    }

    /// Set colors
    pub fn colors(mut self, background: Color, foreground: Color) -> Self {
        self.background = background;
        self.foreground = foreground;
        self
    }

    /// Set border color (None for no border)
    pub fn border(mut self, border: Option<Color>) -> Self {
        self.border = border;
        self
    }

    /// Get dimensions
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width of the filled portion in pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fill_width(&self) -> u32 {
        // progress is clamped to 0..=1, so the product fits in u32
        (self.width as f32 * self.progress).floor() as u32
    }

    /// Render progress bar
    pub fn render<C: Canvas>(&self, canvas: &mut C, position: Point) {
        let w = i32::try_from(self.width).unwrap_or(i32::MAX);
        let h = i32::try_from(self.height).unwrap_or(i32::MAX);

        // Track
        canvas.draw(DrawCommand::fill_rect(position.x, position.y, w, h, self.background));

        // Filled portion
        let fill = i32::try_from(self.fill_width()).unwrap_or(w);
        if fill > 0 {
            canvas.draw(DrawCommand::fill_rect(position.x, position.y, fill, h, self.foreground));
        }

        // Border on top of both
        if let Some(border) = self.border {
            canvas.draw(DrawCommand::stroke_rect(position.x, position.y, w, h, border));
        }
    }
}
