//! Lobster mascot and party confetti

use embedded_graphics::prelude::Point;

use crate::color::Color;
use crate::command::{Canvas, DrawCommand};

const BODY: Color = Color::rgb(0xff, 0x6b, 0x6b);
const BODY_LIGHT: Color = Color::rgb(0xff, 0x99, 0x99);
const BODY_DARK: Color = Color::rgb(0xcc, 0x44, 0x44);
const EYE_WHITE: Color = Color::WHITE;
const EYE_BLACK: Color = Color::rgb(0x11, 0x11, 0x11);
const CHEEK: Color = Color::rgb(0xff, 0xaa, 0xaa);

/// Confetti palette, cycled by piece index plus frame.
pub const CONFETTI_COLORS: [Color; 6] = [
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0xff, 0x88, 0x00),
    Color::rgb(0x88, 0xff, 0x00),
];

/// Offsets of the confetti pieces from the centre.
pub const CONFETTI_POSITIONS: [(i32, i32); 12] = [
    (-45, -30),
    (40, -25),
    (-30, 20),
    (35, 15),
    (-20, -35),
    (25, -20),
    (-40, 5),
    (45, 0),
    (-15, 25),
    (20, 30),
    (-35, -10),
    (30, -5),
];

/// Twinkling confetti: circles, squares and triangles around a centre.
///
/// On each frame every other piece is visible; with `clear_first` all pieces
/// are blacked out before the visible ones are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confetti {
    center: Point,
    frame: u32,
    clear_first: bool,
}

impl Confetti {
    /// Confetti scattered around `center`.
    pub fn new(center: Point) -> Self {
        Self {
            center,
            frame: 0,
            clear_first: false,
        }
    }

    /// Animation frame; pieces alternate between frames.
    pub fn frame(mut self, frame: u32) -> Self {
        self.frame = frame;
        self
    }

    /// Paint every piece black before drawing, to erase the previous frame.
    pub fn clear_first(mut self, clear: bool) -> Self {
        self.clear_first = clear;
        self
    }

    fn piece(i: usize, at: Point, color: Color) -> DrawCommand {
        match i % 3 {
            0 => DrawCommand::circle(at, 3, color, true),
            1 => DrawCommand::fill_rect(at.x, at.y, 5, 5, color),
            _ => DrawCommand::triangle(
                at,
                Point::new(at.x + 5, at.y),
                Point::new(at.x + 2, at.y - 5),
                color,
                true,
            ),
        }
    }

    /// Draw the pieces visible in this frame.
    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        let frame = usize::try_from(self.frame).unwrap_or(0);
        for (i, (dx, dy)) in CONFETTI_POSITIONS.iter().enumerate() {
            let at = self.center + Point::new(*dx, *dy);
            let phase = i.wrapping_add(frame);
            if self.clear_first {
                canvas.draw(Self::piece(i, at, Color::BLACK));
            }
            if phase % 2 == 0 {
                let color = CONFETTI_COLORS[phase % CONFETTI_COLORS.len()];
                canvas.draw(Self::piece(i, at, color));
            }
        }
    }
}

/// The lobster buddy. Happy mode raises the claws, squints the eyes and
/// throws confetti behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lobster {
    center: Point,
    happy: bool,
    frame: u32,
    scale: f64,
}

impl Lobster {
    /// Calm lobster at 1x centred on `center`.
    pub fn new(center: Point) -> Self {
        Self {
            center,
            happy: false,
            frame: 0,
            scale: 1.0,
        }
    }

    /// Celebrate: raised claws, squinting eyes, confetti.
    pub fn happy(mut self, happy: bool) -> Self {
        self.happy = happy;
        self
    }

    /// Confetti animation frame (only visible when happy).
    pub fn frame(mut self, frame: u32) -> Self {
        self.frame = frame;
        self
    }

    /// Geometry multiplier; non-finite or non-positive values fall back to 1.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self
    }

    /// Scaled signed offset.
    #[allow(clippy::cast_possible_truncation)]
    fn off(&self, v: i32) -> i32 {
        (f64::from(v) * self.scale).round_ties_even() as i32
    }

    /// Scaled size, at least 1.
    fn sz(&self, v: i32) -> i32 {
        self.off(v).max(1)
    }

    fn at(&self, dx: i32, dy: i32) -> Point {
        self.center + Point::new(self.off(dx), self.off(dy))
    }

    /// Draw the lobster, with confetti behind it when happy.
    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        let c = self.center;

        if self.happy {
            Confetti::new(c).frame(self.frame).render(canvas);
        }

        // Claws, mirrored
        let raise = Point::new(0, if self.happy { self.off(-5) } else { 0 });
        for side in [-1, 1] {
            let p = |dx: i32, dy: i32| self.at(side * dx, dy) + raise;
            canvas.draw_all([
                DrawCommand::line(p(10, -5), p(18, -13), BODY),
                DrawCommand::circle(p(21, -16), self.sz(4), BODY, true),
                DrawCommand::triangle(p(23, -19), p(20, -20), p(27, -27), BODY, true),
                DrawCommand::triangle(p(24, -14), p(23, -17), p(32, -17), BODY, true),
            ]);
        }

        // Body
        canvas.draw_all([
            DrawCommand::ellipse(c, self.sz(14), self.sz(12), BODY, true),
            DrawCommand::ellipse(self.at(-2, -2), self.sz(7), self.sz(5), BODY_LIGHT, true),
            DrawCommand::circle(self.at(-5, -3), self.sz(5), EYE_WHITE, true),
            DrawCommand::circle(self.at(5, -3), self.sz(5), EYE_WHITE, true),
        ]);

        // Eyes: ^_^ when happy
        if self.happy {
            canvas.draw_all([
                DrawCommand::line(self.at(-8, -2), self.at(-5, -5), EYE_BLACK),
                DrawCommand::line(self.at(-5, -5), self.at(-2, -2), EYE_BLACK),
                DrawCommand::line(self.at(2, -2), self.at(5, -5), EYE_BLACK),
                DrawCommand::line(self.at(5, -5), self.at(8, -2), EYE_BLACK),
            ]);
        } else {
            canvas.draw_all([
                DrawCommand::circle(self.at(-4, -4), self.sz(2), EYE_BLACK, true),
                DrawCommand::circle(self.at(6, -4), self.sz(2), EYE_BLACK, true),
                DrawCommand::pixel(self.at(-6, -5), EYE_WHITE),
                DrawCommand::pixel(self.at(4, -5), EYE_WHITE),
            ]);
        }

        // Blush
        let (bx, by) = if self.happy {
            (self.sz(4), self.sz(3))
        } else {
            (self.sz(3), self.sz(2))
        };
        canvas.draw_all([
            DrawCommand::ellipse(self.at(-8, 3), bx, by, CHEEK, true),
            DrawCommand::ellipse(self.at(8, 3), bx, by, CHEEK, true),
        ]);

        // Antennae
        canvas.draw_all([
            DrawCommand::line(self.at(-2, -14), self.at(-6, -24), BODY),
            DrawCommand::line(self.at(2, -14), self.at(6, -24), BODY),
            DrawCommand::circle(self.at(-6, -24), self.sz(2), BODY_LIGHT, true),
            DrawCommand::circle(self.at(6, -24), self.sz(2), BODY_LIGHT, true),
        ]);

        // Legs
        for dy in [-5, 1, 7] {
            canvas.draw_all([
                DrawCommand::line(self.at(-12, dy), self.at(-18, dy + 3), BODY_DARK),
                DrawCommand::line(self.at(12, dy), self.at(18, dy + 3), BODY_DARK),
            ]);
        }

        // Tail
        canvas.draw_all([
            DrawCommand::ellipse(self.at(0, 14), self.sz(5), self.sz(3), BODY, true),
            DrawCommand::ellipse(self.at(0, 19), self.sz(4), self.sz(2), BODY, true),
            DrawCommand::ellipse(self.at(0, 23), self.sz(3), self.sz(2), BODY_DARK, true),
            DrawCommand::circle(self.at(-4, 27), self.sz(3), BODY, true),
            DrawCommand::circle(self.at(4, 27), self.sz(3), BODY, true),
            DrawCommand::circle(self.at(0, 29), self.sz(3), BODY, true),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(lobster: Lobster) -> Vec<DrawCommand> {
        let mut cmds = Vec::new();
        lobster.render(&mut cmds);
        cmds
    }

    #[test]
    fn test_lobster_command_count() {
        // claws 8, body 2, eye whites 2, pupils 4, blush 2, antennae 4, legs 6, tail 6
        assert_eq!(render(Lobster::new(Point::new(120, 190))).len(), 34);
    }

    #[test]
    fn test_happy_lobster_adds_confetti_and_raises_claws() {
        let calm = render(Lobster::new(Point::new(120, 190)));
        let happy = render(Lobster::new(Point::new(120, 190)).happy(true));
        // 6 of 12 confetti pieces visible on frame 0
        assert_eq!(happy.len(), calm.len() + 6);
        assert_eq!(
            calm[0],
            DrawCommand::line(Point::new(110, 185), Point::new(102, 177), BODY)
        );
        assert_eq!(
            happy[6],
            DrawCommand::line(Point::new(110, 180), Point::new(102, 172), BODY)
        );
    }

    #[test]
    fn test_scale_rounds_half_to_even() {
        let lobster = Lobster::new(Point::zero()).scale(0.5);
        assert_eq!(lobster.off(5), 2);
        assert_eq!(lobster.off(7), 4);
        assert_eq!(lobster.off(-5), -2);
        assert_eq!(lobster.sz(1), 1);
        assert_eq!(Lobster::new(Point::zero()).scale(f64::NAN).off(10), 10);
    }

    #[test]
    fn test_confetti_twinkles() {
        let mut even = Vec::new();
        Confetti::new(Point::new(100, 100)).render(&mut even);
        let mut odd = Vec::new();
        Confetti::new(Point::new(100, 100)).frame(1).render(&mut odd);

        assert_eq!(even.len(), 6);
        assert_eq!(odd.len(), 6);
        // piece 0 is a circle at (-45, -30), first palette colour
        assert_eq!(
            even[0],
            DrawCommand::circle(Point::new(55, 70), 3, CONFETTI_COLORS[0], true)
        );
        // on frame 1 piece 1 (a square) shows with colour index 2
        assert_eq!(odd[0], DrawCommand::fill_rect(140, 75, 5, 5, CONFETTI_COLORS[2]));
    }

    #[test]
    fn test_confetti_clear_first_blacks_out_everything() {
        let mut cmds = Vec::new();
        Confetti::new(Point::new(100, 100))
            .clear_first(true)
            .render(&mut cmds);
        assert_eq!(cmds.len(), 18);
        let black = cmds
            .iter()
            .filter(|c| match c {
                DrawCommand::Circle { color, .. }
                | DrawCommand::Rect { color, .. }
                | DrawCommand::Triangle { color, .. } => *color == Color::BLACK,
                _ => false,
            })
            .count();
        assert_eq!(black, 12);
    }
}
