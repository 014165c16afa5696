//! Bitmap icons drawn as run-length rectangles
//!
//! Sending one pixel command per icon pixel would cost 256 commands for a
//! 16x16 icon. Instead each row is scanned into maximal runs of identical
//! opaque colour and every run becomes a single filled rectangle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use embedded_graphics::prelude::{Point, Size};
use image::RgbaImage;
use tracing::debug;

use crate::color::Color;
use crate::command::{Canvas, DrawCommand};
use crate::error::{Error, Result};

fn signed(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// A horizontal run of same-coloured pixels: columns `start..end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelRun {
    /// First column.
    pub start: u32,
    /// One past the last column.
    pub end: u32,
    /// Colour shared by the run.
    pub color: Color,
}

impl PixelRun {
    /// Pixels in the run.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the run covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decoded RGBA icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconBitmap {
    image: RgbaImage,
}

impl IconBitmap {
    /// Wrap an already decoded image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode an image file (any format the `image` crate was built with).
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|source| Error::Icon {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_image(image.to_rgba8()))
    }

    /// Decode in-memory image data; `name` is only used in errors.
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self> {
        let image = image::load_from_memory(bytes).map_err(|source| Error::Icon {
            path: PathBuf::from(name),
            source,
        })?;
        Ok(Self::from_image(image.to_rgba8()))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Opaque runs on row `y`, left to right. Rows outside the image are empty.
    ///
    /// Pixels with alpha 0 end a run and are skipped; any other alpha counts
    /// as opaque.
    pub fn row_runs(&self, y: u32) -> RowRuns<'_> {
        let x = if y < self.height() { 0 } else { self.width() };
        RowRuns {
            image: &self.image,
            y,
            x,
        }
    }

    /// Total number of runs, i.e. rectangles the icon costs to draw.
    pub fn run_count(&self) -> usize {
        (0..self.height()).map(|y| self.row_runs(y).count()).sum()
    }
}

/// Iterator over the runs of one bitmap row.
pub struct RowRuns<'a> {
    image: &'a RgbaImage,
    y: u32,
    x: u32,
}

impl RowRuns<'_> {
    /// Colour at column `x`, or `None` when transparent or out of range.
    fn opaque(&self, x: u32) -> Option<Color> {
        let [r, g, b, a] = self.image.get_pixel_checked(x, self.y)?.0;
        (a != 0).then(|| Color::rgb(r, g, b))
    }
}

impl Iterator for RowRuns<'_> {
    type Item = PixelRun;

    fn next(&mut self) -> Option<PixelRun> {
        let width = self.image.width();
        while self.x < width && self.opaque(self.x).is_none() {
            self.x += 1;
        }
        let start = self.x;
        let color = self.opaque(start)?;
        self.x += 1;
        while self.x < width && self.opaque(self.x) == Some(color) {
            self.x += 1;
        }
        Some(PixelRun {
            start,
            end: self.x,
            color,
        })
    }
}

/// Icon component: a bitmap placed at an integer scale.
pub struct Icon<'a> {
    bitmap: &'a IconBitmap,
    scale: u32,
}

impl<'a> Icon<'a> {
    /// Draw `bitmap` at 1x.
    pub fn new(bitmap: &'a IconBitmap) -> Self {
        Self { bitmap, scale: 1 }
    }

    /// Each source pixel becomes a `scale`x`scale` block (minimum 1).
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    /// Rendered size in pixels.
    pub fn dimensions(&self) -> Size {
        Size::new(
            self.bitmap.width().saturating_mul(self.scale),
            self.bitmap.height().saturating_mul(self.scale),
        )
    }

    /// Emit one filled rectangle per run, top-left at `position`.
    pub fn render<C: Canvas>(&self, canvas: &mut C, position: Point) {
        let scale = signed(self.scale);
        for row in 0..self.bitmap.height() {
            let y = position.y + signed(row) * scale;
            for run in self.bitmap.row_runs(row) {
                let w = signed(run.len()) * scale;
                if w <= 0 {
                    continue;
                }
                canvas.draw(DrawCommand::fill_rect(
                    position.x + signed(run.start) * scale,
                    y,
                    w,
                    scale,
                    run.color,
                ));
            }
        }
    }
}

/// Decodes each icon path once.
#[derive(Debug, Default)]
pub struct IconCache {
    icons: HashMap<PathBuf, Arc<IconBitmap>>,
}

impl IconCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path` on first use, then hand out the shared copy.
    pub fn load(&mut self, path: &Path) -> Result<Arc<IconBitmap>> {
        if let Some(icon) = self.icons.get(path) {
            return Ok(Arc::clone(icon));
        }
        debug!(path = %path.display(), "decoding icon");
        let icon = Arc::new(IconBitmap::open(path)?);
        self.icons.insert(path.to_path_buf(), Arc::clone(&icon));
        Ok(icon)
    }

    /// Number of decoded icons held.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn row(pixels: &[Rgba<u8>]) -> IconBitmap {
        let mut img = RgbaImage::new(pixels.len() as u32, 1);
        for (x, p) in pixels.iter().enumerate() {
            img.put_pixel(x as u32, 0, *p);
        }
        IconBitmap::from_image(img)
    }

    #[test]
    fn test_runs_split_on_color_and_transparency() {
        let icon = row(&[CLEAR, RED, RED, BLUE, CLEAR, CLEAR, RED]);
        let runs: Vec<PixelRun> = icon.row_runs(0).collect();
        assert_eq!(
            runs,
            vec![
                PixelRun { start: 1, end: 3, color: Color::RED },
                PixelRun { start: 3, end: 4, color: Color::BLUE },
                PixelRun { start: 6, end: 7, color: Color::RED },
            ]
        );
    }

    #[test]
    fn test_fully_transparent_row_has_no_runs() {
        let icon = row(&[CLEAR; 16]);
        assert_eq!(icon.row_runs(0).count(), 0);
    }

    #[test]
    fn test_partial_alpha_counts_as_opaque() {
        let icon = row(&[Rgba([255, 0, 0, 1]), RED]);
        let runs: Vec<PixelRun> = icon.row_runs(0).collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 2);
    }

    #[test]
    fn test_row_out_of_range_is_empty() {
        let icon = row(&[RED]);
        assert_eq!(icon.row_runs(5).count(), 0);
    }

    #[test]
    fn test_render_scales_runs() {
        let mut img = RgbaImage::from_pixel(4, 2, CLEAR);
        img.put_pixel(1, 1, BLUE);
        img.put_pixel(2, 1, BLUE);
        let icon = IconBitmap::from_image(img);

        let mut cmds: Vec<DrawCommand> = Vec::new();
        Icon::new(&icon).scale(3).render(&mut cmds, Point::new(10, 20));
        assert_eq!(cmds, vec![DrawCommand::fill_rect(13, 23, 6, 3, Color::BLUE)]);
    }

    #[test]
    fn test_icon_dimensions() {
        let icon = IconBitmap::from_image(RgbaImage::new(16, 16));
        assert_eq!(Icon::new(&icon).scale(2).dimensions(), Size::new(32, 32));
        assert_eq!(Icon::new(&icon).scale(0).dimensions(), Size::new(16, 16));
    }

    #[test]
    fn test_cache_decodes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("potion.png");
        RgbaImage::from_pixel(16, 16, RED).save(&path).unwrap();

        let mut cache = IconCache::new();
        let a = cache.load(&path).unwrap();
        let b = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(a.run_count(), 16);
    }

    #[test]
    fn test_missing_icon_is_error() {
        let mut cache = IconCache::new();
        let err = cache.load(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::Icon { .. }));
        assert!(cache.is_empty());
    }

    proptest! {
        #[test]
        fn prop_runs_cover_exactly_the_opaque_pixels(
            pixels in proptest::collection::vec(0u8..4, 1..32)
        ) {
            let palette = [CLEAR, RED, BLUE, Rgba([0, 255, 0, 128])];
            let row_px: Vec<Rgba<u8>> = pixels.iter().map(|&i| palette[i as usize]).collect();
            let icon = row(&row_px);

            let mut covered = vec![false; row_px.len()];
            let mut prev_end = 0;
            for run in icon.row_runs(0) {
                prop_assert!(run.start >= prev_end);
                prop_assert!(!run.is_empty());
                for x in run.start..run.end {
                    let p = row_px[x as usize];
                    prop_assert!(p.0[3] != 0);
                    prop_assert_eq!(Color::rgb(p.0[0], p.0[1], p.0[2]), run.color);
                    covered[x as usize] = true;
                }
                prev_end = run.end;
            }
            for (x, p) in row_px.iter().enumerate() {
                prop_assert_eq!(covered[x], p.0[3] != 0);
            }
        }
    }
}
