//! Icon pack grid
//!
//! Picks the first sixteen 16x16 PNGs from a zip archive or a directory and
//! draws them as a centred 4x4 grid of run-length icons.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use holocube::components::icon::{Icon, IconBitmap};
use holocube::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Icons needed to fill the grid.
pub const GRID_ICONS: usize = 16;
const ICON_SIZE: u32 = 16;

#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub struct Source {
    /// Icon pack zip archive
    #[arg(long)]
    zip: Option<PathBuf>,
    /// Directory of PNG icons
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    source: Source,
    /// Integer icon scale, clamped to 1..=4
    #[arg(long, default_value_t = 2)]
    scale: u32,
    /// Background colour
    #[arg(long, default_value = "#000000")]
    bg: Color,
}

/// Geometry of the icon grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub cols: i32,
    pub rows: i32,
    pub icon_size: i32,
    pub scale: i32,
    pub gap: i32,
}

impl GridSpec {
    /// 4x4 grid of 16px icons, 8px apart, at `scale` clamped to 1..=4.
    pub fn new(scale: u32) -> Self {
        Self {
            cols: 4,
            rows: 4,
            icon_size: 16,
            scale: i32::try_from(scale.clamp(1, 4)).unwrap_or(1),
            gap: 8,
        }
    }

    /// Distance between the top-left corners of neighbouring cells.
    pub fn cell(&self) -> i32 {
        self.icon_size * self.scale + self.gap
    }

    pub fn width(&self) -> i32 {
        self.cols * self.icon_size * self.scale + (self.cols - 1) * self.gap
    }

    pub fn height(&self) -> i32 {
        self.rows * self.icon_size * self.scale + (self.rows - 1) * self.gap
    }

    /// Top-left of the grid when centred on the screen.
    pub fn origin(&self) -> Point {
        Point::new(
            (HoloCube::SCREEN_WIDTH - self.width()).div_euclid(2),
            (HoloCube::SCREEN_HEIGHT - self.height()).div_euclid(2),
        )
    }

    /// Top-left of cell `index`, row-major.
    pub fn position(&self, index: i32) -> Point {
        let (row, col) = (index / self.cols, index % self.cols);
        self.origin() + Point::new(col * self.cell(), row * self.cell())
    }
}

fn is_png(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Keep `icon` if it is exactly 16x16.
fn accept(name: &str, icon: holocube::Result<IconBitmap>) -> Option<IconBitmap> {
    match icon {
        Ok(icon) if icon.width() == ICON_SIZE && icon.height() == ICON_SIZE => Some(icon),
        Ok(icon) => {
            debug!(name, w = icon.width(), h = icon.height(), "skipping, not 16x16");
            None
        }
        Err(e) => {
            warn!(name, error = %e, "skipping undecodable icon");
            None
        }
    }
}

/// First [`GRID_ICONS`] 16x16 PNGs of a zip, by entry name.
///
/// Entries under a `16x16/` folder are preferred; if there are none every
/// PNG in the archive is considered.
pub fn icons_from_zip(path: &Path) -> Result<Vec<IconBitmap>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("{} is not a zip archive", path.display()))?;

    let pngs: Vec<String> = archive
        .file_names()
        .filter(|name| is_png(name))
        .map(String::from)
        .collect();
    let mut names: Vec<String> = pngs
        .iter()
        .filter(|name| name.replace('\\', "/").contains("/16x16/"))
        .cloned()
        .collect();
    if names.is_empty() {
        names = pngs;
    }
    names.sort();

    let mut icons = Vec::with_capacity(GRID_ICONS);
    for name in names {
        if icons.len() == GRID_ICONS {
            break;
        }
        let mut bytes = Vec::new();
        archive
            .by_name(&name)
            .with_context(|| format!("failed to read {name}"))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read {name}"))?;
        icons.extend(accept(&name, IconBitmap::from_bytes(&bytes, &name)));
    }
    Ok(icons)
}

/// First [`GRID_ICONS`] 16x16 PNGs below `dir`, ordered by full path.
pub fn icons_from_dir(dir: &Path) -> Result<Vec<IconBitmap>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() && is_png(&entry.path().to_string_lossy()) {
            paths.push(entry.into_path());
        }
    }
    // plain string order, so "a-b/x.png" comes before "a/y.png"
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    let mut icons = Vec::with_capacity(GRID_ICONS);
    for path in paths {
        if icons.len() == GRID_ICONS {
            break;
        }
        icons.extend(accept(&path.display().to_string(), IconBitmap::open(&path)));
    }
    Ok(icons)
}

/// Run-length rectangles for the whole grid.
pub fn grid_commands(icons: &[IconBitmap], spec: &GridSpec) -> Vec<DrawCommand> {
    let mut cmds = Vec::new();
    let scale = spec.scale.unsigned_abs();
    for (i, icon) in (0i32..).zip(icons.iter().take(GRID_ICONS)) {
        Icon::new(icon).scale(scale).render(&mut cmds, spec.position(i));
    }
    cmds
}

pub async fn run(cube: HoloCube, args: &Args) -> Result<()> {
    let icons = match (&args.source.zip, &args.source.dir) {
        (Some(zip), _) => icons_from_zip(zip)?,
        (None, Some(dir)) => icons_from_dir(dir)?,
        (None, None) => bail!("pass --zip or --dir"),
    };
    if icons.len() < GRID_ICONS {
        bail!(
            "Need {GRID_ICONS} icons; found {} 16x16 PNGs in source",
            icons.len()
        );
    }

    let spec = GridSpec::new(args.scale);
    let cmds = grid_commands(&icons, &spec);
    println!(
        "{}",
        format!("Drawing {} icons at {}x ({} rects)", icons.len(), spec.scale, cmds.len())
            .cyan()
            .bold()
    );

    // big payload: give the device more time between batches
    let policy = cube.batch_policy();
    let cube = cube.with_batch_policy(BatchPolicy {
        pause_ms: 50,
        ..policy
    });
    let resp = cube.clear(args.bg).await.context("clear failed")?;
    println!("clear: {}", resp.status);
    let resp = cube.send_batched(&cmds).await.context("batch failed")?;
    println!("{}", format!("batch: processed={}", resp.processed.unwrap_or(0)).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use image::{Rgba, RgbaImage};
    use zip::write::SimpleFileOptions;

    use super::*;

    fn png(side: u32, shade: u8) -> Vec<u8> {
        let img = RgbaImage::from_pixel(side, side, Rgba([shade, 0, 0, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_grid_is_centred() {
        let spec = GridSpec::new(2);
        assert_eq!(spec.cell(), 40);
        assert_eq!(spec.width(), 152);
        assert_eq!(spec.origin(), Point::new(44, 44));
        assert_eq!(spec.position(5), Point::new(84, 84));
        assert_eq!(spec.position(15), Point::new(164, 164));
    }

    #[test]
    fn test_scale_is_clamped() {
        assert_eq!(GridSpec::new(0).scale, 1);
        assert_eq!(GridSpec::new(9).scale, 4);
        // scale 4 is wider than the screen and starts off the left edge
        assert_eq!(GridSpec::new(4).origin().x, -20);
    }

    #[test]
    fn test_zip_prefers_16x16_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.zip");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        let opts = SimpleFileOptions::default();
        for i in 0..3 {
            zip.start_file(format!("pack/32x32/a{i:02}.png"), opts).unwrap();
            zip.write_all(&png(32, 0)).unwrap();
        }
        for i in (0..20).rev() {
            zip.start_file(format!("pack/16x16/icon_{i:02}.png"), opts).unwrap();
            zip.write_all(&png(16, u8::try_from(i).unwrap())).unwrap();
        }
        zip.start_file("pack/readme.txt", opts).unwrap();
        zip.write_all(b"hi").unwrap();
        zip.finish().unwrap();

        let icons = icons_from_zip(&path).unwrap();
        assert_eq!(icons.len(), GRID_ICONS);
        // sorted by name: icon_00 first
        let mut cmds = Vec::new();
        Icon::new(&icons[0]).render(&mut cmds, Point::zero());
        assert_eq!(cmds[0], DrawCommand::fill_rect(0, 0, 16, 1, Color::rgb(0, 0, 0)));
        let mut cmds = Vec::new();
        Icon::new(&icons[15]).render(&mut cmds, Point::zero());
        assert_eq!(cmds[0], DrawCommand::fill_rect(0, 0, 16, 1, Color::rgb(15, 0, 0)));
    }

    #[test]
    fn test_dir_skips_other_sizes_and_reports_shortfall() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            std::fs::write(dir.path().join(format!("i{i}.png")), png(16, 1)).unwrap();
        }
        std::fs::write(dir.path().join("big.png"), png(24, 1)).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let icons = icons_from_dir(dir.path()).unwrap();
        assert_eq!(icons.len(), 5);
        assert!(icons_from_dir(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_dir_orders_by_full_path() {
        let dir = tempfile::tempdir().unwrap();
        // '-' sorts before '/', so a-b/ files precede a/ files
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a").join("y.png"), png(16, 2)).unwrap();
        std::fs::create_dir(dir.path().join("a-b")).unwrap();
        std::fs::write(dir.path().join("a-b").join("x.png"), png(16, 1)).unwrap();
        std::fs::write(dir.path().join("b.png"), png(16, 3)).unwrap();

        let icons = icons_from_dir(dir.path()).unwrap();
        let shades: Vec<Color> = icons
            .iter()
            .map(|icon| {
                let mut cmds = Vec::new();
                Icon::new(icon).render(&mut cmds, Point::zero());
                match cmds[0] {
                    DrawCommand::Rect { color, .. } => color,
                    ref other => panic!("unexpected command {other:?}"),
                }
            })
            .collect();
        assert_eq!(
            shades,
            vec![Color::rgb(1, 0, 0), Color::rgb(2, 0, 0), Color::rgb(3, 0, 0)]
        );
    }

    #[test]
    fn test_grid_commands_one_rect_per_row_run() {
        let icon = IconBitmap::from_bytes(&png(16, 9), "solid").unwrap();
        let icons = vec![icon; GRID_ICONS];
        let spec = GridSpec::new(1);
        let cmds = grid_commands(&icons, &spec);
        // solid icon: one run per row
        assert_eq!(cmds.len(), GRID_ICONS * 16);
        assert_eq!(cmds[0], DrawCommand::fill_rect(76, 76, 16, 1, Color::rgb(9, 0, 0)));
    }
}
