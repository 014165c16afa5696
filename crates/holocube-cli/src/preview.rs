//! Offline screen previews

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use holocube::preview::PreviewCanvas;
use holocube::prelude::*;
use holocube::screens::{centered, message_screen, progress_screen, timer_screen};

use crate::assets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Screen {
    Message,
    Progress,
    Timer,
    Status,
    Lobster,
}

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(value_enum)]
    screen: Screen,
    /// Output PNG path
    #[arg(short, long)]
    out: PathBuf,
    /// Directory holding the tracker icons
    #[arg(long, env = "HOLOCUBE_ICONS", default_value = assets::DEFAULT_ICON_DIR)]
    icons: PathBuf,
}

/// Commands for a sample of each screen.
pub fn commands(screen: Screen, icons: &TrackerIcons) -> Vec<DrawCommand> {
    let layout = Layout::default();
    match screen {
        Screen::Message => message_screen(
            &["Hello", "From", "Rust"],
            &[Color::CYAN, Color::WHITE, Color::ORANGE],
            3,
            Color::BLACK,
        ),
        Screen::Progress => progress_screen(0.66, Some("Loading"), Color::GREEN, Color::BLACK),
        Screen::Timer => {
            let mut cmds = vec![DrawCommand::clear(Color::BLACK)];
            let counts = TrackerCounts {
                water: 2,
                exercise: 10,
                focus: 1,
                supplements_done: true,
            };
            TrackerBar::new(icons, counts)
                .content_inset(8)
                .count_offset_y(-8)
                .x_shift(-4)
                .value_gap(4)
                .border(Some(Color::GRAY))
                .render(&layout, &mut cmds);
            cmds.push(centered(
                layout.body_rect().top_left.y + 14,
                "FOCUS",
                TextStyle::new().size(2),
            ));
            let view = TimerView::new()
                .colors(Color::RED, Color::BLACK)
                .at(layout.timer_y(4))
                .size(4);
            cmds.extend(timer_screen(1500, &view));
            Lobster::new(layout.mascot_anchor()).scale(0.85).render(&mut cmds);
            cmds
        }
        Screen::Status => {
            let mut cmds = vec![DrawCommand::clear(Color::BLACK)];
            StatusBar::new()
                .left_text("HOLOCUBE")
                .right_text("12:34")
                .wifi(true, 3)
                .battery(76, false)
                .render(&layout, &mut cmds);
            let body = layout.body_rect();
            cmds.push(centered(
                layout.timer_y(3),
                "READY",
                TextStyle::new().size(3).color(Color::CYAN),
            ));
            cmds.push(DrawCommand::stroke_rect(
                body.top_left.x + layout.padding,
                body.top_left.y + layout.gap,
                layout.screen_w - 2 * layout.padding,
                i32::try_from(body.size.height).unwrap_or(0) - 2 * layout.gap,
                Color::DARK_GRAY,
            ));
            cmds
        }
        Screen::Lobster => {
            let mut cmds = vec![DrawCommand::clear(Color::BLACK)];
            Lobster::new(Point::new(120, 120)).happy(true).scale(2.0).render(&mut cmds);
            cmds
        }
    }
}

pub fn run(args: &Args) -> Result<()> {
    let icons = match args.screen {
        Screen::Timer => assets::tracker_icons(&args.icons),
        _ => TrackerIcons::empty(),
    };
    let cmds = commands(args.screen, &icons);
    let mut canvas = PreviewCanvas::new();
    canvas.draw_all(cmds.iter().cloned());
    canvas
        .save_png(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    println!(
        "{} {} ({} commands)",
        "wrote".green(),
        args.out.display(),
        cmds.len()
    );
    Ok(())
}
