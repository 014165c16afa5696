//! Library showcase screens

use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use holocube::prelude::*;
use holocube::screens::big_number_screen;

use crate::assets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Three coloured lines of text
    Message,
    /// A 25-minute focus timer
    Timer,
    /// Progress bar filling from 0 to 100%
    Progress,
    /// Orange flash with a message
    Alert,
    /// Tracker bar, big status number and the lobster
    Os,
}

/// Everything the `os` screen draws, in paint order.
///
/// The big number screen clears, so it goes first and the tracker bar and
/// mascot are painted over it.
pub fn os_screen(icons: &TrackerIcons) -> Vec<DrawCommand> {
    let layout = Layout::default();
    let counts = TrackerCounts {
        water: 3,
        exercise: 2,
        focus: 15,
        supplements_done: false,
    };
    let mut cmds = big_number_screen("42", Some("STATUS"), Color::CYAN, Color::BLACK);
    TrackerBar::new(icons, counts).render(&layout, &mut cmds);
    Lobster::new(layout.mascot_anchor()).happy(true).render(&mut cmds);
    cmds
}

pub async fn run(cube: &HoloCube, demo: Demo) -> Result<()> {
    println!("{}", format!("Running {demo:?} demo on {}", cube.base_url()).cyan().bold());

    match demo {
        Demo::Message => {
            cube.show_message(
                &["Hello", "From", "Rust"],
                &[Color::CYAN, Color::WHITE, Color::ORANGE],
                3,
                Color::BLACK,
            )
            .await
            .context("message demo failed")?;
        }
        Demo::Timer => {
            cube.show_timer(1500, &TimerView::new().label("FOCUS").clear_screen(true))
                .await
                .context("timer demo failed")?;
        }
        Demo::Progress => {
            for i in 0..=100u8 {
                cube.show_progress(f32::from(i) / 100.0, Some("Loading"), Color::GREEN, Color::BLACK)
                    .await
                    .context("progress demo failed")?;
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
        Demo::Alert => {
            cube.alert("BREAK TIME", Color::ORANGE)
                .await
                .context("alert demo failed")?;
        }
        Demo::Os => {
            let icons = assets::tracker_icons(std::path::Path::new(assets::DEFAULT_ICON_DIR));
            let resp = cube
                .send_batched(&os_screen(&icons))
                .await
                .context("os demo failed")?;
            println!("processed {} commands", resp.processed.unwrap_or(0));
        }
    }

    println!("{}", "Done".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_screen_keeps_tracker_bar_visible() {
        let cmds = os_screen(&TrackerIcons::empty());
        let clears: Vec<usize> = cmds
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, DrawCommand::Clear { .. }))
            .map(|(i, _)| i)
            .collect();
        // the only full clear comes before anything else
        assert_eq!(clears, vec![0]);
        assert!(cmds.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "42"
        )));
    }
}
