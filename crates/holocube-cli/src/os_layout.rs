//! Status/body/footer layout walkthrough
//!
//! Draws the static shell once, then only the timer digits while counting
//! down, then updates the trackers and cheers up the lobster.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use holocube::prelude::*;

use crate::assets;

const COUNTDOWN_SECS: u64 = 10;

/// Clear, tracker bar and a lobster in the footer.
pub fn shell(layout: &Layout, icons: &TrackerIcons, counts: TrackerCounts, happy: bool) -> Vec<DrawCommand> {
    let mut cmds = Vec::new();
    if !happy {
        cmds.push(DrawCommand::clear(Color::BLACK));
    }
    TrackerBar::new(icons, counts).render(layout, &mut cmds);
    Lobster::new(layout.mascot_anchor()).happy(happy).render(&mut cmds);
    cmds
}

pub async fn run(cube: &HoloCube, icons_dir: &Path) -> Result<()> {
    let layout = Layout::default();
    let icons = assets::tracker_icons(icons_dir);

    let before = TrackerCounts {
        water: 3,
        exercise: 15,
        focus: 2,
        supplements_done: false,
    };
    cube.send_batched(&shell(&layout, &icons, before, false))
        .await
        .context("failed to draw the layout")?;
    println!("{}", "Shell drawn, counting down".cyan());

    let view = TimerView::new()
        .colors(Color::CYAN, Color::BLACK)
        .at(layout.timer_y(5));
    for remaining in (0..=COUNTDOWN_SECS).rev() {
        cube.show_timer(remaining, &view)
            .await
            .context("failed to update the timer")?;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    let after = TrackerCounts {
        water: 4,
        exercise: 20,
        focus: 3,
        supplements_done: true,
    };
    cube.send_batched(&shell(&layout, &icons, after, true))
        .await
        .context("failed to update the trackers")?;
    println!("{}", "Done".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_keeps_the_timer() {
        let layout = Layout::default();
        let icons = TrackerIcons::empty();
        let first = shell(&layout, &icons, TrackerCounts::default(), false);
        let update = shell(&layout, &icons, TrackerCounts::default(), true);

        assert!(matches!(first[0], DrawCommand::Clear { .. }));
        assert!(!update.iter().any(|c| matches!(c, DrawCommand::Clear { .. })));
        // nothing in the update overlaps the timer digits
        let top = layout.timer_y(5);
        let bottom = top + holocube::layout::text_height(5);
        assert!(update.iter().all(|c| match c {
            DrawCommand::Rect { y, h, .. } => y + h <= top || *y >= bottom,
            _ => true,
        }));
    }
}
