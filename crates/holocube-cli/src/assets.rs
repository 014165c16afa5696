//! Bundled asset locations

use std::path::Path;

use colored::Colorize;
use holocube::components::icon::IconCache;
use holocube::components::tracker_bar::TrackerIcons;

/// 16x16 folder of the Kyrise RPG icon pack, relative to the working directory.
pub const DEFAULT_ICON_DIR: &str =
    "assets/icons/kyrise_16x16_rpg/Kyrise's 16x16 RPG Icon Pack - V1.3/icons/16x16";

/// Load the tracker icons, telling the user when some are missing.
pub fn tracker_icons(dir: &Path) -> TrackerIcons {
    let mut cache = IconCache::new();
    let icons = TrackerIcons::load_dir(dir, &mut cache);
    if icons.loaded() < 4 {
        println!(
            "{}",
            format!(
                "Only {}/4 tracker icons found in {}; drawing without artwork",
                icons.loaded(),
                dir.display()
            )
            .yellow()
        );
    }
    icons
}
