//! Screen components
//!
//! Each component is a small builder that renders itself as draw commands
//! into a [`Canvas`](crate::command::Canvas).
//!
//! # Components
//!
//! - `Icon` - RGBA bitmap drawn as run-length rectangles
//! - `ProgressBar` - horizontal progress indicator
//! - `StatusBar` - text plus WiFi and battery indicators
//! - `TrackerBar` / `OsHeader` - habit tracker rows with icons and counts
//! - `Lobster` / `Confetti` - footer mascot

pub mod icon;
pub mod mascot;
pub mod progress_bar;
pub mod status_bar;
pub mod tracker_bar;

pub mod prelude {
    //! Every component type.
    pub use super::icon::*;
    pub use super::mascot::*;
    pub use super::progress_bar::*;
    pub use super::status_bar::*;
    pub use super::tracker_bar::*;
}
