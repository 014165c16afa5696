//! HoloCube client
//!
//! Drives a HoloCube (a 240x240 networked pixel display) through its
//! JSON/HTTP drawing API.
//!
//! # Modules
//!
//! - [`client`] - `HoloCube` async client, primitives, GIF and system endpoints
//! - [`command`] - `DrawCommand` wire type and the `Canvas` sink
//! - [`batch`] - splitting command lists under device request limits
//! - [`layout`] - text metrics and the status/body/footer screen template
//! - [`components`] - progress bar, status bar, tracker bar, icons, mascot
//! - [`screens`] - composite screens (messages, timers, progress)
//! - [`draw3d`] - on-device wireframe renderer control
//! - [`preview`] - offline framebuffer that renders commands to PNG
//!
//! # Example
//!
//! ```no_run
//! use holocube::prelude::*;
//!
//! # async fn demo() -> holocube::Result<()> {
//! let cube = HoloCube::new("192.168.7.80")?;
//! cube.clear(Color::BLACK).await?;
//! cube.text(60, 100, "Hello!", TextStyle::new().size(4).color(Color::CYAN)).await?;
//! cube.circle(120, 120, 50, Color::RED, true).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod batch;
pub mod client;
pub mod color;
pub mod command;
pub mod components;
pub mod config;
pub mod draw3d;
pub mod error;
pub mod layout;
pub mod preview;
pub mod screens;

pub use client::{ApiResponse, HoloCube};
pub use color::Color;
pub use command::{Canvas, DrawCommand, TextStyle};
pub use config::{BatchPolicy, ClientConfig};
pub use error::{Error, Result};

pub mod prelude {
    //! Common imports for drawing on a HoloCube.
    pub use crate::client::{ApiResponse, HoloCube};
    pub use crate::color::Color;
    pub use crate::command::{Canvas, DrawCommand, TextStyle};
    pub use crate::components::prelude::*;
    pub use crate::config::{BatchPolicy, ClientConfig};
    pub use crate::draw3d::{Animation3d, Primitive3d, Transform3d};
    pub use crate::layout::Layout;
    pub use crate::screens::TimerView;
    pub use embedded_graphics::prelude::{Point, Size};
}
