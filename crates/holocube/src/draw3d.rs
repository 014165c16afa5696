//! On-device 3D wireframe renderer
//!
//! The device rotates and projects a small set of built-in meshes itself; the
//! client only picks the mesh and sets rotation speed, colour and scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ApiResponse, HoloCube};
use crate::color::Color;
use crate::error::{Error, Result};

/// Built-in wireframe meshes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive3d {
    #[default]
    Cube,
    Pyramid,
    Octahedron,
    Diamond,
    Tetrahedron,
    Icosahedron,
}

impl Primitive3d {
    /// Every shape the firmware knows.
    pub const ALL: [Primitive3d; 6] = [
        Primitive3d::Cube,
        Primitive3d::Pyramid,
        Primitive3d::Octahedron,
        Primitive3d::Diamond,
        Primitive3d::Tetrahedron,
        Primitive3d::Icosahedron,
    ];

    /// Wire name of the shape.
    pub fn name(self) -> &'static str {
        match self {
            Primitive3d::Cube => "cube",
            Primitive3d::Pyramid => "pyramid",
            Primitive3d::Octahedron => "octahedron",
            Primitive3d::Diamond => "diamond",
            Primitive3d::Tetrahedron => "tetrahedron",
            Primitive3d::Icosahedron => "icosahedron",
        }
    }
}

impl fmt::Display for Primitive3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Primitive3d {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidPrimitive(s.to_string()))
    }
}

/// Continuous rotation settings, sent to `/api/v1/3d/animate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Animation3d {
    /// Rotation speed around x.
    pub speed_x: i32,
    /// Rotation speed around y.
    pub speed_y: i32,
    /// Rotation speed around z.
    pub speed_z: i32,
    /// Shape to draw.
    #[serde(rename = "type")]
    pub primitive: Primitive3d,
    /// Wireframe colour.
    pub color: Color,
    /// Size multiplier.
    pub scale: f32,
}

impl Default for Animation3d {
    fn default() -> Self {
        Self {
            speed_x: 0,
            speed_y: 2,
            speed_z: 0,
            primitive: Primitive3d::Cube,
            color: Color::CYAN,
            scale: 1.0,
        }
    }
}

impl Animation3d {
    /// Default rotation for `primitive`: slow spin around y, cyan, 1x.
    pub fn new(primitive: Primitive3d) -> Self {
        Self {
            primitive,
            ..Self::default()
        }
    }

    /// Per-axis rotation speed.
    pub fn speeds(mut self, x: i32, y: i32, z: i32) -> Self {
        self.speed_x = x;
        self.speed_y = y;
        self.speed_z = z;
        self
    }

    /// Wireframe colour.
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Size multiplier, 1.0 fills the screen comfortably.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Change colour and/or scale of the running animation. Unset fields are
/// left alone by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Transform3d {
    /// New wireframe colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// New size multiplier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl Transform3d {
    /// Change only the colour.
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            scale: None,
        }
    }

    /// Change only the scale.
    pub fn scale(scale: f32) -> Self {
        Self {
            color: None,
            scale: Some(scale),
        }
    }
}

impl HoloCube {
    /// Start (or restart) a rotating wireframe.
    pub async fn animate_3d(&self, animation: &Animation3d) -> Result<ApiResponse> {
        self.post("/api/v1/3d/animate", animation).await
    }

    /// Adjust the running animation.
    pub async fn transform_3d(&self, transform: &Transform3d) -> Result<ApiResponse> {
        self.post("/api/v1/3d/transform", transform).await
    }

    /// Draw a single static frame of `primitive`.
    pub async fn primitive_3d(&self, primitive: Primitive3d, color: Color, scale: f32) -> Result<ApiResponse> {
        self.post(
            "/api/v1/3d/primitive",
            &json!({ "type": primitive, "color": color, "scale": scale }),
        )
        .await
    }

    /// Stop the animation and return to normal drawing.
    pub async fn stop_3d(&self) -> Result<ApiResponse> {
        self.post("/api/v1/3d/stop", &json!({})).await
    }
}
