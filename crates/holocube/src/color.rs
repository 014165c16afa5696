//! RGB colours in the device's `#rrggbb` wire format

use core::fmt;
use core::str::FromStr;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A 24-bit colour. The device converts it to RGB565 on its side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color(Rgb888);

impl Color {
    /// `#000000`
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    /// `#ffffff`
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    /// `#ff0000`
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    /// `#00ff00`
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    /// `#0000ff`
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    /// `#00ffff`
    pub const CYAN: Color = Color::rgb(0x00, 0xff, 0xff);
    /// `#ff00ff`
    pub const MAGENTA: Color = Color::rgb(0xff, 0x00, 0xff);
    /// `#ffff00`
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    /// `#ff6600`
    pub const ORANGE: Color = Color::rgb(0xff, 0x66, 0x00);
    /// `#9900ff`
    pub const PURPLE: Color = Color::rgb(0x99, 0x00, 0xff);
    /// Separators and empty progress tracks.
    pub const DARK_GRAY: Color = Color::rgb(0x33, 0x33, 0x33);
    /// Inactive indicators.
    pub const GRAY: Color = Color::rgb(0x77, 0x77, 0x77);

    /// Build a colour from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Rgb888::new(r, g, b))
    }

    /// Red component.
    pub fn r(&self) -> u8 {
        self.0.r()
    }

    /// Green component.
    pub fn g(&self) -> u8 {
        self.0.g()
    }

    /// Blue component.
    pub fn b(&self) -> u8 {
        self.0.b()
    }

    /// The embedded-graphics colour, for rendering previews.
    pub fn to_rgb888(self) -> Rgb888 {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        Self(c)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let rgb = u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidColor(s.to_string()))?;
        let [_, r, g, b] = rgb.to_be_bytes();
        Ok(Self::rgb(r, g, b))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Color::ORANGE.to_string(), "#ff6600");
        assert_eq!(Color::rgb(0xAB, 0x01, 0x0f).to_string(), "#ab010f");
    }

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!("#00ffff".parse::<Color>().unwrap(), Color::CYAN);
        assert_eq!("9900FF".parse::<Color>().unwrap(), Color::PURPLE);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "", "#fff", "#12345", "#1234567", "#gg0000", "#ffé00", "+12345", "#+12345", "#-12345",
        ] {
            assert!(bad.parse::<Color>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let json = serde_json::to_string(&Color::DARK_GRAY).unwrap();
        assert_eq!(json, "\"#333333\"");
        let back: Color = serde_json::from_str("\"#777777\"").unwrap();
        assert_eq!(back, Color::GRAY);
    }
}
