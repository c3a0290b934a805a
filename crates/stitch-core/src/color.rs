//! Hex color parsing for paint layers.
//!
//! Documents store colors as CSS-style hex strings (`#rgb`, `#rrggbb` or
//! `#rrggbbaa`). Renderers want concrete RGBA values, so this module turns
//! those strings into [`HexColor`] and from there into [`peniko::Color`].

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("unsupported color length {len} in {input:?}")]
    InvalidLength { input: String, len: usize },
    #[error("invalid hex digit in {0:?}")]
    InvalidDigit(String),
}

/// An 8-bit RGBA color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(input.to_string()))?;

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(input.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidDigit(input.to_string()))
        };

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let doubled: String = [c, c].iter().collect();
                    *slot = channel(&doubled)?;
                }
                Ok(Self::new(out[0], out[1], out[2], 255))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            len => Err(ColorError::InvalidLength {
                input: input.to_string(),
                len,
            }),
        }
    }

    /// Perceived brightness in `0..=255`, ignoring alpha.
    pub fn brightness(&self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }

    /// Multiply the embedded alpha by a layer opacity in `0..=1`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<HexColor> for Color {
    fn from(color: HexColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl From<Color> for HexColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Parse a color string and apply a layer opacity, logging and returning
/// `None` for malformed input so a bad color never aborts a paint pass.
pub fn paint_color(input: &str, opacity: f64) -> Option<Color> {
    match HexColor::parse(input) {
        Ok(color) => Some(color.with_opacity(opacity).into()),
        Err(err) => {
            log::warn!("Ignoring paint color: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_form() {
        assert_eq!(HexColor::parse("#fff").unwrap(), HexColor::white());
        assert_eq!(HexColor::parse("#a0c").unwrap(), HexColor::new(0xaa, 0x00, 0xcc, 255));
    }

    #[test]
    fn test_parse_with_alpha() {
        let color = HexColor::parse("#3b82f680").unwrap();
        assert_eq!(color, HexColor::new(0x3b, 0x82, 0xf6, 0x80));
        assert_eq!(color.to_string(), "#3b82f680");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(HexColor::parse("3b82f6"), Err(ColorError::MissingHash(_))));
        assert!(matches!(
            HexColor::parse("#3b82f"),
            Err(ColorError::InvalidLength { len: 5, .. })
        ));
        assert!(matches!(HexColor::parse("#zzzzzz"), Err(ColorError::InvalidDigit(_))));
    }

    #[test]
    fn test_brightness_orders_white_above_black() {
        assert!(HexColor::white().brightness() > HexColor::black().brightness());
        assert!((HexColor::white().brightness() - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let color = HexColor::parse("#000000").unwrap().with_opacity(0.5);
        assert_eq!(color.a, 128);
        assert!(paint_color("not a color", 1.0).is_none());
    }

    #[test]
    fn test_peniko_roundtrip() {
        let color = HexColor::new(10, 20, 30, 40);
        let peniko: Color = color.into();
        assert_eq!(HexColor::from(peniko), color);
    }
}
