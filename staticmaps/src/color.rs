//! RGBA colors and their string forms.
//!
//! Accepts hex notation (`#RGB`, `#RRGGBB`, `#RRGGBBAA`, with or without the
//! leading `#`) and the CSS basic color keywords plus `transparent`.
//! Parsing is case-insensitive.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Non-premultiplied 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0x80, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Perceived brightness in `[0, 1]`, ignoring alpha.
    pub fn luminance(&self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrasting(&self) -> Color {
        if self.luminance() >= 0.5 {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }

    /// Conversion for the drawing backend.
    pub fn to_skia(&self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    fn from_name(name: &str) -> Option<Self> {
        let c = match name {
            "black" => Color::BLACK,
            "silver" => Color::rgb(0xc0, 0xc0, 0xc0),
            "gray" | "grey" => Color::rgb(0x80, 0x80, 0x80),
            "white" => Color::WHITE,
            "maroon" => Color::rgb(0x80, 0x00, 0x00),
            "red" => Color::RED,
            "purple" => Color::rgb(0x80, 0x00, 0x80),
            "fuchsia" | "magenta" => Color::rgb(0xff, 0x00, 0xff),
            "green" => Color::GREEN,
            "lime" => Color::rgb(0x00, 0xff, 0x00),
            "olive" => Color::rgb(0x80, 0x80, 0x00),
            "yellow" => Color::rgb(0xff, 0xff, 0x00),
            "navy" => Color::rgb(0x00, 0x00, 0x80),
            "blue" => Color::BLUE,
            "teal" => Color::rgb(0x00, 0x80, 0x80),
            "aqua" | "cyan" => Color::rgb(0x00, 0xff, 0xff),
            "orange" => Color::rgb(0xff, 0xa5, 0x00),
            "brown" => Color::rgb(0xa5, 0x2a, 0x2a),
            "pink" => Color::rgb(0xff, 0xc0, 0xcb),
            "transparent" => Color::TRANSPARENT,
            _ => return None,
        };
        Some(c)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Color::rgb(
                nibble(0)? * 0x11,
                nibble(1)? * 0x11,
                nibble(2)? * 0x11,
            )),
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(c: Color) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input was empty or whitespace.
    #[error("Empty color string")]
    Empty,
    /// Input is neither a known name nor valid hex notation.
    #[error("Cannot parse color '{0}'")]
    Invalid(String),
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(c) = Color::from_name(&lower) {
            return Ok(c);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        Color::from_hex(hex).ok_or_else(|| ColorError::Invalid(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!("WHITE".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("white".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "yellow".parse::<Color>().unwrap(),
            Color::rgb(0xff, 0xff, 0x00)
        );
        assert_eq!("transparent".parse::<Color>().unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn test_parse_hex_forms() {
        let magenta_42 = Color::rgba(0xff, 0x00, 0xff, 0x42);
        let magenta = Color::rgb(0xff, 0x00, 0xff);
        for (input, expected) in [
            ("#FF00FF42", magenta_42),
            ("#ff00ff42", magenta_42),
            ("FF00FF42", magenta_42),
            ("#ff00ff", magenta),
            ("ff00ff", magenta),
            ("#f0f", magenta),
            ("f0f", magenta),
        ] {
            assert_eq!(input.parse::<Color>().unwrap(), expected, "input {input}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["bad-name", "#FF00F", "#GGGGGG", "#", "ffff"] {
            assert!(input.parse::<Color>().is_err(), "input {input}");
        }
        assert_eq!("".parse::<Color>(), Err(ColorError::Empty));
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(Color::BLACK.luminance(), 0.0);
        assert!((Color::WHITE.luminance() - 1.0).abs() < 1e-12);
        assert_eq!(Color::RED.contrasting(), Color::WHITE);
        assert_eq!(Color::rgb(0xff, 0xff, 0x00).contrasting(), Color::BLACK);
    }

    #[test]
    fn test_display_is_reparseable() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_string(), "#12345678");
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
    }
}
