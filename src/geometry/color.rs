//! RGB colors and luminosity contrast.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An opaque RGB color.
///
/// Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Pure white, the background of an unstyled page.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Pure black, the default text color.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Relative luminance in `0.0..=1.0` (sRGB, as used by WCAG).
    pub fn luminosity(&self) -> f64 {
        fn channel(c: u8) -> f64 {
            let v = c as f64 / 255.0;
            if v <= 0.03928 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// Contrast ratio `(max + 0.05) / (min + 0.05)` between two colors.
    ///
    /// Ranges from 1.0 (identical luminosity) to 21.0 (black on white).
    pub fn contrast(&self, other: &Color) -> f64 {
        let l1 = self.luminosity();
        let l2 = other.luminosity();
        let (max, min) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (max + 0.05) / (min + 0.05)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidColor(s.to_string()))?;
        let parse = |h: &str| u8::from_str_radix(h, 16).map_err(|_| Error::InvalidColor(s.to_string()));

        match hex.len() {
            6 => Ok(Color::rgb(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let r = parse(&hex[0..1])?;
                let g = parse(&hex[1..2])?;
                let b = parse(&hex[2..3])?;
                Ok(Color::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let c: Color = "#ff8000".parse().unwrap();
        assert_eq!(c, Color::rgb(255, 128, 0));
        assert_eq!(c.to_string(), "#ff8000");

        let short: Color = "#fff".parse().unwrap();
        assert_eq!(short, Color::WHITE);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("ff8000".parse::<Color>().is_err());
        assert!("#ff80".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_contrast() {
        let ratio = Color::BLACK.contrast(&Color::WHITE);
        assert!((ratio - 21.0).abs() < 0.01);
        assert!((Color::WHITE.contrast(&Color::WHITE) - 1.0).abs() < 1e-9);
        // symmetric
        let a = Color::rgb(10, 120, 200);
        assert!((a.contrast(&Color::WHITE) - Color::WHITE.contrast(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(1, 2, 3));
    }
}
