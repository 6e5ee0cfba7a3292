//! Palette colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a color string is not `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in color: {0:?}")]
    BadDigit(String),
}

/// An opaque 24-bit RGB color.
///
/// Serialized as a `#RRGGBB` string so palettes read naturally in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor` (clamped to 0.0-1.0).
    pub fn dimmed(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * factor).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !digits.is_ascii() {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }

        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorParseError::BadDigit(s.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // Short form: each digit is doubled, so "#F53" == "#FF5533".
                let short = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(ColorParseError::BadLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        assert_eq!("#FF5733".parse::<Rgb>(), Ok(Rgb::new(0xFF, 0x57, 0x33)));
        assert_eq!("#33a5ff".parse::<Rgb>(), Ok(Rgb::new(0x33, 0xA5, 0xFF)));
    }

    #[test]
    fn test_parse_short_form() {
        assert_eq!("#F53".parse::<Rgb>(), Ok(Rgb::new(0xFF, 0x55, 0x33)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "FF5733".parse::<Rgb>(),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            "#FF57".parse::<Rgb>(),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            "#GG5733".parse::<Rgb>(),
            Err(ColorParseError::BadDigit(_))
        ));
    }

    #[test]
    fn test_display_is_uppercase_hex() {
        assert_eq!(Rgb::new(0x0A, 0xB0, 0xFF).to_string(), "#0AB0FF");
    }

    #[test]
    fn test_dimmed() {
        let c = Rgb::new(200, 100, 50);
        assert_eq!(c.dimmed(1.0), c);
        assert_eq!(c.dimmed(0.0), Rgb::new(0, 0, 0));
        assert_eq!(c.dimmed(0.5), Rgb::new(100, 50, 25));
        assert_eq!(c.dimmed(3.0), c);
    }
}
