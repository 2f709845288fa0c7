//! Color values for the tint channel.

use cinder_common::ConfigError;
use serde::{Deserialize, Serialize};

/// An RGB triple with 0-255 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RgbRepr")]
pub struct Rgb {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Rgb {
    /// White, the neutral tint.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `0xrrggbb` or bare `rrggbb`.
    ///
    /// An 8-digit form carries a leading alpha byte, which is ignored.
    pub fn from_hex(text: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(text.to_string());

        let digits = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .unwrap_or(text);
        let digits = match digits.len() {
            6 => digits,
            8 => digits.get(2..).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };

        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Packs this color into a tint value.
    #[must_use]
    pub const fn to_tint(self) -> Tint {
        Tint::from_rgb(self.r, self.g, self.b)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Hex(String),
    Components { r: u8, g: u8, b: u8 },
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = ConfigError;

    fn try_from(repr: RgbRepr) -> Result<Self, Self::Error> {
        match repr {
            RgbRepr::Hex(text) => Self::from_hex(&text),
            RgbRepr::Components { r, g, b } => Ok(Self::new(r, g, b)),
        }
    }
}

/// Packed `0xRRGGBB` tint applied multiplicatively by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint(pub u32);

impl Tint {
    /// No tint.
    pub const WHITE: Self = Self(0x00FF_FFFF);

    /// Packs byte components.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Packs float components, truncating each toward zero after clamping
    /// to 0-255.
    #[must_use]
    pub fn from_components(r: f32, g: f32, b: f32) -> Self {
        let byte = |c: f32| c.clamp(0.0, 255.0) as u8;
        Self::from_rgb(byte(r), byte(g), byte(b))
    }

    /// Splits the tint back into components.
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        Rgb::new((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}
