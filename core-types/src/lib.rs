use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width and height of a raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {input:?}: expected #rrggbb")]
pub struct ColorParseError {
    pub input: String,
}

/// Opaque 8-bit RGB color. Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor(pub [u8; 3]);

impl RgbColor {
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const BLACK: Self = Self([0, 0, 0]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for RgbColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }

        let mut out = [0u8; 3];
        for (idx, channel) in out.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[idx * 2..idx * 2 + 2], 16).map_err(|_| err())?;
        }
        Ok(Self(out))
    }
}

impl TryFrom<String> for RgbColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Where a scaled source lands on a fixed-size canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub scaled: Dimensions,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Placement {
    /// Zero when the placement overflows `target`.
    pub fn right_border(&self, target: Dimensions) -> u32 {
        target
            .width
            .saturating_sub(self.offset_x)
            .saturating_sub(self.scaled.width)
    }

    /// Zero when the placement overflows `target`.
    pub fn bottom_border(&self, target: Dimensions) -> u32 {
        target
            .height
            .saturating_sub(self.offset_y)
            .saturating_sub(self.scaled.height)
    }
}

pub mod report;

pub use report::{BatchReport, ItemOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors_with_and_without_hash() {
        assert_eq!("#ffffff".parse::<RgbColor>().unwrap(), RgbColor::WHITE);
        assert_eq!(
            "6366F1".parse::<RgbColor>().unwrap(),
            RgbColor::new(0x63, 0x66, 0xf1)
        );
        assert!("#fff".parse::<RgbColor>().is_err());
        assert!("#gg0000".parse::<RgbColor>().is_err());
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_string(&RgbColor::new(139, 92, 246)).unwrap();
        assert_eq!(json, "\"#8b5cf6\"");
        let back: RgbColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RgbColor::new(139, 92, 246));
    }

    #[test]
    fn placement_borders_add_up() {
        let target = Dimensions::new(1280, 800);
        let placement = Placement {
            scaled: Dimensions::new(1280, 720),
            offset_x: 0,
            offset_y: 40,
        };
        assert_eq!(placement.right_border(target), 0);
        assert_eq!(placement.bottom_border(target), 40);
    }

    #[test]
    fn borders_of_an_oversized_placement_are_zero() {
        let placement = Placement {
            scaled: Dimensions::new(1920, 1080),
            offset_x: 10,
            offset_y: 10,
        };
        let target = Dimensions::new(1280, 800);
        assert_eq!(placement.right_border(target), 0);
        assert_eq!(placement.bottom_border(target), 0);
    }
}
