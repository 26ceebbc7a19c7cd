//! Visual style shared by stencils and connectors.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            3 => {
                let nibble = |i: usize| {
                    let v = u8::from_str_radix(digits.get(i..i + 1)?, 16).ok()?;
                    Some(v * 17)
                };
                Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, 255))
            }
            6 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for stencils and connectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// SVG-style dash pattern, e.g. `"4 2"` (None = solid).
    #[serde(default)]
    pub stroke_dasharray: Option<String>,
}

impl ShapeStyle {
    /// Default style for connectors: no fill.
    pub fn connector() -> Self {
        Self {
            fill_color: None,
            ..Self::default()
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    /// Set the stroke color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke_color = color.into();
    }

    /// Set the fill color from a peniko Color.
    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill_color = color.map(|c| c.into());
    }

    /// Parsed dash lengths; empty for a solid stroke.
    pub fn dashes(&self) -> Vec<f64> {
        self.stroke_dasharray
            .as_deref()
            .map(|s| {
                s.split(|c: char| c == ',' || c.is_whitespace())
                    .filter_map(|part| part.parse::<f64>().ok())
                    .filter(|v| *v >= 0.0)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: Some(SerializableColor::white()),
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            stroke_dasharray: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#ff0000"), Some(SerializableColor::new(255, 0, 0, 255)));
        assert_eq!(SerializableColor::from_hex("#0f0"), Some(SerializableColor::new(0, 255, 0, 255)));
        assert_eq!(SerializableColor::from_hex("#00000080"), Some(SerializableColor::new(0, 0, 0, 128)));
        assert_eq!(SerializableColor::from_hex("ff0000"), None);
        assert_eq!(SerializableColor::from_hex("#zz0000"), None);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(SerializableColor::new(18, 52, 86, 255).to_hex(), "#123456");
        assert_eq!(SerializableColor::transparent().to_hex(), "#00000000");
    }

    #[test]
    fn test_peniko_round_trip() {
        let color = SerializableColor::new(10, 20, 30, 255);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }

    #[test]
    fn test_dashes() {
        let mut style = ShapeStyle::default();
        assert!(style.dashes().is_empty());
        style.stroke_dasharray = Some("4, 2 1".to_string());
        assert_eq!(style.dashes(), vec![4.0, 2.0, 1.0]);
    }
}
