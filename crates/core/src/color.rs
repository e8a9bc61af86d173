//! 8-bit RGBA colors as used by the drawing surface.
//!
//! Sketch palettes are authored as straight (non-premultiplied) 8-bit RGBA,
//! which is also what canvas-2d style strings and PNG pixels want, so no
//! wider color space is carried.

use crate::error::SketchError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Straight-alpha RGBA color with 8-bit components.
///
/// Serializes as `"#rrggbbaa"`; parses `"#rrggbb"` (opaque) or `"#rrggbbaa"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha as a fraction in [0, 1].
    pub fn alpha_f64(self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Parses `"#rrggbb"`, `"rrggbb"`, `"#rrggbbaa"` or `"rrggbbaa"` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Rgba, SketchError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 && digits.len() != 8 {
            return Err(SketchError::InvalidColor(format!(
                "expected 6 or 8 hex digits in {hex:?}, got {}",
                digits.len()
            )));
        }
        let component = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| SketchError::InvalidColor(format!("bad hex component in {hex:?}")))
        };
        let a = if digits.len() == 8 { component(6)? } else { 255 };
        Ok(Rgba {
            r: component(0)?,
            g: component(2)?,
            b: component(4)?,
            a,
        })
    }

    /// Formats as `"#rrggbbaa"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Formats as a CSS `rgba()` string for canvas-2d style properties.
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {:.4})",
            self.r,
            self.g,
            self.b,
            self.alpha_f64()
        )
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_six_digits_is_opaque() {
        let c = Rgba::from_hex("#f6f4ee").unwrap();
        assert_eq!(c, Rgba::rgb(246, 244, 238));
    }

    #[test]
    fn from_hex_eight_digits_keeps_alpha() {
        let c = Rgba::from_hex("181818E6").unwrap();
        assert_eq!(c, Rgba::rgba(24, 24, 24, 230));
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(Rgba::from_hex("#fff").is_err());
        assert!(Rgba::from_hex("").is_err());
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(Rgba::from_hex("#gg0000").is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_input_without_panicking() {
        assert!(Rgba::from_hex("#ééé").is_err());
    }

    #[test]
    fn to_hex_includes_alpha() {
        assert_eq!(Rgba::rgba(16, 16, 16, 170).to_hex(), "#101010aa");
    }

    #[test]
    fn to_css_formats_alpha_fraction() {
        assert_eq!(Rgba::rgba(255, 0, 0, 255).to_css(), "rgba(255, 0, 0, 1.0000)");
        assert_eq!(Rgba::rgba(0, 0, 0, 0).to_css(), "rgba(0, 0, 0, 0.0000)");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c = Rgba::rgba(128, 110, 93, 48);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#806e5d30\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Rgba>("\"not a color\"").is_err());
    }
}
