//! Discrete color palettes for sketches.
//!
//! Unlike a gradient, a sketch palette is a bag of colors picked at random
//! per shape (a Mondrian plane, a pebble).

use crate::color::Rgba;
use crate::error::SketchError;
use crate::prng::RandomSource;

/// Built-in palette names, in listing order.
const PALETTE_NAMES: &[&str] = &["mondrian", "pebbles"];

/// A non-empty set of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Creates a palette. Requires at least one color.
    pub fn new(colors: Vec<Rgba>) -> Result<Self, SketchError> {
        if colors.is_empty() {
            return Err(SketchError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex strings (see [`Rgba::from_hex`]).
    pub fn from_hex(hexes: &[&str]) -> Result<Self, SketchError> {
        let colors = hexes
            .iter()
            .map(|h| Rgba::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors in authoring order.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Picks one color uniformly at random.
    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Rgba {
        self.colors[rng.index(self.colors.len())]
    }

    /// Primary planes: red, yellow, blue, gray.
    pub fn mondrian() -> Self {
        Self {
            colors: vec![
                Rgba::rgba(200, 48, 42, 200),
                Rgba::rgba(242, 194, 48, 210),
                Rgba::rgba(31, 78, 156, 200),
                Rgba::rgba(150, 150, 146, 190),
            ],
        }
    }

    /// Translucent earth tones for stones.
    pub fn pebbles() -> Self {
        Self {
            colors: vec![
                Rgba::rgba(128, 110, 93, 48),
                Rgba::rgba(110, 94, 78, 46),
                Rgba::rgba(148, 129, 112, 44),
                Rgba::rgba(95, 82, 70, 44),
                Rgba::rgba(170, 152, 133, 40),
            ],
        }
    }

    /// Looks up a built-in palette by name (case insensitive).
    pub fn from_name(name: &str) -> Result<Self, SketchError> {
        match name.to_ascii_lowercase().as_str() {
            "mondrian" => Ok(Self::mondrian()),
            "pebbles" => Ok(Self::pebbles()),
            _ => Err(SketchError::InvalidPalette(format!(
                "unknown palette '{name}', expected one of: {}",
                PALETTE_NAMES.join(", ")
            ))),
        }
    }

    /// Names accepted by [`Palette::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }
}
