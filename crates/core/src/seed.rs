//! Reproducible record of a sketch run.
//!
//! A [`Seed`] captures everything needed to replay a drawing: sketch name,
//! viewport, parameters, PRNG seed, speed level, and how many frames were
//! drawn (`None` means "until finished").

use serde::{Deserialize, Serialize};

use crate::error::SketchError;
use crate::geometry::Viewport;
use crate::pacing::SpeedLevel;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub sketch: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "empty_object")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub speed: SpeedLevel,
    #[serde(default)]
    pub frames: Option<u64>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Seed with empty params, normal speed, and no frame limit.
    pub fn new(sketch: &str, width: f64, height: f64, seed: u64) -> Self {
        Self {
            sketch: sketch.to_string(),
            width,
            height,
            params: empty_object(),
            seed,
            speed: SpeedLevel::Normal,
            frames: None,
        }
    }

    /// The viewport this seed describes, validated.
    pub fn viewport(&self) -> Result<Viewport, SketchError> {
        Viewport::new(self.width, self.height)
    }

    /// Parses a seed from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SketchError> {
        serde_json::from_str(text).map_err(|e| SketchError::InvalidSeed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let s = Seed::new("pebbles", 800.0, 600.0, 42);
        assert_eq!(s.sketch, "pebbles");
        assert_eq!(s.speed, SpeedLevel::Normal);
        assert_eq!(s.frames, None);
        assert_eq!(s.params, serde_json::json!({}));
    }

    #[test]
    fn json_round_trip_with_params_and_frames() {
        let mut s = Seed::new("mondrian", 1024.0, 768.0, 7);
        s.params = serde_json::json!({"blank_chance": 0.5});
        s.speed = SpeedLevel::Quadruple;
        s.frames = Some(240);
        let json = serde_json::to_string_pretty(&s).unwrap();
        assert_eq!(Seed::from_json_str(&json).unwrap(), s);
    }

    #[test]
    fn missing_optional_fields_fall_back() {
        let s = Seed::from_json_str(r#"{"sketch":"pebbles","width":300,"height":200,"seed":5}"#)
            .unwrap();
        assert_eq!(s.speed, SpeedLevel::Normal);
        assert_eq!(s.frames, None);
        assert!(s.params.is_object());
    }

    #[test]
    fn speed_labels_and_floats_are_accepted() {
        let s = Seed::from_json_str(
            r#"{"sketch":"mondrian","width":300,"height":200,"seed":5,"speed":"4x"}"#,
        )
        .unwrap();
        assert_eq!(s.speed, SpeedLevel::Quadruple);
        let s = Seed::from_json_str(
            r#"{"sketch":"mondrian","width":300,"height":200,"seed":5,"speed":2.0}"#,
        )
        .unwrap();
        assert_eq!(s.speed, SpeedLevel::Double);
    }

    #[test]
    fn viewport_validates() {
        assert!(Seed::new("pebbles", 0.0, 10.0, 1).viewport().is_err());
        assert_eq!(Seed::new("pebbles", 30.0, 10.0, 1).viewport().unwrap().scale(), 10.0);
    }

    #[test]
    fn malformed_seed_is_invalid_seed() {
        assert!(matches!(Seed::from_json_str("{"), Err(SketchError::InvalidSeed(_))));
        let missing = Seed::from_json_str(r#"{"sketch":"pebbles","width":300}"#);
        assert!(matches!(missing, Err(SketchError::InvalidSeed(msg)) if msg.contains("height")));
    }
}
