//! Frame pacing: how much path may be drawn per frame at each speed level.
//!
//! The speed level is owned by whatever drives frames (the chrome writes it,
//! sketches only read it through a [`Pacer`]). Each level maps to an
//! immutable [`SpeedProfile`]; the fastest level adds random "bursts" so the
//! reveal looks punctuated rather than uniform.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::prng::RandomSource;

/// Discrete animation speed selectable by the user.
///
/// Serializes as its multiplier. Deserializing is as forgiving as the chrome:
/// numbers go through [`from_value`](SpeedLevel::from_value), strings through
/// [`parse_lossy`](SpeedLevel::parse_lossy), anything else is `Normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum SpeedLevel {
    #[default]
    Normal,
    Double,
    Quadruple,
}

impl SpeedLevel {
    /// All levels, slowest first.
    pub const ALL: [SpeedLevel; 3] = [SpeedLevel::Normal, SpeedLevel::Double, SpeedLevel::Quadruple];

    /// Maps a raw chrome value to a level; 2 and 4 select the fast levels,
    /// anything else (including NaN and infinities) is `Normal`.
    pub fn from_value(value: f64) -> Self {
        if value == 2.0 {
            SpeedLevel::Double
        } else if value == 4.0 {
            SpeedLevel::Quadruple
        } else {
            SpeedLevel::Normal
        }
    }

    /// Lenient parse of `"1"`, `"2x"`, `" 4 "`, ... Unparseable input is `Normal`.
    pub fn parse_lossy(text: &str) -> Self {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_suffix('x')
            .or_else(|| trimmed.strip_suffix('X'))
            .unwrap_or(trimmed);
        digits
            .trim()
            .parse::<f64>()
            .map(Self::from_value)
            .unwrap_or_default()
    }

    /// The multiplier shown to users (1, 2 or 4).
    pub fn multiplier(self) -> u8 {
        match self {
            SpeedLevel::Normal => 1,
            SpeedLevel::Double => 2,
            SpeedLevel::Quadruple => 4,
        }
    }

    /// Short label such as `"2x"`.
    pub fn label(self) -> String {
        format!("{}x", self.multiplier())
    }

    pub fn profile(self) -> &'static SpeedProfile {
        match self {
            SpeedLevel::Normal => &NORMAL,
            SpeedLevel::Double => &DOUBLE,
            SpeedLevel::Quadruple => &QUADRUPLE,
        }
    }
}

impl From<SpeedLevel> for u8 {
    fn from(level: SpeedLevel) -> u8 {
        level.multiplier()
    }
}

impl From<u8> for SpeedLevel {
    fn from(value: u8) -> Self {
        SpeedLevel::from_value(value as f64)
    }
}

impl<'de> Deserialize<'de> for SpeedLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().map_or(SpeedLevel::Normal, SpeedLevel::from_value),
            Value::String(s) => SpeedLevel::parse_lossy(&s),
            _ => SpeedLevel::Normal,
        })
    }
}

/// Pacing constants for one speed level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedProfile {
    /// Floor for the per-frame draw distance.
    pub min_distance: f64,
    /// Draw distance as a fraction of the viewport scale.
    pub distance_scale: f64,
    /// Multiplier applied to per-shape stroke increments.
    pub increment_multiplier: f64,
    /// Discrete placements happen only every `placement_interval` frames.
    pub placement_interval: u32,
    pub distance_burst_chance: f64,
    pub distance_burst_min: f64,
    pub distance_burst_scale_min: f64,
    pub distance_burst_scale_max: f64,
    pub increment_burst_chance: f64,
    pub increment_burst_multiplier_min: f64,
    pub increment_burst_multiplier_max: f64,
}

const NORMAL: SpeedProfile = SpeedProfile {
    min_distance: 8.0,
    distance_scale: 0.02,
    increment_multiplier: 0.5,
    placement_interval: 3,
    distance_burst_chance: 0.0,
    distance_burst_min: 0.0,
    distance_burst_scale_min: 0.0,
    distance_burst_scale_max: 0.0,
    increment_burst_chance: 0.0,
    increment_burst_multiplier_min: 0.0,
    increment_burst_multiplier_max: 0.0,
};

const DOUBLE: SpeedProfile = SpeedProfile {
    min_distance: 24.0,
    distance_scale: 0.055,
    increment_multiplier: 2.0,
    placement_interval: 1,
    ..NORMAL
};

const QUADRUPLE: SpeedProfile = SpeedProfile {
    min_distance: 54.0,
    distance_scale: 0.12,
    increment_multiplier: 4.0,
    placement_interval: 1,
    distance_burst_chance: 0.35,
    distance_burst_min: 28.0,
    distance_burst_scale_min: 0.08,
    distance_burst_scale_max: 0.2,
    increment_burst_chance: 0.5,
    increment_burst_multiplier_min: 10.0,
    increment_burst_multiplier_max: 50.0,
};

/// Reads the current speed level and turns it into per-frame budgets.
///
/// Stateless apart from the level itself; randomness for bursts comes from
/// the caller so replays stay deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacer {
    level: SpeedLevel,
}

impl Pacer {
    pub fn new(level: SpeedLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> SpeedLevel {
        self.level
    }

    pub fn set_level(&mut self, level: SpeedLevel) {
        self.level = level;
    }

    pub fn profile(&self) -> &'static SpeedProfile {
        self.level.profile()
    }

    /// Path length that may be drawn this frame. `scale` is usually
    /// `min(viewport width, viewport height)`.
    pub fn distance_per_frame<R: RandomSource + ?Sized>(&self, scale: f64, rng: &mut R) -> f64 {
        let p = self.profile();
        let mut distance = p.min_distance.max(scale * p.distance_scale);
        if rng.chance(p.distance_burst_chance) {
            let burst = scale * rng.range(p.distance_burst_scale_min, p.distance_burst_scale_max);
            distance += p.distance_burst_min.max(burst);
        }
        distance
    }

    /// Scales a shape's base stroke increment, occasionally bursting.
    pub fn stroke_increment<R: RandomSource + ?Sized>(&self, base: f64, rng: &mut R) -> f64 {
        let p = self.profile();
        let mut increment = base * p.increment_multiplier;
        if rng.chance(p.increment_burst_chance) {
            increment += base
                * rng.range(
                    p.increment_burst_multiplier_min,
                    p.increment_burst_multiplier_max,
                );
        }
        increment
    }

    /// True when discrete placement should wait for a later frame.
    pub fn should_skip_frame(&self, frame_index: u64) -> bool {
        let interval = self.profile().placement_interval as u64;
        interval > 1 && frame_index % interval != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::Xorshift64;

    #[test]
    fn default_level_is_normal() {
        assert_eq!(SpeedLevel::default(), SpeedLevel::Normal);
        assert_eq!(Pacer::default().level(), SpeedLevel::Normal);
    }

    #[test]
    fn from_value_falls_back_to_normal() {
        assert_eq!(SpeedLevel::from_value(2.0), SpeedLevel::Double);
        assert_eq!(SpeedLevel::from_value(4.0), SpeedLevel::Quadruple);
        assert_eq!(SpeedLevel::from_value(3.0), SpeedLevel::Normal);
        assert_eq!(SpeedLevel::from_value(f64::NAN), SpeedLevel::Normal);
        assert_eq!(SpeedLevel::from_value(f64::INFINITY), SpeedLevel::Normal);
    }

    #[test]
    fn parse_lossy_accepts_labels() {
        assert_eq!(SpeedLevel::parse_lossy("2x"), SpeedLevel::Double);
        assert_eq!(SpeedLevel::parse_lossy(" 4 "), SpeedLevel::Quadruple);
        assert_eq!(SpeedLevel::parse_lossy("fast"), SpeedLevel::Normal);
        assert_eq!(SpeedLevel::parse_lossy(""), SpeedLevel::Normal);
    }

    #[test]
    fn serde_uses_multiplier() {
        assert_eq!(serde_json::to_string(&SpeedLevel::Quadruple).unwrap(), "4");
        let level: SpeedLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level, SpeedLevel::Double);
        let odd: SpeedLevel = serde_json::from_str("7").unwrap();
        assert_eq!(odd, SpeedLevel::Normal);
    }

    #[test]
    fn deserialize_is_lenient() {
        let parse = |json: &str| serde_json::from_str::<SpeedLevel>(json).unwrap();
        assert_eq!(parse("2.0"), SpeedLevel::Double);
        assert_eq!(parse("4.5"), SpeedLevel::Normal);
        assert_eq!(parse(r#""2x""#), SpeedLevel::Double);
        assert_eq!(parse(r#"" 4 ""#), SpeedLevel::Quadruple);
        assert_eq!(parse(r#""fast""#), SpeedLevel::Normal);
        assert_eq!(parse("null"), SpeedLevel::Normal);
        assert_eq!(parse("[4]"), SpeedLevel::Normal);
        assert_eq!(parse("-1"), SpeedLevel::Normal);
    }

    #[test]
    fn labels() {
        let labels: Vec<String> = SpeedLevel::ALL.iter().map(|l| l.label()).collect();
        assert_eq!(labels, ["1x", "2x", "4x"]);
    }

    #[test]
    fn normal_distance_for_800_by_600() {
        let pacer = Pacer::new(SpeedLevel::Normal);
        let mut rng = Xorshift64::new(1);
        assert_eq!(pacer.distance_per_frame(600.0, &mut rng), 12.0);
    }

    #[test]
    fn normal_distance_floor_applies_on_small_viewports() {
        let pacer = Pacer::new(SpeedLevel::Normal);
        let mut rng = Xorshift64::new(1);
        assert_eq!(pacer.distance_per_frame(100.0, &mut rng), 8.0);
    }

    #[test]
    fn double_distance_has_no_bursts() {
        let pacer = Pacer::new(SpeedLevel::Double);
        let mut rng = Xorshift64::new(9);
        for _ in 0..200 {
            assert!((pacer.distance_per_frame(1000.0, &mut rng) - 55.0).abs() < 1e-9);
        }
    }

    #[test]
    fn quadruple_distance_sometimes_bursts() {
        let pacer = Pacer::new(SpeedLevel::Quadruple);
        let mut rng = Xorshift64::new(21);
        let base = 1000.0 * 0.12;
        let mut bursts = 0;
        for _ in 0..1000 {
            let d = pacer.distance_per_frame(1000.0, &mut rng);
            assert!(d >= base - 1e-9);
            if d > base + 1e-9 {
                bursts += 1;
                // burst adds max(28, 1000 * [0.08, 0.2))
                assert!(d >= base + 80.0 - 1e-9 && d < base + 200.0 + 1e-9, "{d}");
            }
        }
        assert!((250..450).contains(&bursts), "burst count {bursts}");
    }

    #[test]
    fn stroke_increment_scales_by_level() {
        let mut rng = Xorshift64::new(2);
        assert_eq!(Pacer::new(SpeedLevel::Normal).stroke_increment(4.0, &mut rng), 2.0);
        assert_eq!(Pacer::new(SpeedLevel::Double).stroke_increment(4.0, &mut rng), 8.0);
    }

    #[test]
    fn quadruple_stroke_increment_bursts_within_range() {
        let pacer = Pacer::new(SpeedLevel::Quadruple);
        let mut rng = Xorshift64::new(5);
        for _ in 0..500 {
            let inc = pacer.stroke_increment(2.0, &mut rng);
            assert!(inc == 8.0 || (inc >= 8.0 + 20.0 && inc < 8.0 + 100.0), "{inc}");
        }
    }

    #[test]
    fn skip_frame_cadence() {
        let normal = Pacer::new(SpeedLevel::Normal);
        let skipped: Vec<bool> = (1..=6).map(|f| normal.should_skip_frame(f)).collect();
        assert_eq!(skipped, [true, true, false, true, true, false]);

        let fast = Pacer::new(SpeedLevel::Quadruple);
        assert!((1..100).all(|f| !fast.should_skip_frame(f)));
    }

    #[test]
    fn set_level_switches_profile() {
        let mut pacer = Pacer::default();
        pacer.set_level(SpeedLevel::Double);
        assert_eq!(pacer.profile().placement_interval, 1);
        assert_eq!(pacer.profile().min_distance, 24.0);
    }
}
