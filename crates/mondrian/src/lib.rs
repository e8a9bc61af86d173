#![deny(unsafe_code)]
//! Mondrian-style composition sketch.
//!
//! Partitions the viewport (minus a margin) into rectangles of bounded area
//! and aspect ratio, gives each a fill plan (blank, dark hatch, or colored
//! hatch), then reveals the piece stroke by stroke: every section outline
//! first, then each section's hatching in reading order. Each frame draws a
//! fixed path length chosen by the [`Pacer`], so the reveal speed depends on
//! the speed level and viewport, not on how much detail a section has.

pub mod fill;
pub mod partition;

use huahua_core::color::Rgba;
use huahua_core::geometry::{Rect, Viewport};
use huahua_core::pacing::Pacer;
use huahua_core::palette::Palette;
use huahua_core::params::{param_chance, param_f64, param_usize};
use huahua_core::prng::{RandomSource, Xorshift64};
use huahua_core::sketch::{Credits, FrameStatus, Sketch};
use huahua_core::stroke::StrokePath;
use huahua_core::surface::{StrokeStyle, Surface};
use serde_json::{json, Value};
use tracing::{debug, info, trace};

use fill::{spacing_bounds, FillStyle, Section};
use partition::{composition_bounds, partition, PartitionRules};

/// Canvas color.
pub const BACKGROUND: Rgba = Rgba::rgb(246, 244, 238);
/// Section outline color.
pub const GRID_COLOR: Rgba = Rgba::rgba(24, 24, 24, 230);

const DEFAULT_MARGIN_RATIO: f64 = 0.06;
const DEFAULT_MARGIN_MIN: f64 = 32.0;
const DEFAULT_MARGIN_MAX: f64 = 96.0;
const DEFAULT_BLANK_CHANCE: f64 = 0.3;
const DEFAULT_DARK_CHANCE: f64 = 0.15;

/// Leftover budget below this is dropped instead of drawing a sub-pixel sliver.
const BUDGET_EPSILON: f64 = 1e-9;

const TITLE: &str = "Composition with large red plane, yellow, black, gray and blue";
const AUTHOR: &str = "Piet Mondriaan";
const URL: &str =
    "https://www.kunstmuseum.nl/en/collection/composition-large-red-plane-yellow-black-gray-and-blue";

/// Tunable parameters for the Mondrian sketch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MondrianParams {
    /// Margin as a fraction of `min(width, height)`.
    pub margin_ratio: f64,
    pub margin_min: f64,
    pub margin_max: f64,
    pub rules: PartitionRules,
    /// Probability a section is left blank.
    pub blank_chance: f64,
    /// Probability a section gets dark hatching.
    pub dark_chance: f64,
}

impl Default for MondrianParams {
    fn default() -> Self {
        Self {
            margin_ratio: DEFAULT_MARGIN_RATIO,
            margin_min: DEFAULT_MARGIN_MIN,
            margin_max: DEFAULT_MARGIN_MAX,
            rules: PartitionRules::default(),
            blank_chance: DEFAULT_BLANK_CHANCE,
            dark_chance: DEFAULT_DARK_CHANCE,
        }
    }
}

impl MondrianParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = PartitionRules::default();
        Self {
            margin_ratio: param_f64(params, "margin_ratio", DEFAULT_MARGIN_RATIO),
            margin_min: param_f64(params, "margin_min", DEFAULT_MARGIN_MIN),
            margin_max: param_f64(params, "margin_max", DEFAULT_MARGIN_MAX),
            rules: PartitionRules {
                area_min_ratio: param_f64(params, "area_min_ratio", d.area_min_ratio),
                area_max_ratio: param_f64(params, "area_max_ratio", d.area_max_ratio),
                ratio_min: param_f64(params, "ratio_min", d.ratio_min),
                ratio_max: param_f64(params, "ratio_max", d.ratio_max),
                attempts: param_usize(params, "partition_attempts", d.attempts),
                cut_attempts: param_usize(params, "cut_attempts", d.cut_attempts),
            },
            blank_chance: param_chance(params, "blank_chance", DEFAULT_BLANK_CHANCE),
            dark_chance: param_chance(params, "dark_chance", DEFAULT_DARK_CHANCE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Outlines,
    Fills,
}

/// The Mondrian sketch: layout plus reveal state.
pub struct Mondrian {
    params: MondrianParams,
    palette: Palette,
    rng: Xorshift64,
    viewport: Option<Viewport>,
    bounds: Option<Rect>,
    sections: Vec<Section>,
    outlines: StrokePath,
    phase: Phase,
    current_section: usize,
    fill_weight: f64,
    border_weight: f64,
    used_fallback: bool,
    complete: bool,
}

impl Mondrian {
    /// Creates an empty sketch; call [`Sketch::regenerate`] before drawing.
    pub fn new(seed: u64, params: MondrianParams) -> Self {
        Self {
            params,
            palette: Palette::mondrian(),
            rng: Xorshift64::new(seed),
            viewport: None,
            bounds: None,
            sections: Vec::new(),
            outlines: StrokePath::default(),
            phase: Phase::Outlines,
            current_section: 0,
            fill_weight: 1.0,
            border_weight: 4.0,
            used_fallback: false,
            complete: true,
        }
    }

    /// Creates the sketch from a JSON params object.
    pub fn from_json(seed: u64, params: &Value) -> Self {
        Self::new(seed, MondrianParams::from_json(params))
    }

    /// Sections in drawing order (top-to-bottom, then left-to-right).
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The outline path covering every section edge.
    pub fn outlines(&self) -> &StrokePath {
        &self.outlines
    }

    /// The composition rectangle of the current layout.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// True when the current layout is the fallback grid.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    /// Total path length of the composition (outlines plus all fills).
    pub fn total_length(&self) -> f64 {
        self.outlines.total_length()
            + self
                .sections
                .iter()
                .map(|s| s.fill.total_length())
                .sum::<f64>()
    }

    /// Draws outlines while there is budget; returns what was used.
    fn draw_outlines(&mut self, budget: f64, surface: &mut dyn Surface) -> f64 {
        let weight = self.border_weight;
        let rng = &mut self.rng;
        self.outlines.advance(budget, surface, || {
            StrokeStyle::new(GRID_COLOR, (weight + rng.range(-0.25, 0.25)).max(1.2))
        })
    }

    /// Draws the current section's hatching; returns what was used.
    fn draw_current_fill(&mut self, budget: f64, surface: &mut dyn Surface) -> f64 {
        let weight = self.fill_weight;
        let rng = &mut self.rng;
        let section = &mut self.sections[self.current_section];
        let Some(color) = section.style.hatch_color() else {
            return 0.0;
        };
        section.fill.advance(budget, surface, || {
            StrokeStyle::new(color, (weight + rng.range(-0.12, 0.14)).max(0.7))
        })
    }
}

impl Sketch for Mondrian {
    fn name(&self) -> &'static str {
        "mondrian"
    }

    fn background(&self) -> Rgba {
        BACKGROUND
    }

    fn regenerate(&mut self, viewport: Viewport, surface: &mut dyn Surface) {
        surface.clear(BACKGROUND);

        let scale = viewport.scale();
        self.fill_weight = (scale * 0.0018).clamp(0.8, 1.4);
        self.border_weight = self.fill_weight * 4.0;

        let p = self.params;
        let bounds = composition_bounds(viewport, p.margin_ratio, p.margin_min, p.margin_max);
        let layout = partition(bounds, &p.rules, &mut self.rng);

        let mut rects = layout.sections;
        rects.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        let spacing = spacing_bounds(scale);
        let inset = self.border_weight * 0.7;
        let sections: Vec<Section> = rects
            .into_iter()
            .map(|rect| {
                let style = FillStyle::choose(&mut self.rng, p.blank_chance, p.dark_chance, &self.palette);
                Section::plan(rect, style, spacing, inset, &mut self.rng)
            })
            .collect();

        self.outlines = StrokePath::new(sections.iter().flat_map(|s| s.rect.edges()).collect());
        self.sections = sections;
        self.viewport = Some(viewport);
        self.bounds = Some(bounds);
        self.used_fallback = layout.used_fallback;
        self.phase = Phase::Outlines;
        self.current_section = 0;
        self.complete = false;

        info!(
            sketch = "mondrian",
            width = viewport.width(),
            height = viewport.height(),
            sections = self.sections.len(),
            fallback = layout.used_fallback,
            "regenerated composition"
        );
    }

    fn advance_frame(
        &mut self,
        frame_index: u64,
        pacer: &Pacer,
        surface: &mut dyn Surface,
    ) -> FrameStatus {
        let Some(viewport) = self.viewport else {
            return FrameStatus::Finished;
        };
        if self.complete {
            return FrameStatus::Finished;
        }

        let budget = pacer.distance_per_frame(viewport.scale(), &mut self.rng);
        trace!(frame_index, budget, "mondrian frame");

        let mut remaining = budget;
        while remaining > BUDGET_EPSILON {
            if self.phase == Phase::Outlines {
                let used = self.draw_outlines(remaining, surface);
                if used > 0.0 {
                    remaining -= used;
                } else {
                    self.phase = Phase::Fills;
                }
                continue;
            }

            if self.current_section >= self.sections.len() {
                break;
            }
            let used = self.draw_current_fill(remaining, surface);
            if used > 0.0 {
                remaining -= used;
            } else {
                self.current_section += 1;
            }
        }

        if self.phase == Phase::Fills && self.current_section >= self.sections.len() {
            self.complete = true;
            debug!(frame_index, "mondrian composition complete");
            return FrameStatus::Finished;
        }
        FrameStatus::Running
    }

    fn is_finished(&self) -> bool {
        self.complete
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "margin_ratio": p.margin_ratio,
            "margin_min": p.margin_min,
            "margin_max": p.margin_max,
            "area_min_ratio": p.rules.area_min_ratio,
            "area_max_ratio": p.rules.area_max_ratio,
            "ratio_min": p.rules.ratio_min,
            "ratio_max": p.rules.ratio_max,
            "partition_attempts": p.rules.attempts,
            "cut_attempts": p.rules.cut_attempts,
            "blank_chance": p.blank_chance,
            "dark_chance": p.dark_chance,
        })
    }

    fn param_schema(&self) -> Value {
        let d = MondrianParams::default();
        json!({
            "margin_ratio": {
                "type": "number", "default": d.margin_ratio, "min": 0.0, "max": 0.4,
                "description": "Margin around the composition as a fraction of min(width, height)"
            },
            "margin_min": {
                "type": "number", "default": d.margin_min, "min": 0.0, "max": 512.0,
                "description": "Smallest margin in surface units"
            },
            "margin_max": {
                "type": "number", "default": d.margin_max, "min": 0.0, "max": 512.0,
                "description": "Largest margin in surface units"
            },
            "area_min_ratio": {
                "type": "number", "default": d.rules.area_min_ratio, "min": 0.0, "max": 1.0,
                "description": "Smallest section area as a fraction of the composition"
            },
            "area_max_ratio": {
                "type": "number", "default": d.rules.area_max_ratio, "min": 0.0, "max": 1.0,
                "description": "Largest section area as a fraction of the composition"
            },
            "ratio_min": {
                "type": "number", "default": d.rules.ratio_min, "min": 0.05, "max": 1.0,
                "description": "Smallest width/height ratio of a section"
            },
            "ratio_max": {
                "type": "number", "default": d.rules.ratio_max, "min": 1.0, "max": 20.0,
                "description": "Largest width/height ratio of a section"
            },
            "partition_attempts": {
                "type": "integer", "default": d.rules.attempts, "min": 0, "max": 1000,
                "description": "Layouts tried before falling back to a 5x5 grid"
            },
            "cut_attempts": {
                "type": "integer", "default": d.rules.cut_attempts, "min": 1, "max": 500,
                "description": "Random cut positions tried per orientation"
            },
            "blank_chance": {
                "type": "number", "default": d.blank_chance, "min": 0.0, "max": 1.0,
                "description": "Probability a section is left unfilled"
            },
            "dark_chance": {
                "type": "number", "default": d.dark_chance, "min": 0.0, "max": 1.0,
                "description": "Probability a section gets dense dark hatching"
            }
        })
    }

    fn credits(&self) -> Option<Credits> {
        Some(Credits::new(TITLE, AUTHOR, URL))
    }
}
