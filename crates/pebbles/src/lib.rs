#![deny(unsafe_code)]
//! Pebble-mosaic sketch.
//!
//! A seed stone is dropped at the viewport center and the cluster grows
//! outward one stone at a time. Each new stone first has its outline traced
//! over several frames, then is painted in a translucent earth tone. Growth
//! stops after a run of failed placement searches.

pub mod cluster;
pub mod pebble;

use huahua_core::color::Rgba;
use huahua_core::geometry::Viewport;
use huahua_core::pacing::Pacer;
use huahua_core::palette::Palette;
use huahua_core::params::{param_f64, param_range, param_usize};
use huahua_core::prng::Xorshift64;
use huahua_core::sketch::{FrameStatus, Sketch};
use huahua_core::surface::Surface;
use serde_json::{json, Value};
use tracing::info;

use cluster::{Cluster, ClusterRules, Growth};

/// Canvas color.
pub const BACKGROUND: Rgba = Rgba::rgb(246, 241, 232);

/// Tunable parameters for the Pebbles sketch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PebbleParams {
    pub rules: ClusterRules,
}

impl PebbleParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = ClusterRules::default();
        let positive = |(lo, hi): (f64, f64), fallback: (f64, f64)| {
            if lo > 0.0 {
                (lo, hi)
            } else {
                fallback
            }
        };
        Self {
            rules: ClusterRules {
                seed_radius: positive(param_range(params, "seed_radius", d.seed_radius), d.seed_radius),
                candidate_radius: positive(
                    param_range(params, "candidate_radius", d.candidate_radius),
                    d.candidate_radius,
                ),
                placement_attempts: param_usize(params, "placement_attempts", d.placement_attempts).max(1),
                max_failures: param_usize(params, "max_failures", d.max_failures).max(1),
                overlap_tolerance: param_f64(params, "overlap_tolerance", d.overlap_tolerance).max(0.0),
                touch_tolerance: param_f64(params, "touch_tolerance", d.touch_tolerance).max(0.0),
                viewport_margin: param_f64(params, "viewport_margin", d.viewport_margin).max(0.0),
            },
        }
    }
}

pub struct Pebbles {
    params: PebbleParams,
    palette: Palette,
    rng: Xorshift64,
    cluster: Option<Cluster>,
}

impl Pebbles {
    pub fn new(seed: u64, params: PebbleParams) -> Self {
        Self {
            params,
            palette: Palette::pebbles(),
            rng: Xorshift64::new(seed),
            cluster: None,
        }
    }

    pub fn from_json(seed: u64, params: &Value) -> Self {
        Self::new(seed, PebbleParams::from_json(params))
    }

    /// The cluster laid out by the last regeneration.
    pub fn cluster(&self) -> Option<&Cluster> {
        self.cluster.as_ref()
    }
}

impl Sketch for Pebbles {
    fn name(&self) -> &'static str {
        "pebbles"
    }

    fn background(&self) -> Rgba {
        BACKGROUND
    }

    fn regenerate(&mut self, viewport: Viewport, surface: &mut dyn Surface) {
        surface.clear(BACKGROUND);
        let cluster = Cluster::start(viewport, self.params.rules, &self.palette, &mut self.rng);
        info!(
            width = viewport.width(),
            height = viewport.height(),
            center_x = cluster.center().x,
            center_y = cluster.center().y,
            "pebbles regenerated"
        );
        self.cluster = Some(cluster);
    }

    fn advance_frame(&mut self, frame_index: u64, pacer: &Pacer, surface: &mut dyn Surface) -> FrameStatus {
        let Some(cluster) = self.cluster.as_mut() else {
            return FrameStatus::Finished;
        };

        if let Some(pebble) = cluster.active_pebble_mut() {
            let budget = pacer.stroke_increment(pebble.draw_speed, &mut self.rng);
            pebble.trace(budget, surface);
            if pebble.is_traced() {
                pebble.finalize(surface);
                cluster.release_active();
            }
            return FrameStatus::Running;
        }

        if cluster.is_full() {
            return FrameStatus::Finished;
        }
        if pacer.should_skip_frame(frame_index) {
            return FrameStatus::Running;
        }

        match cluster.grow(&self.palette, &mut self.rng) {
            Growth::Placed | Growth::Failed => FrameStatus::Running,
            Growth::Full => {
                info!(pebbles = cluster.len(), "pebbles finished");
                FrameStatus::Finished
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.cluster
            .as_ref()
            .map_or(true, |c| c.is_full() && c.active().is_none())
    }

    fn params(&self) -> Value {
        let r = &self.params.rules;
        json!({
            "seed_radius": [r.seed_radius.0, r.seed_radius.1],
            "candidate_radius": [r.candidate_radius.0, r.candidate_radius.1],
            "placement_attempts": r.placement_attempts,
            "max_failures": r.max_failures,
            "overlap_tolerance": r.overlap_tolerance,
            "touch_tolerance": r.touch_tolerance,
            "viewport_margin": r.viewport_margin,
        })
    }

    fn param_schema(&self) -> Value {
        let d = ClusterRules::default();
        json!({
            "seed_radius": {
                "type": "range", "default": [d.seed_radius.0, d.seed_radius.1], "min": 1.0, "max": 400.0,
                "description": "Nominal radius range of the center stone"
            },
            "candidate_radius": {
                "type": "range", "default": [d.candidate_radius.0, d.candidate_radius.1], "min": 1.0, "max": 400.0,
                "description": "Nominal radius range of every later stone"
            },
            "placement_attempts": {
                "type": "integer", "default": d.placement_attempts, "min": 1, "max": 5000,
                "description": "Candidates sampled per placement"
            },
            "max_failures": {
                "type": "integer", "default": d.max_failures, "min": 1, "max": 1000,
                "description": "Consecutive failed placements before the cluster is full"
            },
            "overlap_tolerance": {
                "type": "number", "default": d.overlap_tolerance, "min": 0.0, "max": 10.0,
                "description": "Allowed overlap between neighbouring stones"
            },
            "touch_tolerance": {
                "type": "number", "default": d.touch_tolerance, "min": 0.0, "max": 10.0,
                "description": "Gap within which stones count as touching"
            },
            "viewport_margin": {
                "type": "number", "default": d.viewport_margin, "min": 0.0, "max": 200.0,
                "description": "Clearance kept from the viewport edge"
            }
        })
    }
}
