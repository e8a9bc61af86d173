//! A single stone: a jittered, corner-smoothed polygon in its own frame.

use huahua_core::color::Rgba;
use huahua_core::geometry::{circumradius, polygon_perimeter, smooth_closed};
use huahua_core::palette::Palette;
use huahua_core::prng::RandomSource;
use huahua_core::stroke::StrokePath;
use huahua_core::surface::{StrokeStyle, Surface};
use huahua_core::DVec2;

/// Outline color while the perimeter is being traced.
pub const TRACE_COLOR: Rgba = Rgba::rgba(44, 35, 28, 110);
/// Outline color of a finished stone.
pub const OUTLINE_COLOR: Rgba = Rgba::rgba(46, 36, 28, 95);
/// Small glint drawn on every finished stone.
pub const HIGHLIGHT_COLOR: Rgba = Rgba::rgba(255, 255, 255, 30);
const HIGHLIGHT_WIDTH: f64 = 0.7;

/// Vertex count is drawn from `[MIN_VERTICES, MAX_VERTICES)`.
const MIN_VERTICES: f64 = 10.0;
const MAX_VERTICES: f64 = 18.0;
/// Vertex distance as a fraction of the nominal radius.
const EDGE_JITTER: (f64, f64) = (0.78, 0.98);
const STROKE_WIDTH: (f64, f64) = (0.7, 1.2);
const SMOOTHING_PASSES: usize = 1;

/// A stone placed (or about to be placed) in the cluster.
#[derive(Debug, Clone)]
pub struct Pebble {
    /// Center in surface coordinates.
    pub center: DVec2,
    /// Nominal radius the shape was generated from.
    pub radius: f64,
    /// Largest distance from the center to a smoothed vertex; used for collisions.
    pub packing_radius: f64,
    /// Smoothed outline in local (unrotated, center-relative) coordinates.
    pub vertices: Vec<DVec2>,
    pub color: Rgba,
    /// Rotation of the local frame in radians.
    pub rotation: f64,
    pub stroke_width: f64,
    pub perimeter: f64,
    /// Base perimeter distance traced per frame, before pacing.
    pub draw_speed: f64,
    outline: StrokePath,
    finalized: bool,
}

impl Pebble {
    /// Builds a random stone of nominal `radius` at `center`.
    pub fn generate<R: RandomSource>(center: DVec2, radius: f64, palette: &Palette, rng: &mut R) -> Self {
        let count = rng.range(MIN_VERTICES, MAX_VERTICES).floor() as usize;
        let raw: Vec<DVec2> = (0..count)
            .map(|i| {
                let angle = i as f64 / count as f64 * std::f64::consts::TAU;
                DVec2::from_angle(angle) * (radius * rng.range(EDGE_JITTER.0, EDGE_JITTER.1))
            })
            .collect();
        let vertices = smooth_closed(&raw, SMOOTHING_PASSES);

        Self {
            center,
            radius,
            packing_radius: circumradius(&vertices),
            perimeter: polygon_perimeter(&vertices),
            outline: StrokePath::closed(&vertices),
            vertices,
            color: palette.pick(rng),
            rotation: rng.angle(),
            stroke_width: rng.range(STROKE_WIDTH.0, STROKE_WIDTH.1),
            draw_speed: (radius * 0.2).max(2.2),
            finalized: false,
        }
    }

    /// The same stone moved to `center`.
    pub fn placed_at(mut self, center: DVec2) -> Self {
        self.center = center;
        self
    }

    /// Perimeter traced so far, in `[0, perimeter]`.
    pub fn draw_progress(&self) -> f64 {
        self.outline.drawn_length()
    }

    /// True once the whole perimeter has been traced.
    pub fn is_traced(&self) -> bool {
        self.outline.is_complete()
    }

    /// True once [`finalize`](Pebble::finalize) has painted the stone.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Traces up to `budget` more of the perimeter; returns what was used.
    pub fn trace(&mut self, budget: f64, surface: &mut dyn Surface) -> f64 {
        if self.outline.is_complete() {
            return 0.0;
        }
        let style = StrokeStyle::new(TRACE_COLOR, self.stroke_width);
        surface.push_transform(self.center, self.rotation);
        let used = self.outline.advance(budget, surface, || style);
        surface.pop_transform();
        used
    }

    /// Paints the filled stone, its outline and the highlight. Runs once.
    pub fn finalize(&mut self, surface: &mut dyn Surface) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        surface.push_transform(self.center, self.rotation);
        surface.fill_polygon(&self.vertices, self.color);
        surface.set_stroke(&StrokeStyle::new(OUTLINE_COLOR, self.stroke_width));
        for segment in self.outline.segments() {
            surface.line(segment.start, segment.end);
        }

        let r = self.radius;
        surface.set_stroke(&StrokeStyle::new(HIGHLIGHT_COLOR, HIGHLIGHT_WIDTH));
        surface.line(DVec2::new(-r * 0.25, -r * 0.12), DVec2::new(r * 0.2, -r * 0.2));
        surface.pop_transform();
    }
}
