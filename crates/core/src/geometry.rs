//! Planar geometry shared by the sketches.
//!
//! Points are `glam::DVec2`. Screen coordinates: x grows right, y grows down.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SketchError;

/// Segments at or below this length are treated as degenerate.
pub const DEGENERATE_LENGTH: f64 = 1e-3;

/// Drawable area in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Returns `SketchError::InvalidDimensions` unless both sides are finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, SketchError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SketchError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// `min(width, height)`, the length every size-relative constant scales with.
    pub fn scale(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.w / self.h
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Shrinks every side by `amount`; `None` if nothing is left.
    pub fn inset(&self, amount: f64) -> Option<Rect> {
        let w = self.w - amount * 2.0;
        let h = self.h - amount * 2.0;
        (w > 0.0 && h > 0.0).then(|| Rect::new(self.x + amount, self.y + amount, w, h))
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.x, self.y),
            DVec2::new(self.right(), self.y),
            DVec2::new(self.right(), self.bottom()),
            DVec2::new(self.x, self.bottom()),
        ]
    }

    /// The four edges clockwise from the top edge.
    pub fn edges(&self) -> [Segment; 4] {
        let [a, b, c, d] = self.corners();
        [
            Segment::new(a, b),
            Segment::new(b, c),
            Segment::new(c, d),
            Segment::new(d, a),
        ]
    }

    /// Area shared with `other` (0 when they only touch).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// Straight segment with its length precomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
    pub length: f64,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self {
            start,
            end,
            length: start.distance(end),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.length <= DEGENERATE_LENGTH
    }

    /// Point `distance` along the segment, clamped to its ends.
    pub fn point_at(&self, distance: f64) -> DVec2 {
        if self.length <= 0.0 {
            return self.start;
        }
        let t = (distance / self.length).clamp(0.0, 1.0);
        self.start.lerp(self.end, t)
    }
}

/// Clips the segment `a..b` against `rect` (Liang-Barsky).
///
/// Returns `None` when no part of the segment lies inside.
pub fn clip_segment(a: DVec2, b: DVec2, rect: &Rect) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    let p = [-d.x, d.x, -d.y, d.y];
    let q = [a.x - rect.x, rect.right() - a.x, a.y - rect.y, rect.bottom() - a.y];
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (&pi, &qi) in p.iter().zip(q.iter()) {
        if pi.abs() < 1e-6 {
            // Parallel to this edge: either fully outside or unconstrained.
            if qi < 0.0 {
                return None;
            }
            continue;
        }
        let r = qi / pi;
        if pi < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((a + d * t0, a + d * t1))
}

/// Perimeter of the closed polygon through `points`.
pub fn polygon_perimeter(points: &[DVec2]) -> f64 {
    closed_edges(points).map(|(a, b)| a.distance(b)).sum()
}

/// Largest distance from the local origin to any vertex.
pub fn circumradius(points: &[DVec2]) -> f64 {
    points.iter().map(|p| p.length()).fold(0.0, f64::max)
}

/// Chaikin corner cutting on a closed polyline, `iterations` times.
///
/// Each pass replaces every edge with points at 1/4 and 3/4 along it, so the
/// result stays inside the original hull.
pub fn smooth_closed(points: &[DVec2], iterations: usize) -> Vec<DVec2> {
    let mut current = points.to_vec();
    for _ in 0..iterations {
        if current.len() < 3 {
            break;
        }
        current = closed_edges(&current)
            .flat_map(|(a, b)| [a.lerp(b, 0.25), a.lerp(b, 0.75)])
            .collect();
    }
    current
}

/// Edges of a closed polyline as `(from, to)` pairs, wrapping at the end.
pub fn closed_edges(points: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = points.len();
    (0..if n < 2 { 0 } else { n }).map(move |i| (points[i], points[(i + 1) % n]))
}
