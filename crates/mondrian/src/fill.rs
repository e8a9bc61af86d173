//! Per-section fill plans: a style plus a family of parallel hatch lines.

use huahua_core::color::Rgba;
use huahua_core::geometry::{clip_segment, Rect, Segment};
use huahua_core::palette::Palette;
use huahua_core::prng::RandomSource;
use huahua_core::stroke::StrokePath;
use huahua_core::DVec2;

/// Hatch angles offered to each section, in degrees.
pub const ANGLE_OPTIONS: [f64; 7] = [0.0, 15.0, 30.0, 45.0, 60.0, 75.0, 90.0];

/// Hatch color for dark sections.
pub const DARK_HATCH: Rgba = Rgba::rgba(16, 16, 16, 170);

/// Dark sections hatch tighter than colored ones.
const DARK_SPACING_FACTOR: f64 = 0.6;

/// How a section is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStyle {
    /// Left as background; no fill lines.
    Blank,
    /// Dense near-black hatching.
    Dark,
    /// Hatching in a palette color.
    Color(Rgba),
}

impl FillStyle {
    /// Rolls a style: blank with `blank_chance`, dark with `dark_chance`,
    /// otherwise a palette color.
    pub fn choose<R: RandomSource>(
        rng: &mut R,
        blank_chance: f64,
        dark_chance: f64,
        palette: &Palette,
    ) -> Self {
        let roll = rng.next_f64();
        if roll < blank_chance {
            FillStyle::Blank
        } else if roll < blank_chance + dark_chance {
            FillStyle::Dark
        } else {
            FillStyle::Color(palette.pick(rng))
        }
    }

    /// Stroke color for hatch lines, `None` for blank sections.
    pub fn hatch_color(&self) -> Option<Rgba> {
        match self {
            FillStyle::Blank => None,
            FillStyle::Dark => Some(DARK_HATCH),
            FillStyle::Color(c) => Some(*c),
        }
    }
}

/// A finalized section with its fill plan and animation cursor.
#[derive(Debug, Clone)]
pub struct Section {
    pub rect: Rect,
    pub style: FillStyle,
    pub angle_degrees: f64,
    pub line_spacing: f64,
    /// Hatch lines; the path's cursor is the section's fill progress.
    pub fill: StrokePath,
}

impl Section {
    /// Decorates `rect` with a fill plan.
    ///
    /// `spacing` is the `(min, max)` hatch spacing range and `inset` keeps
    /// hatching clear of the border stroke.
    pub fn plan<R: RandomSource>(
        rect: Rect,
        style: FillStyle,
        spacing: (f64, f64),
        inset: f64,
        rng: &mut R,
    ) -> Self {
        let angle_degrees = rng.pick(&ANGLE_OPTIONS).copied().unwrap_or(45.0);
        let mut line_spacing = rng.range(spacing.0, spacing.1);
        if style == FillStyle::Dark {
            line_spacing *= DARK_SPACING_FACTOR;
        }

        let lines = if style == FillStyle::Blank {
            Vec::new()
        } else {
            let phase = rng.range(line_spacing * 0.2, line_spacing);
            hatch_lines(&rect, angle_degrees.to_radians(), line_spacing, inset, phase)
        };

        Self {
            rect,
            style,
            angle_degrees,
            line_spacing,
            fill: StrokePath::new(lines),
        }
    }
}

/// Hatch spacing range `(max(2, s*0.004), max(5, s*0.008))` for viewport scale `s`.
pub fn spacing_bounds(scale: f64) -> (f64, f64) {
    ((scale * 0.004).max(2.0), (scale * 0.008).max(5.0))
}

/// Parallel lines at `angle` (radians) every `spacing` units, clipped to
/// `rect` shrunk by `inset`.
///
/// `phase` shifts the first line so neighbouring sections don't line up.
/// Returns nothing when the inset interior is 1 unit or thinner.
pub fn hatch_lines(rect: &Rect, angle: f64, spacing: f64, inset: f64, phase: f64) -> Vec<Segment> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let Some(inner) = rect.inset(inset) else {
        return Vec::new();
    };
    if inner.w <= 1.0 || inner.h <= 1.0 {
        return Vec::new();
    }

    let center = inner.center();
    let dir = DVec2::new(angle.cos(), angle.sin());
    let normal = dir.perp();
    let diagonal = inner.w.hypot(inner.h);

    let (min_offset, max_offset) = inner
        .corners()
        .iter()
        .map(|&corner| (corner - center).dot(normal))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p), hi.max(p)));

    let mut lines = Vec::new();
    let mut offset = min_offset - phase;
    while offset <= max_offset + spacing {
        offset += spacing;
        let base = center + normal * offset;
        let raw_start = base - dir * diagonal;
        let raw_end = base + dir * diagonal;
        if let Some((a, b)) = clip_segment(raw_start, raw_end, &inner) {
            let segment = Segment::new(a, b);
            if !segment.is_degenerate() {
                lines.push(segment);
            }
        }
    }
    lines
}
