//! Area- and aspect-constrained rectangle partitioning.
//!
//! The composition rectangle is repeatedly split at its largest oversized
//! section until every section's area falls in `[min_area, max_area]`, with
//! each cut chosen so both halves keep an acceptable aspect ratio. A layout
//! that paints itself into a corner is thrown away and retried; after
//! [`PartitionRules::attempts`] failures a uniform 5x5 grid is used instead.

use huahua_core::geometry::{Rect, Viewport};
use huahua_core::prng::RandomSource;
use tracing::debug;

/// Upper bound on splits within a single attempt.
const SPLIT_GUARD: usize = 600;
/// Area tolerance when validating a finished layout.
const AREA_TOLERANCE: f64 = 0.5;
/// Rows and columns of the fallback grid.
const FALLBACK_GRID: usize = 5;

/// Constraints and retry budgets for [`partition`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionRules {
    /// Smallest allowed section area as a fraction of the composition area.
    pub area_min_ratio: f64,
    /// Largest allowed section area as a fraction of the composition area.
    pub area_max_ratio: f64,
    /// Smallest allowed `w / h`.
    pub ratio_min: f64,
    /// Largest allowed `w / h`.
    pub ratio_max: f64,
    /// Whole-layout attempts before falling back to the grid.
    pub attempts: usize,
    /// Random cut positions tried per orientation.
    pub cut_attempts: usize,
}

impl Default for PartitionRules {
    fn default() -> Self {
        Self {
            area_min_ratio: 0.01,
            area_max_ratio: 0.05,
            ratio_min: 0.5,
            ratio_max: 2.0,
            attempts: 120,
            cut_attempts: 36,
        }
    }
}

impl PartitionRules {
    /// Aspect ratio within bounds.
    pub fn shape_ok(&self, section: &Rect) -> bool {
        let ratio = section.aspect();
        ratio >= self.ratio_min && ratio <= self.ratio_max
    }

    /// Area and aspect within bounds, with a small area tolerance.
    pub fn section_ok(&self, section: &Rect, min_area: f64, max_area: f64) -> bool {
        let area = section.area();
        area >= min_area - AREA_TOLERANCE
            && area <= max_area + AREA_TOLERANCE
            && self.shape_ok(section)
    }
}

/// Which way a section is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Cut along a vertical line (left | right).
    Vertical,
    /// Cut along a horizontal line (top / bottom).
    Horizontal,
}

/// Outcome of [`partition`].
#[derive(Debug, Clone)]
pub struct Partition {
    /// Sections in generation order; they tile the bounds exactly.
    pub sections: Vec<Rect>,
    /// True when every attempt failed and the grid was used.
    pub used_fallback: bool,
    /// Attempts spent, including the successful one.
    pub attempts: usize,
}

/// The viewport inset by a margin of `clamp(scale * ratio, min, max)`,
/// never smaller than 10x10.
pub fn composition_bounds(viewport: Viewport, margin_ratio: f64, margin_min: f64, margin_max: f64) -> Rect {
    let margin = (viewport.scale() * margin_ratio).max(margin_min).min(margin_max);
    Rect::new(
        margin,
        margin,
        (viewport.width() - margin * 2.0).max(10.0),
        (viewport.height() - margin * 2.0).max(10.0),
    )
}

/// Partitions `bounds`, retrying up to `rules.attempts` times before using
/// the fallback grid. Always terminates.
pub fn partition<R: RandomSource>(bounds: Rect, rules: &PartitionRules, rng: &mut R) -> Partition {
    let area = bounds.area();
    let min_area = area * rules.area_min_ratio;
    let max_area = area * rules.area_max_ratio;

    for attempt in 1..=rules.attempts {
        let Some(sections) = try_partition(bounds, min_area, max_area, rules, rng) else {
            continue;
        };
        if sections.iter().all(|s| rules.section_ok(s, min_area, max_area)) {
            debug!(attempt, sections = sections.len(), "partition accepted");
            return Partition {
                sections,
                used_fallback: false,
                attempts: attempt,
            };
        }
    }

    debug!(attempts = rules.attempts, "partition failed, using fallback grid");
    Partition {
        sections: fallback_grid(bounds, FALLBACK_GRID, FALLBACK_GRID),
        used_fallback: true,
        attempts: rules.attempts,
    }
}

/// One attempt: split the largest oversized section until none remain.
fn try_partition<R: RandomSource>(
    bounds: Rect,
    min_area: f64,
    max_area: f64,
    rules: &PartitionRules,
    rng: &mut R,
) -> Option<Vec<Rect>> {
    let mut sections = vec![bounds];

    for _ in 0..SPLIT_GUARD {
        let Some(largest) = largest_oversized(&sections, max_area) else {
            return Some(sections);
        };
        let (first, second) = split_section(&sections[largest], min_area, rules, rng)?;
        sections.splice(largest..=largest, [first, second]);
    }

    None
}

/// Index of the largest section with area above `max_area`; ties keep the first.
fn largest_oversized(sections: &[Rect], max_area: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, section) in sections.iter().enumerate() {
        let area = section.area();
        if area > max_area && best.map_or(true, |(_, a)| area > a) {
            best = Some((i, area));
        }
    }
    best.map(|(i, _)| i)
}

/// Splits `section` in two, trying both orientations in random order.
///
/// Returns `None` when neither orientation yields halves that both keep at
/// least `min_area` and an acceptable aspect ratio.
pub fn split_section<R: RandomSource>(
    section: &Rect,
    min_area: f64,
    rules: &PartitionRules,
    rng: &mut R,
) -> Option<(Rect, Rect)> {
    let mut orientations = [Orientation::Vertical, Orientation::Horizontal];
    rng.shuffle(&mut orientations);
    orientations
        .into_iter()
        .find_map(|orientation| split_with_orientation(section, min_area, orientation, rules, rng))
}

fn split_with_orientation<R: RandomSource>(
    section: &Rect,
    min_area: f64,
    orientation: Orientation,
    rules: &PartitionRules,
    rng: &mut R,
) -> Option<(Rect, Rect)> {
    let (dim, other) = match orientation {
        Orientation::Vertical => (section.w, section.h),
        Orientation::Horizontal => (section.h, section.w),
    };
    let min_cut = min_area / other;
    let max_cut = dim - min_cut;
    if max_cut <= min_cut {
        return None;
    }

    for _ in 0..rules.cut_attempts {
        let cut = rng.range(min_cut, max_cut);
        let halves = match orientation {
            Orientation::Vertical => (
                Rect::new(section.x, section.y, cut, section.h),
                Rect::new(section.x + cut, section.y, section.w - cut, section.h),
            ),
            Orientation::Horizontal => (
                Rect::new(section.x, section.y, section.w, cut),
                Rect::new(section.x, section.y + cut, section.w, section.h - cut),
            ),
        };
        if rules.shape_ok(&halves.0) && rules.shape_ok(&halves.1) {
            return Some(halves);
        }
    }

    None
}

/// Uniform `rows x columns` grid over `bounds`, row-major.
pub fn fallback_grid(bounds: Rect, rows: usize, columns: usize) -> Vec<Rect> {
    let cell_w = bounds.w / columns as f64;
    let cell_h = bounds.h / rows as f64;
    (0..rows)
        .flat_map(|row| {
            (0..columns).map(move |column| {
                Rect::new(
                    bounds.x + column as f64 * cell_w,
                    bounds.y + row as f64 * cell_h,
                    cell_w,
                    cell_h,
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use huahua_core::prng::Xorshift64;

    fn viewport(w: f64, h: f64) -> Viewport {
        Viewport::new(w, h).unwrap()
    }

    fn assert_tiles(bounds: &Rect, sections: &[Rect]) {
        let total: f64 = sections.iter().map(Rect::area).sum();
        assert!(
            (total - bounds.area()).abs() <= bounds.area() * 1e-9,
            "areas sum to {total}, bounds {}",
            bounds.area()
        );
        for (i, a) in sections.iter().enumerate() {
            assert!(a.w > 0.0 && a.h > 0.0);
            assert!(a.x >= bounds.x - 1e-9 && a.right() <= bounds.right() + 1e-9);
            assert!(a.y >= bounds.y - 1e-9 && a.bottom() <= bounds.bottom() + 1e-9);
            for b in &sections[i + 1..] {
                assert!(a.intersection_area(b) < 1e-6, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn composition_bounds_uses_clamped_margin() {
        // 600 * 0.06 = 36, inside [32, 96]
        let b = composition_bounds(viewport(800.0, 600.0), 0.06, 32.0, 96.0);
        assert_eq!(b, Rect::new(36.0, 36.0, 728.0, 528.0));
        // tiny viewport: margin floor 32, size floor 10
        let tiny = composition_bounds(viewport(20.0, 20.0), 0.06, 32.0, 96.0);
        assert_eq!(tiny, Rect::new(32.0, 32.0, 10.0, 10.0));
        // huge viewport: margin ceiling
        let huge = composition_bounds(viewport(4000.0, 3000.0), 0.06, 32.0, 96.0);
        assert_eq!(huge.x, 96.0);
    }

    #[test]
    fn partition_meets_area_and_ratio_bounds() {
        let bounds = Rect::new(36.0, 36.0, 728.0, 528.0);
        let rules = PartitionRules::default();
        let mut rng = Xorshift64::new(42);
        let result = partition(bounds, &rules, &mut rng);
        assert_tiles(&bounds, &result.sections);
        if !result.used_fallback {
            let min_area = bounds.area() * rules.area_min_ratio;
            let max_area = bounds.area() * rules.area_max_ratio;
            for s in &result.sections {
                assert!(rules.section_ok(s, min_area, max_area), "{s:?}");
            }
            assert!(result.sections.len() >= 20, "at least 1/max_ratio sections");
        }
    }

    #[test]
    fn typical_viewports_rarely_need_the_fallback() {
        let bounds = Rect::new(36.0, 36.0, 728.0, 528.0);
        let rules = PartitionRules::default();
        let fallbacks = (1..=20)
            .filter(|&seed| partition(bounds, &rules, &mut Xorshift64::new(seed)).used_fallback)
            .count();
        assert!(fallbacks < 10, "{fallbacks} of 20 seeds fell back");
    }

    #[test]
    fn forced_failure_gives_same_grid_every_time() {
        let bounds = Rect::new(36.0, 36.0, 728.0, 528.0);
        // No aspect ratio can satisfy an inverted range.
        let rules = PartitionRules {
            ratio_min: 3.0,
            ratio_max: 2.0,
            ..PartitionRules::default()
        };
        let a = partition(bounds, &rules, &mut Xorshift64::new(1));
        let b = partition(bounds, &rules, &mut Xorshift64::new(999));
        assert!(a.used_fallback && b.used_fallback);
        assert_eq!(a.sections, b.sections);
        assert_eq!(a.sections, fallback_grid(bounds, 5, 5));
        assert_eq!(a.attempts, rules.attempts);
    }

    #[test]
    fn zero_attempts_goes_straight_to_fallback() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let rules = PartitionRules {
            attempts: 0,
            ..PartitionRules::default()
        };
        let result = partition(bounds, &rules, &mut Xorshift64::new(3));
        assert!(result.used_fallback);
        assert_eq!(result.sections.len(), 25);
    }

    #[test]
    fn minimum_composition_still_terminates() {
        let bounds = composition_bounds(viewport(10.0, 10.0), 0.06, 32.0, 96.0);
        assert_eq!((bounds.w, bounds.h), (10.0, 10.0));
        let result = partition(bounds, &PartitionRules::default(), &mut Xorshift64::new(8));
        assert_tiles(&bounds, &result.sections);
    }

    #[test]
    fn fallback_grid_is_row_major_and_tiles() {
        let bounds = Rect::new(10.0, 20.0, 50.0, 25.0);
        let grid = fallback_grid(bounds, 5, 5);
        assert_eq!(grid.len(), 25);
        assert_eq!(grid[0], Rect::new(10.0, 20.0, 10.0, 5.0));
        assert_eq!(grid[1].x, 20.0);
        assert_eq!(grid[5].y, 25.0);
        assert_tiles(&bounds, &grid);
    }

    #[test]
    fn split_halves_tile_parent() {
        let rules = PartitionRules::default();
        let parent = Rect::new(0.0, 0.0, 200.0, 150.0);
        let mut rng = Xorshift64::new(17);
        let (a, b) = split_section(&parent, 300.0, &rules, &mut rng).unwrap();
        assert!((a.area() + b.area() - parent.area()).abs() < 1e-9);
        assert_eq!(a.intersection_area(&b), 0.0);
        assert!(a.area() >= 300.0 && b.area() >= 300.0);
        assert!(rules.shape_ok(&a) && rules.shape_ok(&b));
    }

    #[test]
    fn split_fails_when_min_area_too_large() {
        let rules = PartitionRules::default();
        let parent = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut rng = Xorshift64::new(2);
        assert!(split_section(&parent, 60.0, &rules, &mut rng).is_none());
    }

    #[test]
    fn largest_oversized_prefers_first_on_ties() {
        let sections = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(10.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 10.0, 1.0, 1.0),
        ];
        assert_eq!(largest_oversized(&sections, 50.0), Some(0));
        assert_eq!(largest_oversized(&sections, 100.0), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn any_viewport_partition_tiles_its_bounds(
                seed: u64,
                w in 10.0_f64..2000.0,
                h in 10.0_f64..2000.0,
            ) {
                let bounds = composition_bounds(viewport(w, h), 0.06, 32.0, 96.0);
                let rules = PartitionRules::default();
                let result = partition(bounds, &rules, &mut Xorshift64::new(seed));
                assert_tiles(&bounds, &result.sections);
                if !result.used_fallback {
                    let min_area = bounds.area() * rules.area_min_ratio;
                    let max_area = bounds.area() * rules.area_max_ratio;
                    for s in &result.sections {
                        prop_assert!(rules.section_ok(s, min_area, max_area));
                    }
                }
            }
        }
    }
}
