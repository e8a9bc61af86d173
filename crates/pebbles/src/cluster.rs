//! Outward growth of a pebble cluster from the viewport center.
//!
//! Each placement samples many tangent candidates around weighted parents
//! and keeps the best-scoring one. The cluster is full after a run of
//! consecutive searches that found nothing.

use huahua_core::geometry::Viewport;
use huahua_core::palette::Palette;
use huahua_core::prng::RandomSource;
use huahua_core::DVec2;
use tracing::{debug, trace};

use crate::pebble::Pebble;

/// Parents within this distance of the cluster center grow in any direction.
const CENTER_SNAP: f64 = 8.0;
/// Maximum deviation from the outward direction, as a fraction of pi.
const OUTWARD_SPREAD: f64 = 0.9;
/// Parent weight is `(distance + PARENT_WEIGHT_OFFSET) ^ PARENT_WEIGHT_EXPONENT`.
const PARENT_WEIGHT_OFFSET: f64 = 12.0;
const PARENT_WEIGHT_EXPONENT: f64 = 1.25;
const CONTACT_SCORE: f64 = 100.0;
const OUTWARD_SCORE: f64 = 0.05;
const SCORE_NOISE: f64 = 0.2;

/// Tunables for cluster growth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterRules {
    /// Nominal radius range of the first stone.
    pub seed_radius: (f64, f64),
    /// Nominal radius range of every later stone.
    pub candidate_radius: (f64, f64),
    /// Candidates sampled per placement.
    pub placement_attempts: usize,
    /// Consecutive failed placements before the cluster is full.
    pub max_failures: usize,
    /// Allowed interpenetration between packing circles.
    pub overlap_tolerance: f64,
    /// Gap within which two stones count as touching.
    pub touch_tolerance: f64,
    /// Minimum clearance between a stone and the viewport edge.
    pub viewport_margin: f64,
}

impl Default for ClusterRules {
    fn default() -> Self {
        Self {
            seed_radius: (34.0, 56.0),
            candidate_radius: (18.0, 46.0),
            placement_attempts: 300,
            max_failures: 40,
            overlap_tolerance: 0.35,
            touch_tolerance: 1.6,
            viewport_margin: 2.0,
        }
    }
}

/// Result of one placement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// A stone was added and is now active.
    Placed,
    /// No candidate fit; the failure count went up.
    Failed,
    /// The cluster stopped growing.
    Full,
}

#[derive(Debug, Clone)]
pub struct Cluster {
    pebbles: Vec<Pebble>,
    center: DVec2,
    viewport: Viewport,
    rules: ClusterRules,
    active: Option<usize>,
    failures: usize,
    full: bool,
}

impl Cluster {
    /// Places the seed stone at the viewport center and makes it active.
    pub fn start<R: RandomSource>(
        viewport: Viewport,
        rules: ClusterRules,
        palette: &Palette,
        rng: &mut R,
    ) -> Self {
        let center = viewport.center();
        let radius = rng.range(rules.seed_radius.0, rules.seed_radius.1);
        let seed = Pebble::generate(center, radius, palette, rng);
        debug!(radius, packing = seed.packing_radius, "seeded pebble cluster");
        Self {
            pebbles: vec![seed],
            center,
            viewport,
            rules,
            active: Some(0),
            failures: 0,
            full: false,
        }
    }

    pub fn pebbles(&self) -> &[Pebble] {
        &self.pebbles
    }

    pub fn len(&self) -> usize {
        self.pebbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pebbles.is_empty()
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn rules(&self) -> &ClusterRules {
        &self.rules
    }

    /// Index of the stone currently being traced.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_pebble_mut(&mut self) -> Option<&mut Pebble> {
        self.active.and_then(|i| self.pebbles.get_mut(i))
    }

    /// Marks the active stone as done.
    pub fn release_active(&mut self) {
        self.active = None;
    }

    /// Consecutive failed placements so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Searches for the next stone and records the outcome.
    pub fn grow<R: RandomSource>(&mut self, palette: &Palette, rng: &mut R) -> Growth {
        if self.full {
            return Growth::Full;
        }
        match self.find_next(palette, rng) {
            Some(pebble) => {
                trace!(
                    index = self.pebbles.len(),
                    x = pebble.center.x,
                    y = pebble.center.y,
                    r = pebble.radius,
                    "placed pebble"
                );
                self.pebbles.push(pebble);
                self.active = Some(self.pebbles.len() - 1);
                self.failures = 0;
                Growth::Placed
            }
            None => {
                self.failures += 1;
                if self.failures >= self.rules.max_failures {
                    self.full = true;
                    debug!(pebbles = self.pebbles.len(), "pebble cluster full");
                    Growth::Full
                } else {
                    Growth::Failed
                }
            }
        }
    }

    /// Best tangent candidate out of `placement_attempts` samples, if any fits.
    ///
    /// Candidates score `contacts * 100 + outward_distance * 0.05` plus a
    /// little noise, so stones nestle into existing ones before reaching out.
    pub fn find_next<R: RandomSource>(&self, palette: &Palette, rng: &mut R) -> Option<Pebble> {
        let (r_min, r_max) = self.rules.candidate_radius;
        let mut best: Option<(f64, Pebble)> = None;

        for _ in 0..self.rules.placement_attempts {
            let Some(parent) = self.pick_parent(rng) else {
                break;
            };
            let radius = rng.range(r_min, r_max);
            let candidate = Pebble::generate(DVec2::ZERO, radius, palette, rng);
            let angle = self.growth_angle(parent, rng);
            let center = parent.center
                + DVec2::from_angle(angle) * (parent.packing_radius + candidate.packing_radius);
            let reach = candidate.packing_radius;

            if !self.within_viewport(center, reach) || self.overlaps(center, reach) {
                continue;
            }

            let score = self.contacts(center, reach) as f64 * CONTACT_SCORE
                + center.distance(self.center) * OUTWARD_SCORE
                + rng.range(0.0, SCORE_NOISE);
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, candidate.placed_at(center)));
            }
        }

        best.map(|(_, pebble)| pebble)
    }

    /// Parent chosen with weight `(distance_to_center + 12) ^ 1.25`.
    fn pick_parent<R: RandomSource>(&self, rng: &mut R) -> Option<&Pebble> {
        let weight = |p: &Pebble| {
            (p.center.distance(self.center) + PARENT_WEIGHT_OFFSET).powf(PARENT_WEIGHT_EXPONENT)
        };
        let total: f64 = self.pebbles.iter().map(weight).sum();
        let mut target = rng.range(0.0, total);
        for pebble in &self.pebbles {
            target -= weight(pebble);
            if target <= 0.0 {
                return Some(pebble);
            }
        }
        self.pebbles.last()
    }

    fn growth_angle<R: RandomSource>(&self, parent: &Pebble, rng: &mut R) -> f64 {
        let outward = parent.center - self.center;
        if outward.length() < CENTER_SNAP {
            return rng.angle();
        }
        let spread = OUTWARD_SPREAD * std::f64::consts::PI;
        outward.y.atan2(outward.x) + rng.range(-spread, spread)
    }

    fn within_viewport(&self, center: DVec2, reach: f64) -> bool {
        let m = self.rules.viewport_margin;
        center.x - reach > m
            && center.x + reach < self.viewport.width() - m
            && center.y - reach > m
            && center.y + reach < self.viewport.height() - m
    }

    fn overlaps(&self, center: DVec2, reach: f64) -> bool {
        self.pebbles.iter().any(|p| {
            center.distance(p.center) < p.packing_radius + reach - self.rules.overlap_tolerance
        })
    }

    fn contacts(&self, center: DVec2, reach: f64) -> usize {
        self.pebbles
            .iter()
            .filter(|p| {
                let gap = center.distance(p.center) - (p.packing_radius + reach);
                gap.abs() <= self.rules.touch_tolerance
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huahua_core::prng::Xorshift64;

    fn viewport(w: f64, h: f64) -> Viewport {
        Viewport::new(w, h).unwrap()
    }

    fn grow_to_full(cluster: &mut Cluster, rng: &mut Xorshift64) -> usize {
        let palette = Palette::pebbles();
        let mut steps = 0;
        while cluster.grow(&palette, rng) != Growth::Full {
            steps += 1;
            assert!(steps < 5_000, "cluster never filled");
        }
        steps
    }

    #[test]
    fn seed_sits_at_viewport_center() {
        let mut rng = Xorshift64::new(1);
        let cluster = Cluster::start(viewport(800.0, 600.0), ClusterRules::default(), &Palette::pebbles(), &mut rng);
        assert_eq!(cluster.len(), 1);
        assert_eq!(cluster.active(), Some(0));
        let seed = &cluster.pebbles()[0];
        assert_eq!(seed.center, DVec2::new(400.0, 300.0));
        assert!((34.0..56.0).contains(&seed.radius));
    }

    #[test]
    fn first_neighbour_touches_the_seed() {
        let palette = Palette::pebbles();
        for s in 1..20 {
            let mut rng = Xorshift64::new(s);
            let cluster = Cluster::start(viewport(800.0, 600.0), ClusterRules::default(), &palette, &mut rng);
            let seed = &cluster.pebbles()[0];
            let next = cluster.find_next(&palette, &mut rng).expect("room around the seed");
            let d = next.center.distance(seed.center);
            assert!((d - (seed.packing_radius + next.packing_radius)).abs() < 1e-9, "seed {s}: d={d}");
            assert!((18.0..46.0).contains(&next.radius));
        }
    }

    #[test]
    fn placed_pebbles_never_overlap_and_stay_inside() {
        let mut rng = Xorshift64::new(9);
        let rules = ClusterRules::default();
        let vp = viewport(400.0, 300.0);
        let mut cluster = Cluster::start(vp, rules, &Palette::pebbles(), &mut rng);
        grow_to_full(&mut cluster, &mut rng);

        let pebbles = cluster.pebbles();
        assert!(pebbles.len() > 5, "only {} pebbles", pebbles.len());
        for (i, a) in pebbles.iter().enumerate() {
            for b in &pebbles[i + 1..] {
                let d = a.center.distance(b.center);
                assert!(d >= a.packing_radius + b.packing_radius - rules.overlap_tolerance - 1e-9);
            }
        }
        for p in &pebbles[1..] {
            assert!(p.center.x - p.packing_radius > rules.viewport_margin);
            assert!(p.center.x + p.packing_radius < vp.width() - rules.viewport_margin);
            assert!(p.center.y - p.packing_radius > rules.viewport_margin);
            assert!(p.center.y + p.packing_radius < vp.height() - rules.viewport_margin);
        }
    }

    #[test]
    fn full_after_consecutive_failures() {
        let mut rng = Xorshift64::new(4);
        // Room for the seed only: every search fails.
        let mut cluster = Cluster::start(viewport(60.0, 60.0), ClusterRules::default(), &Palette::pebbles(), &mut rng);
        let palette = Palette::pebbles();
        for n in 1..40 {
            assert_eq!(cluster.grow(&palette, &mut rng), Growth::Failed);
            assert_eq!(cluster.failures(), n);
        }
        assert_eq!(cluster.grow(&palette, &mut rng), Growth::Full);
        assert!(cluster.is_full());
        assert_eq!(cluster.grow(&palette, &mut rng), Growth::Full);
        assert_eq!(cluster.len(), 1);
    }

    #[test]
    fn placement_resets_failures_and_activates_new_pebble() {
        let palette = Palette::pebbles();
        let mut rng = Xorshift64::new(6);
        let mut cluster = Cluster::start(viewport(800.0, 600.0), ClusterRules::default(), &palette, &mut rng);
        cluster.failures = 3;
        cluster.release_active();
        assert_eq!(cluster.grow(&palette, &mut rng), Growth::Placed);
        assert_eq!(cluster.failures(), 0);
        assert_eq!(cluster.active(), Some(1));
    }

    #[test]
    fn smaller_failure_limit_fills_sooner() {
        let palette = Palette::pebbles();
        let rules = ClusterRules { max_failures: 1, ..ClusterRules::default() };
        let mut rng = Xorshift64::new(2);
        let mut cluster = Cluster::start(viewport(60.0, 60.0), rules, &palette, &mut rng);
        assert_eq!(cluster.grow(&palette, &mut rng), Growth::Full);
    }

    #[test]
    fn growth_is_deterministic_per_seed() {
        let run = |seed| {
            let mut rng = Xorshift64::new(seed);
            let mut cluster = Cluster::start(viewport(360.0, 280.0), ClusterRules::default(), &Palette::pebbles(), &mut rng);
            grow_to_full(&mut cluster, &mut rng);
            cluster.pebbles().iter().map(|p| (p.center, p.radius)).collect::<Vec<_>>()
        };
        assert_eq!(run(33), run(33));
        assert_ne!(run(33), run(34));
    }

    #[test]
    fn parent_choice_favours_outer_pebbles() {
        let palette = Palette::pebbles();
        let mut rng = Xorshift64::new(12);
        let mut cluster = Cluster::start(viewport(800.0, 600.0), ClusterRules::default(), &palette, &mut rng);
        let far = Pebble::generate(cluster.center() + DVec2::new(250.0, 0.0), 20.0, &palette, &mut rng);
        cluster.pebbles.push(far);

        let mut outer = 0;
        for _ in 0..2_000 {
            if let Some(p) = cluster.pick_parent(&mut rng) {
                if p.center.x > cluster.center().x + 1.0 {
                    outer += 1;
                }
            }
        }
        // weights 12^1.25 ≈ 22.3 vs 262^1.25 ≈ 1051
        assert!(outer > 1_800, "outer picked {outer} times");
    }
}
