//! Seedable randomness for generation, placement search and pacing bursts.
//!
//! Every stochastic procedure in the workspace draws from a [`RandomSource`]
//! passed in by `&mut`, so a fixed seed replays a sketch exactly. The default
//! source is [`Xorshift64`].

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed random values.
///
/// Only [`next_f64`](RandomSource::next_f64) is required; everything else is
/// derived from it so alternative sources (e.g. a scripted sequence in tests)
/// stay trivial to write.
pub trait RandomSource {
    /// Returns a uniformly distributed f64 in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a uniformly distributed f64 in [min, max).
    ///
    /// Returns `min` when the range is empty or inverted.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        let v = min + self.next_f64() * (max - min);
        // a span tiny next to `min` can round up onto `max`
        if v < max {
            v
        } else {
            min
        }
    }

    /// Returns true with probability `p`. `p <= 0` never fires.
    fn chance(&mut self, p: f64) -> bool {
        p > 0.0 && self.next_f64() < p
    }

    /// Returns a uniformly distributed index in [0, len). `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Returns a random angle in [0, 2π).
    fn angle(&mut self) -> f64 {
        self.next_f64() * std::f64::consts::TAU
    }

    /// Picks one element uniformly, or `None` for an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }

    /// Fisher-Yates shuffle in place.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed 0 is replaced with a
/// non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed (0 is remapped).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Derives an independent generator, e.g. one per sketch from a driver seed.
    pub fn fork(&mut self) -> Self {
        Self::new(self.next_u64())
    }
}

impl RandomSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` divided by 2^53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, every saved Seed record replays differently.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for i in 0..500 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at {i}");
        }
    }

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn range_stays_below_max_when_rounding_would_reach_it() {
        let mut rng = Fixed(1.0 - f64::EPSILON / 2.0);
        let (min, max) = (1e6, 1e6 + 1e-3);
        let v = rng.range(min, max);
        assert!(v >= min && v < max, "range({min}, {max}) = {v}");
    }

    #[test]
    fn range_returns_min_for_inverted_bounds() {
        let mut rng = Xorshift64::new(3);
        assert_eq!(rng.range(5.0, 5.0), 5.0);
        assert_eq!(rng.range(5.0, 1.0), 5.0);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = Xorshift64::new(11);
        for _ in 0..1000 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn pick_empty_is_none() {
        let mut rng = Xorshift64::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick(&[9]), Some(&9));
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = Xorshift64::new(99);
        let mut values = [1, 2, 3, 4, 5, 6];
        rng.shuffle(&mut values);
        let mut sorted = values;
        sorted.sort_unstable();
        assert_eq!(sorted, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn fork_is_deterministic() {
        let mut a = Xorshift64::new(5);
        let mut b = Xorshift64::new(5);
        assert_eq!(a.fork().next_u64(), b.fork().next_u64());
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn range_in_bounds(seed: u64, min in -1e6_f64..1e6, span in 1e-3_f64..1e6) {
                let mut rng = Xorshift64::new(seed);
                let max = min + span;
                for _ in 0..100 {
                    let v = rng.range(min, max);
                    prop_assert!(v >= min && v < max, "range({min}, {max}) = {v}");
                }
            }

            #[test]
            fn index_in_bounds(seed: u64, len in 1_usize..10_000) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    prop_assert!(rng.index(len) < len);
                }
            }

            #[test]
            fn angle_in_full_turn(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let a = rng.angle();
                    prop_assert!((0.0..std::f64::consts::TAU).contains(&a));
                }
            }
        }
    }
}
