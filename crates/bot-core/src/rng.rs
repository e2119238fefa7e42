//! Deterministic seedable RNG wrapper.
//!
//! # Determinism strategy
//!
//! Every consumer of randomness in the toolkit — composite child shuffling,
//! timer jitter, wander-position picking — receives a `BotRng` explicitly at
//! construction time instead of reaching for an ambient source.  The same
//! seed therefore always reproduces the same run, which makes behavior-tree
//! tests exact rather than statistical.
//!
//! Independent subsystems derive their own streams via [`BotRng::child`] so
//! that, say, adding a timer to one tree never perturbs another tree's
//! shuffle order.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A seedable deterministic RNG.
///
/// The type is `!Sync` to prevent accidental sharing; each tree or manager
/// owns its own instance.
pub struct BotRng(SmallRng);

impl BotRng {
    pub fn new(seed: u64) -> Self {
        BotRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `BotRng` with a different seed offset — useful for
    /// giving each subsystem its own deterministic stream from one root seed.
    pub fn child(&mut self, offset: u64) -> BotRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        BotRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// `base` perturbed by a uniform variance of `± jitter / 2`.
    ///
    /// `jitter(5.0, 2.0)` is uniform in `[4.0, 6.0)`.  A `jitter` of zero
    /// returns `base` exactly, so callers don't need a special case.
    #[inline]
    pub fn jitter(&mut self, base: f64, jitter: f64) -> f64 {
        if jitter == 0.0 {
            return base;
        }
        base - jitter * 0.5 + jitter * self.0.r#gen::<f64>()
    }
}
