//! Deterministic simulation RNG.
//!
//! The simulation is single-threaded, so one `SimRng` seeded from
//! `SimConfig::seed` drives every random draw: walking speeds, spawn jitter,
//! line choice, waiting-spot draws, and boarding delays.  Runs with the same
//! seed and the same inputs are bit-for-bit reproducible.

use rand::distributions::Distribution;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
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

    /// Uniform `f32` in `[min, max)`, or `min` when the range is empty.
    #[inline]
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if max > min { self.0.gen_range(min..max) } else { min }
    }

    /// Uniform offset in `[-half_extent, half_extent]` on both plane axes.
    pub fn jitter(&mut self, half_extent: f32) -> crate::Vec2 {
        crate::Vec2::new(
            self.uniform(-half_extent, half_extent),
            self.uniform(-half_extent, half_extent),
        )
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Draw one sample from a `rand` distribution.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.0)
    }
}
