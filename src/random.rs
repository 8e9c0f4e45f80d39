//! Randomness seam. Every random decision in the game goes through
//! [`RandomSource`] so a seeded run replays exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// Small, fast, seedable generator (not crypto secure).
pub struct SeededRandom(SmallRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}
