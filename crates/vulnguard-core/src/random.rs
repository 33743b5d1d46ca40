//! Injectable, seedable randomness for the scan simulator
//!
//! Simulation output must be reproducible under a known seed, so the
//! simulator never touches `rand::thread_rng` directly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of pseudo-random values.
///
/// Sequential calls against a seeded source always yield the same
/// sequence, which is what makes scan simulation testable.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[min, max]` (inclusive on both ends).
    fn int_in_range(&self, min: u32, max: u32) -> u32;

    /// Uniform float in `[min, max)`.
    fn float_in_range(&self, min: f64, max: f64) -> f64;
}

/// `StdRng`-backed source. Seedable for tests, entropy-seeded in
/// production.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl RandomSource for SeededRandom {
    fn int_in_range(&self, min: u32, max: u32) -> u32 {
        let mut rng = self.rng.lock().unwrap();
        rng.gen_range(min..=max)
    }

    fn float_in_range(&self, min: f64, max: f64) -> f64 {
        let mut rng = self.rng.lock().unwrap();
        rng.gen_range(min..max)
    }
}
