//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests and replays,
//! a seeded or recorded implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by `StdRng`.
///
/// Seeded from the OS for live play, or from a fixed seed when a session
/// must be replayed roll-for-roll.
#[derive(Debug, Clone)]
pub struct StdRngSource(StdRng);

impl StdRngSource {
    /// Creates an RNG seeded from operating-system entropy.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Creates an RNG with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for StdRngSource {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}
