//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use arbiter_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min`. Suitable for tests that do not
/// depend on specific random values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// An RNG that returns values from a predetermined sequence. Panics if the
/// sequence is exhausted. Used in tests that need specific, repeatable dice
/// rolls.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of values consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }
}
