//! Shared test doubles and utilities for the Arbiter narrative engine.

mod clock;
mod ids;
mod rng;

pub use clock::{FixedClock, SteppingClock};
pub use ids::SequentialIds;
pub use rng::{MockRng, SequenceRng};
