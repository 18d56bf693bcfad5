//! Domain layer for the Resolution Engine.

pub mod band;
pub mod dice;
pub mod difficulty;
pub mod narrative;
pub mod resolution;
