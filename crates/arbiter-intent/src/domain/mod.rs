//! Domain layer for the Intent Latch context.

pub mod commands;
pub mod intent;
pub mod latch;
