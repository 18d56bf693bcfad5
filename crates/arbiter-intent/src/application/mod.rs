//! Application layer for the Intent Latch context.

pub mod command_handlers;
pub mod query_handlers;
