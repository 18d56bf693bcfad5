//! Application layer for the Canonical Event Ledger context.

pub mod command_handlers;
pub mod query_handlers;
