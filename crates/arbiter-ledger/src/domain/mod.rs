//! Domain layer for the Canonical Event Ledger context.

pub mod canon;
pub mod commands;
pub mod events;
pub mod pending;
pub mod session;
