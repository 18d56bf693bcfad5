//! Arbiter CLI — a table session driven from stdin.
//!
//! Wires the ledger, resolution engine and intent latch to local stand-ins
//! for the action parser and option generator, configured from the
//! environment.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod state;
pub mod table;
