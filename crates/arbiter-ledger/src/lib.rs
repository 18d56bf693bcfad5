//! Arbiter — Canonical Event Ledger bounded context.
//!
//! Owns the append-only session history and the set of unconfirmed
//! proposals. The assistant may only propose; a human Arbiter confirms
//! proposals, authors outcomes, moves scenes and ends the session. Every
//! operation returns a new [`domain::session::SessionState`] value.

pub mod application;
pub mod domain;
