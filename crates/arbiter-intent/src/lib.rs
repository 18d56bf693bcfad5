//! Arbiter — Intent Latch bounded context.
//!
//! Guards the path from a submitted player intent to its canonical outcome:
//! one intent at a time, exactly one `OUTCOME` event per intent. Also holds
//! the ports for the external action parser and option generator, and the
//! command handlers that drive a turn through them.

pub mod application;
pub mod domain;
pub mod ports;
