//! Arbiter — Resolution Engine bounded context.
//!
//! Turns a risk classification and a die roll into an outcome band, a
//! narrative sentence and an audit trail. Whether an action succeeds is
//! decided by the roll alone; this crate only interprets it.

pub mod domain;
