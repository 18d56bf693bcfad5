//! Arbiter Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that every bounded
//! context depends on: time, randomness, identifier minting, actor identity
//! and the domain error. It contains no infrastructure code and no global
//! state; every collaborator is passed in explicitly.

pub mod actor;
pub mod clock;
pub mod command;
pub mod error;
pub mod id;
pub mod rng;
