//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A referenced entity (pending change, option, intent) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The intent latch rejected a transition. Ledger state is unchanged.
    #[error("latch violation: {0}")]
    LatchViolation(String),

    /// A non-human actor attempted an operation reserved for the Arbiter.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A collaborator failed (parser, option generator, ...).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
