//! Actor identity and the authority contract.
//!
//! The assistant acts as [`Actor::System`] and may only draft and propose.
//! Only a [`Actor::Human`] may turn a proposal into canon or author an
//! outcome directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Wire value used for the system actor.
pub const SYSTEM_ACTOR: &str = "system";

/// Who performed an operation.
///
/// Serialized as a plain string: `"system"` or the human's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Actor {
    /// The automated assistant.
    System,
    /// A human participant, identified by name or account id.
    Human(String),
}

impl Actor {
    /// Creates a human actor.
    pub fn human(id: impl Into<String>) -> Self {
        Self::Human(id.into())
    }

    /// Returns `true` for a human actor with a non-blank identifier.
    #[must_use]
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human(id) if !id.trim().is_empty())
    }

    /// Returns the identifier as it appears in the ledger.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => SYSTEM_ACTOR,
            Self::Human(id) => id,
        }
    }

    /// Guards an Arbiter-only operation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if the actor is not human.
    pub fn require_human(&self, operation: &str) -> Result<(), DomainError> {
        if self.is_human() {
            Ok(())
        } else {
            Err(DomainError::Unauthorized(format!(
                "{operation} requires a human actor, got {:?}",
                self.as_str()
            )))
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Actor {
    fn from(value: String) -> Self {
        if value == SYSTEM_ACTOR {
            Self::System
        } else {
            Self::Human(value)
        }
    }
}

impl From<&str> for Actor {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Actor> for String {
    fn from(value: Actor) -> Self {
        match value {
            Actor::System => SYSTEM_ACTOR.to_owned(),
            Actor::Human(id) => id,
        }
    }
}
