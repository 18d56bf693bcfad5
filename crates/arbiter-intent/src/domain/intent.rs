//! Player intents and the options classified for them.

use arbiter_core::actor::Actor;
use arbiter_core::error::DomainError;
use arbiter_rules::domain::difficulty::RiskKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player's free-text intent after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIntent {
    /// Who declared the intent.
    pub actor_id: Actor,
    /// The text as typed.
    pub raw_text: String,
    /// When it was parsed.
    pub timestamp: DateTime<Utc>,
}

/// One way to attempt an intent, with its risk classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentOption {
    /// Generator-assigned option identifier.
    pub id: String,
    /// How risky the option is.
    pub kind: RiskKind,
    /// What the option does.
    pub description: String,
}

/// The options produced for one intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    /// Candidate options; the first is the generator's preferred one.
    pub options: Vec<IntentOption>,
}

/// The intent currently holding the latch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveIntent {
    /// Latch-assigned intent identifier.
    pub intent_id: Uuid,
    /// The parsed intent.
    pub parsed: ParsedIntent,
    /// Classified options, never empty.
    pub options: Vec<IntentOption>,
    /// When the latch was taken.
    pub activated_at: DateTime<Utc>,
}

impl ActiveIntent {
    /// Looks up an option by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no option has that id.
    pub fn option(&self, option_id: &str) -> Result<&IntentOption, DomainError> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "option {option_id:?} for intent {}",
                    self.intent_id
                ))
            })
    }
}
