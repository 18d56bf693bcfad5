//! Pending changes — proposals awaiting human confirmation.

use arbiter_core::actor::Actor;
use arbiter_core::clock::Clock;
use arbiter_core::id::IdGenerator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A proposed, unconfirmed mutation. It never becomes canon on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    /// Proposal identifier.
    pub id: Uuid,
    /// What would become true if confirmed.
    pub description: String,
    /// Who drafted the proposal (usually the system).
    pub proposed_by: Actor,
    /// When the proposal was made.
    pub created_at: DateTime<Utc>,
}

impl PendingChange {
    /// Drafts a new proposal, minting its id from `ids`.
    pub fn new(
        description: impl Into<String>,
        proposed_by: Actor,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Self {
        Self {
            id: ids.next_id(),
            description: description.into(),
            proposed_by,
            created_at: clock.now(),
        }
    }
}
