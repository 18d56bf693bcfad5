//! Identifier minting.
//!
//! Every event, pending change and intent identifier is produced through an
//! [`IdGenerator`] handed to the ledger or latch, so id assignment happens in
//! one auditable place and can be made deterministic in tests.

use uuid::Uuid;

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a new, previously unissued identifier.
    fn next_id(&self) -> Uuid;
}

/// Production generator issuing time-ordered UUID v7 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}
