//! Query handlers for the Intent Latch context.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::intent::IntentOption;
use crate::domain::latch::{IntentLatch, LatchState};

/// Read-only view of the latch.
#[derive(Debug, Serialize)]
pub struct LatchView {
    /// `idle`, `active` or `committed`.
    pub state: &'static str,
    /// The active or just-committed intent.
    pub intent_id: Option<Uuid>,
    /// The active intent's text.
    pub raw_text: Option<String>,
    /// The active intent's options.
    pub options: Vec<IntentOption>,
}

/// Builds a [`LatchView`] for `latch`.
#[must_use]
pub fn latch_view(latch: &IntentLatch) -> LatchView {
    match latch.state() {
        LatchState::Idle => LatchView {
            state: "idle",
            intent_id: None,
            raw_text: None,
            options: Vec::new(),
        },
        LatchState::Active(active) => LatchView {
            state: "active",
            intent_id: Some(active.intent_id),
            raw_text: Some(active.parsed.raw_text.clone()),
            options: active.options.clone(),
        },
        LatchState::Committed { intent_id, .. } => LatchView {
            state: "committed",
            intent_id: Some(*intent_id),
            raw_text: None,
            options: Vec::new(),
        },
    }
}
