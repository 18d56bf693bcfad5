//! Query handlers for the Canonical Event Ledger context.
//!
//! Read-only projections over a snapshot. Nothing here writes state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::canon::export_canon;
use crate::domain::events::EventType;
use crate::domain::session::SessionState;

/// Read-only view of a pending proposal.
#[derive(Debug, Serialize)]
pub struct PendingChangeView {
    /// The proposal identifier.
    pub change_id: String,
    /// The proposal text.
    pub description: String,
    /// Who proposed it.
    pub proposed_by: String,
}

/// Read-only view of a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: String,
    /// The active scene, if any.
    pub scene_id: Option<String>,
    /// Total events in the ledger.
    pub event_count: usize,
    /// Number of `OUTCOME` events.
    pub outcome_count: usize,
    /// Proposals awaiting confirmation.
    pub pending: Vec<PendingChangeView>,
    /// Raised flags.
    pub flags: Vec<String>,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended, if it has.
    pub ended_at: Option<DateTime<Utc>>,
    /// The canon export.
    pub canon: String,
}

/// Builds a [`SessionView`] for `state`.
#[must_use]
pub fn session_view(state: &SessionState) -> SessionView {
    SessionView {
        session_id: state.session_id().to_owned(),
        scene_id: state.scene_id().map(str::to_owned),
        event_count: state.events().len(),
        outcome_count: state
            .events()
            .iter()
            .filter(|e| e.event_type() == EventType::Outcome)
            .count(),
        pending: state
            .pending()
            .iter()
            .map(|p| PendingChangeView {
                change_id: p.id.to_string(),
                description: p.description.clone(),
                proposed_by: p.proposed_by.to_string(),
            })
            .collect(),
        flags: state.flags().to_vec(),
        started_at: state.started_at(),
        ended_at: state.ended_at(),
        canon: export_canon(state.events()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::actor::Actor;
    use arbiter_test_support::{FixedClock, SequentialIds};
    use chrono::TimeZone;

    use crate::domain::pending::PendingChange;

    #[test]
    fn test_session_view_summarizes_snapshot() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock)
            .set_scene("docks", &Actor::human("DM"), &clock, &ids)
            .unwrap()
            .propose(PendingChange::new("tide turns", Actor::System, &clock, &ids))
            .unwrap();

        let view = session_view(&state);

        assert_eq!(view.session_id, "s1");
        assert_eq!(view.scene_id.as_deref(), Some("docks"));
        assert_eq!(view.event_count, 1);
        assert_eq!(view.outcome_count, 0);
        assert_eq!(view.pending.len(), 1);
        assert_eq!(view.pending[0].proposed_by, "system");
        assert_eq!(view.canon, "");
        assert!(view.ended_at.is_none());
    }
}
