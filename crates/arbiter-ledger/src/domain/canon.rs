//! Canon export — a read-only projection of committed outcomes.

use super::events::{EventPayload, SessionEvent};

/// Renders every `OUTCOME` event's description, one per line, in ledger
/// order. All other event types are omitted.
#[must_use]
pub fn export_canon(events: &[SessionEvent]) -> String {
    events
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::Outcome(outcome) => Some(outcome.description.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{ConfirmedChange, OutcomeRecord, SceneSet};
    use arbiter_core::id::IdGenerator;
    use arbiter_core::actor::Actor;
    use arbiter_test_support::{FixedClock, SequentialIds};
    use chrono::{TimeZone, Utc};

    fn event(ids: &SequentialIds, payload: EventPayload) -> SessionEvent {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        SessionEvent::new(Actor::human("DM"), payload, &clock, ids)
    }

    fn outcome(ids: &SequentialIds, text: &str) -> EventPayload {
        EventPayload::Outcome(OutcomeRecord {
            intent_id: ids.next_id(),
            description: text.to_owned(),
            band: "Strong Success".to_owned(),
            margin: 4,
            die: "d20".to_owned(),
            roll: 14,
            difficulty_class: 10,
            roll_source: "manual".to_owned(),
            audit_trail: Vec::new(),
        })
    }

    #[test]
    fn test_export_keeps_only_outcomes_in_ledger_order() {
        let ids = SequentialIds::new();
        let events = vec![
            event(
                &ids,
                EventPayload::SetScene(SceneSet {
                    scene_id: "gate".to_owned(),
                }),
            ),
            event(&ids, outcome(&ids, "First.")),
            event(
                &ids,
                EventPayload::ConfirmedChange(ConfirmedChange {
                    change_id: ids.next_id(),
                    description: "torch lit".to_owned(),
                    proposed_by: Actor::System,
                }),
            ),
            event(&ids, outcome(&ids, "Second.")),
            event(&ids, EventPayload::EndSession),
        ];

        assert_eq!(export_canon(&events), "First.\nSecond.");
    }

    #[test]
    fn test_export_of_history_without_outcomes_is_empty() {
        let ids = SequentialIds::new();
        let events = vec![event(&ids, EventPayload::EndSession)];

        assert_eq!(export_canon(&events), "");
        assert_eq!(export_canon(&[]), "");
    }
}
