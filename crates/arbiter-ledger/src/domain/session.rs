//! The session snapshot and the ledger operations over it.
//!
//! `SessionState` is a plain value. Every operation borrows the current
//! snapshot and returns a new one; the caller decides which snapshot is
//! "current". `events` only ever grows: nothing here removes or reorders an
//! entry once it has been appended.

use arbiter_core::actor::Actor;
use arbiter_core::clock::Clock;
use arbiter_core::error::DomainError;
use arbiter_core::id::IdGenerator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{
    ConfirmedChange, EventPayload, EventType, FlagRaised, SceneSet, SessionEvent,
};
use super::pending::PendingChange;

/// The whole session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    session_id: String,
    scene_id: Option<String>,
    events: Vec<SessionEvent>,
    pending: Vec<PendingChange>,
    flags: Vec<String>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Starts a new, empty session.
    pub fn create(session_id: impl Into<String>, clock: &dyn Clock) -> Self {
        let session_id = session_id.into();
        tracing::info!(session_id = %session_id, "session created");
        Self {
            session_id,
            scene_id: None,
            events: Vec::new(),
            pending: Vec::new(),
            flags: Vec::new(),
            started_at: clock.now(),
            ended_at: None,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Active scene, if one was set.
    #[must_use]
    pub fn scene_id(&self) -> Option<&str> {
        self.scene_id.as_deref()
    }

    /// Canonical history in append order.
    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Proposals awaiting confirmation, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[PendingChange] {
        &self.pending
    }

    /// Raised session flags, in the order they were raised.
    #[must_use]
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Returns `true` if `flag` has been raised.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// When the session started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the session ended, if it has.
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Returns `true` once `end_session` has succeeded.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    fn ensure_open(&self, operation: &str) -> Result<(), DomainError> {
        if self.is_ended() {
            tracing::warn!(session_id = %self.session_id, operation, "rejected: session has ended");
            return Err(DomainError::Validation(format!(
                "session has ended; cannot {operation}"
            )));
        }
        Ok(())
    }

    /// Adds a proposal to `pending`. Anyone, including the system, may propose.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the session has ended or a
    /// proposal with the same id is already pending.
    pub fn propose(&self, change: PendingChange) -> Result<Self, DomainError> {
        self.ensure_open("propose")?;
        if self.pending.iter().any(|p| p.id == change.id) {
            return Err(DomainError::Validation(format!(
                "change {} is already pending",
                change.id
            )));
        }

        tracing::debug!(
            session_id = %self.session_id,
            change_id = %change.id,
            proposed_by = %change.proposed_by,
            "change proposed"
        );
        let mut next = self.clone();
        next.pending.push(change);
        Ok(next)
    }

    /// Removes a pending proposal without making it canon.
    ///
    /// The proposer may withdraw their own proposal; a human may withdraw any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no such proposal is pending and
    /// `DomainError::Unauthorized` if `actor` may not withdraw it.
    pub fn withdraw(&self, change_id: Uuid, actor: &Actor) -> Result<Self, DomainError> {
        let index = self.pending_index(change_id)?;
        if !actor.is_human() && self.pending[index].proposed_by != *actor {
            return Err(DomainError::Unauthorized(format!(
                "{actor} may not withdraw change {change_id}"
            )));
        }

        tracing::info!(session_id = %self.session_id, %change_id, %actor, "change withdrawn");
        let mut next = self.clone();
        next.pending.remove(index);
        Ok(next)
    }

    /// Converts a pending proposal into canon.
    ///
    /// Removes the proposal from `pending` and appends a `CONFIRMED_CHANGE`
    /// event attributed to `confirmed_by`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if `confirmed_by` is not human,
    /// `DomainError::Validation` if the session has ended, and
    /// `DomainError::NotFound` if `change_id` is not pending.
    pub fn confirm(
        &self,
        change_id: Uuid,
        confirmed_by: &Actor,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, DomainError> {
        confirmed_by.require_human("confirm")?;
        self.ensure_open("confirm")?;
        let index = self.pending_index(change_id)?;

        let mut next = self.clone();
        let change = next.pending.remove(index);
        let event = SessionEvent::new(
            confirmed_by.clone(),
            EventPayload::ConfirmedChange(ConfirmedChange {
                change_id: change.id,
                description: change.description,
                proposed_by: change.proposed_by,
            }),
            clock,
            ids,
        );
        tracing::info!(
            session_id = %self.session_id,
            %change_id,
            confirmed_by = %confirmed_by,
            event_id = %event.id,
            "change confirmed"
        );
        next.events.push(event);
        Ok(next)
    }

    /// Appends an Arbiter-authored event directly, bypassing propose/confirm.
    ///
    /// Only `OUTCOME` and `CONFIRMED_CHANGE` facts may be recorded this way;
    /// scene changes, flags and session end have dedicated operations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if the event's actor is not human,
    /// and `DomainError::Validation` if the session has ended, the event id is
    /// already in the ledger, or the payload has a dedicated operation.
    pub fn record(&self, event: SessionEvent) -> Result<Self, DomainError> {
        event.actor.require_human("record")?;
        self.ensure_open("record")?;
        let event_type = event.event_type();
        if !matches!(event_type, EventType::Outcome | EventType::ConfirmedChange) {
            return Err(DomainError::Validation(format!(
                "{} events cannot be recorded directly",
                event_type.as_str()
            )));
        }
        if self.events.iter().any(|e| e.id == event.id) {
            return Err(DomainError::Validation(format!(
                "event {} is already recorded",
                event.id
            )));
        }

        tracing::info!(
            session_id = %self.session_id,
            event_id = %event.id,
            event_type = event_type.as_str(),
            actor = %event.actor,
            "event recorded"
        );
        let mut next = self.clone();
        next.events.push(event);
        Ok(next)
    }

    /// Moves the session to a new scene and appends `SET_SCENE`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if `confirmed_by` is not human and
    /// `DomainError::Validation` if the session has ended or `scene_id` is blank.
    pub fn set_scene(
        &self,
        scene_id: impl Into<String>,
        confirmed_by: &Actor,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, DomainError> {
        confirmed_by.require_human("set_scene")?;
        self.ensure_open("set_scene")?;
        let scene_id = scene_id.into();
        if scene_id.trim().is_empty() {
            return Err(DomainError::Validation("scene id must not be blank".to_owned()));
        }

        tracing::info!(session_id = %self.session_id, scene_id = %scene_id, "scene set");
        let mut next = self.clone();
        next.scene_id = Some(scene_id.clone());
        next.events.push(SessionEvent::new(
            confirmed_by.clone(),
            EventPayload::SetScene(SceneSet { scene_id }),
            clock,
            ids,
        ));
        Ok(next)
    }

    /// Ends the session. Idempotent: once ended, returns an unchanged copy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if `confirmed_by` is not human.
    pub fn end_session(
        &self,
        confirmed_by: &Actor,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, DomainError> {
        confirmed_by.require_human("end_session")?;
        if self.is_ended() {
            tracing::debug!(session_id = %self.session_id, "session already ended");
            return Ok(self.clone());
        }

        let event = SessionEvent::new(confirmed_by.clone(), EventPayload::EndSession, clock, ids);
        tracing::info!(session_id = %self.session_id, ended_by = %confirmed_by, "session ended");
        let mut next = self.clone();
        next.ended_at = Some(event.timestamp);
        next.events.push(event);
        Ok(next)
    }

    /// Raises a session flag and appends `FLAG_RAISED`. Raising a flag that
    /// is already set returns an unchanged copy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if `raised_by` is not human and
    /// `DomainError::Validation` if the session has ended or `flag` is blank.
    pub fn raise_flag(
        &self,
        flag: impl Into<String>,
        raised_by: &Actor,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, DomainError> {
        raised_by.require_human("raise_flag")?;
        self.ensure_open("raise_flag")?;
        let flag = flag.into();
        if flag.trim().is_empty() {
            return Err(DomainError::Validation("flag must not be blank".to_owned()));
        }
        if self.has_flag(&flag) {
            return Ok(self.clone());
        }

        tracing::info!(session_id = %self.session_id, flag = %flag, "flag raised");
        let mut next = self.clone();
        next.flags.push(flag.clone());
        next.events.push(SessionEvent::new(
            raised_by.clone(),
            EventPayload::FlagRaised(FlagRaised { flag }),
            clock,
            ids,
        ));
        Ok(next)
    }

    fn pending_index(&self, change_id: Uuid) -> Result<usize, DomainError> {
        self.pending
            .iter()
            .position(|p| p.id == change_id)
            .ok_or_else(|| {
                tracing::warn!(session_id = %self.session_id, %change_id, "pending change not found");
                DomainError::NotFound(format!("pending change {change_id}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{EventType, OutcomeRecord};
    use arbiter_test_support::{FixedClock, SequentialIds};
    use chrono::TimeZone;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn dm() -> Actor {
        Actor::human("DM")
    }

    fn outcome_event(ids: &SequentialIds, text: &str) -> SessionEvent {
        SessionEvent::new(
            dm(),
            EventPayload::Outcome(OutcomeRecord {
                intent_id: ids.next_id(),
                description: text.to_owned(),
                band: "Narrow Success".to_owned(),
                margin: 1,
                die: "d20".to_owned(),
                roll: 11,
                difficulty_class: 10,
                roll_source: "system".to_owned(),
                audit_trail: vec!["Recorded by DM".to_owned()],
            }),
            &fixed_clock(),
            ids,
        )
    }

    #[test]
    fn test_create_session_starts_empty() {
        let state = SessionState::create("s1", &fixed_clock());

        assert_eq!(state.session_id(), "s1");
        assert!(state.events().is_empty());
        assert!(state.pending().is_empty());
        assert!(state.ended_at().is_none());
        assert_eq!(state.started_at(), fixed_clock().0);
    }

    #[test]
    fn test_propose_then_confirm_moves_change_into_canon() {
        // Arrange
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);
        let change = PendingChange::new("torch lit", Actor::System, &clock, &ids);
        let change_id = change.id;

        // Act
        let proposed = state.propose(change).unwrap();
        let confirmed = proposed.confirm(change_id, &dm(), &clock, &ids).unwrap();

        // Assert
        assert_eq!(proposed.pending().len(), 1);
        assert!(proposed.events().is_empty());
        assert!(confirmed.pending().is_empty());
        assert_eq!(confirmed.events().len(), 1);

        let event = &confirmed.events()[0];
        assert_eq!(event.event_type(), EventType::ConfirmedChange);
        assert_eq!(event.actor, dm());
        match &event.payload {
            EventPayload::ConfirmedChange(payload) => {
                assert_eq!(payload.description, "torch lit");
                assert_eq!(payload.proposed_by, Actor::System);
                assert_eq!(payload.change_id, change_id);
            }
            other => panic!("expected ConfirmedChange, got {other:?}"),
        }
    }

    #[test]
    fn test_confirm_twice_fails_the_second_time() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let change = PendingChange::new("door barred", Actor::System, &clock, &ids);
        let change_id = change.id;
        let state = SessionState::create("s1", &clock).propose(change).unwrap();

        let once = state.confirm(change_id, &dm(), &clock, &ids).unwrap();
        let twice = once.confirm(change_id, &dm(), &clock, &ids);

        match twice {
            Err(DomainError::NotFound(msg)) => assert!(msg.contains(&change_id.to_string())),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(once.events().len(), 1);
    }

    #[test]
    fn test_confirm_unknown_change_leaves_state_unchanged() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);
        let before = state.clone();

        let result = state.confirm(Uuid::new_v4(), &dm(), &clock, &ids);

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_system_cannot_confirm() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let change = PendingChange::new("bridge collapses", Actor::System, &clock, &ids);
        let change_id = change.id;
        let state = SessionState::create("s1", &clock).propose(change).unwrap();

        let result = state.confirm(change_id, &Actor::System, &clock, &ids);

        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
        assert_eq!(state.pending().len(), 1);
    }

    #[test]
    fn test_duplicate_pending_id_is_rejected() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let change = PendingChange::new("rain starts", Actor::System, &clock, &ids);
        let state = SessionState::create("s1", &clock)
            .propose(change.clone())
            .unwrap();

        let result = state.propose(change);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(state.pending().len(), 1);
    }

    #[test]
    fn test_withdraw_removes_proposal_without_event() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let change = PendingChange::new("guard dozes", Actor::System, &clock, &ids);
        let change_id = change.id;
        let state = SessionState::create("s1", &clock).propose(change).unwrap();

        let withdrawn = state.withdraw(change_id, &Actor::System).unwrap();

        assert!(withdrawn.pending().is_empty());
        assert!(withdrawn.events().is_empty());
        assert!(matches!(
            withdrawn.withdraw(change_id, &dm()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_record_appends_human_authored_outcome() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);

        let recorded = state.record(outcome_event(&ids, "The lock gives.")).unwrap();

        assert_eq!(recorded.events().len(), 1);
        assert_eq!(recorded.events()[0].event_type(), EventType::Outcome);
    }

    #[test]
    fn test_record_rejects_system_actor_and_replayed_event() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);
        let event = outcome_event(&ids, "The lock gives.");

        let mut forged = event.clone();
        forged.actor = Actor::System;
        assert!(matches!(
            state.record(forged),
            Err(DomainError::Unauthorized(_))
        ));

        let once = state.record(event.clone()).unwrap();
        assert!(matches!(once.record(event), Err(DomainError::Validation(_))));
        assert_eq!(once.events().len(), 1);
    }

    #[test]
    fn test_record_rejects_payloads_with_dedicated_operations() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);
        let event = SessionEvent::new(dm(), EventPayload::EndSession, &clock, &ids);

        let result = state.record(event);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(!state.is_ended());
    }

    #[test]
    fn test_set_scene_updates_scene_and_appends_event() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);

        let next = state.set_scene("harbor", &dm(), &clock, &ids).unwrap();

        assert_eq!(next.scene_id(), Some("harbor"));
        assert_eq!(next.events()[0].event_type(), EventType::SetScene);
        assert!(state.scene_id().is_none());
    }

    #[test]
    fn test_end_session_is_idempotent() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);

        let ended = state.end_session(&dm(), &clock, &ids).unwrap();
        let again = ended.end_session(&dm(), &clock, &ids).unwrap();

        assert_eq!(again, ended);
        assert_eq!(again.ended_at(), ended.ended_at());
        let end_events = again
            .events()
            .iter()
            .filter(|e| e.event_type() == EventType::EndSession)
            .count();
        assert_eq!(end_events, 1);
    }

    #[test]
    fn test_mutations_after_end_are_rejected() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let ended = SessionState::create("s1", &clock)
            .end_session(&dm(), &clock, &ids)
            .unwrap();

        let change = PendingChange::new("late idea", Actor::System, &clock, &ids);
        assert!(matches!(ended.propose(change), Err(DomainError::Validation(_))));
        assert!(matches!(
            ended.set_scene("epilogue", &dm(), &clock, &ids),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            ended.record(outcome_event(&ids, "too late")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_raise_flag_is_idempotent_per_flag() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock);

        let flagged = state.raise_flag("x-card", &dm(), &clock, &ids).unwrap();
        let again = flagged.raise_flag("x-card", &dm(), &clock, &ids).unwrap();

        assert!(again.has_flag("x-card"));
        assert_eq!(again.flags().len(), 1);
        assert_eq!(again.events().len(), 1);
    }

    #[test]
    fn test_events_never_shrink_across_an_operation_sequence() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let change = PendingChange::new("torch lit", Actor::System, &clock, &ids);
        let change_id = change.id;

        let mut state = SessionState::create("s1", &clock);
        let mut lengths = vec![state.events().len()];
        let mut apply = |result: Result<SessionState, DomainError>, state: &mut SessionState| {
            if let Ok(next) = result {
                *state = next;
            }
            lengths.push(state.events().len());
        };

        apply(state.propose(change), &mut state);
        apply(state.confirm(change_id, &dm(), &clock, &ids), &mut state);
        apply(state.confirm(change_id, &dm(), &clock, &ids), &mut state);
        apply(state.withdraw(change_id, &dm()), &mut state);
        apply(state.set_scene("crypt", &dm(), &clock, &ids), &mut state);
        apply(state.record(outcome_event(&ids, "The crypt opens.")), &mut state);
        apply(state.end_session(&dm(), &clock, &ids), &mut state);
        apply(state.end_session(&dm(), &clock, &ids), &mut state);
        apply(state.set_scene("after", &dm(), &clock, &ids), &mut state);

        assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(state.events().len(), 4);
    }

    #[test]
    fn test_snapshot_restores_verbatim() {
        let clock = fixed_clock();
        let ids = SequentialIds::new();
        let state = SessionState::create("s1", &clock)
            .set_scene("harbor", &dm(), &clock, &ids)
            .unwrap()
            .propose(PendingChange::new("fog rolls in", Actor::System, &clock, &ids))
            .unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, state);
    }
}
