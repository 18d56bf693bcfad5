//! Session events — the immutable facts stored in the ledger.

use arbiter_core::actor::Actor;
use arbiter_core::clock::Clock;
use arbiter_core::id::IdGenerator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type identifier for [`EventPayload::ConfirmedChange`].
pub const CONFIRMED_CHANGE_EVENT_TYPE: &str = "CONFIRMED_CHANGE";

/// Event type identifier for [`EventPayload::SetScene`].
pub const SET_SCENE_EVENT_TYPE: &str = "SET_SCENE";

/// Event type identifier for [`EventPayload::EndSession`].
pub const END_SESSION_EVENT_TYPE: &str = "END_SESSION";

/// Event type identifier for [`EventPayload::Outcome`].
pub const OUTCOME_EVENT_TYPE: &str = "OUTCOME";

/// Event type identifier for [`EventPayload::FlagRaised`].
pub const FLAG_RAISED_EVENT_TYPE: &str = "FLAG_RAISED";

/// Discriminant of a [`SessionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A pending change accepted by a human.
    ConfirmedChange,
    /// The active scene changed.
    SetScene,
    /// The session ended.
    EndSession,
    /// A resolved player intent.
    Outcome,
    /// A session flag was raised.
    FlagRaised,
}

impl EventType {
    /// Returns the wire name of this event type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfirmedChange => CONFIRMED_CHANGE_EVENT_TYPE,
            Self::SetScene => SET_SCENE_EVENT_TYPE,
            Self::EndSession => END_SESSION_EVENT_TYPE,
            Self::Outcome => OUTCOME_EVENT_TYPE,
            Self::FlagRaised => FLAG_RAISED_EVENT_TYPE,
        }
    }
}

/// Payload of a `CONFIRMED_CHANGE` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedChange {
    /// The pending change that was confirmed.
    pub change_id: Uuid,
    /// The original proposal text.
    pub description: String,
    /// Who drafted the proposal.
    pub proposed_by: Actor,
}

/// Payload of a `SET_SCENE` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSet {
    /// The new scene identifier.
    pub scene_id: String,
}

/// Payload of an `OUTCOME` event: one resolved player intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// The intent this outcome resolves.
    pub intent_id: Uuid,
    /// The canonical narrative text.
    pub description: String,
    /// Outcome band label (e.g. "Narrow Success").
    pub band: String,
    /// `roll - difficulty_class`.
    pub margin: i32,
    /// Die used, e.g. "d20".
    pub die: String,
    /// Face value rolled.
    pub roll: u32,
    /// Difficulty class the roll was compared against.
    pub difficulty_class: i32,
    /// "manual" or "system".
    pub roll_source: String,
    /// Provenance lines in call order. Advisory only.
    pub audit_trail: Vec<String>,
}

/// Payload of a `FLAG_RAISED` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRaised {
    /// The flag name.
    pub flag: String,
}

/// Event payload variants, tagged on the wire by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    /// A proposal became canon.
    ConfirmedChange(ConfirmedChange),
    /// The active scene changed.
    SetScene(SceneSet),
    /// The session ended.
    EndSession,
    /// A player intent was resolved and recorded.
    Outcome(OutcomeRecord),
    /// A session flag was raised.
    FlagRaised(FlagRaised),
}

/// One immutable fact in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// Who authored or approved the fact.
    pub actor: Actor,
    /// Event-specific payload.
    pub payload: EventPayload,
}

impl SessionEvent {
    /// Builds an event, minting its id and timestamp from the given sources.
    pub fn new(
        actor: Actor,
        payload: EventPayload,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Self {
        Self {
            id: ids.next_id(),
            timestamp: clock.now(),
            actor,
            payload,
        }
    }

    /// Returns the discriminant of this event.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match &self.payload {
            EventPayload::ConfirmedChange(_) => EventType::ConfirmedChange,
            EventPayload::SetScene(_) => EventType::SetScene,
            EventPayload::EndSession => EventType::EndSession,
            EventPayload::Outcome(_) => EventType::Outcome,
            EventPayload::FlagRaised(_) => EventType::FlagRaised,
        }
    }

    /// Human-readable description of the fact.
    #[must_use]
    pub fn description(&self) -> String {
        match &self.payload {
            EventPayload::ConfirmedChange(change) => change.description.clone(),
            EventPayload::SetScene(scene) => format!("Scene set to {}", scene.scene_id),
            EventPayload::EndSession => "Session ended".to_owned(),
            EventPayload::Outcome(outcome) => outcome.description.clone(),
            EventPayload::FlagRaised(flag) => format!("Flag raised: {}", flag.flag),
        }
    }
}
