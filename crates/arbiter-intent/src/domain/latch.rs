//! The Intent Latch state machine.
//!
//! ```text
//!   Idle ──activate──▶ Active ──commit──▶ Committed ──release──▶ Idle
//!                        │
//!                        └──────abort──────────────────────────▶ Idle
//! ```
//!
//! `commit` is the only transition that touches the ledger, and it moves to
//! `Committed` only after the ledger has accepted the `OUTCOME` event. Every
//! rejected transition leaves both the latch and the ledger as they were.

use arbiter_core::actor::Actor;
use arbiter_core::clock::Clock;
use arbiter_core::error::DomainError;
use arbiter_core::id::IdGenerator;
use arbiter_ledger::domain::events::{EventPayload, OutcomeRecord, SessionEvent};
use arbiter_ledger::domain::session::SessionState;
use arbiter_rules::domain::resolution::ResolutionReport;
use serde::Serialize;
use uuid::Uuid;

use super::intent::{ActiveIntent, OptionSet, ParsedIntent};

/// Latch state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LatchState {
    /// Ready to accept an intent.
    Idle,
    /// An intent is being resolved; new intents are rejected.
    Active(ActiveIntent),
    /// The intent's outcome is canon; waiting to be released.
    Committed {
        /// The committed intent.
        intent_id: Uuid,
        /// The `OUTCOME` event that committed it.
        event_id: Uuid,
    },
}

/// Session-scoped guard ensuring one canonical outcome per intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentLatch {
    state: LatchState,
    last_committed: Option<Uuid>,
}

impl Default for IntentLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentLatch {
    /// Creates an idle latch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LatchState::Idle,
            last_committed: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &LatchState {
        &self.state
    }

    /// Returns `true` when a new intent may be submitted.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, LatchState::Idle)
    }

    /// The active intent, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveIntent> {
        match &self.state {
            LatchState::Active(active) => Some(active),
            _ => None,
        }
    }

    /// Returns the active intent if it is `intent_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LatchViolation` if `intent_id` is not active.
    pub fn active_intent(&self, intent_id: Uuid) -> Result<&ActiveIntent, DomainError> {
        match &self.state {
            LatchState::Active(active) if active.intent_id == intent_id => Ok(active),
            _ => Err(self.violation(intent_id, "is not the active intent")),
        }
    }

    /// Idle → Active. Mints the intent id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LatchViolation` if the latch is not idle, and
    /// `DomainError::Validation` if `options` is empty.
    pub fn activate(
        &mut self,
        parsed: ParsedIntent,
        options: OptionSet,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Uuid, DomainError> {
        if !self.is_idle() {
            tracing::warn!(actor = %parsed.actor_id, "intent rejected: latch is busy");
            return Err(DomainError::LatchViolation(
                "another intent is still in progress".to_owned(),
            ));
        }
        if options.options.is_empty() {
            return Err(DomainError::Validation(
                "an intent needs at least one classified option".to_owned(),
            ));
        }

        let intent_id = ids.next_id();
        tracing::info!(%intent_id, actor = %parsed.actor_id, options = options.options.len(), "latch active");
        self.state = LatchState::Active(ActiveIntent {
            intent_id,
            parsed,
            options: options.options,
            activated_at: clock.now(),
        });
        Ok(intent_id)
    }

    /// Active → Committed. Records the intent's `OUTCOME` in `session` and
    /// returns the new snapshot.
    ///
    /// "Recorded by {arbiter}" is appended to the report's audit trail.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LatchViolation` if `intent_id` is not the active
    /// intent (including a repeated commit), and propagates any ledger error
    /// from `record`; in both cases the latch does not move.
    pub fn commit(
        &mut self,
        session: &SessionState,
        intent_id: Uuid,
        report: &ResolutionReport,
        arbiter: &Actor,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<SessionState, DomainError> {
        self.active_intent(intent_id)?;

        let mut audit_trail = report.audit_trail.clone();
        audit_trail.push(format!("Recorded by {arbiter}"));
        let event = SessionEvent::new(
            arbiter.clone(),
            EventPayload::Outcome(OutcomeRecord {
                intent_id,
                description: report.narrative.clone(),
                band: report.band.label().to_owned(),
                margin: report.margin,
                die: report.dice_outcome.mode.as_str().to_owned(),
                roll: report.dice_outcome.roll,
                difficulty_class: report.dice_outcome.difficulty_class,
                roll_source: report.dice_outcome.source.as_str().to_owned(),
                audit_trail,
            }),
            clock,
            ids,
        );
        let event_id = event.id;

        let next = session.record(event)?;
        tracing::info!(%intent_id, %event_id, arbiter = %arbiter, "latch committed");
        self.state = LatchState::Committed {
            intent_id,
            event_id,
        };
        self.last_committed = Some(intent_id);
        Ok(next)
    }

    /// Committed → Idle. The only way to re-arm after a commit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LatchViolation` if the latch is not committed.
    pub fn release(&mut self) -> Result<Uuid, DomainError> {
        match self.state {
            LatchState::Committed { intent_id, .. } => {
                tracing::debug!(%intent_id, "latch released");
                self.state = LatchState::Idle;
                Ok(intent_id)
            }
            _ => Err(DomainError::LatchViolation(
                "nothing has been committed to release".to_owned(),
            )),
        }
    }

    /// Active → Idle without an outcome.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LatchViolation` if `intent_id` is not active.
    pub fn abort(&mut self, intent_id: Uuid) -> Result<(), DomainError> {
        self.active_intent(intent_id)?;
        tracing::info!(%intent_id, "intent aborted");
        self.state = LatchState::Idle;
        Ok(())
    }

    fn violation(&self, intent_id: Uuid, reason: &str) -> DomainError {
        let already = self.last_committed == Some(intent_id);
        tracing::warn!(%intent_id, already_committed = already, "latch violation");
        if already {
            DomainError::LatchViolation(format!("intent {intent_id} is already committed"))
        } else {
            DomainError::LatchViolation(format!("intent {intent_id} {reason}"))
        }
    }
}
