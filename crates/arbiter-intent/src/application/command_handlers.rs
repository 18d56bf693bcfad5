//! Command handlers for the Intent Latch context.
//!
//! These drive one turn: submit an intent through the parser and option
//! generator, resolve a chosen option, then commit the outcome to the ledger.
//! Commit and release happen in the same synchronous step, so the latch is
//! re-armed only once the ledger has acknowledged the `OUTCOME` event.

use std::sync::Mutex;

use arbiter_core::clock::Clock;
use arbiter_core::command::Command;
use arbiter_core::error::DomainError;
use arbiter_core::id::IdGenerator;
use arbiter_core::rng::DeterministicRng;
use arbiter_ledger::domain::session::SessionState;
use arbiter_rules::domain::narrative::TagRuleSet;
use arbiter_rules::domain::resolution::{ResolutionContext, ResolutionReport, resolve};
use uuid::Uuid;

use crate::domain::commands::{AbortIntent, CommitOutcome, ResolveOption, SubmitIntent};
use crate::domain::intent::IntentOption;
use crate::domain::latch::IntentLatch;
use crate::ports::{ActionParser, OptionGenerator};

/// Result of a successfully submitted intent.
#[derive(Debug)]
pub struct SubmittedIntent {
    /// The id the latch minted for the intent.
    pub intent_id: Uuid,
    /// The classified options, in generator order.
    pub options: Vec<IntentOption>,
}

/// Result of a successfully committed outcome.
#[derive(Debug)]
pub struct CommittedOutcome {
    /// The new snapshot, containing the `OUTCOME` event.
    pub state: SessionState,
    /// The `OUTCOME` event id.
    pub event_id: Uuid,
}

/// Handles the `SubmitIntent` command: parses the text, generates options and
/// takes the latch.
///
/// A busy latch is checked before either collaborator is called, so a
/// rejected submission costs nothing.
///
/// # Errors
///
/// Returns `DomainError::LatchViolation` if another intent is in progress,
/// `DomainError::Validation` if the generator produced no options, and any
/// error raised by the collaborators.
pub async fn handle_submit_intent(
    command: &SubmitIntent,
    latch: &mut IntentLatch,
    parser: &dyn ActionParser,
    generator: &dyn OptionGenerator,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<SubmittedIntent, DomainError> {
    if !latch.is_idle() {
        tracing::warn!(
            command = command.command_type(),
            correlation_id = %command.correlation_id(),
            "intent rejected: latch is busy"
        );
        return Err(DomainError::LatchViolation(
            "another intent is still in progress".to_owned(),
        ));
    }

    let parsed = parser.parse(&command.actor, &command.raw_text).await?;
    let option_set = generator.generate(&parsed).await?;
    let options = option_set.options.clone();
    let intent_id = latch.activate(parsed, option_set, clock, ids)?;

    tracing::info!(
        correlation_id = %command.correlation_id(),
        %intent_id,
        options = options.len(),
        "intent submitted"
    );
    Ok(SubmittedIntent { intent_id, options })
}

/// Handles the `ResolveOption` command: runs the Resolution Engine for one
/// option of the active intent. Does not touch the ledger or the latch.
///
/// The `Mutex` is locked only for the duration of the roll.
///
/// # Errors
///
/// Returns `DomainError::LatchViolation` if the intent is not active,
/// `DomainError::NotFound` for an unknown option, and
/// `DomainError::Validation` for an invalid manual roll.
pub fn handle_resolve_option(
    command: &ResolveOption,
    latch: &IntentLatch,
    rng: &Mutex<dyn DeterministicRng>,
    rules: &TagRuleSet,
    drafter: &str,
) -> Result<ResolutionReport, DomainError> {
    let active = latch.active_intent(command.intent_id)?;
    let option = active.option(&command.option_id)?;
    let context = ResolutionContext {
        intent_description: active.parsed.raw_text.clone(),
        risk_kind: option.kind.clone(),
    };

    let mut rng_guard = rng
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
    let report = resolve(
        &context,
        command.die,
        command.manual_roll,
        &mut *rng_guard,
        rules,
        drafter,
    )?;

    tracing::info!(
        correlation_id = %command.correlation_id(),
        intent_id = %command.intent_id,
        option_id = %command.option_id,
        band = report.band.label(),
        "option resolved"
    );
    Ok(report)
}

/// Handles the `CommitOutcome` command: records the outcome and re-arms the
/// latch.
///
/// # Errors
///
/// Returns `DomainError::LatchViolation` if the intent is not active (a
/// duplicate commit included) and any error from the ledger. On error the
/// caller's snapshot is unchanged.
pub fn handle_commit_outcome(
    command: &CommitOutcome,
    state: &SessionState,
    latch: &mut IntentLatch,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<CommittedOutcome, DomainError> {
    let next = latch.commit(
        state,
        command.intent_id,
        &command.report,
        &command.arbiter,
        clock,
        ids,
    )?;
    latch.release()?;

    let event_id = next
        .events()
        .last()
        .map(|event| event.id)
        .ok_or_else(|| DomainError::Infrastructure("ledger acknowledged no event".to_owned()))?;
    tracing::info!(
        correlation_id = %command.correlation_id(),
        intent_id = %command.intent_id,
        %event_id,
        "outcome committed"
    );
    Ok(CommittedOutcome {
        state: next,
        event_id,
    })
}

/// Handles the `AbortIntent` command: releases the latch with no outcome.
///
/// # Errors
///
/// Returns `DomainError::LatchViolation` if the intent is not active.
pub fn handle_abort_intent(command: &AbortIntent, latch: &mut IntentLatch) -> Result<(), DomainError> {
    latch.abort(command.intent_id)?;
    tracing::info!(
        correlation_id = %command.correlation_id(),
        intent_id = %command.intent_id,
        "intent aborted"
    );
    Ok(())
}
