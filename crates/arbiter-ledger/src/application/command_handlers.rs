//! Command handlers for the Canonical Event Ledger context.
//!
//! Each handler applies one command to the caller's current snapshot and
//! returns the new snapshot together with the events it appended. The input
//! snapshot is never modified, so a failed command leaves the caller's state
//! exactly as it was.

use arbiter_core::clock::Clock;
use arbiter_core::command::Command;
use arbiter_core::error::DomainError;
use arbiter_core::id::IdGenerator;
use uuid::Uuid;

use crate::domain::commands::{
    ConfirmChange, EndSession, ProposeChange, RaiseFlag, SetScene, WithdrawChange,
};
use crate::domain::events::SessionEvent;
use crate::domain::pending::PendingChange;
use crate::domain::session::SessionState;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct LedgerCommandResult {
    /// The new snapshot.
    pub state: SessionState,
    /// Events appended by the command (empty for idempotent no-ops).
    pub new_events: Vec<SessionEvent>,
}

/// Result of a successfully handled `ProposeChange`.
#[derive(Debug)]
pub struct ProposalResult {
    /// The new snapshot.
    pub state: SessionState,
    /// The id minted for the proposal.
    pub change_id: Uuid,
}

fn finish(
    command: &dyn Command,
    before: &SessionState,
    result: Result<SessionState, DomainError>,
) -> Result<LedgerCommandResult, DomainError> {
    match result {
        Ok(state) => {
            let new_events = state.events()[before.events().len()..].to_vec();
            tracing::debug!(
                command = command.command_type(),
                correlation_id = %command.correlation_id(),
                appended = new_events.len(),
                "ledger command handled"
            );
            Ok(LedgerCommandResult { state, new_events })
        }
        Err(err) => {
            tracing::warn!(
                command = command.command_type(),
                correlation_id = %command.correlation_id(),
                error = %err,
                "ledger command rejected"
            );
            Err(err)
        }
    }
}

/// Handles the `ProposeChange` command: drafts a pending change and adds it
/// to the snapshot.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the session has ended.
pub fn handle_propose_change(
    command: &ProposeChange,
    state: &SessionState,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<ProposalResult, DomainError> {
    let change = PendingChange::new(
        command.description.clone(),
        command.proposed_by.clone(),
        clock,
        ids,
    );
    let change_id = change.id;
    let result = finish(command, state, state.propose(change))?;
    Ok(ProposalResult {
        state: result.state,
        change_id,
    })
}

/// Handles the `ConfirmChange` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound`, `DomainError::Unauthorized` or
/// `DomainError::Validation` as described on [`SessionState::confirm`].
pub fn handle_confirm_change(
    command: &ConfirmChange,
    state: &SessionState,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<LedgerCommandResult, DomainError> {
    finish(
        command,
        state,
        state.confirm(command.change_id, &command.confirmed_by, clock, ids),
    )
}

/// Handles the `WithdrawChange` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` or `DomainError::Unauthorized` as
/// described on [`SessionState::withdraw`].
pub fn handle_withdraw_change(
    command: &WithdrawChange,
    state: &SessionState,
) -> Result<LedgerCommandResult, DomainError> {
    finish(
        command,
        state,
        state.withdraw(command.change_id, &command.withdrawn_by),
    )
}

/// Handles the `SetScene` command.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` or `DomainError::Validation` as
/// described on [`SessionState::set_scene`].
pub fn handle_set_scene(
    command: &SetScene,
    state: &SessionState,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<LedgerCommandResult, DomainError> {
    finish(
        command,
        state,
        state.set_scene(command.scene_id.clone(), &command.confirmed_by, clock, ids),
    )
}

/// Handles the `EndSession` command. Ending an ended session succeeds with
/// no new events.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` if the actor is not human.
pub fn handle_end_session(
    command: &EndSession,
    state: &SessionState,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<LedgerCommandResult, DomainError> {
    finish(
        command,
        state,
        state.end_session(&command.confirmed_by, clock, ids),
    )
}

/// Handles the `RaiseFlag` command.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` or `DomainError::Validation` as
/// described on [`SessionState::raise_flag`].
pub fn handle_raise_flag(
    command: &RaiseFlag,
    state: &SessionState,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<LedgerCommandResult, DomainError> {
    finish(
        command,
        state,
        state.raise_flag(command.flag.clone(), &command.raised_by, clock, ids),
    )
}
