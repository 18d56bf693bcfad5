//! Commands for the Canonical Event Ledger context.

use arbiter_core::actor::Actor;
use arbiter_core::command::Command;
use uuid::Uuid;

/// Command to propose a change for later confirmation.
#[derive(Debug, Clone)]
pub struct ProposeChange {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// What would become canon.
    pub description: String,
    /// Who drafts the proposal.
    pub proposed_by: Actor,
}

impl Command for ProposeChange {
    fn command_type(&self) -> &'static str {
        "ledger.propose_change"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to confirm a pending change.
#[derive(Debug, Clone)]
pub struct ConfirmChange {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The pending change to confirm.
    pub change_id: Uuid,
    /// The human confirming it.
    pub confirmed_by: Actor,
}

impl Command for ConfirmChange {
    fn command_type(&self) -> &'static str {
        "ledger.confirm_change"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to withdraw a pending change.
#[derive(Debug, Clone)]
pub struct WithdrawChange {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The pending change to withdraw.
    pub change_id: Uuid,
    /// Who withdraws it.
    pub withdrawn_by: Actor,
}

impl Command for WithdrawChange {
    fn command_type(&self) -> &'static str {
        "ledger.withdraw_change"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to move the session to another scene.
#[derive(Debug, Clone)]
pub struct SetScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The new scene.
    pub scene_id: String,
    /// The human making the change.
    pub confirmed_by: Actor,
}

impl Command for SetScene {
    fn command_type(&self) -> &'static str {
        "ledger.set_scene"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to end the session.
#[derive(Debug, Clone)]
pub struct EndSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The human ending the session.
    pub confirmed_by: Actor,
}

impl Command for EndSession {
    fn command_type(&self) -> &'static str {
        "ledger.end_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to raise a session flag.
#[derive(Debug, Clone)]
pub struct RaiseFlag {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The flag name.
    pub flag: String,
    /// The human raising it.
    pub raised_by: Actor,
}

impl Command for RaiseFlag {
    fn command_type(&self) -> &'static str {
        "ledger.raise_flag"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
