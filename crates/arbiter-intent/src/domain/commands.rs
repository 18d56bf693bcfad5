//! Commands for the Intent Latch context.

use arbiter_core::actor::Actor;
use arbiter_core::command::Command;
use arbiter_rules::domain::dice::DieMode;
use arbiter_rules::domain::resolution::ResolutionReport;
use uuid::Uuid;

/// Command to submit a new player intent.
#[derive(Debug, Clone)]
pub struct SubmitIntent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player declaring the intent.
    pub actor: Actor,
    /// The intent as typed.
    pub raw_text: String,
}

impl Command for SubmitIntent {
    fn command_type(&self) -> &'static str {
        "intent.submit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to resolve one option of the active intent.
#[derive(Debug, Clone)]
pub struct ResolveOption {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The active intent.
    pub intent_id: Uuid,
    /// The chosen option.
    pub option_id: String,
    /// The die to roll.
    pub die: DieMode,
    /// A roll made at the table, if any.
    pub manual_roll: Option<i64>,
}

impl Command for ResolveOption {
    fn command_type(&self) -> &'static str {
        "intent.resolve_option"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to commit a resolved outcome to canon.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The intent being committed.
    pub intent_id: Uuid,
    /// The resolution to record.
    pub report: ResolutionReport,
    /// The human recording it.
    pub arbiter: Actor,
}

impl Command for CommitOutcome {
    fn command_type(&self) -> &'static str {
        "intent.commit_outcome"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to abandon the active intent without an outcome.
#[derive(Debug, Clone)]
pub struct AbortIntent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The intent to abandon.
    pub intent_id: Uuid,
}

impl Command for AbortIntent {
    fn command_type(&self) -> &'static str {
        "intent.abort"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
