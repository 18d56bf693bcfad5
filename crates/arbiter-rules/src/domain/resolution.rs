//! The resolution pipeline: classify, roll, band, narrate.

use arbiter_core::error::DomainError;
use arbiter_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

use super::band::OutcomeBand;
use super::dice::{DiceOutcome, DieMode, roll_dice};
use super::difficulty::RiskKind;
use super::narrative::{TagRuleSet, assemble_narrative};

/// Input to the Resolution Engine for one player intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionContext {
    /// The player's intent, as typed.
    pub intent_description: String,
    /// Classification of the chosen option.
    pub risk_kind: RiskKind,
}

/// Everything the engine produced for one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// The outcome band.
    pub band: OutcomeBand,
    /// `roll - difficulty_class`.
    pub margin: i32,
    /// Band sentence plus thematic clauses.
    pub narrative: String,
    /// The roll that decided it.
    pub dice_outcome: DiceOutcome,
    /// Provenance lines in call order.
    pub audit_trail: Vec<String>,
}

/// Resolves an intent end to end.
///
/// With `manual_roll` set the roll is taken from the table; otherwise `rng`
/// rolls the die. `drafter` names whoever drafted the resolution and opens
/// the audit trail.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the manual roll is not a positive
/// integer that fits on `die`. Nothing is computed for an invalid roll.
pub fn resolve(
    context: &ResolutionContext,
    die: DieMode,
    manual_roll: Option<i64>,
    rng: &mut dyn DeterministicRng,
    rules: &TagRuleSet,
    drafter: &str,
) -> Result<ResolutionReport, DomainError> {
    let difficulty_class = context.risk_kind.difficulty_class();
    let dice_outcome = roll_dice(die, manual_roll, difficulty_class, rng).inspect_err(|err| {
        tracing::warn!(error = %err, die = die.as_str(), "roll rejected");
    })?;
    Ok(interpret(context, dice_outcome, rules, drafter))
}

/// Interprets an already validated roll. Pure: the same context, roll and
/// rule table always yield the same report.
#[must_use]
pub fn interpret(
    context: &ResolutionContext,
    dice_outcome: DiceOutcome,
    rules: &TagRuleSet,
    drafter: &str,
) -> ResolutionReport {
    let margin = dice_outcome.margin();
    let band = OutcomeBand::from_margin(margin);
    let narrative = assemble_narrative(band, &context.intent_description, rules);

    let audit_trail = vec![
        format!("Drafted by {drafter}"),
        format!(
            "Classified as {} (DC {})",
            context.risk_kind, dice_outcome.difficulty_class
        ),
        format!(
            "Rolled {} on {} ({})",
            dice_outcome.roll,
            dice_outcome.mode,
            dice_outcome.source.as_str()
        ),
        format!("Margin {margin:+}: {band}"),
    ];

    tracing::debug!(
        roll = dice_outcome.roll,
        difficulty_class = dice_outcome.difficulty_class,
        margin,
        band = band.label(),
        "intent resolved"
    );

    ResolutionReport {
        band,
        margin,
        narrative,
        dice_outcome,
        audit_trail,
    }
}
