//! Stage B: die selection, roll validation and margin.

use std::fmt;
use std::str::FromStr;

use arbiter_core::error::DomainError;
use arbiter_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

/// Die sizes the table supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieMode {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
}

impl DieMode {
    /// All supported dice, smallest first.
    pub const ALL: [Self; 6] = [Self::D4, Self::D6, Self::D8, Self::D10, Self::D12, Self::D20];

    /// Number of faces.
    #[must_use]
    pub fn faces(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }

    /// Conventional name, e.g. `"d20"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::D4 => "d4",
            Self::D6 => "d6",
            Self::D8 => "d8",
            Self::D10 => "d10",
            Self::D12 => "d12",
            Self::D20 => "d20",
        }
    }
}

impl fmt::Display for DieMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DieMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| DomainError::Validation(format!("unsupported die: {s:?}")))
    }
}

/// Where a roll came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollSource {
    /// Rolled at the table and typed in.
    Manual,
    /// Generated by the engine.
    System,
}

impl RollSource {
    /// Wire name, `"manual"` or `"system"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::System => "system",
        }
    }
}

/// Result of one roll against a difficulty class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOutcome {
    /// The die rolled.
    pub mode: DieMode,
    /// Face value. [`roll_dice`] only produces `1..=mode.faces()`.
    pub roll: u32,
    /// Threshold the roll is compared against.
    pub difficulty_class: i32,
    /// Manual or system roll.
    pub source: RollSource,
}

impl DiceOutcome {
    /// `roll - difficulty_class`, saturated to the `i32` range.
    #[must_use]
    pub fn margin(&self) -> i32 {
        let margin = i64::from(self.roll) - i64::from(self.difficulty_class);
        i32::try_from(margin).unwrap_or(if margin < 0 { i32::MIN } else { i32::MAX })
    }
}

/// Parses a roll typed at the table.
///
/// # Errors
///
/// Returns `DomainError::Validation` for text that is not an integer
/// (including decimals such as `"3.5"`) and for zero or negative values.
pub fn parse_manual_roll(text: &str) -> Result<i64, DomainError> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| DomainError::Validation(format!("roll must be an integer, got {text:?}")))?;
    if value <= 0 {
        return Err(DomainError::Validation(format!(
            "roll must be positive, got {value}"
        )));
    }
    Ok(value)
}

/// Produces the roll for one intent.
///
/// A manual roll is taken at face value once it is a positive integer that
/// fits on the die; otherwise the engine rolls `1..=faces` itself.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `manual_roll` is zero, negative or
/// larger than the die's face count.
pub fn roll_dice(
    mode: DieMode,
    manual_roll: Option<i64>,
    difficulty_class: i32,
    rng: &mut dyn DeterministicRng,
) -> Result<DiceOutcome, DomainError> {
    let (roll, source) = match manual_roll {
        Some(value) => {
            if value <= 0 {
                return Err(DomainError::Validation(format!(
                    "roll must be positive, got {value}"
                )));
            }
            let roll = u32::try_from(value)
                .ok()
                .filter(|roll| *roll <= mode.faces())
                .ok_or_else(|| {
                    DomainError::Validation(format!("roll {value} does not fit on a {mode}"))
                })?;
            (roll, RollSource::Manual)
        }
        None => (rng.next_u32_range(1, mode.faces()), RollSource::System),
    };

    Ok(DiceOutcome {
        mode,
        roll,
        difficulty_class,
        source,
    })
}
