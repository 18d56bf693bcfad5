//! Stage C: margin to outcome band.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete narrative severity derived from a roll's margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeBand {
    /// margin < -5
    CatastrophicFailure,
    /// -5 <= margin < -2
    HardFailure,
    /// -2 <= margin < 0
    SoftFailure,
    /// 0 <= margin < 3
    NarrowSuccess,
    /// 3 <= margin < 6
    StrongSuccess,
    /// margin >= 6
    ExtremeSuccess,
}

impl OutcomeBand {
    /// Classifies a margin. Total over `i32`: every margin maps to exactly
    /// one band.
    #[must_use]
    pub fn from_margin(margin: i32) -> Self {
        match margin {
            6.. => Self::ExtremeSuccess,
            3..=5 => Self::StrongSuccess,
            0..=2 => Self::NarrowSuccess,
            -2..=-1 => Self::SoftFailure,
            -5..=-3 => Self::HardFailure,
            i32::MIN..=-6 => Self::CatastrophicFailure,
        }
    }

    /// Display label, e.g. `"Narrow Success"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CatastrophicFailure => "Catastrophic Failure",
            Self::HardFailure => "Hard Failure",
            Self::SoftFailure => "Soft Failure",
            Self::NarrowSuccess => "Narrow Success",
            Self::StrongSuccess => "Strong Success",
            Self::ExtremeSuccess => "Extreme Success",
        }
    }

    /// Returns `true` for the three success bands.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::NarrowSuccess | Self::StrongSuccess | Self::ExtremeSuccess
        )
    }

    /// The sentence every narrative for this band starts with.
    #[must_use]
    pub fn base_sentence(self) -> &'static str {
        match self {
            Self::CatastrophicFailure => "It fails disastrously, and something is lost.",
            Self::HardFailure => "It fails, and the situation turns against you.",
            Self::SoftFailure => "It falls short, though the way forward is still open.",
            Self::NarrowSuccess => "It works, but only just.",
            Self::StrongSuccess => "It works, cleanly and convincingly.",
            Self::ExtremeSuccess => "It goes better than anyone dared hope.",
        }
    }
}

impl fmt::Display for OutcomeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
