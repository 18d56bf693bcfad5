//! Stage A: risk kind to difficulty class.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Difficulty class used for risk kinds the table does not name.
pub const DEFAULT_DIFFICULTY_CLASS: i32 = 10;

/// How dangerous an option is, as classified by the option generator.
///
/// Parsed leniently: any text that is not one of the four known kinds is
/// kept as `Unrecognized` so it can still be resolved at the default DC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskKind {
    /// No meaningful opposition.
    Safe,
    /// The surroundings push back.
    Environmental,
    /// Real chance of things going wrong.
    Risky,
    /// Someone is actively opposing the action.
    Contested,
    /// A kind the table does not know.
    Unrecognized(String),
}

impl RiskKind {
    /// Parses a risk kind, case-insensitively.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "safe" => Self::Safe,
            "environmental" => Self::Environmental,
            "risky" => Self::Risky,
            "contested" => Self::Contested,
            _ => Self::Unrecognized(text.trim().to_owned()),
        }
    }

    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Safe => "safe",
            Self::Environmental => "environmental",
            Self::Risky => "risky",
            Self::Contested => "contested",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// The canonical difficulty table.
    #[must_use]
    pub fn difficulty_class(&self) -> i32 {
        match self {
            Self::Safe => 6,
            Self::Environmental => 8,
            Self::Risky => 10,
            Self::Contested => 14,
            Self::Unrecognized(_) => DEFAULT_DIFFICULTY_CLASS,
        }
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RiskKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for RiskKind {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<RiskKind> for String {
    fn from(value: RiskKind) -> Self {
        value.as_str().to_owned()
    }
}
