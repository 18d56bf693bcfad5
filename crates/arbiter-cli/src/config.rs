//! Configuration read from the environment.

use std::path::PathBuf;

use arbiter_rules::domain::dice::DieMode;
use arbiter_rules::domain::narrative::TagRuleSet;

use crate::error::AppError;

/// Table session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The human Arbiter who commits outcomes and confirms changes.
    pub arbiter_name: String,
    /// The player whose intents are read from stdin.
    pub player_name: String,
    /// Die used for system rolls.
    pub die: DieMode,
    /// Name recorded as drafter in audit trails.
    pub drafter: String,
    /// Known character names for thematic tagging.
    pub characters: Vec<String>,
    /// Optional YAML rule table replacing the built-in rules.
    pub tag_rules_path: Option<PathBuf>,
    /// Ledger session id.
    pub session_id: String,
    /// Fixed RNG seed for replayable sessions.
    pub seed: Option<u64>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        let die = get("ARBITER_DIE", "d20")
            .parse::<DieMode>()
            .map_err(|e| AppError::Config(format!("ARBITER_DIE: {e}")))?;
        let seed = lookup("ARBITER_SEED")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("ARBITER_SEED must be a u64: {e}")))
            })
            .transpose()?;
        let characters = lookup("ARBITER_CHARACTERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let tag_rules_path = lookup("ARBITER_TAG_RULES")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            arbiter_name: get("ARBITER_NAME", "Arbiter"),
            player_name: get("ARBITER_PLAYER", "Player"),
            die,
            drafter: get("ARBITER_DRAFTER", "Solace"),
            characters,
            tag_rules_path,
            session_id: get("ARBITER_SESSION_ID", "table-session"),
            seed,
        })
    }

    /// Builds the thematic rule table: the YAML file if configured, otherwise
    /// the built-in rules, plus one rule per known character.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the rule file cannot be read and
    /// `AppError::Config` if it is not a valid rule table.
    pub fn load_rules(&self) -> Result<TagRuleSet, AppError> {
        let rules = match &self.tag_rules_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                TagRuleSet::from_yaml(&text)
                    .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?
            }
            None => TagRuleSet::default(),
        };
        rules
            .with_characters(&self.characters)
            .map_err(|e| AppError::Config(format!("ARBITER_CHARACTERS: {e}")))
    }
}
