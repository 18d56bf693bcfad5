//! Narrative assembly: band sentence plus thematic clauses.
//!
//! Themes are detected with a swappable table of `(pattern, tag)` rules so a
//! campaign can bring its own vocabulary and cast without touching the
//! banding algorithm. Each matched tag adds at most one clause, and clauses
//! always appear in tag priority order, so the same intent text and band
//! always produce the same narrative.

use std::collections::BTreeMap;
use std::fmt;

use arbiter_core::error::DomainError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::band::OutcomeBand;

/// Thematic tags, declared in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTag {
    /// Sneaking, hiding, moving unseen.
    Stealth,
    /// Spells and the arcane.
    Magic,
    /// Prayer and divine favor.
    Blessing,
    /// Weapons and fighting.
    Martial,
    /// A known character is named.
    Character,
}

impl ThemeTag {
    /// Wire name of this tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stealth => "stealth",
            Self::Magic => "magic",
            Self::Blessing => "blessing",
            Self::Martial => "martial",
            Self::Character => "character",
        }
    }

    /// The extra clause this tag contributes. `subject` is the matched
    /// character name for [`ThemeTag::Character`] and ignored otherwise.
    #[must_use]
    pub fn clause(self, subject: &str, success: bool) -> String {
        match (self, success) {
            (Self::Stealth, true) => "No one marks your passing.".to_owned(),
            (Self::Stealth, false) => "A careless sound gives you away.".to_owned(),
            (Self::Magic, true) => "The weave answers your call.".to_owned(),
            (Self::Magic, false) => "The magic slips and sputters.".to_owned(),
            (Self::Blessing, true) => "A quiet grace settles over you.".to_owned(),
            (Self::Blessing, false) => "The heavens stay silent.".to_owned(),
            (Self::Martial, true) => "Your training carries the blow home.".to_owned(),
            (Self::Martial, false) => "Your guard opens at the worst moment.".to_owned(),
            (Self::Character, true) => format!("{subject} sees it all unfold."),
            (Self::Character, false) => format!("{subject} is caught up in the fallout."),
        }
    }
}

impl fmt::Display for ThemeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(pattern, tag)` rule.
#[derive(Debug, Clone)]
pub struct TagRule {
    pattern: Regex,
    tag: ThemeTag,
    /// Canonical subject for the clause; falls back to the matched text.
    label: Option<String>,
}

impl TagRule {
    /// Compiles a case-insensitive rule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `pattern` is not a valid regex.
    pub fn new(pattern: &str, tag: ThemeTag) -> Result<Self, DomainError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::Validation(format!("invalid tag pattern {pattern:?}: {e}")))?;
        Ok(Self {
            pattern,
            tag,
            label: None,
        })
    }

    /// Builds a whole-word rule for a named character.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn character(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "character name must not be blank".to_owned(),
            ));
        }
        let mut rule = Self::new(&format!(r"\b{}\b", regex::escape(name)), ThemeTag::Character)?;
        rule.label = Some(name.to_owned());
        Ok(rule)
    }

    /// The tag this rule assigns.
    #[must_use]
    pub fn tag(&self) -> ThemeTag {
        self.tag
    }

    fn subject(&self, text: &str) -> Option<String> {
        self.pattern
            .find(text)
            .map(|m| self.label.clone().unwrap_or_else(|| m.as_str().to_owned()))
    }
}

/// Built-in keyword table: `(pattern, tag)`.
const DEFAULT_RULES: &[(&str, ThemeTag)] = &[
    (
        r"\b(?:sneak\w*|hid(?:e|es|ing)|creep\w*|shadows?|quiet(?:ly)?|stealth\w*|unseen)\b",
        ThemeTag::Stealth,
    ),
    (
        r"\b(?:spells?|cast(?:s|ing)?|arcane|runes?|enchant\w*|magic(?:al)?|ward)\b",
        ThemeTag::Magic,
    ),
    (
        r"\b(?:pray\w*|bless\w*|divine|holy|sacred|gods?|goddess)\b",
        ThemeTag::Blessing,
    ),
    (
        r"\b(?:attack\w*|strike\w*|swords?|blades?|fight\w*|parry|shield|axe|spear)\b",
        ThemeTag::Martial,
    ),
];

#[derive(Debug, Deserialize)]
struct TagRuleTable {
    #[serde(default)]
    rules: Vec<TagRuleSpec>,
    #[serde(default)]
    characters: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagRuleSpec {
    pattern: String,
    tag: ThemeTag,
}

/// An ordered table of tag rules.
#[derive(Debug, Clone)]
pub struct TagRuleSet {
    rules: Vec<TagRule>,
}

impl TagRuleSet {
    /// A table with no rules; narratives carry only the band sentence.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates a table from already compiled rules.
    #[must_use]
    pub fn from_rules(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }

    /// Loads a table from YAML:
    ///
    /// ```yaml
    /// rules:
    ///   - pattern: '\b(?:skulk|lurk)\b'
    ///     tag: stealth
    /// characters: [Mira, Bram]
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the YAML is malformed, names an
    /// unknown tag, or contains an invalid pattern.
    pub fn from_yaml(text: &str) -> Result<Self, DomainError> {
        let table: TagRuleTable = serde_yaml::from_str(text)
            .map_err(|e| DomainError::Validation(format!("invalid tag rule table: {e}")))?;
        let rules = table
            .rules
            .iter()
            .map(|spec| TagRule::new(&spec.pattern, spec.tag))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(rules).with_characters(&table.characters)
    }

    /// Adds a whole-word rule for each named character.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a name is blank.
    pub fn with_characters<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, DomainError> {
        for name in names {
            self.rules.push(TagRule::character(name.as_ref())?);
        }
        Ok(self)
    }

    /// Rules in table order.
    #[must_use]
    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    /// Finds the matched tags in `text`, at most one entry per tag, ordered by
    /// tag priority. For each tag the first matching rule in table order wins.
    #[must_use]
    pub fn matches(&self, text: &str) -> BTreeMap<ThemeTag, String> {
        let mut found = BTreeMap::new();
        for rule in &self.rules {
            let tag = rule.tag();
            if found.contains_key(&tag) {
                continue;
            }
            if let Some(subject) = rule.subject(text) {
                found.insert(tag, subject);
            }
        }
        found
    }
}

impl Default for TagRuleSet {
    fn default() -> Self {
        Self::from_rules(compile_builtin(DEFAULT_RULES))
    }
}

/// Compiles a built-in table. A pattern that fails to compile is logged and
/// skipped so the remaining rules stay usable.
fn compile_builtin(table: &[(&str, ThemeTag)]) -> Vec<TagRule> {
    table
        .iter()
        .filter_map(|(pattern, tag)| match TagRule::new(pattern, *tag) {
            Ok(rule) => Some(rule),
            Err(err) => {
                tracing::warn!(tag = tag.as_str(), error = %err, "built-in tag rule failed to compile");
                None
            }
        })
        .collect()
}

/// Builds the narrative for `band` given the raw intent text.
#[must_use]
pub fn assemble_narrative(band: OutcomeBand, intent_text: &str, rules: &TagRuleSet) -> String {
    let success = band.is_success();
    let mut narrative = band.base_sentence().to_owned();
    for (tag, subject) in rules.matches(intent_text) {
        narrative.push(' ');
        narrative.push_str(&tag.clause(&subject, success));
    }
    narrative
}
