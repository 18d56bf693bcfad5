//! Local stand-ins for the action parser and option generator services.

use std::sync::Arc;

use arbiter_core::actor::Actor;
use arbiter_core::clock::Clock;
use arbiter_core::error::DomainError;
use arbiter_intent::domain::intent::{IntentOption, OptionSet, ParsedIntent};
use arbiter_intent::ports::{ActionParser, OptionGenerator};
use arbiter_rules::domain::difficulty::RiskKind;
use async_trait::async_trait;

/// Takes the typed line as the intent, stamped with the session clock.
pub struct LineActionParser {
    clock: Arc<dyn Clock>,
}

impl LineActionParser {
    /// Creates a parser stamping intents with `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ActionParser for LineActionParser {
    async fn parse(&self, actor_id: &Actor, raw_text: &str) -> Result<ParsedIntent, DomainError> {
        let raw_text = raw_text.trim();
        if raw_text.is_empty() {
            return Err(DomainError::Validation("intent text must not be blank".to_owned()));
        }
        Ok(ParsedIntent {
            actor_id: actor_id.clone(),
            raw_text: raw_text.to_owned(),
            timestamp: self.clock.now(),
        })
    }
}

/// Keyword table checked in order; the first kind with a matching word wins.
const KEYWORDS: &[(&str, &[&str])] = &[
    (
        "contested",
        &[
            "attack", "fight", "wrestle", "grab", "steal", "persuade", "intimidate", "duel",
            "grapple", "shove", "chase",
        ],
    ),
    (
        "environmental",
        &[
            "climb", "jump", "leap", "swim", "cross", "wade", "storm", "fire", "cliff",
            "river", "ice",
        ],
    ),
    (
        "risky",
        &[
            "sneak", "pick", "cast", "lie", "bluff", "hide", "disarm", "pray", "search",
            "forge",
        ],
    ),
];

/// Classifies intents by keyword.
///
/// The first option is the bold attempt at the classified risk. Anything
/// riskier than `safe` also gets a cautious `safe` alternative.
#[derive(Debug, Default)]
pub struct KeywordOptionGenerator;

impl KeywordOptionGenerator {
    fn classify(text: &str) -> RiskKind {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        KEYWORDS
            .iter()
            .find(|(_, keys)| {
                words
                    .iter()
                    .any(|word| keys.iter().any(|key| word.starts_with(key)))
            })
            .map_or(RiskKind::Safe, |(kind, _)| RiskKind::parse(kind))
    }
}

#[async_trait]
impl OptionGenerator for KeywordOptionGenerator {
    async fn generate(&self, intent: &ParsedIntent) -> Result<OptionSet, DomainError> {
        let kind = Self::classify(&intent.raw_text);
        let mut options = vec![IntentOption {
            id: "bold".to_owned(),
            kind: kind.clone(),
            description: intent.raw_text.clone(),
        }];
        if kind != RiskKind::Safe {
            options.push(IntentOption {
                id: "careful".to_owned(),
                kind: RiskKind::Safe,
                description: format!("{}, slowly and carefully", intent.raw_text),
            });
        }
        Ok(OptionSet { options })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_test_support::FixedClock;
    use chrono::{TimeZone, Utc};

    fn parser() -> LineActionParser {
        LineActionParser::new(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        )))
    }

    #[tokio::test]
    async fn test_parser_trims_and_stamps() {
        let parsed = parser()
            .parse(&Actor::human("Mira"), "  I open the door \n")
            .await
            .unwrap();

        assert_eq!(parsed.raw_text, "I open the door");
        assert_eq!(parsed.timestamp, Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_parser_rejects_blank_text() {
        let result = parser().parse(&Actor::human("Mira"), "   ").await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_classify_picks_first_matching_kind() {
        assert_eq!(
            KeywordOptionGenerator::classify("I attack the guard"),
            RiskKind::Contested
        );
        assert_eq!(
            KeywordOptionGenerator::classify("I climb while sneaking"),
            RiskKind::Environmental
        );
        assert_eq!(
            KeywordOptionGenerator::classify("I pick the lock"),
            RiskKind::Risky
        );
        assert_eq!(
            KeywordOptionGenerator::classify("I open the door"),
            RiskKind::Safe
        );
    }

    #[tokio::test]
    async fn test_risky_intent_offers_careful_alternative() {
        let intent = parser()
            .parse(&Actor::human("Mira"), "I sneak past")
            .await
            .unwrap();

        let options = KeywordOptionGenerator.generate(&intent).await.unwrap().options;

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].id, "bold");
        assert_eq!(options[0].kind, RiskKind::Risky);
        assert_eq!(options[1].kind, RiskKind::Safe);
    }
}
