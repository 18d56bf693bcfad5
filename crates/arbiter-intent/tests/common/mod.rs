//! Shared test helpers for Intent Latch integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use arbiter_core::actor::Actor;
use arbiter_core::clock::Clock;
use arbiter_core::error::DomainError;
use arbiter_core::rng::DeterministicRng;
use arbiter_intent::domain::intent::{IntentOption, OptionSet, ParsedIntent};
use arbiter_intent::ports::{ActionParser, OptionGenerator};
use arbiter_rules::domain::difficulty::RiskKind;
use arbiter_test_support::{FixedClock, SequenceRng};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
}

/// A `Mutex`-guarded RNG that yields `rolls` in order.
pub fn rolls(values: Vec<u32>) -> Mutex<SequenceRng> {
    Mutex::new(SequenceRng::new(values))
}

/// Returns the text unchanged, stamped with the fixed clock.
pub struct StubActionParser;

#[async_trait]
impl ActionParser for StubActionParser {
    async fn parse(&self, actor_id: &Actor, raw_text: &str) -> Result<ParsedIntent, DomainError> {
        Ok(ParsedIntent {
            actor_id: actor_id.clone(),
            raw_text: raw_text.to_owned(),
            timestamp: fixed_clock().now(),
        })
    }
}

/// Offers one option per configured risk kind, ids `opt-1`, `opt-2`, ...
pub struct StubOptionGenerator {
    kinds: Vec<RiskKind>,
}

impl StubOptionGenerator {
    pub fn new(kinds: Vec<RiskKind>) -> Self {
        Self { kinds }
    }

    pub fn single(kind: RiskKind) -> Self {
        Self::new(vec![kind])
    }
}

#[async_trait]
impl OptionGenerator for StubOptionGenerator {
    async fn generate(&self, intent: &ParsedIntent) -> Result<OptionSet, DomainError> {
        let options = self
            .kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| IntentOption {
                id: format!("opt-{}", i + 1),
                kind: kind.clone(),
                description: format!("{} ({kind})", intent.raw_text),
            })
            .collect();
        Ok(OptionSet { options })
    }
}

/// Always fails, as an unreachable generator service would.
pub struct FailingOptionGenerator;

#[async_trait]
impl OptionGenerator for FailingOptionGenerator {
    async fn generate(&self, _intent: &ParsedIntent) -> Result<OptionSet, DomainError> {
        Err(DomainError::Infrastructure(
            "option generator unavailable".to_owned(),
        ))
    }
}

/// Upcasts a concrete RNG mutex for the handler signature.
pub fn as_dyn(rng: &Mutex<SequenceRng>) -> &Mutex<dyn DeterministicRng> {
    rng
}
