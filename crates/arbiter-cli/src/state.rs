//! Shared application state.

use std::sync::{Arc, Mutex};

use arbiter_core::clock::Clock;
use arbiter_core::id::IdGenerator;
use arbiter_core::rng::DeterministicRng;
use arbiter_rules::domain::narrative::TagRuleSet;

/// Collaborators shared by every table operation.
#[derive(Clone)]
pub struct AppState {
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock>,
    /// RNG for system rolls.
    pub rng: Arc<Mutex<dyn DeterministicRng>>,
    /// Generator for event, proposal and intent ids.
    pub ids: Arc<dyn IdGenerator>,
    /// Thematic tag rules for narratives.
    pub rules: Arc<TagRuleSet>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng>>,
        ids: Arc<dyn IdGenerator>,
        rules: Arc<TagRuleSet>,
    ) -> Self {
        Self {
            clock,
            rng,
            ids,
            rules,
        }
    }
}
