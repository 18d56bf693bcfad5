//! Ports for the external collaborators a turn depends on.
//!
//! Parsing free text and generating candidate options are out of the core's
//! hands; these traits are the contract the core expects from them.

use arbiter_core::actor::Actor;
use arbiter_core::error::DomainError;
use async_trait::async_trait;

use crate::domain::intent::{OptionSet, ParsedIntent};

/// Turns raw player text into a [`ParsedIntent`].
#[async_trait]
pub trait ActionParser: Send + Sync {
    /// Parses `raw_text` submitted by `actor_id`.
    async fn parse(&self, actor_id: &Actor, raw_text: &str) -> Result<ParsedIntent, DomainError>;
}

/// Produces classified options for a parsed intent.
#[async_trait]
pub trait OptionGenerator: Send + Sync {
    /// Generates the options for `intent`.
    async fn generate(&self, intent: &ParsedIntent) -> Result<OptionSet, DomainError>;
}
