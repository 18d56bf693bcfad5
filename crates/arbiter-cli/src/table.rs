//! One table session: reads lines, drives the ledger and the latch.

use arbiter_core::actor::Actor;
use arbiter_core::error::DomainError;
use arbiter_intent::application::command_handlers::{
    handle_abort_intent, handle_commit_outcome, handle_resolve_option, handle_submit_intent,
};
use arbiter_intent::application::query_handlers::latch_view;
use arbiter_intent::domain::commands::{AbortIntent, CommitOutcome, ResolveOption, SubmitIntent};
use arbiter_intent::domain::latch::IntentLatch;
use arbiter_ledger::application::command_handlers::{
    handle_confirm_change, handle_end_session, handle_propose_change, handle_raise_flag,
    handle_set_scene,
};
use arbiter_ledger::application::query_handlers::session_view;
use arbiter_ledger::domain::canon::export_canon;
use arbiter_ledger::domain::commands::{ConfirmChange, EndSession, ProposeChange, RaiseFlag, SetScene};
use arbiter_ledger::domain::session::SessionState;
use arbiter_rules::domain::dice::{DieMode, parse_manual_roll};
use arbiter_rules::domain::resolution::ResolutionReport;
use tracing::instrument;
use uuid::Uuid;

use crate::collaborators::{KeywordOptionGenerator, LineActionParser};
use crate::config::Config;
use crate::state::AppState;

/// The option the table always plays.
const PLAYED_OPTION: &str = "bold";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLine {
    /// A player intent.
    Intent(String),
    /// `/scene <id>`
    Scene(String),
    /// `/propose <text>`
    Propose(String),
    /// `/confirm`
    Confirm,
    /// `/flag <name>`
    Flag(String),
    /// `/roll <n>`: manual roll for the next intent.
    Roll(i64),
    /// `/status`
    Status,
    /// `/end`
    End,
}

impl TableLine {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an unknown command, a command
    /// missing its argument, or an invalid roll.
    pub fn parse(line: &str) -> Result<Option<Self>, DomainError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(Some(Self::Intent(line.to_owned())));
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));
        let required = |what: &str| {
            if arg.is_empty() {
                Err(DomainError::Validation(format!("/{name} needs {what}")))
            } else {
                Ok(arg.to_owned())
            }
        };

        let parsed = match name {
            "scene" => Self::Scene(required("a scene id")?),
            "propose" => Self::Propose(required("a description")?),
            "confirm" => Self::Confirm,
            "flag" => Self::Flag(required("a flag name")?),
            "roll" => Self::Roll(parse_manual_roll(&required("a number")?)?),
            "status" => Self::Status,
            "end" => Self::End,
            other => {
                return Err(DomainError::Validation(format!("unknown command /{other}")));
            }
        };
        Ok(Some(parsed))
    }
}

/// A running table session.
pub struct Table {
    state: AppState,
    arbiter: Actor,
    player: Actor,
    die: DieMode,
    drafter: String,
    parser: LineActionParser,
    generator: KeywordOptionGenerator,
    session: SessionState,
    latch: IntentLatch,
    next_roll: Option<i64>,
}

impl Table {
    /// Opens a new session.
    #[must_use]
    pub fn new(config: &Config, state: AppState) -> Self {
        let session = SessionState::create(config.session_id.clone(), state.clock.as_ref());
        tracing::info!(session_id = %config.session_id, arbiter = %config.arbiter_name, "session opened");
        Self {
            parser: LineActionParser::new(state.clock.clone()),
            generator: KeywordOptionGenerator,
            arbiter: Actor::human(config.arbiter_name.clone()),
            player: Actor::human(config.player_name.clone()),
            die: config.die,
            drafter: config.drafter.clone(),
            session,
            latch: IntentLatch::new(),
            next_roll: None,
            state,
        }
    }

    /// The current ledger snapshot.
    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Handles one input line and returns what to print, if anything.
    ///
    /// # Errors
    ///
    /// Returns the `DomainError` of the rejected operation. The session and
    /// the latch are unchanged on error.
    #[instrument(skip(self), fields(session_id = %self.session.session_id()))]
    pub async fn handle_line(&mut self, line: &str) -> Result<Option<String>, DomainError> {
        let Some(parsed) = TableLine::parse(line)? else {
            return Ok(None);
        };

        let output = match parsed {
            TableLine::Intent(text) => self.play_intent(&text).await?,
            TableLine::Scene(scene_id) => self.set_scene(&scene_id)?,
            TableLine::Propose(description) => self.propose(&description)?,
            TableLine::Confirm => self.confirm_oldest()?,
            TableLine::Flag(flag) => self.raise_flag(&flag)?,
            TableLine::Roll(roll) => {
                self.next_roll = Some(roll);
                format!("next roll: {roll}")
            }
            TableLine::Status => self.status(),
            TableLine::End => {
                self.end()?;
                "session ended".to_owned()
            }
        };
        Ok(Some(output))
    }

    /// Ends the session (if still open) and returns the canon export.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if the configured Arbiter is not a
    /// human actor.
    pub fn finish(&mut self) -> Result<String, DomainError> {
        self.end()?;
        Ok(export_canon(self.session.events()))
    }

    async fn play_intent(&mut self, text: &str) -> Result<String, DomainError> {
        if self.session.is_ended() {
            return Err(DomainError::Validation("session has ended".to_owned()));
        }

        let submitted = handle_submit_intent(
            &SubmitIntent {
                correlation_id: Uuid::new_v4(),
                actor: self.player.clone(),
                raw_text: text.to_owned(),
            },
            &mut self.latch,
            &self.parser,
            &self.generator,
            self.state.clock.as_ref(),
            self.state.ids.as_ref(),
        )
        .await?;
        let intent_id = submitted.intent_id;

        let outcome = handle_resolve_option(
            &ResolveOption {
                correlation_id: Uuid::new_v4(),
                intent_id,
                option_id: PLAYED_OPTION.to_owned(),
                die: self.die,
                manual_roll: self.next_roll.take(),
            },
            &self.latch,
            self.state.rng.as_ref(),
            &self.state.rules,
            &self.drafter,
        )
        .and_then(|report| {
            let summary = summarize(&report);
            let committed = handle_commit_outcome(
                &CommitOutcome {
                    correlation_id: Uuid::new_v4(),
                    intent_id,
                    report,
                    arbiter: self.arbiter.clone(),
                },
                &self.session,
                &mut self.latch,
                self.state.clock.as_ref(),
                self.state.ids.as_ref(),
            )?;
            self.session = committed.state;
            Ok(summary)
        });

        if outcome.is_err() {
            handle_abort_intent(
                &AbortIntent {
                    correlation_id: Uuid::new_v4(),
                    intent_id,
                },
                &mut self.latch,
            )?;
        }
        outcome
    }

    fn set_scene(&mut self, scene_id: &str) -> Result<String, DomainError> {
        let result = handle_set_scene(
            &SetScene {
                correlation_id: Uuid::new_v4(),
                scene_id: scene_id.to_owned(),
                confirmed_by: self.arbiter.clone(),
            },
            &self.session,
            self.state.clock.as_ref(),
            self.state.ids.as_ref(),
        )?;
        self.session = result.state;
        Ok(format!("scene: {scene_id}"))
    }

    fn propose(&mut self, description: &str) -> Result<String, DomainError> {
        let result = handle_propose_change(
            &ProposeChange {
                correlation_id: Uuid::new_v4(),
                description: description.to_owned(),
                proposed_by: Actor::System,
            },
            &self.session,
            self.state.clock.as_ref(),
            self.state.ids.as_ref(),
        )?;
        self.session = result.state;
        Ok(format!("proposed {}: {description}", result.change_id))
    }

    fn confirm_oldest(&mut self) -> Result<String, DomainError> {
        let oldest = self
            .session
            .pending()
            .first()
            .ok_or_else(|| DomainError::NotFound("no pending change to confirm".to_owned()))?;
        let change_id = oldest.id;
        let description = oldest.description.clone();

        let result = handle_confirm_change(
            &ConfirmChange {
                correlation_id: Uuid::new_v4(),
                change_id,
                confirmed_by: self.arbiter.clone(),
            },
            &self.session,
            self.state.clock.as_ref(),
            self.state.ids.as_ref(),
        )?;
        self.session = result.state;
        Ok(format!("confirmed: {description}"))
    }

    fn raise_flag(&mut self, flag: &str) -> Result<String, DomainError> {
        let result = handle_raise_flag(
            &RaiseFlag {
                correlation_id: Uuid::new_v4(),
                flag: flag.to_owned(),
                raised_by: self.arbiter.clone(),
            },
            &self.session,
            self.state.clock.as_ref(),
            self.state.ids.as_ref(),
        )?;
        self.session = result.state;
        Ok(format!("flag raised: {flag}"))
    }

    fn end(&mut self) -> Result<(), DomainError> {
        let result = handle_end_session(
            &EndSession {
                correlation_id: Uuid::new_v4(),
                confirmed_by: self.arbiter.clone(),
            },
            &self.session,
            self.state.clock.as_ref(),
            self.state.ids.as_ref(),
        )?;
        self.session = result.state;
        Ok(())
    }

    fn status(&self) -> String {
        let status = serde_json::json!({
            "session": session_view(&self.session),
            "latch": latch_view(&self.latch),
        });
        status.to_string()
    }
}

fn summarize(report: &ResolutionReport) -> String {
    let dice = &report.dice_outcome;
    format!(
        "[{}] rolled {} on {} vs DC {}. {}",
        report.band, dice.roll, dice.mode, dice.difficulty_class, report.narrative
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_an_intent() {
        assert_eq!(
            TableLine::parse("  I open the door ").unwrap(),
            Some(TableLine::Intent("I open the door".to_owned()))
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(TableLine::parse("   ").unwrap(), None);
        assert_eq!(TableLine::parse("# scene two").unwrap(), None);
    }

    #[test]
    fn test_commands_take_their_argument() {
        assert_eq!(
            TableLine::parse("/scene  the docks").unwrap(),
            Some(TableLine::Scene("the docks".to_owned()))
        );
        assert_eq!(TableLine::parse("/confirm").unwrap(), Some(TableLine::Confirm));
        assert_eq!(TableLine::parse("/roll 17").unwrap(), Some(TableLine::Roll(17)));
    }

    #[test]
    fn test_invalid_commands_are_rejected() {
        for line in ["/scene", "/roll soon", "/roll 0", "/dance"] {
            assert!(
                matches!(TableLine::parse(line), Err(DomainError::Validation(_))),
                "{line} should be rejected"
            );
        }
    }
}
