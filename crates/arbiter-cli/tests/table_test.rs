//! Table session tests driving `Table` line by line.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arbiter_cli::config::Config;
use arbiter_cli::state::AppState;
use arbiter_cli::table::Table;
use arbiter_core::error::DomainError;
use arbiter_ledger::domain::events::EventType;
use arbiter_test_support::{SequenceRng, SequentialIds, SteppingClock};
use chrono::{Duration, TimeZone, Utc};

fn build_table(vars: &[(&str, &str)], rolls: Vec<u32>) -> Table {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let rules = config.load_rules().unwrap();
    let state = AppState::new(
        Arc::new(SteppingClock::new(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            Duration::seconds(1),
        )),
        Arc::new(Mutex::new(SequenceRng::new(rolls))),
        Arc::new(SequentialIds::new()),
        Arc::new(rules),
    );
    Table::new(&config, state)
}

async fn say(table: &mut Table, line: &str) -> String {
    table.handle_line(line).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_scripted_session_produces_canon() {
    // Arrange
    let mut table = build_table(&[], vec![7]);

    // Act
    assert_eq!(say(&mut table, "/scene docks").await, "scene: docks");
    assert!(
        say(&mut table, "/propose the tide turns")
            .await
            .ends_with(": the tide turns")
    );
    assert_eq!(say(&mut table, "/confirm").await, "confirmed: the tide turns");
    say(&mut table, "/roll 20").await;
    let first = say(&mut table, "I attack the smuggler").await;
    let second = say(&mut table, "I open the crate").await;
    let canon = table.finish().unwrap();

    // Assert
    assert_eq!(
        first,
        "[Extreme Success] rolled 20 on d20 vs DC 14. \
         It goes better than anyone dared hope. Your training carries the blow home."
    );
    assert_eq!(
        second,
        "[Narrow Success] rolled 7 on d20 vs DC 6. It works, but only just."
    );
    assert_eq!(
        canon,
        "It goes better than anyone dared hope. Your training carries the blow home.\n\
         It works, but only just."
    );
    let types: Vec<EventType> = table.session().events().iter().map(|e| e.event_type()).collect();
    assert_eq!(
        types,
        vec![
            EventType::SetScene,
            EventType::ConfirmedChange,
            EventType::Outcome,
            EventType::Outcome,
            EventType::EndSession,
        ]
    );
}

#[tokio::test]
async fn test_event_timestamps_follow_ledger_order() {
    let mut table = build_table(&[], vec![10, 10]);

    say(&mut table, "I open the door").await;
    say(&mut table, "I close the door").await;
    table.finish().unwrap();

    let events = table.session().events();
    assert!(events.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp));
}

#[tokio::test]
async fn test_confirm_with_nothing_pending_is_not_found() {
    let mut table = build_table(&[], vec![]);

    let result = table.handle_line("/confirm").await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
    assert!(table.session().events().is_empty());
}

#[tokio::test]
async fn test_roll_off_the_die_releases_the_latch() {
    let mut table = build_table(&[("ARBITER_DIE", "d6")], vec![3]);
    say(&mut table, "/roll 9").await;

    let rejected = table.handle_line("I open the door").await;
    let accepted = say(&mut table, "I open the door").await;

    assert!(matches!(rejected, Err(DomainError::Validation(_))));
    assert_eq!(
        accepted,
        "[Hard Failure] rolled 3 on d6 vs DC 6. It fails, and the situation turns against you."
    );
}

#[tokio::test]
async fn test_intents_after_end_are_rejected() {
    let mut table = build_table(&[], vec![]);
    assert_eq!(say(&mut table, "/end").await, "session ended");

    let result = table.handle_line("I run for the boats").await;
    let status: serde_json::Value = serde_json::from_str(&say(&mut table, "/status").await).unwrap();

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(status["latch"]["state"], "idle");
    assert!(!status["session"]["ended_at"].is_null());
    assert_eq!(table.finish().unwrap(), "");
}

#[tokio::test]
async fn test_known_characters_are_woven_into_narrative() {
    let mut table = build_table(&[("ARBITER_CHARACTERS", "Bram")], vec![]);
    say(&mut table, "/roll 10").await;

    let line = say(&mut table, "I hand Bram the lantern").await;

    assert_eq!(
        line,
        "[Strong Success] rolled 10 on d20 vs DC 6. \
         It works, cleanly and convincingly. Bram sees it all unfold."
    );
}
