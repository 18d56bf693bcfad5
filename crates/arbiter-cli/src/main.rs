//! Arbiter table session entry point.

use std::sync::{Arc, Mutex};

use arbiter_cli::config::Config;
use arbiter_cli::error::{AppError, ErrorBody};
use arbiter_cli::state::AppState;
use arbiter_cli::table::Table;
use arbiter_core::clock::SystemClock;
use arbiter_core::id::TimeOrderedIds;
use arbiter_core::rng::StdRngSource;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Logs go to stderr; stdout carries the table output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Arbiter table session");

    let config = Config::from_env()?;
    let rules = config.load_rules()?;
    let rng = match config.seed {
        Some(seed) => StdRngSource::seeded(seed),
        None => StdRngSource::from_os(),
    };
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(Mutex::new(rng)),
        Arc::new(TimeOrderedIds),
        Arc::new(rules),
    );
    let mut table = Table::new(&config, app_state);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match table.handle_line(&line).await {
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => {}
            Err(err) => eprintln!("{}", serde_json::to_string(&ErrorBody::from(&err))?),
        }
    }

    let canon = table.finish()?;
    tracing::info!(
        session_id = %table.session().session_id(),
        events = table.session().events().len(),
        "session closed"
    );
    println!("--- canon ---");
    println!("{canon}");

    Ok(())
}
