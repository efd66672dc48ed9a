//! Tracker command-line entry point.
//!
//! Loads content from the data directory, scans a directory of JSON documents
//! and prints what the indices hold. Any arguments are oracle ids to roll.
//!
//! ```bash
//! TRACKER_DATA_DIR=./data cargo run -p tracker-cli -- oracle:action
//! ```
mod config;

use std::sync::Arc;

use anyhow::Result;
use config::CliConfig;
use rules_content::ContentFactory;
use rules_core::{Lens, rollables};
use tracker_runtime::{JsonDirectoryStore, Session, ThreadRandom};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Documents directory: {}", config.documents_dir.display());

    let session = build_session(&config).await?;
    print_session(&session);

    let mut rng = ThreadRandom::thread();
    for oracle in std::env::args().skip(1) {
        match session.roll_oracle(&oracle, &mut rng) {
            Ok(roll) => {
                let result = roll.row.map(|row| row.result).unwrap_or_else(|| "-".into());
                println!("{oracle}: {} → {result}", roll.roll);
            }
            Err(e) => eprintln!("{oracle}: {e}"),
        }
    }

    Ok(())
}

async fn build_session(config: &CliConfig) -> Result<Session> {
    let factory = ContentFactory::new(&config.data_dir);

    let mut tracker_config = factory.load_config()?;
    if let Some(policy) = config.write_policy {
        tracker_config.write_policy = policy;
    }
    let ruleset = factory.load_ruleset(&config.ruleset)?;
    let data = factory.load_data_index()?;
    tracing::info!(
        "Loaded ruleset {} with {} stats and {} condition meters",
        ruleset.id(),
        ruleset.stats().len(),
        ruleset.condition_meters().len()
    );

    let store = JsonDirectoryStore::new(&config.documents_dir)?;
    let mut session = Session::new(Arc::new(ruleset), data, tracker_config);
    session.scan(&store).await?;
    Ok(session)
}

fn print_session(session: &Session) {
    let summary = session.summary();
    println!(
        "{} characters, {} progress tracks, {} clocks",
        summary.characters, summary.progress_tracks, summary.clocks
    );
    println!(
        "{} assets, {} moves, {} oracles",
        summary.assets, summary.moves, summary.oracles
    );

    for (id, context) in session.characters().entries().iter() {
        let lens = &context.lens;
        let character = &context.character;
        let stats = rollables(lens, character)
            .iter()
            .map(|r| format!("{} {}", r.key, r.value))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "[character] {id}: {} (momentum {}/{}) {stats}",
            lens.name.get(character),
            lens.momentum.get(character),
            lens.momentum_ops().ceiling(character),
        );
    }

    for (id, document) in session.progress_tracks().entries().iter() {
        let track = document.track();
        println!(
            "[progress] {id}: {} ({}, {}/10 boxes)",
            document.name(),
            track.rank(),
            track.boxes_filled()
        );
    }

    for (id, document) in session.clocks().entries().iter() {
        let clock = document.clock();
        println!(
            "[clock] {id}: {}/{}{}",
            clock.filled(),
            clock.segments(),
            if clock.active() { "" } else { " (inactive)" }
        );
    }
}
