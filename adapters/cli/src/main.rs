#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Rampart combat scenarios headlessly.

mod runner;
mod scenario;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Runs a tower-defense combat scenario without rendering and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "rampart", version)]
struct Cli {
    /// Scenario file to run. The built-in demo runs when omitted.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 12_000)]
    ticks: u64,

    /// Length of a frame in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 50)]
    dt_ms: u64,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    ensure!(cli.dt_ms > 0, "--dt-ms must be positive");

    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("could not load scenario {}", path.display()))?,
        None => Scenario::demo().context("built-in demo scenario is invalid")?,
    };
    tracing::info!(
        scenario = %scenario.name,
        towers = scenario.towers.len(),
        waves = scenario.waves.len(),
        "starting session"
    );

    let summary = runner::run(&scenario, cli.ticks, Duration::from_millis(cli.dt_ms));
    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        println!("{summary}");
    }
    Ok(())
}
