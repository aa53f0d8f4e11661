#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs an eruption headlessly.

mod scenario;
mod script;
mod session;

use std::{
    env, io,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use eruption_engine::Engine;
use eruption_system_bootstrap::{Bootstrap, Difficulty};
use tracing_subscriber::EnvFilter;

use crate::{
    scenario::Scenario,
    script::{Script, ScriptedAction},
    session::{ReportFormat, Session},
};

/// Command-line arguments for the eruption simulator.
#[derive(Debug, Parser)]
#[command(name = "eruption", about = "Evacuate a village before the lava arrives")]
struct Cli {
    /// Difficulty preset: easy, normal, hard, or procedural.
    #[arg(long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,
    /// Seed for procedural maps. Defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML scenario with a custom map and budgets. Overrides --difficulty.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,
    /// Stop after this many ticks even if the run is unresolved.
    #[arg(long, default_value_t = 500)]
    max_ticks: u64,
    /// Player action applied before a tick, as <tick>:<barricade|open>:<x>,<y>.
    #[arg(long = "action", value_name = "ACTION")]
    actions: Vec<ScriptedAction>,
    /// Print the grid before and after the run.
    #[arg(long)]
    show_map: bool,
    /// Emit one JSON object per tick instead of text.
    #[arg(long)]
    json: bool,
}

/// Entry point for the eruption command-line interface.
fn main() -> Result<()> {
    let directives = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let bootstrap = Bootstrap;
    eprintln!("{}", bootstrap.welcome_banner());

    let seed = cli.seed.unwrap_or_else(time_seed);
    let mut actions = cli.actions;
    let config = match &cli.scenario {
        Some(path) => {
            let scenario = Scenario::load(path)?;
            actions.extend(scenario.actions()?);
            scenario.config()?
        }
        None => bootstrap
            .prepare(cli.difficulty, seed)
            .with_context(|| format!("failed to prepare {} run", cli.difficulty))?,
    };

    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };
    let mut session = Session::new(Engine::new(config), Script::new(actions), cli.max_ticks);
    let stdout = io::stdout();
    let summary = session.run(&mut stdout.lock(), format, cli.show_map)?;
    tracing::info!(
        outcome = ?summary.outcome,
        ticks = summary.ticks,
        saved = summary.saved,
        lost = summary.lost,
        "session complete"
    );
    Ok(())
}

/// Filter built from `RUST_LOG`-style directives, falling back to `info`
/// when they are absent, blank, or malformed.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
