use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gollux_cli::state::AppState;
use gollux_cli::{game_loop, ipc};
use gollux_core::commands::PlayerCommand;
use gollux_core::config::{MapLayout, SessionConfig};
use gollux_core::enums::GameMode;
use gollux_core::state::SessionSummary;
use gollux_sim::SimulationEngine;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Solo,
    Coop,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Solo => GameMode::Solo,
            ModeArg::Coop => GameMode::Coop,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gollux")]
#[command(about = "Run a GOLLUX session headless and print its summary as JSON")]
struct Cli {
    /// Session mode. Uses the built-in preset for that mode.
    #[arg(long, value_enum, conflicts_with = "config")]
    mode: Option<ModeArg>,

    /// Session config JSON. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Map layout JSON (size and obstacles).
    #[arg(long)]
    map: Option<PathBuf>,

    /// RNG seed, overriding the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Tick limit for scripted runs (default: 10 minutes at 60 Hz).
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,

    /// Run in real time, reading commands from stdin, one per line.
    #[arg(long)]
    realtime: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let config = load_config(&cli)?;
    let map = load_map(cli.map.as_deref())?;
    info!(mode = ?config.mode, seed = config.seed, realtime = cli.realtime, "starting gollux");
    let mut engine = SimulationEngine::new(config, map).context("invalid session setup")?;

    let summary = if cli.realtime {
        run_realtime(engine)?
    } else {
        game_loop::run_scripted(&mut engine, cli.ticks)
    };

    match summary {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => warn!("session ended without a summary"),
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the summary.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SessionConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SessionConfig::for_mode(cli.mode.map(GameMode::from).unwrap_or_default()),
    };
    Ok(match cli.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn load_map(path: Option<&Path>) -> Result<MapLayout> {
    let Some(path) = path else {
        return Ok(MapLayout::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    MapLayout::from_json(&json).with_context(|| format!("invalid map {}", path.display()))
}

fn run_realtime(engine: SimulationEngine) -> Result<Option<SessionSummary>> {
    let state = AppState::new();
    let handle = state.start(engine)?;
    state.send(PlayerCommand::StartSession)?;

    let pumped = ipc::pump_commands(std::io::stdin().lock(), &state);
    state.shutdown();
    let summary = handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))?;
    pumped?;
    Ok(summary)
}
