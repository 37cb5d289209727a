//! Game loop: drives the simulation engine at the fixed tick rate.
//!
//! The real-time loop owns the engine on its own thread. Commands arrive via
//! an `mpsc` channel; the latest snapshot is stored in shared state for
//! polling. `run_scripted` drives the same engine headless as fast as it
//! can, with an autopilot standing in for the players.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use gollux_core::commands::PlayerCommand;
use gollux_core::constants::TICK_RATE;
use gollux_core::state::{GameStateSnapshot, SessionSummary};
use gollux_sim::player::PlayerState;
use gollux_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// The autopilot re-steers this often.
const AUTOPILOT_STEER_TICKS: u64 = 30;

/// The autopilot tries its first skill slot this often.
const AUTOPILOT_SKILL_TICKS: u64 = 600;

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle yielding the session summary.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<Option<SessionSummary>>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("gollux-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the session ends, a Shutdown command arrives or
/// the channel disconnects.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> Option<SessionSummary> {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    return abort(&mut engine, latest_snapshot);
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        let finished = snapshot.phase.is_terminal();

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }
        if finished {
            info!(phase = ?engine.phase(), "game loop finished");
            return engine.summary().cloned();
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Quit an unfinished session so it still produces a summary.
fn abort(
    engine: &mut SimulationEngine,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> Option<SessionSummary> {
    if !engine.is_finished() {
        engine.queue_command(PlayerCommand::Quit);
        let snapshot = engine.tick();
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }
    }
    engine.summary().cloned()
}

/// Steering for every living player: a slow circle, offset per slot, plus a
/// periodic skill attempt.
pub fn autopilot_commands(tick: u64, players: &[PlayerState]) -> Vec<PlayerCommand> {
    let mut commands = Vec::new();
    for player in players.iter().filter(|p| p.is_alive()) {
        let angle = tick as f64 * 0.002 + player.slot.index() as f64 * std::f64::consts::PI;
        commands.push(PlayerCommand::Move {
            player: player.slot,
            x: angle.cos(),
            y: angle.sin(),
        });
        if tick > 0 && tick % AUTOPILOT_SKILL_TICKS == 0 {
            commands.push(PlayerCommand::ActivateSkill {
                player: player.slot,
                slot: 0,
            });
        }
    }
    commands
}

/// Run a whole session headless for at most `max_ticks` ticks. A session
/// still running at the limit is aborted.
pub fn run_scripted(engine: &mut SimulationEngine, max_ticks: u64) -> Option<SessionSummary> {
    engine.queue_command(PlayerCommand::StartSession);

    for tick in 0..max_ticks {
        if tick % AUTOPILOT_STEER_TICKS == 0 {
            let commands = autopilot_commands(tick, engine.players());
            engine.queue_commands(commands);
        }
        let snapshot = engine.tick();
        if tick % (TICK_RATE as u64 * 10) == 0 {
            debug!(
                tick,
                session_secs = snapshot.session_secs,
                enemies = snapshot.enemies.len(),
                "progress"
            );
        }
        if engine.is_finished() {
            break;
        }
    }

    if !engine.is_finished() {
        info!(max_ticks, "tick limit reached, aborting session");
        engine.queue_command(PlayerCommand::Quit);
        engine.tick();
    }
    engine.summary().cloned()
}
