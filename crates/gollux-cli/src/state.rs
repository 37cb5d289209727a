//! Runner state shared between the input pump and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Result};

use gollux_core::commands::PlayerCommand;
use gollux_core::state::{GameStateSnapshot, SessionSummary};
use gollux_sim::SimulationEngine;

use crate::game_loop;

/// Commands sent from the input layer to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Stop the loop. An unfinished session is aborted first.
    Shutdown,
}

/// Shared runner state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` covers state that does not exist before `start`
/// - `Arc<Mutex<...>>` holds the latest snapshot, shared with the loop thread
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    /// `None` before `start` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    /// Whether the game loop is currently running.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop thread for `engine`. Fails if one is already running.
    pub fn start(&self, engine: SimulationEngine) -> Result<JoinHandle<Option<SessionSummary>>> {
        let mut running = self.running.lock().map_err(|e| anyhow!(e.to_string()))?;
        if *running {
            bail!("simulation already running");
        }

        let (cmd_tx, handle) = game_loop::spawn_game_loop(engine, self.latest_snapshot.clone())?;

        let mut tx_lock = self.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        *tx_lock = Some(cmd_tx);
        *running = true;
        Ok(handle)
    }

    /// Forward a player command to the simulation.
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.send_loop_command(GameLoopCommand::PlayerCommand(command))
    }

    /// Ask the loop to stop. Sending to a loop that already exited is not an error.
    pub fn shutdown(&self) {
        let _ = self.send_loop_command(GameLoopCommand::Shutdown);
        if let Ok(mut running) = self.running.lock() {
            *running = false;
        }
    }

    fn send_loop_command(&self, command: GameLoopCommand) -> Result<()> {
        let tx_lock = self.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(command)
                .map_err(|e| anyhow!("failed to send command: {e}")),
            None => bail!("simulation not started"),
        }
    }

    /// Latest snapshot, if the loop has ticked at least once.
    pub fn latest(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Whether the latest snapshot shows a finished session.
    pub fn session_finished(&self) -> bool {
        self.latest_snapshot
            .lock()
            .map(|lock| lock.as_ref().is_some_and(|s| s.phase.is_terminal()))
            .unwrap_or(false)
    }
}
