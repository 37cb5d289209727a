//! Line-based command input for the real-time runner.
//!
//! Each non-empty line is either a JSON `PlayerCommand`
//! (`{"type":"Move","player":"One","x":1.0,"y":0.0}`) or a console line
//! starting with `/` (`/money`, `/boss`). Console lines open the console if
//! needed, run the cheat and leave the console closed.

use std::io::BufRead;

use anyhow::{Context, Result};
use tracing::warn;

use gollux_core::commands::{CheatCommand, PlayerCommand};

use crate::state::AppState;

/// Parse one input line into the commands it stands for.
pub fn parse_line(line: &str) -> Result<Vec<PlayerCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(cheat) = line.strip_prefix('/') {
        let cheat: CheatCommand = cheat.parse()?;
        return Ok(vec![
            PlayerCommand::OpenConsole,
            PlayerCommand::Cheat { cheat },
            PlayerCommand::CloseConsole,
        ]);
    }
    let command = serde_json::from_str(line).with_context(|| format!("bad command: {line}"))?;
    Ok(vec![command])
}

/// Forward commands read from `input` until it ends, the loop stops
/// accepting commands, or the session finishes.
pub fn pump_commands(input: impl BufRead, state: &AppState) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read command input")?;
        match parse_line(&line) {
            Ok(commands) => {
                for command in commands {
                    if state.send(command).is_err() {
                        return Ok(());
                    }
                }
            }
            Err(error) => warn!(%error, "ignoring input line"),
        }
        if state.session_finished() {
            break;
        }
    }
    Ok(())
}
