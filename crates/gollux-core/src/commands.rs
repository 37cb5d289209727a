//! Player commands sent from the input layer to the simulation.
//!
//! Commands are discrete intents, queued and processed at the next tick boundary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::error::SimError;
use crate::types::PlayerSlot;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session control ---
    /// Spawn the players and start ticking.
    StartSession,
    /// Toggle the pause menu.
    TogglePause,
    /// Toggle the admin console.
    ToggleConsole,
    /// Open the admin console. No-op when it is already open.
    OpenConsole,
    /// Close the admin console. No-op when it is not open.
    CloseConsole,
    /// Abort the session (also cancels score/victory transitions).
    Quit,

    // --- Per-player intents ---
    /// Set the held movement direction. Components are clamped to [-1, 1].
    Move { player: PlayerSlot, x: f64, y: f64 },
    /// Try to activate the skill in a skill-bar slot.
    ActivateSkill { player: PlayerSlot, slot: usize },
    /// Open the devil shop when standing inside its radius.
    Interact { player: PlayerSlot },

    // --- Shop ---
    Purchase { item: ShopItem },
    CloseShop,

    // --- Admin console ---
    /// Only honored while the console is open.
    Cheat { cheat: CheatCommand },
}

/// Admin side channel. Mutates core state directly and is allowed to break
/// the usual invariants (health caps, session time, spawn gating).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheatCommand {
    /// Add a large amount of currency to every player.
    AddMoney,
    /// Raise max health and health of every player far above normal.
    Armor,
    /// Undo `Armor`, restoring the values saved when it was applied.
    RestoreArmor,
    /// Jump the session clock forward.
    TimeSkip,
    /// Summon the devil now (if absent).
    SpawnDevil,
    /// Set the damage of every live projectile very high.
    HighDamage,
    /// Summon the boss now (if not spawned yet).
    SpawnBoss,
    /// Give each player a random, distinct new skill.
    NewSkills,
}

impl FromStr for CheatCommand {
    type Err = SimError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "money" => Ok(CheatCommand::AddMoney),
            "armor" => Ok(CheatCommand::Armor),
            "unarmor" => Ok(CheatCommand::RestoreArmor),
            "timeskip" => Ok(CheatCommand::TimeSkip),
            "devil" => Ok(CheatCommand::SpawnDevil),
            "highdamage" => Ok(CheatCommand::HighDamage),
            "boss" => Ok(CheatCommand::SpawnBoss),
            "newskills" => Ok(CheatCommand::NewSkills),
            other => Err(SimError::UnknownCheat(other.to_string())),
        }
    }
}
