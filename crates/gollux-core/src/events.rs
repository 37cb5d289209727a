//! Events emitted by the simulation for audio and UI feedback.
//!
//! Fire-and-forget: the simulation never reads a reply.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::PlayerSlot;

/// Audio cues for the frontend sound system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A projectile or skill damaged an enemy or the boss.
    EnemyHit,
    /// A partner fired a projectile.
    PartnerShot { player: PlayerSlot },
    LevelUp { player: PlayerSlot, level: u32 },
    PlayerDeath { player: PlayerSlot },
    Purchase { player: PlayerSlot, item: ShopItem },
    SkillActivated { player: PlayerSlot, skill: SkillKind },
    BossWarning,
    BossDefeated,
    DevilArrived,
}
