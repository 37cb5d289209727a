//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Marks an entity as a member of the general enemy set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Ticks until the next contact attack is allowed.
    pub attack_cooldown_ticks: u32,
    /// Ticks the enemy stays frozen after being hit.
    pub hit_stun_ticks: u32,
}

/// Hit points. `current` stays within `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

/// Collision box half extents, centered on the entity's `Position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub half_extents: DVec2,
}

/// Present once an enemy took lethal damage. Non-targetable, non-colliding,
/// still rendered until `remaining_ticks` runs out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dying {
    pub remaining_ticks: u32,
    pub killed_by: KillSource,
}

/// Marks an enemy as a member of the Bi hazard set (ranged sting shooter).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BiShooter {
    pub fire_cooldown_ticks: u32,
}

/// Experience pickup dropped by a kill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExperienceOrb {
    pub xp: u32,
    pub currency: u32,
}
