//! The boss: a singleton enemy with a one-way defeat flag.

use glam::DVec2;

use gollux_core::constants::*;
use gollux_core::state::BossView;
use gollux_core::types::{Aabb, Position};

#[derive(Debug, Clone)]
pub struct Boss {
    pub position: DVec2,
    pub half_extents: DVec2,
    pub health: i32,
    pub max_health: i32,
    pub enraged: bool,
    pub attack_cooldown_ticks: u32,
    is_defeated: bool,
}

impl Boss {
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            half_extents: DVec2::splat(BOSS_HALF_SIZE),
            health: BOSS_MAX_HEALTH,
            max_health: BOSS_MAX_HEALTH,
            enraged: false,
            attack_cooldown_ticks: 0,
            is_defeated: false,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.is_defeated
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Apply damage. Returns true only on the hit that defeats the boss;
    /// hits after defeat are ignored.
    pub fn take_hit(&mut self, damage: i32) -> bool {
        if self.is_defeated {
            return false;
        }
        self.health = (self.health - damage.max(0)).max(0);
        if self.health == 0 {
            self.is_defeated = true;
            return true;
        }
        false
    }

    pub fn view(&self) -> BossView {
        BossView {
            position: Position(self.position),
            health: self.health,
            max_health: self.max_health,
            defeated: self.is_defeated,
            enraged: self.enraged,
        }
    }
}
