//! Player contexts and their partner companions.
//!
//! Players live outside the ECS world: there are at most two of them and
//! almost every system needs them by slot.

use glam::DVec2;

use gollux_core::constants::*;
use gollux_core::enums::{AnimationKey, Facing, LifeState, PartnerKind};
use gollux_core::types::{Aabb, PlayerSlot, ShooterId};

use crate::pool::{DamageProfile, ProjectilePool};
use crate::skills::SkillBar;

/// Result of applying damage to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Player was already down; nothing changed.
    Ignored,
    Survived,
    /// This hit started the death animation. Reported exactly once.
    Killed,
}

/// Shooter companion that follows its player.
#[derive(Debug, Clone)]
pub struct Partner {
    pub kind: PartnerKind,
    pub position: DVec2,
    pub shooting: bool,
    pub target: Option<DVec2>,
    /// Ticks since the last shot was fired.
    pub targeting_timer: u32,
    pub pool: ProjectilePool,
}

impl Partner {
    pub fn new(slot: PlayerSlot, anchor: DVec2, pool_capacity: usize) -> Self {
        Self {
            kind: PartnerKind::default(),
            position: anchor + Self::offset(),
            shooting: false,
            target: None,
            targeting_timer: 0,
            pool: ProjectilePool::new(ShooterId::Partner(slot), pool_capacity),
        }
    }

    fn offset() -> DVec2 {
        DVec2::new(PARTNER_OFFSET_X, PARTNER_OFFSET_Y)
    }

    /// Ease toward the resting spot next to the player.
    pub fn follow(&mut self, anchor: DVec2) {
        let desired = anchor + Self::offset();
        self.position += (desired - self.position) * PARTNER_FOLLOW_RATE;
    }

    pub fn shoot_at(&mut self, target: DVec2) {
        self.shooting = true;
        self.target = Some(target);
    }

    pub fn stop_shooting(&mut self) {
        self.shooting = false;
        self.target = None;
    }

    pub fn damage_profile(&self) -> DamageProfile {
        DamageProfile::partner(self.kind)
    }
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub slot: PlayerSlot,
    pub position: DVec2,
    pub half_extents: DVec2,
    pub health: i32,
    pub max_health: i32,
    pub xp: u32,
    pub max_xp: u32,
    pub level: u32,
    pub currency: u32,
    pub life: LifeState,
    pub facing: Facing,
    pub moving: bool,
    /// Held movement direction, each axis in `[-1, 1]`.
    pub intent: DVec2,
    pub death_frame: u32,
    death_timer_secs: f64,
    pub death_animation_complete: bool,
    pub skills: SkillBar,
    pub partner: Partner,
    pub speed_buff_secs: f64,
    pub regen_buff_secs: f64,
    regen_accumulator: f64,
    /// `(health, max_health)` saved by the armor cheat.
    armor_backup: Option<(i32, i32)>,
}

impl PlayerState {
    pub fn new(slot: PlayerSlot, position: DVec2, skill_slots: usize, pool_capacity: usize) -> Self {
        Self {
            slot,
            position,
            half_extents: DVec2::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            xp: 0,
            max_xp: PLAYER_START_MAX_XP,
            level: 1,
            currency: 0,
            life: LifeState::Alive,
            facing: Facing::default(),
            moving: false,
            intent: DVec2::ZERO,
            death_frame: 0,
            death_timer_secs: 0.0,
            death_animation_complete: false,
            skills: SkillBar::new(skill_slots),
            partner: Partner::new(slot, position, pool_capacity),
            speed_buff_secs: 0.0,
            regen_buff_secs: 0.0,
            regen_accumulator: 0.0,
            armor_backup: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Subtract damage, clamping at zero. The first hit that empties the
    /// health bar starts the death animation.
    pub fn apply_damage(&mut self, damage: i32) -> DamageOutcome {
        if self.life != LifeState::Alive {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - damage.max(0)).max(0);
        if self.health == 0 {
            self.life = LifeState::Dying;
            self.moving = false;
            self.intent = DVec2::ZERO;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Survived
        }
    }

    pub fn heal(&mut self, amount: i32) {
        if self.is_alive() {
            self.health = (self.health + amount.max(0)).min(self.max_health);
        }
    }

    /// Add xp, levelling up until `xp < max_xp`. Returns the levels gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.max_xp > 0 && self.xp >= self.max_xp {
            self.xp -= self.max_xp;
            self.max_xp = self.max_xp * LEVEL_UP_XP_GROWTH_PERCENT / 100;
            self.max_health += LEVEL_UP_HEALTH_BONUS;
            self.health = self.max_health;
            self.level += 1;
            gained += 1;
        }
        gained
    }

    /// Spend currency if there is enough of it.
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.currency.checked_sub(amount) {
            Some(left) => {
                self.currency = left;
                true
            }
            None => false,
        }
    }

    /// Movement speed in pixels per reference frame, buffs included.
    pub fn speed(&self) -> f64 {
        if self.speed_buff_secs > 0.0 {
            PLAYER_SPEED * SPEED_POTION_MULTIPLIER
        } else {
            PLAYER_SPEED
        }
    }

    /// Count timed buffs down and apply regeneration.
    pub fn update_buffs(&mut self, dt: f64) {
        self.speed_buff_secs = (self.speed_buff_secs - dt).max(0.0);
        if self.regen_buff_secs > 0.0 {
            self.regen_buff_secs = (self.regen_buff_secs - dt).max(0.0);
            self.regen_accumulator += REGEN_PER_SEC * dt;
            let whole = self.regen_accumulator.floor();
            if whole >= 1.0 {
                self.regen_accumulator -= whole;
                self.heal(whole as i32);
            }
        } else {
            self.regen_accumulator = 0.0;
        }
    }

    /// Advance the death animation on its own fixed-step timer.
    /// Returns true on the single tick the animation completes.
    pub fn update_death_animation(&mut self, dt: f64) -> bool {
        if self.life != LifeState::Dying {
            return false;
        }
        self.death_timer_secs += dt;
        while self.death_timer_secs + 1e-9 >= DEATH_FRAME_SECS {
            self.death_timer_secs -= DEATH_FRAME_SECS;
            if self.death_frame + 1 < DEATH_ANIMATION_FRAMES {
                self.death_frame += 1;
            } else {
                self.life = LifeState::Dead;
                self.death_animation_complete = true;
                return true;
            }
        }
        false
    }

    pub fn animation_key(&self) -> AnimationKey {
        match self.life {
            LifeState::Dying | LifeState::Dead => AnimationKey::Death {
                frame: self.death_frame,
            },
            LifeState::Alive if self.moving => AnimationKey::Walk {
                facing: self.facing,
            },
            LifeState::Alive => AnimationKey::Idle {
                facing: self.facing,
            },
        }
    }

    /// Admin armor: huge health pool, remembering the real values once.
    pub fn apply_armor(&mut self) {
        if self.armor_backup.is_none() {
            self.armor_backup = Some((self.health, self.max_health));
        }
        self.max_health = CHEAT_ARMOR_HEALTH;
        self.health = CHEAT_ARMOR_HEALTH;
    }

    pub fn restore_armor(&mut self) {
        if let Some((health, max_health)) = self.armor_backup.take() {
            self.max_health = max_health;
            self.health = health.min(max_health).min(self.health);
        }
    }
}
