//! Boss behavior: chase the nearest living player, slam on contact, enrage
//! below half health.

use gollux_core::constants::*;
use gollux_core::types::{Position, Velocity};

pub struct BossContext {
    pub position: Position,
    pub target: Option<Position>,
    pub in_contact: bool,
    pub health: i32,
    pub max_health: i32,
    pub attack_cooldown_ticks: u32,
}

pub struct BossUpdate {
    pub velocity: Velocity,
    pub enraged: bool,
    pub attack: Option<i32>,
    pub attack_cooldown_ticks: u32,
}

/// Enraged once health falls to half or below.
pub fn is_enraged(health: i32, max_health: i32) -> bool {
    max_health > 0 && health * 2 <= max_health
}

pub fn evaluate(ctx: &BossContext) -> BossUpdate {
    let enraged = is_enraged(ctx.health, ctx.max_health);
    let mut update = BossUpdate {
        velocity: Velocity::default(),
        enraged,
        attack: None,
        attack_cooldown_ticks: ctx.attack_cooldown_ticks.saturating_sub(1),
    };

    let Some(target) = ctx.target else {
        return update;
    };

    if ctx.in_contact {
        if ctx.attack_cooldown_ticks == 0 {
            update.attack = Some(BOSS_CONTACT_DAMAGE);
            update.attack_cooldown_ticks = BOSS_ATTACK_INTERVAL_TICKS;
        }
        return update;
    }

    let speed = if enraged {
        BOSS_SPEED * BOSS_ENRAGE_SPEED_FACTOR
    } else {
        BOSS_SPEED
    };
    update.velocity = Velocity((target.0 - ctx.position.0).normalize_or_zero() * speed);
    update
}
