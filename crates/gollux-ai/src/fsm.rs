//! Enemy behavior state machine.
//!
//! Pure functions that compute movement, contact attacks and sting fire for
//! regular enemies based on their kind and situation.
//! No ECS dependency; operates on plain data.

use gollux_core::enums::EnemyKind;
use gollux_core::types::{Position, Velocity};

use crate::profiles::{get_profile, EnemyBehaviorProfile};

/// Ranged kinds hold position while within this band around their preferred range.
const RANGE_TOLERANCE: f64 = 20.0;

/// Coarse behavior state, derived each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    /// No living player to chase.
    Idle,
    /// Frozen after being hit.
    Stunned,
    Chase,
    /// Ranged kind backing away from a target that came too close.
    Retreat,
    /// Ranged kind holding at its preferred range.
    Hold,
    /// Touching the target.
    Contact,
}

/// Input to the enemy FSM for a single entity.
pub struct EnemyContext {
    pub kind: EnemyKind,
    pub position: Position,
    /// Nearest living player, if any.
    pub target: Option<Position>,
    /// Whether the enemy's box overlaps the target's box.
    pub in_contact: bool,
    pub hit_stun_ticks: u32,
    pub attack_cooldown_ticks: u32,
    pub fire_cooldown_ticks: u32,
}

/// Output from the enemy FSM.
pub struct EnemyUpdate {
    pub state: EnemyState,
    pub velocity: Velocity,
    /// Contact damage dealt to the target this tick.
    pub attack: Option<i32>,
    /// Ranged kinds: launch a sting at the target this tick.
    pub fire_sting: bool,
    pub hit_stun_ticks: u32,
    pub attack_cooldown_ticks: u32,
    pub fire_cooldown_ticks: u32,
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &EnemyContext) -> EnemyUpdate {
    let profile = get_profile(ctx.kind);

    let mut update = EnemyUpdate {
        state: EnemyState::Idle,
        velocity: Velocity::default(),
        attack: None,
        fire_sting: false,
        hit_stun_ticks: ctx.hit_stun_ticks.saturating_sub(1),
        attack_cooldown_ticks: ctx.attack_cooldown_ticks.saturating_sub(1),
        fire_cooldown_ticks: ctx.fire_cooldown_ticks.saturating_sub(1),
    };

    if ctx.hit_stun_ticks > 0 {
        update.state = EnemyState::Stunned;
        return update;
    }

    let Some(target) = ctx.target else {
        return update;
    };

    let offset = target.0 - ctx.position.0;
    let distance = offset.length();
    let direction = offset.normalize_or_zero();

    match profile.preferred_range {
        None => evaluate_melee(ctx, &profile, direction, &mut update),
        Some(range) => evaluate_ranged(ctx, &profile, range, distance, direction, &mut update),
    }

    update
}

fn evaluate_melee(
    ctx: &EnemyContext,
    profile: &EnemyBehaviorProfile,
    direction: glam::DVec2,
    update: &mut EnemyUpdate,
) {
    if !ctx.in_contact {
        update.state = EnemyState::Chase;
        update.velocity = Velocity(direction * profile.speed);
        return;
    }

    update.state = EnemyState::Contact;
    if ctx.attack_cooldown_ticks == 0 {
        if let Some(damage) = profile.contact_damage {
            update.attack = Some(damage);
            update.attack_cooldown_ticks = profile.attack_interval_ticks;
        }
    }
}

fn evaluate_ranged(
    ctx: &EnemyContext,
    profile: &EnemyBehaviorProfile,
    preferred_range: f64,
    distance: f64,
    direction: glam::DVec2,
    update: &mut EnemyUpdate,
) {
    if distance > preferred_range + RANGE_TOLERANCE {
        update.state = EnemyState::Chase;
        update.velocity = Velocity(direction * profile.speed);
    } else if distance < preferred_range - RANGE_TOLERANCE {
        update.state = EnemyState::Retreat;
        update.velocity = Velocity(-direction * profile.speed);
    } else {
        update.state = EnemyState::Hold;
    }

    if distance < profile.fire_range && ctx.fire_cooldown_ticks == 0 {
        update.fire_sting = true;
        update.fire_cooldown_ticks = profile.fire_interval_ticks;
    }
}
