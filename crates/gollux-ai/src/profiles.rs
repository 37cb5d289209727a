//! Kind-specific behavioral profiles.
//!
//! Consolidates per-kind parameters for the enemy FSM and the spawn factories.

use gollux_core::enums::EnemyKind;

/// Behavioral profile for an enemy kind.
pub struct EnemyBehaviorProfile {
    pub max_health: i32,
    /// Speed in pixels per reference frame.
    pub speed: f64,
    pub half_size: f64,
    /// Melee damage on contact, None for ranged kinds.
    pub contact_damage: Option<i32>,
    pub attack_interval_ticks: u32,
    /// Ranged kinds hover around this distance from their target.
    pub preferred_range: Option<f64>,
    /// Ranged kinds only fire inside this distance.
    pub fire_range: f64,
    pub fire_interval_ticks: u32,
}

/// Get the behavioral profile for a given kind.
pub fn get_profile(kind: EnemyKind) -> EnemyBehaviorProfile {
    use gollux_core::constants::*;

    match kind {
        EnemyKind::Grunt => EnemyBehaviorProfile {
            max_health: GRUNT_MAX_HEALTH,
            speed: GRUNT_SPEED,
            half_size: GRUNT_HALF_SIZE,
            contact_damage: Some(GRUNT_CONTACT_DAMAGE),
            attack_interval_ticks: GRUNT_ATTACK_INTERVAL_TICKS,
            preferred_range: None,
            fire_range: 0.0,
            fire_interval_ticks: 0,
        },
        EnemyKind::Bi => EnemyBehaviorProfile {
            max_health: BI_MAX_HEALTH,
            speed: BI_SPEED,
            half_size: BI_HALF_SIZE,
            contact_damage: None,
            attack_interval_ticks: 0,
            preferred_range: Some(BI_PREFERRED_RANGE),
            fire_range: BI_FIRE_RANGE,
            fire_interval_ticks: BI_FIRE_INTERVAL_TICKS,
        },
    }
}
