//! Targeting resolver: picks what each partner shoots at.
//!
//! Candidates are non-dying enemies and an undefeated boss. The boss wins
//! whenever it is in range, even if a regular enemy is closer. Range is a
//! strict `<` test against the shoot radius, measured from the player.

use glam::DVec2;
use hecs::World;

use gollux_core::components::{Dying, Enemy};
use gollux_core::types::{PlayerSlot, Position};

use crate::boss::Boss;
use crate::player::PlayerState;

/// A shot the projectile step should try to fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireOrder {
    pub player: PlayerSlot,
    pub start: DVec2,
    pub target: DVec2,
}

/// Nearest qualifying target for a shooter at `origin`, boss first.
pub fn resolve_target(
    origin: DVec2,
    boss: Option<DVec2>,
    enemies: &[DVec2],
    shoot_radius: f64,
) -> Option<DVec2> {
    if let Some(boss) = boss {
        if origin.distance(boss) < shoot_radius {
            return Some(boss);
        }
    }

    let mut best: Option<(f64, DVec2)> = None;
    for &enemy in enemies {
        let distance = origin.distance(enemy);
        if distance >= shoot_radius {
            continue;
        }
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, enemy));
        }
    }
    best.map(|(_, position)| position)
}

/// Positions of every targetable (non-dying) enemy.
pub fn targetable_enemies(world: &World) -> Vec<DVec2> {
    world
        .query::<(&Enemy, &Position, Option<&Dying>)>()
        .iter()
        .filter(|(_, (_, _, dying))| dying.is_none())
        .map(|(_, (_, pos, _))| pos.0)
        .collect()
}

/// Tick every partner's targeting timer and re-evaluate those that are due.
/// Each evaluation restarts the timer, whether or not it yields a shot.
/// A partner with no qualifying target stops shooting.
pub fn run(
    world: &World,
    boss: Option<&Boss>,
    players: &mut [PlayerState],
    shoot_radius: f64,
    interval_ticks: u32,
) -> Vec<FireOrder> {
    let boss_position = boss.filter(|b| !b.is_defeated()).map(|b| b.position);
    let enemies = targetable_enemies(world);
    let anything_to_shoot = boss_position.is_some() || !enemies.is_empty();

    let mut orders = Vec::new();
    for player in players.iter_mut() {
        let (alive, slot, origin) = (player.is_alive(), player.slot, player.position);
        let partner = &mut player.partner;
        partner.targeting_timer = partner.targeting_timer.saturating_add(1);

        if !alive {
            partner.stop_shooting();
            continue;
        }
        if partner.targeting_timer < interval_ticks || !anything_to_shoot {
            continue;
        }
        partner.targeting_timer = 0;

        match resolve_target(origin, boss_position, &enemies, shoot_radius) {
            Some(target) => orders.push(FireOrder {
                player: slot,
                start: partner.position,
                target,
            }),
            None => partner.stop_shooting(),
        }
    }
    orders
}
