//! Enemy AI system. Runs each enemy's behavior and applies the result.
//!
//! Calls the enemy FSM from gollux-ai, then writes velocities and cooldowns
//! back into ECS components. Contact attacks and sting launches are returned
//! to the engine, which owns the players and the hazard pool.

use glam::DVec2;
use hecs::World;

use gollux_core::components::{BiShooter, Dying, Enemy, Hitbox};
use gollux_core::constants::REFERENCE_FRAME_RATE;
use gollux_core::types::{Aabb, PlayerSlot, Position, Velocity};

use gollux_ai::boss::{self as boss_ai, BossContext};
use gollux_ai::fsm::{evaluate, EnemyContext};

use crate::boss::Boss;
use crate::player::PlayerState;

/// Damage one enemy dealt to one player this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactHit {
    pub player: PlayerSlot,
    pub damage: i32,
}

/// A sting the hazard pool should launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StingOrder {
    pub start: DVec2,
    pub target: DVec2,
}

#[derive(Debug, Default)]
pub struct EnemyAiOutput {
    pub hits: Vec<ContactHit>,
    pub stings: Vec<StingOrder>,
}

/// Nearest living player to `point`.
pub fn nearest_living(players: &[PlayerState], point: DVec2) -> Option<&PlayerState> {
    players
        .iter()
        .filter(|p| p.is_alive())
        .min_by(|a, b| {
            a.position
                .distance_squared(point)
                .total_cmp(&b.position.distance_squared(point))
        })
}

struct EnemyChange {
    entity: hecs::Entity,
    velocity: Velocity,
    hit_stun_ticks: u32,
    attack_cooldown_ticks: u32,
    fire_cooldown_ticks: u32,
}

/// Run the enemy AI: evaluate the FSM for each non-dying enemy, apply updates.
pub fn run(world: &mut World, players: &[PlayerState]) -> EnemyAiOutput {
    let mut output = EnemyAiOutput::default();
    // Collect updates in a buffer to avoid borrow issues with hecs
    let mut changes: Vec<EnemyChange> = Vec::new();

    {
        let mut query = world.query::<(
            &Enemy,
            &Position,
            &Hitbox,
            Option<&BiShooter>,
            Option<&Dying>,
        )>();
        for (entity, (enemy, pos, hitbox, shooter, dying)) in query.iter() {
            if dying.is_some() {
                continue;
            }

            let target = nearest_living(players, pos.0);
            let in_contact = target.is_some_and(|p| {
                Aabb::new(pos.0, hitbox.half_extents).intersects(&p.hitbox())
            });

            let ctx = EnemyContext {
                kind: enemy.kind,
                position: *pos,
                target: target.map(|p| Position(p.position)),
                in_contact,
                hit_stun_ticks: enemy.hit_stun_ticks,
                attack_cooldown_ticks: enemy.attack_cooldown_ticks,
                fire_cooldown_ticks: shooter.map_or(0, |s| s.fire_cooldown_ticks),
            };
            let update = evaluate(&ctx);

            if let (Some(damage), Some(player)) = (update.attack, target) {
                output.hits.push(ContactHit {
                    player: player.slot,
                    damage,
                });
            }
            if update.fire_sting && shooter.is_some() {
                if let Some(player) = target {
                    output.stings.push(StingOrder {
                        start: pos.0,
                        target: player.position,
                    });
                }
            }

            changes.push(EnemyChange {
                entity,
                velocity: update.velocity,
                hit_stun_ticks: update.hit_stun_ticks,
                attack_cooldown_ticks: update.attack_cooldown_ticks,
                fire_cooldown_ticks: update.fire_cooldown_ticks,
            });
        }
    }

    // Apply updates
    for change in changes {
        if let Ok(mut enemy) = world.get::<&mut Enemy>(change.entity) {
            enemy.hit_stun_ticks = change.hit_stun_ticks;
            enemy.attack_cooldown_ticks = change.attack_cooldown_ticks;
        }
        if let Ok(mut shooter) = world.get::<&mut BiShooter>(change.entity) {
            shooter.fire_cooldown_ticks = change.fire_cooldown_ticks;
        }
        if let Ok(mut vel) = world.get::<&mut Velocity>(change.entity) {
            *vel = change.velocity;
        }
    }

    output
}

/// Run the boss behavior and move it. Returns its contact hit, if any.
pub fn run_boss(boss: &mut Boss, players: &[PlayerState], dt: f64) -> Option<ContactHit> {
    if boss.is_defeated() {
        return None;
    }
    let target = nearest_living(players, boss.position);
    let ctx = BossContext {
        position: Position(boss.position),
        target: target.map(|p| Position(p.position)),
        in_contact: target.is_some_and(|p| boss.hitbox().intersects(&p.hitbox())),
        health: boss.health,
        max_health: boss.max_health,
        attack_cooldown_ticks: boss.attack_cooldown_ticks,
    };
    let update = boss_ai::evaluate(&ctx);

    boss.enraged = update.enraged;
    boss.attack_cooldown_ticks = update.attack_cooldown_ticks;
    boss.position += update.velocity.0 * dt * REFERENCE_FRAME_RATE;

    match (update.attack, target) {
        (Some(damage), Some(player)) => Some(ContactHit {
            player: player.slot,
            damage,
        }),
        _ => None,
    }
}
