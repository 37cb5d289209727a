//! Entity spawn factories for setting up the simulation world.
//!
//! Creates players, enemies, orbs, the boss and the devil with
//! appropriate component bundles and start positions.

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gollux_core::components::*;
use gollux_core::config::{MapLayout, SessionConfig};
use gollux_core::constants::*;
use gollux_core::enums::*;
use gollux_core::types::{Aabb, PlayerSlot, Position, Velocity};

use gollux_ai::profiles::get_profile;

use crate::boss::Boss;
use crate::devil::Devil;
use crate::player::PlayerState;

/// Create the session's players around the map center. Solo starts at the
/// center; coop starts side by side.
pub fn setup_players(config: &SessionConfig, map: &MapLayout) -> Vec<PlayerState> {
    let center = map.center();
    let count = config.player_count();
    (0..count)
        .filter_map(PlayerSlot::from_index)
        .map(|slot| {
            let offset = match (count, slot) {
                (1, _) => 0.0,
                (_, PlayerSlot::One) => -COOP_START_OFFSET * 0.5,
                (_, PlayerSlot::Two) => COOP_START_OFFSET * 0.5,
            };
            PlayerState::new(
                slot,
                center + DVec2::new(offset, 0.0),
                config.skill_slots,
                config.projectile_pool_capacity,
            )
        })
        .collect()
}

/// Midpoint of the living players, falling back to any player when nobody
/// is alive.
pub fn players_midpoint(players: &[PlayerState]) -> Option<DVec2> {
    let living: Vec<DVec2> = players
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| p.position)
        .collect();
    let points = if living.is_empty() {
        players.iter().map(|p| p.position).collect()
    } else {
        living
    };
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<DVec2>() / points.len() as f64)
}

/// Spawn a regular enemy of `kind` at `position`.
pub fn spawn_enemy(world: &mut World, kind: EnemyKind, position: DVec2) -> hecs::Entity {
    let profile = get_profile(kind);
    let enemy = Enemy {
        kind,
        attack_cooldown_ticks: 0,
        hit_stun_ticks: 0,
    };
    let health = Health {
        current: profile.max_health,
        max: profile.max_health,
    };
    let hitbox = Hitbox {
        half_extents: DVec2::splat(profile.half_size),
    };

    match kind {
        EnemyKind::Grunt => world.spawn((
            enemy,
            Position(position),
            Velocity::default(),
            health,
            hitbox,
        )),
        EnemyKind::Bi => world.spawn((
            enemy,
            Position(position),
            Velocity::default(),
            health,
            hitbox,
            BiShooter {
                fire_cooldown_ticks: profile.fire_interval_ticks,
            },
        )),
    }
}

/// Spawn an enemy on a random point of the ring around `center`.
pub fn spawn_enemy_near(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    map: &MapLayout,
    kind: EnemyKind,
    center: DVec2,
) -> hecs::Entity {
    let half = DVec2::splat(get_profile(kind).half_size);
    let position = ring_position(rng, map, center, half);
    spawn_enemy(world, kind, position)
}

/// Random point at spawn-ring distance from `center`, kept inside the map.
pub fn ring_position(rng: &mut ChaCha8Rng, map: &MapLayout, center: DVec2, half: DVec2) -> DVec2 {
    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let distance: f64 = rng.gen_range(ENEMY_SPAWN_MIN_DISTANCE..ENEMY_SPAWN_MAX_DISTANCE);
    let raw = center + DVec2::new(angle.cos(), angle.sin()) * distance;
    map.bounds().clamp_center(raw, half)
}

/// Drop an experience orb where an enemy died.
pub fn spawn_orb(world: &mut World, position: DVec2) -> hecs::Entity {
    world.spawn((
        ExperienceOrb {
            xp: ORB_XP,
            currency: ORB_CURRENCY,
        },
        Position(position),
        Hitbox {
            half_extents: DVec2::splat(ORB_HALF_SIZE),
        },
    ))
}

/// The boss appears on `anchor`, kept inside the map.
pub fn spawn_boss(map: &MapLayout, anchor: DVec2) -> Boss {
    let position = map
        .bounds()
        .clamp_center(anchor, DVec2::splat(BOSS_HALF_SIZE));
    Boss::new(position)
}

/// The devil appears at a random spot away from the map edges.
pub fn spawn_devil(rng: &mut ChaCha8Rng, map: &MapLayout) -> Devil {
    let bounds = map.bounds();
    let margin = DVec2::splat(DEVIL_EDGE_MARGIN).min(bounds.half_extents);
    let inner = Aabb::new(bounds.center, bounds.half_extents - margin);
    let (min, max) = (inner.min(), inner.max());
    let x = if max.x > min.x {
        rng.gen_range(min.x..max.x)
    } else {
        bounds.center.x
    };
    let y = if max.y > min.y {
        rng.gen_range(min.y..max.y)
    } else {
        bounds.center.y
    };
    Devil::new(DVec2::new(x, y))
}

/// Count live enemy entities, optionally of one kind. Dying enemies still count.
pub fn enemy_population(world: &World, kind: Option<EnemyKind>) -> usize {
    world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, enemy)| kind.map_or(true, |k| enemy.kind == k))
        .count()
}
