//! Movement system.
//!
//! Players move per axis against static obstacles, x first, then y. An axis
//! whose move would end inside an obstacle is reverted on its own, which lets
//! players slide along walls. Speeds are authored per reference frame and
//! scaled by `dt`.

use glam::DVec2;
use hecs::World;

use gollux_core::components::{Dying, Hitbox};
use gollux_core::config::MapLayout;
use gollux_core::constants::{DIAGONAL_FACTOR, REFERENCE_FRAME_RATE};
use gollux_core::enums::Facing;
use gollux_core::types::{Aabb, Position, Velocity};

use crate::player::PlayerState;

/// Displacement for one tick of held input.
pub fn input_delta(intent: DVec2, speed: f64, dt: f64) -> DVec2 {
    let mut direction = intent.clamp(DVec2::splat(-1.0), DVec2::splat(1.0));
    if direction.x != 0.0 && direction.y != 0.0 {
        direction *= DIAGONAL_FACTOR;
    }
    direction * speed * dt * REFERENCE_FRAME_RATE
}

/// Move a box by `delta`, one axis at a time, reverting each axis that would
/// collide. The result always stays inside the map.
pub fn step_with_collision(
    position: DVec2,
    half_extents: DVec2,
    delta: DVec2,
    map: &MapLayout,
) -> DVec2 {
    let bounds = map.bounds();
    let mut current = position;

    if delta.x != 0.0 {
        let moved = bounds.clamp_center(current + DVec2::new(delta.x, 0.0), half_extents);
        if !map.blocked(&Aabb::new(moved, half_extents)) {
            current = moved;
        }
    }
    if delta.y != 0.0 {
        let moved = bounds.clamp_center(current + DVec2::new(0.0, delta.y), half_extents);
        if !map.blocked(&Aabb::new(moved, half_extents)) {
            current = moved;
        }
    }
    current
}

/// Move living players by their held input, update facing, drag partners
/// along and tick timed buffs.
pub fn run_players(players: &mut [PlayerState], map: &MapLayout, dt: f64) {
    for player in players.iter_mut() {
        if player.is_alive() {
            let delta = input_delta(player.intent, player.speed(), dt);
            if let Some(facing) = Facing::from_input(player.intent.x, player.intent.y) {
                player.facing = facing;
            }
            let before = player.position;
            player.position = step_with_collision(player.position, player.half_extents, delta, map);
            player.moving = player.position != before;
            player.update_buffs(dt);
        }
        player.partner.follow(player.position);
    }
}

/// Integrate enemy velocities. Enemies ignore obstacles but stay on the map.
pub fn run_enemies(world: &mut World, map: &MapLayout, dt: f64) {
    let bounds = map.bounds();
    let step = dt * REFERENCE_FRAME_RATE;
    for (_entity, (pos, vel, hitbox, dying)) in
        world.query_mut::<(&mut Position, &Velocity, &Hitbox, Option<&Dying>)>()
    {
        if dying.is_some() {
            continue;
        }
        pos.0 = bounds.clamp_center(pos.0 + vel.0 * step, hitbox.half_extents);
    }
}
