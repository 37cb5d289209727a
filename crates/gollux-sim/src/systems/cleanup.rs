//! Cleanup system: counts down dying enemies and removes finished ones.

use hecs::{Entity, World};

use gollux_core::components::{Dying, Enemy};

/// Remove enemies whose dying timer ran out.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (_enemy, dying)) in world.query_mut::<(&Enemy, &mut Dying)>() {
        dying.remaining_ticks = dying.remaining_ticks.saturating_sub(1);
        if dying.remaining_ticks == 0 {
            despawn_buffer.push(entity);
        }
    }

    // Despawn collected entities.
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
