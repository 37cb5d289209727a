//! Experience orb pickup.

use hecs::{Entity, World};

use gollux_core::components::{ExperienceOrb, Hitbox};
use gollux_core::types::{Aabb, PlayerSlot, Position};

use crate::player::PlayerState;

/// One player collecting orbs this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub player: PlayerSlot,
    pub levels_gained: u32,
}

/// Living players collect every orb their box overlaps. An orb touched by
/// both players goes to the lower slot.
pub fn run(world: &mut World, players: &mut [PlayerState], despawn_buffer: &mut Vec<Entity>) -> Vec<Pickup> {
    despawn_buffer.clear();
    let mut pickups = Vec::new();

    for (entity, (orb, pos, hitbox)) in world.query_mut::<(&ExperienceOrb, &Position, &Hitbox)>() {
        let orb_box = Aabb::new(pos.0, hitbox.half_extents);
        let Some(player) = players
            .iter_mut()
            .find(|p| p.is_alive() && p.hitbox().intersects(&orb_box))
        else {
            continue;
        };
        player.currency += orb.currency;
        let levels_gained = player.gain_xp(orb.xp);
        pickups.push(Pickup {
            player: player.slot,
            levels_gained,
        });
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    pickups
}
