//! Projectile spawn and flight.

use gollux_core::config::MapLayout;
use gollux_core::constants::REFERENCE_FRAME_RATE;
use gollux_core::events::AudioEvent;

use crate::player::PlayerState;
use crate::pool::{DamageProfile, ProjectilePool};
use crate::systems::enemy_ai::StingOrder;
use crate::systems::targeting::FireOrder;

/// Fire the ordered partner shots. A saturated pool skips the shot until the
/// partner's next targeting evaluation.
pub fn spawn_partner_shots(
    orders: &[FireOrder],
    players: &mut [PlayerState],
    audio_events: &mut Vec<AudioEvent>,
) {
    for order in orders {
        let Some(player) = players.get_mut(order.player.index()) else {
            continue;
        };
        let partner = &mut player.partner;
        let profile = partner.damage_profile();
        if partner.pool.fire(order.start, order.target, profile) {
            partner.shoot_at(order.target);
            audio_events.push(AudioEvent::PartnerShot {
                player: order.player,
            });
        }
    }
}

/// Launch Bi stings from the shared hazard pool. Saturation drops the shot.
pub fn spawn_stings(orders: &[StingOrder], stings: &mut ProjectilePool) {
    for order in orders {
        stings.fire(order.start, order.target, DamageProfile::sting());
    }
}

/// Move every pooled projectile one tick.
pub fn run(players: &mut [PlayerState], stings: &mut ProjectilePool, map: &MapLayout, dt: f64) {
    let bounds = map.bounds();
    let step = dt * REFERENCE_FRAME_RATE;
    for player in players.iter_mut() {
        player.partner.pool.update(step, &bounds);
    }
    stings.update(step, &bounds);
}
