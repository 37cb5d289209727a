//! Combat resolution: projectile hits, area damage, rewards.
//!
//! Hits are applied once per projectile. A lethal hit moves the enemy into
//! its dying state exactly once; only that transition drops an orb and pays
//! the kill reward.

use glam::DVec2;
use hecs::{Entity, World};

use gollux_core::components::{Dying, Enemy, Health, Hitbox};
use gollux_core::config::SessionConfig;
use gollux_core::constants::{DEVIL_PULSE_DAMAGE, ENEMY_DYING_TICKS, ENEMY_HIT_STUN_TICKS};
use gollux_core::enums::KillSource;
use gollux_core::events::AudioEvent;
use gollux_core::types::{Aabb, PlayerSlot, Position, Velocity};

use crate::boss::Boss;
use crate::effects::StrikeOrder;
use crate::player::{DamageOutcome, PlayerState};
use crate::pool::ProjectilePool;
use crate::world_setup;

/// Result of damaging one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyHit {
    /// Enemy was already dying or gone.
    Ignored,
    Hurt,
    Killed { position: DVec2 },
}

/// Damage a player took this tick, for the engine to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHit {
    pub player: PlayerSlot,
    pub outcome: DamageOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    pub kills: u32,
    /// The boss went down during this step.
    pub boss_defeated: bool,
}

impl CombatOutcome {
    pub fn merge(&mut self, other: CombatOutcome) {
        self.kills += other.kills;
        self.boss_defeated |= other.boss_defeated;
    }
}

/// Apply `damage` to an enemy. The lethal hit inserts `Dying` and freezes it.
pub fn hit_enemy(world: &mut World, entity: Entity, damage: i32, source: KillSource) -> EnemyHit {
    if world.get::<&Dying>(entity).is_ok() {
        return EnemyHit::Ignored;
    }
    let remaining = match world.get::<&mut Health>(entity) {
        Ok(mut health) => {
            health.current = (health.current - damage.max(0)).max(0);
            health.current
        }
        Err(_) => return EnemyHit::Ignored,
    };
    if let Ok(mut enemy) = world.get::<&mut Enemy>(entity) {
        enemy.hit_stun_ticks = ENEMY_HIT_STUN_TICKS;
    }
    if remaining > 0 {
        return EnemyHit::Hurt;
    }

    let position = world
        .get::<&Position>(entity)
        .map(|p| p.0)
        .unwrap_or_default();
    if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
        *vel = Velocity::default();
    }
    let _ = world.insert_one(
        entity,
        Dying {
            remaining_ticks: ENEMY_DYING_TICKS,
            killed_by: source,
        },
    );
    EnemyHit::Killed { position }
}

/// Drop the orb and pay every player their share of the kill reward.
/// Hazard kills pay nothing.
pub fn credit_kill(
    world: &mut World,
    position: DVec2,
    source: KillSource,
    players: &mut [PlayerState],
    config: &SessionConfig,
) {
    if source == KillSource::Hazard {
        return;
    }
    world_setup::spawn_orb(world, position);
    for (index, player) in players.iter_mut().enumerate() {
        player.currency += config.kill_reward_for(index);
    }
}

/// Lump reward for the boss, paid to everyone in the session.
pub fn credit_boss_defeat(players: &mut [PlayerState], config: &SessionConfig) {
    for player in players.iter_mut() {
        player.currency += config.boss_reward;
    }
}

/// Non-dying enemy boxes, in query order.
fn enemy_targets(world: &World) -> Vec<(Entity, Aabb)> {
    world
        .query::<(&Enemy, &Position, &Hitbox, Option<&Dying>)>()
        .iter()
        .filter(|(_, (_, _, _, dying))| dying.is_none())
        .map(|(entity, (_, pos, hitbox, _))| (entity, Aabb::new(pos.0, hitbox.half_extents)))
        .collect()
}

/// Resolve partner projectiles against enemies, then against the boss.
pub fn resolve_projectile_hits(
    world: &mut World,
    players: &mut [PlayerState],
    boss: Option<&mut Boss>,
    config: &SessionConfig,
    audio_events: &mut Vec<AudioEvent>,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    let mut targets = enemy_targets(world);
    let mut kills: Vec<DVec2> = Vec::new();

    for player in players.iter_mut() {
        for projectile in player.partner.pool.active_mut() {
            let hitbox = projectile.hitbox();
            let Some(index) = targets.iter().position(|(_, b)| b.intersects(&hitbox)) else {
                continue;
            };
            projectile.deactivate();
            audio_events.push(AudioEvent::EnemyHit);
            let entity = targets[index].0;
            if let EnemyHit::Killed { position } =
                hit_enemy(world, entity, projectile.damage, KillSource::Projectile)
            {
                targets.swap_remove(index);
                kills.push(position);
            }
        }
    }

    for position in kills {
        credit_kill(world, position, KillSource::Projectile, players, config);
        outcome.kills += 1;
    }

    if let Some(boss) = boss {
        outcome.merge(resolve_boss_hits(boss, players, config, audio_events));
    }
    outcome
}

fn resolve_boss_hits(
    boss: &mut Boss,
    players: &mut [PlayerState],
    config: &SessionConfig,
    audio_events: &mut Vec<AudioEvent>,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    let boss_box = boss.hitbox();

    'players: for player in players.iter_mut() {
        for projectile in player.partner.pool.active_mut() {
            if boss.is_defeated() {
                break 'players;
            }
            if !projectile.hitbox().intersects(&boss_box) {
                continue;
            }
            projectile.deactivate();
            audio_events.push(AudioEvent::EnemyHit);
            if boss.take_hit(projectile.damage) {
                outcome.boss_defeated = true;
            }
        }
    }

    if outcome.boss_defeated {
        credit_boss_defeat(players, config);
        audio_events.push(AudioEvent::BossDefeated);
    }
    outcome
}

/// Bi stings against living players.
pub fn resolve_sting_hits(stings: &mut ProjectilePool, players: &mut [PlayerState]) -> Vec<PlayerHit> {
    let mut hits = Vec::new();
    for sting in stings.active_mut() {
        let hitbox = sting.hitbox();
        let Some(player) = players
            .iter_mut()
            .find(|p| p.is_alive() && p.hitbox().intersects(&hitbox))
        else {
            continue;
        };
        sting.deactivate();
        hits.push(PlayerHit {
            player: player.slot,
            outcome: player.apply_damage(sting.damage),
        });
    }
    hits
}

/// Non-dying enemies whose center is strictly inside a circle.
fn enemies_in_radius(world: &World, center: DVec2, radius: f64) -> Vec<Entity> {
    world
        .query::<(&Enemy, &Position, Option<&Dying>)>()
        .iter()
        .filter(|(_, (_, pos, dying))| dying.is_none() && pos.0.distance(center) < radius)
        .map(|(entity, _)| entity)
        .collect()
}

/// Apply due area strikes to enemies and the boss.
pub fn apply_strikes(
    world: &mut World,
    mut boss: Option<&mut Boss>,
    strikes: &[StrikeOrder],
    players: &mut [PlayerState],
    config: &SessionConfig,
    audio_events: &mut Vec<AudioEvent>,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();

    for strike in strikes {
        for entity in enemies_in_radius(world, strike.center, strike.radius) {
            audio_events.push(AudioEvent::EnemyHit);
            if let EnemyHit::Killed { position } =
                hit_enemy(world, entity, strike.damage, KillSource::Skill)
            {
                credit_kill(world, position, KillSource::Skill, players, config);
                outcome.kills += 1;
            }
        }
        if let Some(boss) = boss.as_deref_mut() {
            if !boss.is_defeated()
                && boss.position.distance(strike.center) < strike.radius + boss.half_extents.x
            {
                audio_events.push(AudioEvent::EnemyHit);
                if boss.take_hit(strike.damage) {
                    outcome.boss_defeated = true;
                    credit_boss_defeat(players, config);
                    audio_events.push(AudioEvent::BossDefeated);
                }
            }
        }
    }
    outcome
}

/// Kill every non-dying regular enemy. The boss is immune.
pub fn nuke_enemies(
    world: &mut World,
    players: &mut [PlayerState],
    config: &SessionConfig,
) -> u32 {
    let targets: Vec<Entity> = enemy_targets(world).into_iter().map(|(e, _)| e).collect();
    let mut kills = 0;
    for entity in targets {
        if let EnemyHit::Killed { position } = hit_enemy(world, entity, i32::MAX, KillSource::Skill) {
            credit_kill(world, position, KillSource::Skill, players, config);
            kills += 1;
        }
    }
    kills
}

/// Devil pulse: hurts enemies near it. Its kills drop nothing.
pub fn devil_pulse(world: &mut World, center: DVec2, radius: f64) -> u32 {
    let mut kills = 0;
    for entity in enemies_in_radius(world, center, radius) {
        if let EnemyHit::Killed { .. } =
            hit_enemy(world, entity, DEVIL_PULSE_DAMAGE, KillSource::Hazard)
        {
            kills += 1;
        }
    }
    kills
}
