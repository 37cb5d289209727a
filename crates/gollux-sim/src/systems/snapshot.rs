//! Snapshot system: reads the world and engine state and builds a complete
//! GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use gollux_core::components::*;
use gollux_core::constants::CAMERA_SPLIT_DISTANCE;
use gollux_core::enums::*;
use gollux_core::events::AudioEvent;
use gollux_core::state::*;
use gollux_core::types::{ratio, Position, SimTime};

use crate::boss::Boss;
use crate::devil::Devil;
use crate::effects::EffectSet;
use crate::player::PlayerState;
use crate::pool::ProjectilePool;
use crate::transition::TransitionMachine;
use crate::world_setup;

/// Everything a snapshot is built from.
pub struct SnapshotSource<'a> {
    pub world: &'a World,
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub session_secs: f64,
    pub players: &'a [PlayerState],
    pub stings: &'a ProjectilePool,
    pub effects: &'a EffectSet,
    pub boss: Option<&'a Boss>,
    pub devil: Option<&'a Devil>,
    pub boss_warning_secs: f64,
    pub devil_notice_secs: f64,
    pub transition: &'a TransitionMachine,
    pub summary: Option<&'a SessionSummary>,
}

/// Build a complete GameStateSnapshot from the current state.
pub fn build_snapshot(source: &SnapshotSource<'_>, audio_events: Vec<AudioEvent>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: source.time,
        phase: source.phase,
        mode: source.mode,
        session_secs: source.session_secs,
        players: build_players(source.players, source.devil),
        enemies: build_enemies(source.world),
        projectiles: build_projectiles(source.players, source.stings),
        orbs: build_orbs(source.world),
        effects: source.effects.iter().map(|e| e.view()).collect(),
        boss: source.boss.map(Boss::view),
        devil: source.devil.map(Devil::view),
        boss_warning_secs: source.boss_warning_secs,
        devil_notice_secs: source.devil_notice_secs,
        transition: source.transition.view(),
        camera: build_camera(source.players),
        audio_events,
        summary: source.summary.cloned(),
    }
}

fn build_players(players: &[PlayerState], devil: Option<&Devil>) -> Vec<PlayerView> {
    players
        .iter()
        .map(|p| PlayerView {
            slot: p.slot,
            position: Position(p.position),
            health: p.health,
            max_health: p.max_health,
            health_ratio: ratio(p.health as f64, p.max_health as f64),
            xp: p.xp,
            max_xp: p.max_xp,
            xp_ratio: ratio(p.xp as f64, p.max_xp as f64),
            level: p.level,
            currency: p.currency,
            life: p.life,
            animation: p.animation_key(),
            partner: PartnerView {
                kind: p.partner.kind,
                position: Position(p.partner.position),
                shooting: p.partner.shooting,
                target: p.partner.target.map(Position),
            },
            skills: p.skills.views(),
            speed_buff_secs: p.speed_buff_secs,
            regen_buff_secs: p.regen_buff_secs,
            can_interact: p.is_alive() && devil.is_some_and(|d| d.can_interact(p.position)),
        })
        .collect()
}

/// Enemy views sorted by entity id for stable output.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position, &Health, Option<&Dying>)>()
        .iter()
        .map(|(entity, (enemy, pos, health, dying))| EnemyView {
            id: entity.to_bits().get(),
            kind: enemy.kind,
            position: *pos,
            health: health.current,
            max_health: health.max,
            dying: dying.is_some(),
            stunned: enemy.hit_stun_ticks > 0,
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(players: &[PlayerState], stings: &ProjectilePool) -> Vec<ProjectileView> {
    players
        .iter()
        .flat_map(|p| p.partner.pool.active())
        .chain(stings.active())
        .map(|projectile| ProjectileView {
            owner: projectile.owner,
            position: Position(projectile.position),
            damage: projectile.damage,
        })
        .collect()
}

fn build_orbs(world: &World) -> Vec<OrbView> {
    world
        .query::<(&ExperienceOrb, &Position)>()
        .iter()
        .map(|(_, (_, pos))| OrbView { position: *pos })
        .collect()
}

/// Camera follows the living players; two living players far apart split
/// the screen.
fn build_camera(players: &[PlayerState]) -> CameraView {
    let focus = world_setup::players_midpoint(players).unwrap_or_default();
    let living: Vec<_> = players.iter().filter(|p| p.is_alive()).collect();
    let split = match living.as_slice() {
        [a, b] => a.position.distance(b.position) > CAMERA_SPLIT_DISTANCE,
        _ => false,
    };
    CameraView {
        focus: Position(focus),
        split,
    }
}
