//! Spawn director: time- and population-gated enemy, boss and devil spawns.
//!
//! Regular enemies come on a fixed tick cadence until the boss shows up.
//! Bi hazards unlock after a session-time floor. The boss appears once, and
//! the devil (when enabled) returns on a fixed schedule.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use gollux_core::config::{MapLayout, SessionConfig};
use gollux_core::enums::EnemyKind;

use crate::boss::Boss;
use crate::devil::Devil;
use crate::player::PlayerState;
use crate::world_setup;

/// Something the director brought into the world this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEvent {
    Enemy,
    Bi,
    Boss,
    Devil,
}

#[derive(Debug, Clone)]
pub struct SpawnDirector {
    /// Ticks since the last regular spawn.
    enemy_timer: u32,
    /// Ticks since the last Bi spawn, counted only past the time floor.
    bi_timer: u32,
    boss_spawned: bool,
    next_devil_secs: f64,
}

impl SpawnDirector {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            enemy_timer: 0,
            bi_timer: 0,
            boss_spawned: false,
            next_devil_secs: config.devil_first_spawn_secs,
        }
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    pub fn next_devil_secs(&self) -> f64 {
        self.next_devil_secs
    }

    /// Run all spawn checks for one tick.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        map: &MapLayout,
        config: &SessionConfig,
        players: &[PlayerState],
        elapsed_secs: f64,
        spawns_blocked: bool,
        boss: &mut Option<Boss>,
        devil: &mut Option<Devil>,
    ) -> Vec<SpawnEvent> {
        let mut events = Vec::new();
        let Some(anchor) = world_setup::players_midpoint(players) else {
            return events;
        };

        // Regular enemies
        self.enemy_timer = self.enemy_timer.saturating_add(1);
        if self.enemy_timer >= config.enemy_spawn_interval_ticks
            && world_setup::enemy_population(world, None) < config.enemy_population_cap
            && !self.boss_spawned
            && !spawns_blocked
        {
            world_setup::spawn_enemy_near(world, rng, map, EnemyKind::Grunt, anchor);
            self.enemy_timer = 0;
            events.push(SpawnEvent::Enemy);
        }

        // Bi hazards
        if elapsed_secs >= config.bi_spawn_floor_secs {
            self.bi_timer = self.bi_timer.saturating_add(1);
            if self.bi_timer >= config.bi_spawn_interval_ticks
                && world_setup::enemy_population(world, Some(EnemyKind::Bi))
                    < config.bi_population_cap
            {
                world_setup::spawn_enemy_near(world, rng, map, EnemyKind::Bi, anchor);
                self.bi_timer = 0;
                debug!(elapsed_secs, "bi spawned");
                events.push(SpawnEvent::Bi);
            }
        }

        // Boss
        if !self.boss_spawned && elapsed_secs >= config.boss_spawn_secs {
            self.spawn_boss(map, players, boss);
            events.push(SpawnEvent::Boss);
        }

        // Devil
        if config.devil_enabled && devil.is_none() && elapsed_secs >= self.next_devil_secs {
            *devil = Some(world_setup::spawn_devil(rng, map));
            self.next_devil_secs += config.devil_spawn_interval_secs;
            info!(elapsed_secs, next = self.next_devil_secs, "devil arrived");
            events.push(SpawnEvent::Devil);
        }

        events
    }

    /// Bring the boss in now. No-op once it has spawned.
    pub fn spawn_boss(
        &mut self,
        map: &MapLayout,
        players: &[PlayerState],
        boss: &mut Option<Boss>,
    ) -> bool {
        if self.boss_spawned {
            return false;
        }
        let Some(anchor) = world_setup::players_midpoint(players) else {
            return false;
        };
        let spawned = world_setup::spawn_boss(map, anchor);
        info!(x = spawned.position.x, y = spawned.position.y, "boss spawned");
        *boss = Some(spawned);
        self.boss_spawned = true;
        true
    }
}
