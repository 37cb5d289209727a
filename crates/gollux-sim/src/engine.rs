//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the players, pools, effects,
//! boss, devil, spawn director, session clock and transition machine. It
//! processes player commands, runs all systems in a fixed order, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec2;
use hecs::World;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use gollux_core::commands::{CheatCommand, PlayerCommand};
use gollux_core::config::{MapLayout, SessionConfig};
use gollux_core::constants::*;
use gollux_core::enums::*;
use gollux_core::error::{PurchaseError, SimError};
use gollux_core::events::AudioEvent;
use gollux_core::state::{GameStateSnapshot, PlayerSummary, SessionSummary};
use gollux_core::types::{PlayerSlot, ShooterId, SimTime};

use crate::boss::Boss;
use crate::clock::SessionClock;
use crate::devil::{Devil, DevilTick};
use crate::effects::{Effect, EffectSet};
use crate::player::{DamageOutcome, PlayerState};
use crate::pool::ProjectilePool;
use crate::shop;
use crate::skills::skill_def;
use crate::systems;
use crate::systems::combat::{CombatOutcome, PlayerHit};
use crate::systems::snapshot::SnapshotSource;
use crate::systems::spawn_director::{SpawnDirector, SpawnEvent};
use crate::transition::{PlayerDownState, TransitionMachine};
use crate::world_setup;

/// Seconds the level-up glow stays on a player.
const LEVEL_UP_GLOW_SECS: f64 = 1.0;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: SessionConfig,
    map: MapLayout,
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    clock: SessionClock,
    players: Vec<PlayerState>,
    stings: ProjectilePool,
    effects: EffectSet,
    boss: Option<Boss>,
    devil: Option<Devil>,
    boss_warning_secs: f64,
    devil_notice_secs: f64,
    director: SpawnDirector,
    transition: TransitionMachine,
    shop_customer: Option<PlayerSlot>,
    pending_skills: Vec<(PlayerSlot, usize)>,
    summary: Option<SessionSummary>,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    audio_events: Vec<AudioEvent>,
}

impl SimulationEngine {
    /// Create a new engine for one session. Fails on an invalid config or map.
    pub fn new(config: SessionConfig, map: MapLayout) -> Result<Self, SimError> {
        config.validate()?;
        map.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            stings: ProjectilePool::new(ShooterId::Hazard, config.sting_pool_capacity),
            director: SpawnDirector::new(&config),
            config,
            map,
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            clock: SessionClock::default(),
            players: Vec::new(),
            effects: EffectSet::default(),
            boss: None,
            devil: None,
            boss_warning_secs: 0.0,
            devil_notice_secs: 0.0,
            transition: TransitionMachine::default(),
            shop_customer: None,
            pending_skills: Vec::new(),
            summary: None,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            audio_events: Vec::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        let dt = self.time.dt();
        match self.phase {
            GamePhase::Active => {
                self.run_systems(dt);
                self.time.advance();
                self.clock.record(GamePhase::Active, dt);
            }
            GamePhase::Paused | GamePhase::Console | GamePhase::Shop => {
                self.clock.record(self.phase, dt);
            }
            GamePhase::VictoryFlash => {
                self.clock.record(GamePhase::VictoryFlash, dt);
                if let Some(outcome) = self.transition.update_victory() {
                    self.finish(outcome);
                }
            }
            GamePhase::Lobby | GamePhase::GameOver | GamePhase::Victory | GamePhase::Aborted => {}
        }

        self.snapshot()
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Session seconds used for spawn gating.
    pub fn session_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    pub fn devil(&self) -> Option<&Devil> {
        self.devil.as_ref()
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn transition(&self) -> &TransitionMachine {
        &self.transition
    }

    /// Final totals, present once the session reached a terminal state.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    #[cfg(test)]
    pub(crate) fn players_mut(&mut self) -> &mut [PlayerState] {
        &mut self.players
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn boss_mut(&mut self) -> Option<&mut Boss> {
        self.boss.as_mut()
    }

    /// Damage a player the way enemy contact does (for tests).
    #[cfg(test)]
    pub(crate) fn hurt_player(&mut self, slot: PlayerSlot, damage: i32) {
        self.damage_player(slot, damage);
    }

    /// Place the devil at a fixed spot (for tests).
    #[cfg(test)]
    pub(crate) fn place_devil(&mut self, position: DVec2) {
        self.devil = Some(Devil::new(position));
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartSession => {
                if self.phase == GamePhase::Lobby {
                    self.players = world_setup::setup_players(&self.config, &self.map);
                    self.phase = GamePhase::Active;
                    info!(
                        mode = ?self.config.mode,
                        seed = self.config.seed,
                        players = self.players.len(),
                        "session started"
                    );
                }
            }
            PlayerCommand::TogglePause => match self.phase {
                GamePhase::Active => self.phase = GamePhase::Paused,
                GamePhase::Paused => self.phase = GamePhase::Active,
                _ => {}
            },
            PlayerCommand::ToggleConsole => match self.phase {
                GamePhase::Active => self.phase = GamePhase::Console,
                GamePhase::Console => self.phase = GamePhase::Active,
                _ => {}
            },
            PlayerCommand::OpenConsole => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Console;
                }
            }
            PlayerCommand::CloseConsole => {
                if self.phase == GamePhase::Console {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::Quit => {
                if !self.phase.is_terminal() {
                    info!(phase = ?self.phase, "session aborted");
                    self.transition.abort();
                    self.finish(SessionOutcome::Aborted);
                }
            }
            PlayerCommand::Move { player, x, y } => {
                if let Some(state) = self.players.get_mut(player.index()) {
                    if state.is_alive() {
                        state.intent = DVec2::new(x, y).clamp(DVec2::splat(-1.0), DVec2::splat(1.0));
                    }
                }
            }
            PlayerCommand::ActivateSkill { player, slot } => {
                if self.phase == GamePhase::Active {
                    self.pending_skills.push((player, slot));
                }
            }
            PlayerCommand::Interact { player } => self.open_shop(player),
            PlayerCommand::Purchase { item } => self.purchase(item),
            PlayerCommand::CloseShop => {
                if self.phase == GamePhase::Shop {
                    self.phase = GamePhase::Active;
                    self.shop_customer = None;
                }
            }
            PlayerCommand::Cheat { cheat } => {
                if self.phase == GamePhase::Console {
                    self.apply_cheat(cheat);
                } else {
                    warn!(?cheat, "console command ignored, console is closed");
                }
            }
        }
    }

    fn open_shop(&mut self, slot: PlayerSlot) {
        if self.phase != GamePhase::Active {
            return;
        }
        let (Some(devil), Some(player)) = (self.devil.as_ref(), self.players.get(slot.index()))
        else {
            return;
        };
        if player.is_alive() && devil.can_interact(player.position) {
            self.phase = GamePhase::Shop;
            self.shop_customer = Some(slot);
            debug!(?slot, "shop opened");
        }
    }

    fn purchase(&mut self, item: ShopItem) {
        let customer = match (self.phase, self.shop_customer) {
            (GamePhase::Shop, Some(slot)) => slot,
            _ => {
                warn!(?item, error = %PurchaseError::ShopClosed, "purchase refused");
                return;
            }
        };
        let Some(player) = self.players.get_mut(customer.index()) else {
            return;
        };
        match shop::purchase(player, item) {
            Ok(levels) => {
                info!(?item, player = ?customer, currency = player.currency, "purchase");
                self.audio_events.push(AudioEvent::Purchase {
                    player: customer,
                    item,
                });
                if levels > 0 {
                    self.on_level_up(customer);
                }
            }
            Err(error) => warn!(?item, player = ?customer, %error, "purchase refused"),
        }
    }

    /// Admin console. Intentionally skips the usual invariant checks.
    fn apply_cheat(&mut self, cheat: CheatCommand) {
        info!(?cheat, "console command");
        match cheat {
            CheatCommand::AddMoney => {
                for player in &mut self.players {
                    player.currency += CHEAT_MONEY_AMOUNT;
                }
            }
            CheatCommand::Armor => {
                for player in self.players.iter_mut().filter(|p| p.is_alive()) {
                    player.apply_armor();
                }
            }
            CheatCommand::RestoreArmor => {
                for player in &mut self.players {
                    player.restore_armor();
                }
            }
            CheatCommand::TimeSkip => self.clock.skip(CHEAT_TIME_SKIP_SECS),
            CheatCommand::SpawnDevil => {
                if !self.config.devil_enabled {
                    warn!("devil is disabled for this session");
                } else if self.devil.is_none() {
                    self.devil = Some(world_setup::spawn_devil(&mut self.rng, &self.map));
                    self.announce_devil();
                }
            }
            CheatCommand::HighDamage => {
                for player in &mut self.players {
                    player.partner.pool.set_active_damage(CHEAT_PROJECTILE_DAMAGE);
                }
            }
            CheatCommand::SpawnBoss => {
                if self
                    .director
                    .spawn_boss(&self.map, &self.players, &mut self.boss)
                {
                    self.announce_boss();
                }
            }
            CheatCommand::NewSkills => self.grant_random_skills(),
        }
    }

    /// Give every player one random skill they do not own, distinct across
    /// players while the pool allows it.
    fn grant_random_skills(&mut self) {
        let mut granted: Vec<SkillKind> = Vec::new();
        for player in &mut self.players {
            let fresh: Vec<SkillKind> = SkillKind::ALL
                .iter()
                .copied()
                .filter(|k| !player.skills.owns(*k))
                .collect();
            let distinct: Vec<SkillKind> = fresh
                .iter()
                .copied()
                .filter(|k| !granted.contains(k))
                .collect();
            let pool = if distinct.is_empty() { &fresh } else { &distinct };
            let Some(&kind) = pool.choose(&mut self.rng) else {
                continue;
            };
            if player.skills.learn(kind).is_err() {
                player.skills.replace(0, kind);
            }
            granted.push(kind);
        }
    }

    fn announce_boss(&mut self) {
        self.boss_warning_secs = self.config.boss_warning_secs;
        self.audio_events.push(AudioEvent::BossWarning);
    }

    fn announce_devil(&mut self) {
        self.devil_notice_secs = DEVIL_NOTICE_SECS;
        self.audio_events.push(AudioEvent::DevilArrived);
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        // 1. Skill cooldowns, then activations requested this tick
        self.update_skills(dt);

        // 2. Entity updates
        systems::movement::run_players(&mut self.players, &self.map, dt);
        let ai = systems::enemy_ai::run(&mut self.world, &self.players);
        systems::movement::run_enemies(&mut self.world, &self.map, dt);
        for hit in ai.hits {
            self.damage_player(hit.player, hit.damage);
        }
        systems::projectiles::spawn_stings(&ai.stings, &mut self.stings);
        let players = &self.players;
        let boss_hit = self
            .boss
            .as_mut()
            .and_then(|boss| systems::enemy_ai::run_boss(boss, players, dt));
        if let Some(hit) = boss_hit {
            self.damage_player(hit.player, hit.damage);
        }
        self.update_devil(dt);

        // 3. Targeting
        let orders = systems::targeting::run(
            &self.world,
            self.boss.as_ref(),
            &mut self.players,
            self.config.shoot_radius,
            self.config.targeting_interval_ticks,
        );

        // 4. Projectile spawn
        systems::projectiles::spawn_partner_shots(&orders, &mut self.players, &mut self.audio_events);

        // 5. Projectile movement
        systems::projectiles::run(&mut self.players, &mut self.stings, &self.map, dt);

        // 6. Combat resolution
        let mut combat = systems::combat::resolve_projectile_hits(
            &mut self.world,
            &mut self.players,
            self.boss.as_mut(),
            &self.config,
            &mut self.audio_events,
        );
        for hit in systems::combat::resolve_sting_hits(&mut self.stings, &mut self.players) {
            self.on_player_hit(hit);
        }
        let pickups =
            systems::pickups::run(&mut self.world, &mut self.players, &mut self.despawn_buffer);
        for pickup in pickups.into_iter().filter(|p| p.levels_gained > 0) {
            self.on_level_up(pickup.player);
        }

        // 7. Effects
        combat = self.update_effects(dt, combat);

        // 8. Death / transition
        self.update_transition(dt, combat);
        if self.phase != GamePhase::Active {
            return;
        }

        // 9. Spawn director
        let events = self.director.run(
            &mut self.world,
            &mut self.rng,
            &self.map,
            &self.config,
            &self.players,
            self.clock.elapsed_secs(),
            self.effects.blocks_spawns(),
            &mut self.boss,
            &mut self.devil,
        );
        for event in events {
            match event {
                SpawnEvent::Boss => self.announce_boss(),
                SpawnEvent::Devil => self.announce_devil(),
                SpawnEvent::Enemy | SpawnEvent::Bi => {}
            }
        }

        // 10. Cleanup and on-screen timers
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        self.boss_warning_secs = (self.boss_warning_secs - dt).max(0.0);
        self.devil_notice_secs = (self.devil_notice_secs - dt).max(0.0);
    }

    fn update_skills(&mut self, dt: f64) {
        for player in &mut self.players {
            player.skills.update(dt);
        }
        for (slot, index) in std::mem::take(&mut self.pending_skills) {
            self.activate_skill(slot, index);
        }
    }

    /// Fire a skill-bar slot and produce its effect.
    fn activate_skill(&mut self, slot: PlayerSlot, index: usize) {
        let Some(player) = self.players.get_mut(slot.index()) else {
            return;
        };
        if !player.is_alive() {
            return;
        }
        let Some(kind) = player.skills.activate_skill(index) else {
            debug!(?slot, index, "skill not ready");
            return;
        };
        let position = player.position;

        match skill_def(kind).activation {
            SkillActivation::TargetedPoint => {
                let point = player.partner.target.unwrap_or(position);
                self.effects.add(Effect::area_strike(slot, point));
            }
            SkillActivation::PlayerCentered => {
                let missing = player.max_health - player.health;
                player.heal(missing);
                self.effects.add(Effect::heal(slot, position));
            }
            SkillActivation::EnemySetWide => {
                // Costs half the current health, never the last point.
                let cost = player.health / 2;
                player.health = (player.health - cost).max(1);
                let kills =
                    systems::combat::nuke_enemies(&mut self.world, &mut self.players, &self.config);
                self.effects.add(Effect::nuke(slot, position));
                info!(?slot, kills, "nuke");
            }
        }
        self.audio_events.push(AudioEvent::SkillActivated {
            player: slot,
            skill: kind,
        });
    }

    fn update_devil(&mut self, dt: f64) {
        let Some(devil) = self.devil.as_mut() else {
            return;
        };
        match devil.update(dt) {
            DevilTick::Pulse => {
                let kills =
                    systems::combat::devil_pulse(&mut self.world, devil.position, DEVIL_EFFECT_RADIUS);
                if kills > 0 {
                    debug!(kills, "devil pulse");
                }
            }
            DevilTick::Gone => {
                self.devil = None;
                debug!("devil left");
            }
            DevilTick::Idle => {}
        }
    }

    fn update_effects(&mut self, dt: f64, mut combat: CombatOutcome) -> CombatOutcome {
        let players = &self.players;
        let strikes = self
            .effects
            .update(dt, |slot| players.get(slot.index()).map(|p| p.position));
        if !strikes.is_empty() {
            combat.merge(systems::combat::apply_strikes(
                &mut self.world,
                self.boss.as_mut(),
                &strikes,
                &mut self.players,
                &self.config,
                &mut self.audio_events,
            ));
        }
        combat
    }

    fn update_transition(&mut self, dt: f64, combat: CombatOutcome) {
        if combat.boss_defeated {
            info!(tick = self.time.tick, "boss defeated");
            self.transition.begin_victory();
            self.phase = GamePhase::VictoryFlash;
            return;
        }

        for player in &mut self.players {
            if player.update_death_animation(dt) {
                debug!(slot = ?player.slot, "death animation complete");
            }
        }
        let states: Vec<PlayerDownState> = self
            .players
            .iter()
            .map(|p| PlayerDownState {
                down: !p.is_alive(),
                animation_complete: p.death_animation_complete,
            })
            .collect();
        if let Some(outcome) = self.transition.update_death(&states) {
            self.finish(outcome);
        }
    }

    fn damage_player(&mut self, slot: PlayerSlot, damage: i32) {
        let Some(player) = self.players.get_mut(slot.index()) else {
            return;
        };
        let outcome = player.apply_damage(damage);
        self.on_player_hit(PlayerHit {
            player: slot,
            outcome,
        });
    }

    fn on_player_hit(&mut self, hit: PlayerHit) {
        if hit.outcome == DamageOutcome::Killed {
            info!(player = ?hit.player, tick = self.time.tick, "player down");
            self.audio_events
                .push(AudioEvent::PlayerDeath { player: hit.player });
            self.transition.player_down(self.time.tick);
        }
    }

    fn on_level_up(&mut self, slot: PlayerSlot) {
        let Some(player) = self.players.get(slot.index()) else {
            return;
        };
        info!(player = ?slot, level = player.level, "level up");
        self.audio_events.push(AudioEvent::LevelUp {
            player: slot,
            level: player.level,
        });
        self.effects
            .add(Effect::generic(slot, player.position, LEVEL_UP_GLOW_SECS));
    }

    /// Enter a terminal phase and freeze the session summary.
    fn finish(&mut self, outcome: SessionOutcome) {
        self.phase = match outcome {
            SessionOutcome::GameOver => GamePhase::GameOver,
            SessionOutcome::Victory => GamePhase::Victory,
            SessionOutcome::Aborted => GamePhase::Aborted,
        };
        self.shop_customer = None;
        self.pending_skills.clear();

        let players: Vec<PlayerSummary> = self
            .players
            .iter()
            .map(|p| PlayerSummary {
                slot: p.slot,
                level: p.level,
                xp: p.xp,
                currency: p.currency,
            })
            .collect();
        let summary = SessionSummary {
            outcome,
            mode: self.config.mode,
            score: SessionSummary::compute_score(outcome, self.config.mode, &players),
            session_secs: self.clock.elapsed_secs(),
            ticks: self.time.tick,
            players,
        };
        info!(?outcome, score = summary.score, "session finished");
        self.summary = Some(summary);
    }

    fn snapshot(&mut self) -> GameStateSnapshot {
        let audio_events = std::mem::take(&mut self.audio_events);
        let source = SnapshotSource {
            world: &self.world,
            time: self.time,
            phase: self.phase,
            mode: self.config.mode,
            session_secs: self.clock.elapsed_secs(),
            players: &self.players,
            stings: &self.stings,
            effects: &self.effects,
            boss: self.boss.as_ref(),
            devil: self.devil.as_ref(),
            boss_warning_secs: self.boss_warning_secs,
            devil_notice_secs: self.devil_notice_secs,
            transition: &self.transition,
            summary: self.summary.as_ref(),
        };
        systems::snapshot::build_snapshot(&source, audio_events)
    }
}
