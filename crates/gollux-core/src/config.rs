//! Session configuration and map layout.
//!
//! `SessionConfig` is built from the defaults in [`crate::constants`] and may be
//! overridden field by field from JSON. Missing fields keep their default.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::GameMode;
use crate::error::SimError;
use crate::types::Aabb;

/// Every tunable a session reads at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub seed: u64,

    // --- Targeting / projectiles ---
    pub shoot_radius: f64,
    pub targeting_interval_ticks: u32,
    pub projectile_pool_capacity: usize,
    pub sting_pool_capacity: usize,

    // --- Spawning ---
    pub enemy_spawn_interval_ticks: u32,
    pub enemy_population_cap: usize,
    pub bi_spawn_floor_secs: f64,
    pub bi_spawn_interval_ticks: u32,
    pub bi_population_cap: usize,
    pub boss_spawn_secs: f64,
    pub boss_warning_secs: f64,
    pub devil_enabled: bool,
    pub devil_first_spawn_secs: f64,
    pub devil_spawn_interval_secs: f64,

    // --- Rewards ---
    /// Currency per regular kill, one entry per player slot.
    pub kill_reward_split: Vec<u32>,
    pub boss_reward: u32,

    // --- Skills ---
    pub skill_slots: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::solo()
    }
}

impl SessionConfig {
    pub fn solo() -> Self {
        Self {
            mode: GameMode::Solo,
            seed: 42,
            shoot_radius: SHOOT_RADIUS,
            targeting_interval_ticks: TARGETING_INTERVAL_TICKS,
            projectile_pool_capacity: PROJECTILE_POOL_CAPACITY,
            sting_pool_capacity: STING_POOL_CAPACITY,
            enemy_spawn_interval_ticks: ENEMY_SPAWN_INTERVAL_TICKS,
            enemy_population_cap: ENEMY_POPULATION_CAP,
            bi_spawn_floor_secs: BI_SPAWN_FLOOR_SECS,
            bi_spawn_interval_ticks: BI_SPAWN_INTERVAL_TICKS,
            bi_population_cap: BI_POPULATION_CAP,
            boss_spawn_secs: BOSS_SPAWN_SECS,
            boss_warning_secs: BOSS_WARNING_SECS,
            devil_enabled: true,
            devil_first_spawn_secs: DEVIL_FIRST_SPAWN_SECS,
            devil_spawn_interval_secs: DEVIL_SPAWN_INTERVAL_SECS,
            kill_reward_split: vec![SOLO_KILL_REWARD],
            boss_reward: BOSS_DEFEAT_REWARD,
            skill_slots: SOLO_SKILL_SLOTS,
        }
    }

    /// Two players, 3/2 kill split, one skill slot each, no devil.
    pub fn coop() -> Self {
        Self {
            mode: GameMode::Coop,
            devil_enabled: false,
            kill_reward_split: vec![COOP_KILL_REWARD_FIRST, COOP_KILL_REWARD_SECOND],
            skill_slots: COOP_SKILL_SLOTS,
            ..Self::solo()
        }
    }

    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Solo => Self::solo(),
            GameMode::Coop => Self::coop(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn player_count(&self) -> usize {
        match self.mode {
            GameMode::Solo => 1,
            GameMode::Coop => 2,
        }
    }

    /// Kill reward for a player slot index. Slots past the split get nothing.
    pub fn kill_reward_for(&self, index: usize) -> u32 {
        self.kill_reward_split.get(index).copied().unwrap_or(0)
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json).map_err(|source| SimError::Parse {
            what: "session config",
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.shoot_radius <= 0.0 {
            return Err(SimError::InvalidConfig("shoot_radius must be positive".into()));
        }
        if self.targeting_interval_ticks == 0 {
            return Err(SimError::InvalidConfig(
                "targeting_interval_ticks must be at least 1".into(),
            ));
        }
        if self.enemy_spawn_interval_ticks == 0 || self.bi_spawn_interval_ticks == 0 {
            return Err(SimError::InvalidConfig(
                "spawn intervals must be at least 1 tick".into(),
            ));
        }
        if self.skill_slots == 0 {
            return Err(SimError::InvalidConfig("skill_slots must be at least 1".into()));
        }
        if self.devil_enabled && self.mode == GameMode::Coop {
            return Err(SimError::InvalidConfig(
                "the devil is only available in solo sessions".into(),
            ));
        }
        Ok(())
    }
}

/// The static world: bounds plus solid obstacles (fences, trees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub obstacles: Vec<Aabb>,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            obstacles: Vec::new(),
        }
    }
}

impl MapLayout {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let layout: Self = serde_json::from_str(json).map_err(|source| SimError::Parse {
            what: "map layout",
            source,
        })?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_corner(0.0, 0.0, self.width, self.height)
    }

    pub fn center(&self) -> glam::DVec2 {
        self.bounds().center
    }

    /// Whether a box collides with any obstacle.
    pub fn blocked(&self, aabb: &Aabb) -> bool {
        self.obstacles.iter().any(|o| o.intersects(aabb))
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SimError::InvalidMap(format!(
                "map size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let bounds = self.bounds();
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if obstacle.half_extents.x <= 0.0 || obstacle.half_extents.y <= 0.0 {
                return Err(SimError::InvalidMap(format!("obstacle {i} has no area")));
            }
            if !bounds.contains(obstacle) {
                return Err(SimError::InvalidMap(format!(
                    "obstacle {i} lies outside the map"
                )));
            }
        }
        if self.blocked(&Aabb::new(
            self.center(),
            glam::DVec2::new(PLAYER_HALF_WIDTH + COOP_START_OFFSET, PLAYER_HALF_HEIGHT),
        )) {
            return Err(SimError::InvalidMap(
                "player start area at the map center is blocked".into(),
            ));
        }
        Ok(())
    }
}
