//! Simulation constants and tuning parameters.
//!
//! These are the defaults baked into `SessionConfig`; anything a session
//! may want to tune goes through the config instead of reading these directly.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Movement speeds are authored per frame at this rate and scaled by `dt`.
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

/// Diagonal input is scaled by this factor so it is not faster than straight input.
pub const DIAGONAL_FACTOR: f64 = 0.7071;

// --- World ---

/// Default map size in pixels.
pub const WORLD_WIDTH: f64 = 2560.0;
pub const WORLD_HEIGHT: f64 = 2560.0;

// --- Players ---

pub const PLAYER_SPEED: f64 = 5.0;
pub const PLAYER_MAX_HEALTH: i32 = 100;
pub const PLAYER_START_MAX_XP: u32 = 100;
pub const PLAYER_HALF_WIDTH: f64 = 16.0;
pub const PLAYER_HALF_HEIGHT: f64 = 24.0;

/// Horizontal distance between the two coop players at session start.
pub const COOP_START_OFFSET: f64 = 100.0;

/// `max_xp` grows to this percentage of itself on every level-up (floored).
pub const LEVEL_UP_XP_GROWTH_PERCENT: u32 = 120;

/// Max health gained per level.
pub const LEVEL_UP_HEALTH_BONUS: i32 = 20;

/// Death animation: frames and seconds per frame.
pub const DEATH_ANIMATION_FRAMES: u32 = 6;
pub const DEATH_FRAME_SECS: f64 = 0.1;

// --- Partner (shooter companion) ---

/// Offset of the partner's muzzle relative to its player.
pub const PARTNER_OFFSET_X: f64 = -40.0;
pub const PARTNER_OFFSET_Y: f64 = -40.0;

/// Per-tick lerp factor for the partner following its player.
pub const PARTNER_FOLLOW_RATE: f64 = 0.15;

// --- Projectiles ---

/// Projectile pool capacity per shooter.
pub const PROJECTILE_POOL_CAPACITY: usize = 20;

/// Shared pool capacity for hazard stings.
pub const STING_POOL_CAPACITY: usize = 30;

pub const PROJECTILE_SPEED: f64 = 10.0;
pub const PROJECTILE_LIFETIME_TICKS: u32 = 120;
pub const PROJECTILE_HALF_SIZE: f64 = 6.0;

pub const EAGLE_PROJECTILE_DAMAGE: i32 = 10;
pub const SKULL_PROJECTILE_DAMAGE: i32 = 20;

/// Damage value written into live projectiles by the high-damage cheat.
pub const CHEAT_PROJECTILE_DAMAGE: i32 = 1000;

// --- Targeting ---

pub const SHOOT_RADIUS: f64 = 500.0;
pub const TARGETING_INTERVAL_TICKS: u32 = 30;

// --- Enemies ---

pub const ENEMY_SPAWN_INTERVAL_TICKS: u32 = 60;
pub const ENEMY_POPULATION_CAP: usize = 15;

/// Ring around the players' midpoint on which enemies appear.
pub const ENEMY_SPAWN_MIN_DISTANCE: f64 = 500.0;
pub const ENEMY_SPAWN_MAX_DISTANCE: f64 = 700.0;

pub const GRUNT_MAX_HEALTH: i32 = 30;
pub const GRUNT_SPEED: f64 = 2.0;
pub const GRUNT_CONTACT_DAMAGE: i32 = 10;
pub const GRUNT_ATTACK_INTERVAL_TICKS: u32 = 60;
pub const GRUNT_HALF_SIZE: f64 = 16.0;

/// Ticks an enemy stays frozen after being hit.
pub const ENEMY_HIT_STUN_TICKS: u32 = 6;

/// Ticks an enemy remains in the world (non-targetable) after lethal damage.
pub const ENEMY_DYING_TICKS: u32 = 30;

// --- Bi hazard enemies ---

pub const BI_SPAWN_FLOOR_SECS: f64 = 60.0;
pub const BI_SPAWN_INTERVAL_TICKS: u32 = 200;
pub const BI_POPULATION_CAP: usize = 3;
pub const BI_MAX_HEALTH: i32 = 20;
pub const BI_SPEED: f64 = 2.5;
pub const BI_HALF_SIZE: f64 = 14.0;
pub const BI_PREFERRED_RANGE: f64 = 250.0;
pub const BI_FIRE_RANGE: f64 = 400.0;
pub const BI_FIRE_INTERVAL_TICKS: u32 = 120;
pub const STING_DAMAGE: i32 = 5;
pub const STING_SPEED: f64 = 6.0;
pub const STING_LIFETIME_TICKS: u32 = 180;

// --- Experience orbs ---

pub const ORB_XP: u32 = 5;
pub const ORB_CURRENCY: u32 = 5;
pub const ORB_HALF_SIZE: f64 = 8.0;

// --- Rewards ---

pub const SOLO_KILL_REWARD: u32 = 5;
pub const COOP_KILL_REWARD_FIRST: u32 = 3;
pub const COOP_KILL_REWARD_SECOND: u32 = 2;
pub const BOSS_DEFEAT_REWARD: u32 = 1000;

// --- Boss ---

pub const BOSS_SPAWN_SECS: f64 = 300.0;
pub const BOSS_WARNING_SECS: f64 = 3.0;
pub const BOSS_MAX_HEALTH: i32 = 2000;
pub const BOSS_SPEED: f64 = 1.5;
pub const BOSS_ENRAGE_SPEED_FACTOR: f64 = 1.5;
pub const BOSS_CONTACT_DAMAGE: i32 = 25;
pub const BOSS_ATTACK_INTERVAL_TICKS: u32 = 90;
pub const BOSS_HALF_SIZE: f64 = 64.0;

// --- Devil hazard (solo only) ---

pub const DEVIL_FIRST_SPAWN_SECS: f64 = 120.0;
pub const DEVIL_SPAWN_INTERVAL_SECS: f64 = 120.0;
pub const DEVIL_STAY_SECS: f64 = 45.0;
pub const DEVIL_FADE_SECS: f64 = 1.0;
pub const DEVIL_EFFECT_RADIUS: f64 = 150.0;
pub const DEVIL_PULSE_INTERVAL_TICKS: u32 = 60;
pub const DEVIL_PULSE_DAMAGE: i32 = 15;
pub const DEVIL_NOTICE_SECS: f64 = 2.5;
/// Keep the devil this far from the map edge.
pub const DEVIL_EDGE_MARGIN: f64 = 200.0;

// --- Skills ---

pub const THUNDER_COOLDOWN_SECS: f64 = 5.0;
pub const THUNDER_DAMAGE: i32 = 40;
pub const THUNDER_RADIUS: f64 = 200.0;
pub const THUNDER_STRIKE_DELAY_SECS: f64 = 0.3;
pub const THUNDER_DURATION_SECS: f64 = 1.0;

pub const HEAL_COOLDOWN_SECS: f64 = 10.0;
pub const HEAL_DURATION_SECS: f64 = 1.0;

pub const NUKE_COOLDOWN_SECS: f64 = 20.0;
pub const NUKE_DURATION_SECS: f64 = 3.0;

/// Skill bar slot counts.
pub const SOLO_SKILL_SLOTS: usize = 3;
pub const COOP_SKILL_SLOTS: usize = 1;

/// Remaining cooldown below this snaps to zero.
pub const COOLDOWN_EPSILON: f64 = 1e-9;

// --- Effects ---

/// Effects are removed after this long no matter what they declared.
pub const EFFECT_MAX_LIFETIME_SECS: f64 = 5.0;
pub const EFFECT_FADE_SECS: f64 = 0.5;

// --- Potions ---

pub const HEALTH_POTION_AMOUNT: i32 = 20;
pub const XP_POTION_AMOUNT: u32 = 50;
pub const SPEED_POTION_SECS: f64 = 10.0;
pub const SPEED_POTION_MULTIPLIER: f64 = 1.5;
pub const REGEN_POTION_SECS: f64 = 15.0;
pub const REGEN_PER_SEC: f64 = 1.0;

// --- Death / victory transitions ---

pub const FADE_ALPHA_MAX: u32 = 255;
pub const FADE_ALPHA_STEP: u32 = 15;
pub const FADE_HOLD_TICKS: u32 = 5;
pub const VICTORY_FLASH_TICKS: u32 = 132;

// --- Camera ---

/// Coop players farther apart than this get split viewports.
pub const CAMERA_SPLIT_DISTANCE: f64 = 600.0;

// --- Admin console ---

pub const CHEAT_MONEY_AMOUNT: u32 = 10_000;
pub const CHEAT_ARMOR_HEALTH: i32 = 1000;
pub const CHEAT_TIME_SKIP_SECS: f64 = 230.0;
