//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Session mode: one player, or two players sharing one world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Solo,
    Coop,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Engine built, session not started yet.
    #[default]
    Lobby,
    Active,
    /// Pause menu open. Ticks are skipped and excluded from session time.
    Paused,
    /// Admin console open. Ticks are skipped and excluded from session time.
    Console,
    /// Devil shop open. Ticks are skipped but still count as session time.
    Shop,
    /// Boss defeated, full-screen flash playing. World is frozen.
    VictoryFlash,
    GameOver,
    Victory,
    /// Quit signal received. All pending transitions were discarded.
    Aborted,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GamePhase::GameOver | GamePhase::Victory | GamePhase::Aborted
        )
    }
}

/// Regular enemy archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Melee chaser that deals contact damage.
    Grunt,
    /// Ranged hazard that keeps its distance and fires stings.
    Bi,
}

/// Partner companion type. Decides the projectile damage profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartnerKind {
    #[default]
    Eagle,
    Skull,
}

/// All learnable skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    ThunderStrike,
    Heal,
    Nuke,
}

impl SkillKind {
    pub const ALL: [SkillKind; 3] = [SkillKind::ThunderStrike, SkillKind::Heal, SkillKind::Nuke];

    pub fn name(self) -> &'static str {
        match self {
            SkillKind::ThunderStrike => "Thunder Strike",
            SkillKind::Heal => "Heal",
            SkillKind::Nuke => "Nuke",
        }
    }
}

/// How a skill's effect is produced once activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillActivation {
    /// Centered at an arbitrary point.
    TargetedPoint,
    /// Needs the full caster (reads/mutates the caster's health).
    PlayerCentered,
    /// Receives the live enemy collection.
    EnemySetWide,
}

/// Things the devil sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    HealthPotion,
    XpPotion,
    SpeedPotion,
    RegenPotion,
    Skill(SkillKind),
    SkullPartner,
}

impl ShopItem {
    pub fn price(self) -> u32 {
        match self {
            ShopItem::HealthPotion => 50,
            ShopItem::XpPotion => 100,
            ShopItem::SpeedPotion => 150,
            ShopItem::RegenPotion => 200,
            ShopItem::Skill(SkillKind::ThunderStrike) => 200,
            ShopItem::Skill(SkillKind::Heal) => 500,
            ShopItem::Skill(SkillKind::Nuke) => 700,
            ShopItem::SkullPartner => 1000,
        }
    }
}

/// Eight-way facing derived from the last movement input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Facing {
    /// Facing for an input direction, or `None` when there is no input.
    pub fn from_input(dx: f64, dy: f64) -> Option<Self> {
        let horizontal = dx.partial_cmp(&0.0)?;
        let vertical = dy.partial_cmp(&0.0)?;
        use std::cmp::Ordering::*;
        match (horizontal, vertical) {
            (Greater, Greater) => Some(Facing::DownRight),
            (Greater, Less) => Some(Facing::UpRight),
            (Greater, Equal) => Some(Facing::Right),
            (Less, Greater) => Some(Facing::DownLeft),
            (Less, Less) => Some(Facing::UpLeft),
            (Less, Equal) => Some(Facing::Left),
            (Equal, Greater) => Some(Facing::Down),
            (Equal, Less) => Some(Facing::Up),
            (Equal, Equal) => None,
        }
    }
}

/// Player life state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    /// Lethal damage taken, death animation running.
    Dying,
    /// Death animation complete. Out of the active set.
    Dead,
}

/// What dealt the killing blow to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillSource {
    Projectile,
    Skill,
    /// World hazards (devil). Kills give no orb and no currency.
    Hazard,
}

/// Death/victory sequencing stage, mirrored in snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionStage {
    #[default]
    None,
    /// At least one player died; waiting for the fade-out condition.
    AwaitingAnimation,
    ScreenFadeOut,
    VictoryFlash,
    GameOver,
    Victory,
    Aborted,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    GameOver,
    Victory,
    Aborted,
}

/// Tagged effect kinds spawned by skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Heal,
    /// Blocks regular enemy spawns while alive.
    Nuke,
    /// Thunder strike area damage.
    AreaStrike,
    Generic,
}

/// Renderer-facing animation key. The renderer maps it to sprite frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "anim")]
pub enum AnimationKey {
    Idle { facing: Facing },
    Walk { facing: Facing },
    Death { frame: u32 },
}

impl Default for AnimationKey {
    fn default() -> Self {
        AnimationKey::Idle {
            facing: Facing::default(),
        }
    }
}
