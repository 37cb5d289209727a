//! Game state snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::AudioEvent;
use crate::types::{PlayerSlot, Position, ShooterId, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    /// Session clock seconds (pause and console time excluded).
    pub session_secs: f64,
    pub players: Vec<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub orbs: Vec<OrbView>,
    pub effects: Vec<EffectView>,
    pub boss: Option<BossView>,
    pub devil: Option<DevilView>,
    /// Seconds left on the on-screen boss warning (0 when hidden).
    pub boss_warning_secs: f64,
    /// Seconds left on the devil arrival notice (0 when hidden).
    pub devil_notice_secs: f64,
    pub transition: TransitionView,
    pub camera: CameraView,
    pub audio_events: Vec<AudioEvent>,
    /// Present once the session reached a terminal state.
    pub summary: Option<SessionSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub slot: PlayerSlot,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub health_ratio: f64,
    pub xp: u32,
    pub max_xp: u32,
    pub xp_ratio: f64,
    pub level: u32,
    pub currency: u32,
    pub life: LifeState,
    pub animation: AnimationKey,
    pub partner: PartnerView,
    pub skills: Vec<SkillSlotView>,
    pub speed_buff_secs: f64,
    pub regen_buff_secs: f64,
    /// Standing next to the devil: the interact prompt is shown.
    pub can_interact: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerView {
    pub kind: PartnerKind,
    pub position: Position,
    pub shooting: bool,
    pub target: Option<Position>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSlotView {
    pub skill: Option<SkillKind>,
    pub cooldown_remaining: f64,
    pub cooldown_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub dying: bool,
    pub stunned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub owner: ShooterId,
    pub position: Position,
    pub damage: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbView {
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub position: Position,
    /// 0.0 - 1.0.
    pub alpha: f64,
    pub fading: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub defeated: bool,
    pub enraged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevilView {
    pub position: Position,
    pub radius: f64,
    pub fading: bool,
    /// 0.0 - 1.0.
    pub alpha: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionView {
    pub stage: TransitionStage,
    /// Screen overlay alpha, 0 - 255.
    pub fade_alpha: u32,
    /// Tick of the frozen background captured when the first player went down.
    pub snapshot_tick: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraView {
    /// Midpoint of living players, or the survivor.
    pub focus: Position,
    /// Coop players far apart get one viewport each.
    pub split: bool,
}

/// Final totals exposed at terminal state for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub outcome: SessionOutcome,
    pub mode: GameMode,
    pub score: u64,
    pub session_secs: f64,
    pub ticks: u64,
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub slot: PlayerSlot,
    pub level: u32,
    pub xp: u32,
    pub currency: u32,
}

impl SessionSummary {
    /// A solo game over scores progress. Coop game overs and victories score
    /// the session currency. An abort scores nothing.
    pub fn compute_score(
        outcome: SessionOutcome,
        mode: GameMode,
        players: &[PlayerSummary],
    ) -> u64 {
        let currency: u64 = players.iter().map(|p| p.currency as u64).sum();
        match (outcome, mode) {
            (SessionOutcome::GameOver, GameMode::Solo) => players
                .iter()
                .map(|p| p.level as u64 * 100 + p.xp as u64)
                .sum(),
            (SessionOutcome::GameOver, GameMode::Coop) | (SessionOutcome::Victory, _) => currency,
            (SessionOutcome::Aborted, _) => 0,
        }
    }
}
