//! Death and victory sequencing.
//!
//! Death path: players go down, the screen waits for a death animation to
//! finish, fades to black, holds briefly, then reports game over.
//! Victory path: boss defeat plays a fixed-length flash, then reports victory.
//! A quit aborts either path immediately.

use gollux_core::constants::*;
use gollux_core::enums::{SessionOutcome, TransitionStage};
use gollux_core::state::TransitionView;

/// Down-state of one player, as seen by the transition machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDownState {
    /// Health ran out (dying or dead).
    pub down: bool,
    pub animation_complete: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TransitionMachine {
    stage: TransitionStage,
    fade_alpha: u32,
    hold_ticks: u32,
    flash_ticks: u32,
    snapshot_tick: Option<u64>,
}

impl TransitionMachine {
    pub fn stage(&self) -> TransitionStage {
        self.stage
    }

    pub fn fade_alpha(&self) -> u32 {
        self.fade_alpha
    }

    pub fn snapshot_tick(&self) -> Option<u64> {
        self.snapshot_tick
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.stage,
            TransitionStage::GameOver | TransitionStage::Victory | TransitionStage::Aborted
        )
    }

    /// A player just went down. The background snapshot is captured once,
    /// at the first such instant.
    pub fn player_down(&mut self, tick: u64) {
        if self.snapshot_tick.is_none() {
            self.snapshot_tick = Some(tick);
        }
        if self.stage == TransitionStage::None {
            self.stage = TransitionStage::AwaitingAnimation;
        }
    }

    /// Advance the death path. The fade starts once every player is down and
    /// at least one of them finished its death animation.
    pub fn update_death(&mut self, players: &[PlayerDownState]) -> Option<SessionOutcome> {
        match self.stage {
            TransitionStage::None | TransitionStage::AwaitingAnimation => {
                let all_down = !players.is_empty() && players.iter().all(|p| p.down);
                let any_complete = players.iter().any(|p| p.animation_complete);
                if all_down && any_complete {
                    self.stage = TransitionStage::ScreenFadeOut;
                    self.fade_alpha = 0;
                    self.hold_ticks = 0;
                }
                None
            }
            TransitionStage::ScreenFadeOut => {
                if self.fade_alpha < FADE_ALPHA_MAX {
                    self.fade_alpha = (self.fade_alpha + FADE_ALPHA_STEP).min(FADE_ALPHA_MAX);
                    return None;
                }
                self.hold_ticks += 1;
                if self.hold_ticks >= FADE_HOLD_TICKS {
                    self.stage = TransitionStage::GameOver;
                    return Some(SessionOutcome::GameOver);
                }
                None
            }
            _ => None,
        }
    }

    /// Boss defeated: switch to the victory flash. Overrides a pending death fade.
    pub fn begin_victory(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.stage = TransitionStage::VictoryFlash;
        self.flash_ticks = 0;
        self.fade_alpha = 0;
    }

    /// Advance the victory flash by one tick.
    pub fn update_victory(&mut self) -> Option<SessionOutcome> {
        if self.stage != TransitionStage::VictoryFlash {
            return None;
        }
        self.flash_ticks += 1;
        self.fade_alpha = victory_flash_alpha(self.flash_ticks);
        if self.flash_ticks >= VICTORY_FLASH_TICKS {
            self.stage = TransitionStage::Victory;
            self.fade_alpha = 0;
            return Some(SessionOutcome::Victory);
        }
        None
    }

    /// Quit: drop whatever was pending.
    pub fn abort(&mut self) {
        *self = Self {
            stage: TransitionStage::Aborted,
            ..Self::default()
        };
    }

    pub fn view(&self) -> TransitionView {
        TransitionView {
            stage: self.stage,
            fade_alpha: self.fade_alpha,
            snapshot_tick: self.snapshot_tick,
        }
    }
}

const FLASH_STEP: u32 = 5;
const FLASH_RAMP_TICKS: u32 = FADE_ALPHA_MAX / FLASH_STEP;
const FLASH_HOLD_TICKS: u32 = VICTORY_FLASH_TICKS - 2 * FLASH_RAMP_TICKS;

/// White flash: ramp up, hold, ramp down.
fn victory_flash_alpha(tick: u32) -> u32 {
    if tick <= FLASH_RAMP_TICKS {
        tick * FLASH_STEP
    } else if tick <= FLASH_RAMP_TICKS + FLASH_HOLD_TICKS {
        FADE_ALPHA_MAX
    } else {
        let down = tick - FLASH_RAMP_TICKS - FLASH_HOLD_TICKS;
        FADE_ALPHA_MAX.saturating_sub(down * FLASH_STEP)
    }
}
