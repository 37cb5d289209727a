//! The devil: a recurring world hazard that also runs the shop.
//!
//! It stays for a while, hurting enemies that wander inside its radius, then
//! fades out. Players standing inside the radius may open the shop.

use glam::DVec2;

use gollux_core::constants::*;
use gollux_core::state::DevilView;
use gollux_core::types::Position;

#[derive(Debug, Clone)]
pub struct Devil {
    pub position: DVec2,
    pub age_secs: f64,
    pub fading: bool,
    pub fade_remaining_secs: f64,
    pub pulse_cooldown_ticks: u32,
}

/// What the devil did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevilTick {
    Idle,
    /// Damage every enemy inside the radius.
    Pulse,
    /// Fade finished; remove the devil.
    Gone,
}

impl Devil {
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            age_secs: 0.0,
            fading: false,
            fade_remaining_secs: 0.0,
            pulse_cooldown_ticks: DEVIL_PULSE_INTERVAL_TICKS,
        }
    }

    pub fn update(&mut self, dt: f64) -> DevilTick {
        self.age_secs += dt;
        if self.fading {
            self.fade_remaining_secs -= dt;
            if self.fade_remaining_secs <= 0.0 {
                return DevilTick::Gone;
            }
            return DevilTick::Idle;
        }
        if self.age_secs >= DEVIL_STAY_SECS {
            self.fading = true;
            self.fade_remaining_secs = DEVIL_FADE_SECS;
            return DevilTick::Idle;
        }
        self.pulse_cooldown_ticks = self.pulse_cooldown_ticks.saturating_sub(1);
        if self.pulse_cooldown_ticks == 0 {
            self.pulse_cooldown_ticks = DEVIL_PULSE_INTERVAL_TICKS;
            return DevilTick::Pulse;
        }
        DevilTick::Idle
    }

    /// Strictly inside the effect radius.
    pub fn in_range(&self, point: DVec2) -> bool {
        self.position.distance(point) < DEVIL_EFFECT_RADIUS
    }

    /// Interaction affordance: in range and not on the way out.
    pub fn can_interact(&self, point: DVec2) -> bool {
        !self.fading && self.in_range(point)
    }

    pub fn alpha(&self) -> f64 {
        if self.fading {
            (self.fade_remaining_secs / DEVIL_FADE_SECS).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn view(&self) -> DevilView {
        DevilView {
            position: Position(self.position),
            radius: DEVIL_EFFECT_RADIUS,
            fading: self.fading,
            alpha: self.alpha(),
        }
    }
}
