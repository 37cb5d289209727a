//! Skill effects: transient objects with their own lifetime.
//!
//! An effect runs until its declared duration ends, then fades out and is
//! removed. Independently of that, nothing outlives the hard lifetime cap.

use glam::DVec2;

use gollux_core::constants::*;
use gollux_core::enums::EffectKind;
use gollux_core::state::EffectView;
use gollux_core::types::{PlayerSlot, Position};

/// Delayed area damage carried by strike effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaDamage {
    pub amount: i32,
    pub radius: f64,
    pub delay_secs: f64,
    pub applied: bool,
}

/// Damage an effect wants applied this tick. Resolved by the combat system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeOrder {
    pub owner: PlayerSlot,
    pub center: DVec2,
    pub radius: f64,
    pub damage: i32,
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub owner: PlayerSlot,
    pub position: DVec2,
    /// Effects glued to their caster move with it.
    pub follows_owner: bool,
    pub age_secs: f64,
    pub duration_secs: f64,
    pub blocks_spawns: bool,
    pub fading: bool,
    pub fade_remaining_secs: f64,
    pub area_damage: Option<AreaDamage>,
}

impl Effect {
    fn base(kind: EffectKind, owner: PlayerSlot, position: DVec2, duration_secs: f64) -> Self {
        Self {
            kind,
            owner,
            position,
            follows_owner: false,
            age_secs: 0.0,
            duration_secs,
            blocks_spawns: false,
            fading: false,
            fade_remaining_secs: 0.0,
            area_damage: None,
        }
    }

    pub fn heal(owner: PlayerSlot, position: DVec2) -> Self {
        Self {
            follows_owner: true,
            ..Self::base(EffectKind::Heal, owner, position, HEAL_DURATION_SECS)
        }
    }

    pub fn nuke(owner: PlayerSlot, position: DVec2) -> Self {
        Self {
            blocks_spawns: true,
            ..Self::base(EffectKind::Nuke, owner, position, NUKE_DURATION_SECS)
        }
    }

    pub fn area_strike(owner: PlayerSlot, position: DVec2) -> Self {
        Self {
            area_damage: Some(AreaDamage {
                amount: THUNDER_DAMAGE,
                radius: THUNDER_RADIUS,
                delay_secs: THUNDER_STRIKE_DELAY_SECS,
                applied: false,
            }),
            ..Self::base(EffectKind::AreaStrike, owner, position, THUNDER_DURATION_SECS)
        }
    }

    /// Cosmetic effect with no gameplay impact (level-up glow).
    pub fn generic(owner: PlayerSlot, position: DVec2, duration_secs: f64) -> Self {
        Self {
            follows_owner: true,
            ..Self::base(EffectKind::Generic, owner, position, duration_secs)
        }
    }

    /// 1.0 while running, ramping to 0.0 during the fade.
    pub fn alpha(&self) -> f64 {
        if self.fading {
            (self.fade_remaining_secs / EFFECT_FADE_SECS).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Advance one tick. Returns false once the effect should be removed.
    fn update(&mut self, dt: f64, owner_position: Option<DVec2>, strikes: &mut Vec<StrikeOrder>) -> bool {
        self.age_secs += dt;
        if self.age_secs >= EFFECT_MAX_LIFETIME_SECS {
            return false;
        }
        if self.follows_owner {
            if let Some(position) = owner_position {
                self.position = position;
            }
        }
        if let Some(area) = self.area_damage.as_mut() {
            if !area.applied && self.age_secs >= area.delay_secs {
                area.applied = true;
                strikes.push(StrikeOrder {
                    owner: self.owner,
                    center: self.position,
                    radius: area.radius,
                    damage: area.amount,
                });
            }
        }
        if self.fading {
            self.fade_remaining_secs -= dt;
            return self.fade_remaining_secs > 0.0;
        }
        if self.age_secs >= self.duration_secs {
            self.fading = true;
            self.fade_remaining_secs = EFFECT_FADE_SECS;
        }
        true
    }

    pub fn view(&self) -> EffectView {
        EffectView {
            kind: self.kind,
            position: Position(self.position),
            alpha: self.alpha(),
            fading: self.fading,
        }
    }
}

/// All live effects, in spawn order.
#[derive(Debug, Clone, Default)]
pub struct EffectSet {
    effects: Vec<Effect>,
}

impl EffectSet {
    pub fn add(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Whether any live effect suppresses regular enemy spawns.
    pub fn blocks_spawns(&self) -> bool {
        self.effects.iter().any(|e| e.blocks_spawns)
    }

    /// Update every effect and drop the finished ones. Area damage that came
    /// due is returned for the combat system to resolve.
    pub fn update(
        &mut self,
        dt: f64,
        owner_position: impl Fn(PlayerSlot) -> Option<DVec2>,
    ) -> Vec<StrikeOrder> {
        let mut strikes = Vec::new();
        self.effects
            .retain_mut(|effect| effect.update(dt, owner_position(effect.owner), &mut strikes));
        strikes
    }
}
