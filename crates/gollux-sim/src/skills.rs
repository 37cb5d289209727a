//! Skill definitions and per-player skill bars.
//!
//! Definitions are immutable and shared. Cooldown state belongs to the bar
//! slot that holds a skill, so the same skill in two bars cools independently.

use gollux_core::constants::*;
use gollux_core::enums::{SkillActivation, SkillKind};
use gollux_core::error::PurchaseError;
use gollux_core::state::SkillSlotView;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillDef {
    pub kind: SkillKind,
    pub cooldown_secs: f64,
    pub activation: SkillActivation,
}

pub fn skill_def(kind: SkillKind) -> SkillDef {
    match kind {
        SkillKind::ThunderStrike => SkillDef {
            kind,
            cooldown_secs: THUNDER_COOLDOWN_SECS,
            activation: SkillActivation::TargetedPoint,
        },
        SkillKind::Heal => SkillDef {
            kind,
            cooldown_secs: HEAL_COOLDOWN_SECS,
            activation: SkillActivation::PlayerCentered,
        },
        SkillKind::Nuke => SkillDef {
            kind,
            cooldown_secs: NUKE_COOLDOWN_SECS,
            activation: SkillActivation::EnemySetWide,
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillSlot {
    pub skill: Option<SkillKind>,
    /// Seconds until the slot can fire again. Within `[0, cooldown_total]`.
    pub cooldown_remaining: f64,
    pub cooldown_total: f64,
}

impl SkillSlot {
    pub fn is_ready(&self) -> bool {
        self.skill.is_some() && self.cooldown_remaining <= 0.0
    }
}

/// Fixed-size array of optional skill slots.
#[derive(Debug, Clone)]
pub struct SkillBar {
    slots: Vec<SkillSlot>,
}

impl SkillBar {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![SkillSlot::default(); size],
        }
    }

    pub fn slots(&self) -> &[SkillSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fire the skill in `slot`. `None` if the slot is out of range, empty
    /// or still cooling down; otherwise the cooldown restarts.
    pub fn activate_skill(&mut self, slot: usize) -> Option<SkillKind> {
        let entry = self.slots.get_mut(slot)?;
        if !entry.is_ready() {
            return None;
        }
        let kind = entry.skill?;
        let def = skill_def(kind);
        entry.cooldown_total = def.cooldown_secs;
        entry.cooldown_remaining = def.cooldown_secs;
        Some(kind)
    }

    /// Count every slot's cooldown down by `dt`.
    pub fn update(&mut self, dt: f64) {
        for entry in &mut self.slots {
            if entry.cooldown_remaining > 0.0 {
                entry.cooldown_remaining -= dt;
                if entry.cooldown_remaining < COOLDOWN_EPSILON {
                    entry.cooldown_remaining = 0.0;
                }
            }
        }
    }

    pub fn owns(&self, kind: SkillKind) -> bool {
        self.slots.iter().any(|s| s.skill == Some(kind))
    }

    pub fn owned(&self) -> impl Iterator<Item = SkillKind> + '_ {
        self.slots.iter().filter_map(|s| s.skill)
    }

    /// Put `kind` in the first empty slot. Returns the slot index.
    pub fn learn(&mut self, kind: SkillKind) -> Result<usize, PurchaseError> {
        if self.owns(kind) {
            return Err(PurchaseError::AlreadyOwned);
        }
        let (index, entry) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, s)| s.skill.is_none())
            .ok_or(PurchaseError::SlotsFull)?;
        *entry = SkillSlot {
            skill: Some(kind),
            ..SkillSlot::default()
        };
        Ok(index)
    }

    /// Overwrite a slot, dropping whatever it held. Used by the admin console.
    pub fn replace(&mut self, slot: usize, kind: SkillKind) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = SkillSlot {
                skill: Some(kind),
                ..SkillSlot::default()
            };
        }
    }

    pub fn views(&self) -> Vec<SkillSlotView> {
        self.slots
            .iter()
            .map(|s| SkillSlotView {
                skill: s.skill,
                cooldown_remaining: s.cooldown_remaining,
                cooldown_total: s.cooldown_total,
            })
            .collect()
    }
}
