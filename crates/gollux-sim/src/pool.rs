//! Fixed-capacity projectile pools.
//!
//! Each shooter owns one pool. Slots are reused instead of allocated: an
//! inactive slot is invisible and never collides. Firing claims the first
//! inactive slot; a saturated pool refuses the shot.

use glam::DVec2;

use gollux_core::constants::*;
use gollux_core::enums::PartnerKind;
use gollux_core::types::{Aabb, ShooterId};

/// Launch parameters that depend on who fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageProfile {
    pub damage: i32,
    pub speed: f64,
    pub lifetime_ticks: u32,
}

impl DamageProfile {
    pub fn partner(kind: PartnerKind) -> Self {
        let damage = match kind {
            PartnerKind::Eagle => EAGLE_PROJECTILE_DAMAGE,
            PartnerKind::Skull => SKULL_PROJECTILE_DAMAGE,
        };
        Self {
            damage,
            speed: PROJECTILE_SPEED,
            lifetime_ticks: PROJECTILE_LIFETIME_TICKS,
        }
    }

    pub fn sting() -> Self {
        Self {
            damage: STING_DAMAGE,
            speed: STING_SPEED,
            lifetime_ticks: STING_LIFETIME_TICKS,
        }
    }
}

/// One pool slot.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub owner: ShooterId,
    pub origin: DVec2,
    /// Where the target stood at launch. Not tracked afterwards.
    pub target: DVec2,
    pub position: DVec2,
    /// Pixels per reference frame.
    pub velocity: DVec2,
    pub damage: i32,
    pub remaining_ticks: u32,
    pub active: bool,
}

impl Projectile {
    fn idle(owner: ShooterId) -> Self {
        Self {
            owner,
            origin: DVec2::ZERO,
            target: DVec2::ZERO,
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            damage: 0,
            remaining_ticks: 0,
            active: false,
        }
    }

    /// Reinitialise the trajectory and activate the slot.
    pub fn reset(&mut self, start: DVec2, target: DVec2, profile: DamageProfile) {
        self.origin = start;
        self.target = target;
        self.position = start;
        self.velocity = (target - start).normalize_or_zero() * profile.speed;
        self.damage = profile.damage;
        self.remaining_ticks = profile.lifetime_ticks;
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.position, DVec2::splat(PROJECTILE_HALF_SIZE))
    }
}

#[derive(Debug, Clone)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(owner: ShooterId, capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Projectile::idle(owner)).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// First inactive slot, or `None` when every slot is in flight.
    pub fn acquire(&mut self) -> Option<&mut Projectile> {
        self.slots.iter_mut().find(|p| !p.active)
    }

    /// Acquire and reset in one step. Returns false when saturated.
    pub fn fire(&mut self, start: DVec2, target: DVec2, profile: DamageProfile) -> bool {
        match self.acquire() {
            Some(slot) => {
                slot.reset(start, target, profile);
                true
            }
            None => false,
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|p| p.active)
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.slots.iter_mut().filter(|p| p.active)
    }

    /// Move every live projectile; expire it on lifetime end or when it
    /// leaves the world.
    pub fn update(&mut self, step: f64, world_bounds: &Aabb) {
        for projectile in self.active_mut() {
            projectile.position += projectile.velocity * step;
            projectile.remaining_ticks = projectile.remaining_ticks.saturating_sub(1);
            if projectile.remaining_ticks == 0 || !world_bounds.contains_point(projectile.position)
            {
                projectile.deactivate();
            }
        }
    }

    /// Overwrite the damage of every projectile currently in flight.
    pub fn set_active_damage(&mut self, damage: i32) {
        for projectile in self.active_mut() {
            projectile.damage = damage;
        }
    }
}
