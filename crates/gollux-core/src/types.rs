//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// World-space position (pixels, y grows downward like the renderer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec2);

/// Per-reference-frame velocity (pixels per 1/60 s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec2);

/// Axis-aligned bounding box described by its center and half extents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: DVec2,
    pub half_extents: DVec2,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each simulated tick).
    pub tick: u64,
    /// Simulated seconds (ticks × DT). Excludes skipped ticks.
    pub elapsed_secs: f64,
}

/// One of the (at most two) player contexts sharing the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

/// Who fired a pooled projectile. Never owns the shooter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShooterId {
    /// The partner companion of a player.
    Partner(PlayerSlot),
    /// Hazard enemies (Bi stings) share one pool.
    Hazard,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        self.0.distance(other.0)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }
}

impl Aabb {
    pub fn new(center: DVec2, half_extents: DVec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Build a box from its top-left corner and full size.
    pub fn from_corner(x: f64, y: f64, width: f64, height: f64) -> Self {
        let half = DVec2::new(width * 0.5, height * 0.5);
        Self::new(DVec2::new(x, y) + half, half)
    }

    pub fn min(&self) -> DVec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> DVec2 {
        self.center + self.half_extents
    }

    pub fn width(&self) -> f64 {
        self.half_extents.x * 2.0
    }

    pub fn height(&self) -> f64 {
        self.half_extents.y * 2.0
    }

    /// Strict overlap test. Boxes that only share an edge do not collide.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x < reach.x && d.y < reach.y
    }

    /// Whether `inner` lies completely inside this box.
    pub fn contains(&self, inner: &Aabb) -> bool {
        let (min, max) = (self.min(), self.max());
        let (imin, imax) = (inner.min(), inner.max());
        imin.x >= min.x && imin.y >= min.y && imax.x <= max.x && imax.y <= max.y
    }

    pub fn contains_point(&self, point: DVec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Clamp a center point so that a box of `half_extents` stays inside `self`.
    pub fn clamp_center(&self, center: DVec2, half_extents: DVec2) -> DVec2 {
        let lo = self.min() + half_extents;
        let hi = self.max() - half_extents;
        DVec2::new(
            center.x.clamp(lo.x, hi.x.max(lo.x)),
            center.y.clamp(lo.y, hi.y.max(lo.y)),
        )
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// `current / max` with a zero-denominator guard, clamped to `[0, 1]`.
pub fn ratio(current: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (current / max).clamp(0.0, 1.0)
}
