//! Systems that operate on the simulation state each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only)
//! plus the engine-owned state they need. They keep no state of their own,
//! except the spawn director's timers.

pub mod cleanup;
pub mod combat;
pub mod enemy_ai;
pub mod movement;
pub mod pickups;
pub mod projectiles;
pub mod snapshot;
pub mod spawn_director;
pub mod targeting;
