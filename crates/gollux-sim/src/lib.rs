//! Simulation core for GOLLUX.
//!
//! Owns the hecs ECS world and the per-player state, runs systems at a fixed
//! tick rate, and produces GameStateSnapshots for the frontend.

pub mod boss;
pub mod clock;
pub mod devil;
pub mod effects;
pub mod engine;
pub mod player;
pub mod pool;
pub mod shop;
pub mod skills;
pub mod systems;
pub mod transition;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use gollux_core as core;

#[cfg(test)]
mod tests;
