//! Enemy AI for GOLLUX.
//!
//! Implements enemy and boss behavior as pure functions over plain data,
//! with kind-driven behavior profiles.

pub mod boss;
pub mod fsm;
pub mod profiles;

pub use gollux_core as core;
