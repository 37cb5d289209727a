//! GOLLUX headless runner.
//!
//! Wires the simulation core to a fixed-rate game loop thread, a line-based
//! command input and a scripted autopilot for unattended runs.

pub mod game_loop;
pub mod ipc;
pub mod state;

pub use gollux_core as core;
