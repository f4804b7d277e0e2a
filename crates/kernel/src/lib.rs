//! Simulation kernel: authoritative robot state, tick stepping, event log
//! and replay.
//!
//! # Invariants
//! - Only [`Simulation::step`] writes the robot pose.
//! - A committed pose is never in collision at the simulation timestep.
//! - A tick either commits or rejects; it never fails.

pub mod config;
pub mod simulation;

pub use config::{ConfigError, SimConfig};
pub use simulation::{RunSummary, SimEvent, SimState, Simulation, StepOutcome};
