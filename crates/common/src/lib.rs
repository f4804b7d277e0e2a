//! Shared types for the gridnav workspace.
//!
//! # Invariants
//! - `Pose` and `Velocity` are plain value types; nothing here holds state.

mod types;

pub use types::{Pose, Velocity};
