//! Local velocity selection: a one-step lookahead search over a fixed
//! candidate set, ranked by a pluggable cost estimator.
//!
//! # Invariants
//! - Planning is a pure function of grid, pose and estimator.
//! - A returned velocity never projects into collision unless no candidate
//!   is collision-free with a non-NaN cost, in which case it is the zero
//!   velocity.

mod estimator;
mod planner;

pub use estimator::{CostEstimator, Euclidean, Manhattan};
pub use planner::{CANDIDATE_COUNT, Candidate, SPEED_LEVELS, VelocityPlanner, candidates};

/// Errors from configuring a planner.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("lookahead must be positive and finite, got {0}")]
    InvalidLookahead(f64),
}
