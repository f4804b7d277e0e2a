use gridnav_common::{Pose, Velocity};
use gridnav_grid::OccupancyGrid;

use crate::{CostEstimator, PlannerError};

/// Per-axis speed levels in m/s, ascending.
pub const SPEED_LEVELS: [f64; 3] = [-1.0, 0.0, 1.0];

/// Number of candidate velocities searched per call.
pub const CANDIDATE_COUNT: usize = SPEED_LEVELS.len() * SPEED_LEVELS.len();

/// The candidate velocities in search order: `vx` major, `vy` minor, both
/// ascending. Angular velocity is always zero.
pub fn candidates() -> impl Iterator<Item = Velocity> {
    SPEED_LEVELS
        .into_iter()
        .flat_map(|vx| SPEED_LEVELS.into_iter().map(move |vy| Velocity::planar(vx, vy)))
}

/// Result of projecting one candidate over the lookahead horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub velocity: Velocity,
    /// Pose after `lookahead` seconds at `velocity`.
    pub next: Pose,
    /// Estimated cost at `next`, `None` if `next` collides.
    pub cost: Option<f64>,
}

impl Candidate {
    pub fn is_safe(&self) -> bool {
        self.cost.is_some()
    }
}

/// One-step lookahead velocity planner.
///
/// Holds only its horizon, so a single planner can serve any number of
/// robots and calls from any thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityPlanner {
    lookahead: f64,
}

impl VelocityPlanner {
    /// Create a planner projecting candidates `lookahead` seconds ahead.
    pub fn new(lookahead: f64) -> Result<Self, PlannerError> {
        if !(lookahead.is_finite() && lookahead > 0.0) {
            return Err(PlannerError::InvalidLookahead(lookahead));
        }
        Ok(Self { lookahead })
    }

    pub fn lookahead(&self) -> f64 {
        self.lookahead
    }

    /// Project and score a single candidate.
    pub fn evaluate<E>(
        &self,
        grid: &OccupancyGrid,
        pose: &Pose,
        estimator: &E,
        velocity: Velocity,
    ) -> Candidate
    where
        E: CostEstimator + ?Sized,
    {
        let next = pose.advance(&velocity, self.lookahead);
        let cost = if grid.in_collision(next.x, next.y) {
            None
        } else {
            Some(estimator.cost(&next))
        };
        tracing::trace!(
            vx = velocity.vx,
            vy = velocity.vy,
            x = next.x,
            y = next.y,
            ?cost,
            "candidate evaluated"
        );
        Candidate {
            velocity,
            next,
            cost,
        }
    }

    /// Every candidate in search order, scored.
    pub fn evaluate_all<E>(
        &self,
        grid: &OccupancyGrid,
        pose: &Pose,
        estimator: &E,
    ) -> Vec<Candidate>
    where
        E: CostEstimator + ?Sized,
    {
        candidates()
            .map(|v| self.evaluate(grid, pose, estimator, v))
            .collect()
    }

    /// Pick the collision-free candidate with the lowest estimated cost.
    ///
    /// Ties go to the candidate earlier in [`candidates`] order. Candidates
    /// the estimator scores as NaN are skipped like collisions. When no
    /// candidate is left the robot is told to stop.
    pub fn choose_velocity<E>(
        &self,
        grid: &OccupancyGrid,
        pose: &Pose,
        estimator: &E,
    ) -> Velocity
    where
        E: CostEstimator + ?Sized,
    {
        let mut best: Option<(Velocity, f64)> = None;
        for velocity in candidates() {
            let Some(cost) = self.evaluate(grid, pose, estimator, velocity).cost else {
                continue;
            };
            if cost.is_nan() {
                continue;
            }
            // Strict comparison keeps the earliest of equal candidates.
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((velocity, cost));
            }
        }

        match best {
            Some((velocity, cost)) => {
                tracing::debug!(vx = velocity.vx, vy = velocity.vy, cost, "velocity chosen");
                velocity
            }
            None => {
                tracing::warn!(
                    x = pose.x,
                    y = pose.y,
                    "no usable velocity, stopping in place"
                );
                Velocity::ZERO
            }
        }
    }
}
