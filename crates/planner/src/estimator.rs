use glam::DVec2;
use gridnav_common::Pose;

/// Estimated remaining cost from a pose to the goal. Lower is better.
///
/// Implementations must be pure in `pose`: the planner relies on identical
/// inputs producing identical rankings. A NaN cost marks the pose as
/// unusable.
pub trait CostEstimator {
    fn cost(&self, pose: &Pose) -> f64;
}

impl<F> CostEstimator for F
where
    F: Fn(&Pose) -> f64,
{
    fn cost(&self, pose: &Pose) -> f64 {
        self(pose)
    }
}

/// Straight-line distance to the goal position. Orientation is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Euclidean {
    goal: DVec2,
}

impl Euclidean {
    pub fn new(goal: Pose) -> Self {
        Self {
            goal: goal.position(),
        }
    }
}

impl CostEstimator for Euclidean {
    fn cost(&self, pose: &Pose) -> f64 {
        self.goal.distance(pose.position())
    }
}

/// Axis-aligned (L1) distance to the goal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manhattan {
    goal: DVec2,
}

impl Manhattan {
    pub fn new(goal: Pose) -> Self {
        Self {
            goal: goal.position(),
        }
    }
}

impl CostEstimator for Manhattan {
    fn cost(&self, pose: &Pose) -> f64 {
        let d = (self.goal - pose.position()).abs();
        d.x + d.y
    }
}
