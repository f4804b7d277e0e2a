use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Robot pose in world coordinates: meters, meters, radians.
///
/// Exposed as a plain `(x, y, theta)` triple so renderers and trace writers
/// need no knowledge of the planner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub theta: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Position component, orientation dropped.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.theta)
    }

    /// Integrate `velocity` over `dt` seconds, component-wise.
    pub fn advance(&self, velocity: &Velocity, dt: f64) -> Self {
        Self {
            x: self.x + dt * velocity.vx,
            y: self.y + dt * velocity.vy,
            theta: self.theta + dt * velocity.omega,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()
    }
}

/// Commanded velocity: m/s, m/s, rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
}

impl Velocity {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(vx: f64, vy: f64, omega: f64) -> Self {
        Self { vx, vy, omega }
    }

    /// Purely translational velocity.
    pub const fn planar(vx: f64, vy: f64) -> Self {
        Self::new(vx, vy, 0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.vx == 0.0 && self.vy == 0.0 && self.omega == 0.0
    }
}
