use std::sync::Arc;

use gridnav_common::{Pose, Velocity};
use gridnav_grid::OccupancyGrid;
use gridnav_planner::{CostEstimator, VelocityPlanner};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SimConfig};

/// An event record produced by every tick.
///
/// The event log is enough to rebuild the robot's state from its start pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The planned move was collision-free and the pose was replaced.
    Committed {
        tick: u64,
        velocity: Velocity,
        pose: Pose,
    },
    /// The planned move collided at the simulation timestep. Pose held.
    Rejected {
        tick: u64,
        velocity: Velocity,
        attempted: Pose,
    },
}

impl SimEvent {
    pub fn tick(&self) -> u64 {
        match self {
            Self::Committed { tick, .. } | Self::Rejected { tick, .. } => *tick,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Committed { velocity: Velocity, pose: Pose },
    Rejected { velocity: Velocity, attempted: Pose },
}

impl StepOutcome {
    pub fn velocity(&self) -> Velocity {
        match self {
            Self::Committed { velocity, .. } | Self::Rejected { velocity, .. } => *velocity,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// The mutable part of a simulation: tick counter and robot pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub tick: u64,
    pub pose: Pose,
}

impl SimState {
    pub fn new(pose: Pose) -> Self {
        Self { tick: 0, pose }
    }

    /// Rebuild state from a start pose and an event log.
    pub fn replay(start: Pose, events: &[SimEvent]) -> Self {
        let mut state = Self::new(start);
        for event in events {
            match event {
                SimEvent::Committed { tick, pose, .. } => {
                    state.tick = *tick;
                    state.pose = *pose;
                }
                SimEvent::Rejected { tick, .. } => {
                    state.tick = *tick;
                }
            }
        }
        state
    }

    /// Deterministic FNV-1a hash over the tick and the exact pose bits.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.pose.x.to_le_bytes());
        mix(&mut h, &self.pose.y.to_le_bytes());
        mix(&mut h, &self.pose.theta.to_le_bytes());
        h
    }
}

/// Totals from [`Simulation::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub committed: u64,
    pub rejected: u64,
    pub final_pose: Pose,
}

/// The authoritative robot simulation.
///
/// Owns the only writable copy of the pose. Each [`step`](Self::step) plans
/// a velocity, integrates it over `dt` and re-checks the result against the
/// grid before committing, since the planner's horizon may differ from `dt`.
pub struct Simulation {
    grid: Arc<OccupancyGrid>,
    planner: VelocityPlanner,
    estimator: Box<dyn CostEstimator + Send + Sync>,
    dt: f64,
    start: Pose,
    state: SimState,
    /// Append-only log of every tick.
    event_log: Vec<SimEvent>,
}

impl Simulation {
    pub fn new<E>(
        grid: Arc<OccupancyGrid>,
        config: &SimConfig,
        estimator: E,
    ) -> Result<Self, ConfigError>
    where
        E: CostEstimator + Send + Sync + 'static,
    {
        config.validate()?;
        if grid.in_collision(config.start.x, config.start.y) {
            tracing::warn!(
                x = config.start.x,
                y = config.start.y,
                "start pose is in collision"
            );
        }
        Ok(Self {
            grid,
            planner: VelocityPlanner::new(config.lookahead)?,
            estimator: Box::new(estimator),
            dt: config.dt,
            start: config.start,
            state: SimState::new(config.start),
            event_log: Vec::new(),
        })
    }

    /// Current robot pose.
    pub fn pose(&self) -> Pose {
        self.state.pose
    }

    /// Ticks executed so far.
    pub fn tick(&self) -> u64 {
        self.state.tick
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Pose the simulation was created with.
    pub fn start(&self) -> Pose {
        self.start
    }

    pub fn grid(&self) -> &Arc<OccupancyGrid> {
        &self.grid
    }

    pub fn planner(&self) -> &VelocityPlanner {
        &self.planner
    }

    /// Estimated cost from the current pose.
    pub fn current_cost(&self) -> f64 {
        self.estimator.cost(&self.state.pose)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SimEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) -> StepOutcome {
        let tick = self.state.tick + 1;
        let _span = tracing::info_span!("sim_step", tick).entered();

        let pose = self.state.pose;
        let velocity = self
            .planner
            .choose_velocity(&self.grid, &pose, self.estimator.as_ref());
        let next = pose.advance(&velocity, self.dt);
        self.state.tick = tick;

        if self.grid.in_collision(next.x, next.y) {
            tracing::warn!(
                x = next.x,
                y = next.y,
                vx = velocity.vx,
                vy = velocity.vy,
                "robot collision, move rejected"
            );
            self.event_log.push(SimEvent::Rejected {
                tick,
                velocity,
                attempted: next,
            });
            return StepOutcome::Rejected {
                velocity,
                attempted: next,
            };
        }

        self.state.pose = next;
        tracing::debug!(x = next.x, y = next.y, theta = next.theta, "pose committed");
        self.event_log.push(SimEvent::Committed {
            tick,
            velocity,
            pose: next,
        });
        StepOutcome::Committed {
            velocity,
            pose: next,
        }
    }

    /// Step `ticks` times and tally the outcomes.
    pub fn run(&mut self, ticks: u64) -> RunSummary {
        let mut summary = RunSummary {
            ticks: 0,
            committed: 0,
            rejected: 0,
            final_pose: self.state.pose,
        };
        for _ in 0..ticks {
            match self.step() {
                StepOutcome::Committed { .. } => summary.committed += 1,
                StepOutcome::Rejected { .. } => summary.rejected += 1,
            }
            summary.ticks += 1;
        }
        summary.final_pose = self.state.pose;
        summary
    }
}
