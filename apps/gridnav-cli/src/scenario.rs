//! Scenario files: everything needed to start a run, loaded from YAML.
//!
//! ```yaml
//! map: maps/office.png
//! scale: 0.05
//! goal: { x: 4.0, y: 4.0 }
//! estimator: euclidean
//! sim_factor: 1.0
//! sim:
//!   start: { x: 1.0, y: 1.0, theta: 0.0 }
//!   dt: 0.1
//!   lookahead: 0.1
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gridnav_common::Pose;
use gridnav_grid::{DEFAULT_SCALE, OccupancyGrid};
use gridnav_kernel::{ConfigError, SimConfig, Simulation};
use gridnav_planner::{Euclidean, Manhattan};
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("goal pose must be finite, got {0:?}")]
    NonFiniteGoal(Pose),
    #[error("sim_factor must be zero or positive, got {0}")]
    InvalidSimFactor(f64),
}

/// Which cost estimator ranks the planner's candidates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    #[default]
    Euclidean,
    Manhattan,
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

/// A complete run description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Map image. Relative paths resolve against the scenario file.
    pub map: PathBuf,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub goal: Pose,
    #[serde(default)]
    pub estimator: EstimatorKind,
    /// Playback speed multiplier. `0` runs as fast as possible.
    #[serde(default)]
    pub sim_factor: f64,
    #[serde(default)]
    pub sim: SimConfig,
}

impl Scenario {
    /// A scenario with defaults for everything but the map.
    pub fn new(map: impl Into<PathBuf>) -> Self {
        Self {
            map: map.into(),
            scale: DEFAULT_SCALE,
            goal: Pose::default(),
            estimator: EstimatorKind::default(),
            sim_factor: 0.0,
            sim: SimConfig::default(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a scenario file, resolving its map path next to it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let mut scenario = Self::from_yaml_str(&std::fs::read_to_string(path)?)?;
        scenario.map = resolve_relative(path, &scenario.map);
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ScenarioError::InvalidScale(self.scale));
        }
        if !self.goal.is_finite() {
            return Err(ScenarioError::NonFiniteGoal(self.goal));
        }
        if !(self.sim_factor.is_finite() && self.sim_factor >= 0.0) {
            return Err(ScenarioError::InvalidSimFactor(self.sim_factor));
        }
        self.sim.validate()?;
        Ok(())
    }

    /// Build the simulation for this scenario on an already loaded grid.
    pub fn build_simulation(&self, grid: Arc<OccupancyGrid>) -> Result<Simulation, ScenarioError> {
        self.validate()?;
        let sim = match self.estimator {
            EstimatorKind::Euclidean => {
                Simulation::new(grid, &self.sim, Euclidean::new(self.goal))?
            }
            EstimatorKind::Manhattan => {
                Simulation::new(grid, &self.sim, Manhattan::new(self.goal))?
            }
        };
        Ok(sim)
    }
}

fn resolve_relative(base_file: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    match base_file.parent() {
        Some(parent) => parent.join(target),
        None => target.to_path_buf(),
    }
}

/// Parse `x,y` or `x,y,theta` into a pose.
pub fn parse_pose(s: &str) -> Result<Pose, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid pose {s:?}: {e}"))?;
    match parts[..] {
        [x, y] => Ok(Pose::new(x, y, 0.0)),
        [x, y, theta] => Ok(Pose::new(x, y, theta)),
        _ => Err(format!("invalid pose {s:?}: expected x,y or x,y,theta")),
    }
}
