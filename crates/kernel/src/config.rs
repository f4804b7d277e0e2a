use gridnav_common::Pose;
use gridnav_planner::PlannerError;
use serde::{Deserialize, Serialize};

/// Errors from validating simulation parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("start pose must be finite, got {0:?}")]
    NonFinitePose(Pose),
    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// Simulation parameters.
///
/// Missing fields fall back to [`SimConfig::default`] when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Initial robot pose.
    pub start: Pose,
    /// Integration timestep in seconds.
    pub dt: f64,
    /// Planner projection horizon in seconds.
    pub lookahead: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start: Pose::default(),
            dt: 0.1,
            lookahead: 0.1,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("dt", self.dt)?;
        check_positive("lookahead", self.lookahead)?;
        if !self.start.is_finite() {
            return Err(ConfigError::NonFinitePose(self.start));
        }
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert_eq!(config.dt, 0.1);
        assert_eq!(config.lookahead, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_timestep() {
        for dt in [0.0, -0.1, f64::NAN] {
            let config = SimConfig {
                dt,
                ..SimConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NotPositive { name: "dt", .. })
            ));
        }
    }

    #[test]
    fn rejects_bad_lookahead() {
        let config = SimConfig {
            lookahead: f64::INFINITY,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "lookahead",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_finite_start() {
        let config = SimConfig {
            start: Pose::new(f64::NAN, 0.0, 0.0),
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinitePose(_))
        ));
    }

    #[test]
    fn planner_errors_pass_through() {
        let err = ConfigError::from(PlannerError::InvalidLookahead(-1.0));
        assert!(matches!(err, ConfigError::Planner(_)));
        assert_eq!(
            err.to_string(),
            "lookahead must be positive and finite, got -1"
        );
    }

    #[test]
    fn error_message_names_field() {
        let err = SimConfig {
            dt: 0.0,
            ..SimConfig::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "dt must be positive and finite, got 0");
    }
}
