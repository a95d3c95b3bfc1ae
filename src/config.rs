use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest chain of waypoints the route search will consider.
pub const MAX_WAYPOINTS: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed reading the config file")]
    ReadError(#[from] std::io::Error),
    #[error("Failed parsing the config file")]
    ParseError(#[from] serde_json::Error),
    #[error("max_waypoints must be between 1 and 3, got {0}")]
    MaxWaypoints(usize),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Number of destinations to chain, at most MAX_WAYPOINTS.
    pub max_waypoints: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig { max_waypoints: MAX_WAYPOINTS }
    }
}

impl PlannerConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if (1..=MAX_WAYPOINTS).contains(&self.max_waypoints) {
            Ok(self)
        } else {
            Err(ConfigError::MaxWaypoints(self.max_waypoints))
        }
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(data)?;
        config.validate()
    }

    pub fn from_file(filename: &str) -> Result<Self, ConfigError> {
        info!("[CONFIG] Loading planner config from {filename}");
        let data = std::fs::read_to_string(filename)?;
        PlannerConfig::from_json(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(PlannerConfig::default().max_waypoints, 3);
        assert_eq!(PlannerConfig::from_json("{}").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(PlannerConfig::from_json(r#"{"max_waypoints": 4}"#),
                         Err(ConfigError::MaxWaypoints(4))));
        assert!(matches!(PlannerConfig::from_json(r#"{"max_waypoints": 0}"#),
                         Err(ConfigError::MaxWaypoints(0))));
        assert_eq!(PlannerConfig::from_json(r#"{"max_waypoints": 2}"#).unwrap().max_waypoints, 2);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(PlannerConfig::from_json("{"), Err(ConfigError::ParseError(_))));
        assert!(matches!(PlannerConfig::from_file("./does/not/exist.json"),
                         Err(ConfigError::ReadError(_))));
    }
}
