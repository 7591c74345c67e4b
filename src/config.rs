//! Tunable engine parameters.
//!
//! Every distance, speed, and timing constant the decision engine relies on
//! lives here so a game can be replayed with different settings. Values can
//! be overridden from a JSON file; missing keys fall back to the defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::geometry::Point;
use crate::world::PowerupType;

/// Errors that can occur while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fixed desirability of each powerup kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypeScores {
    pub speed: f64,
    pub damage: f64,
    pub health: f64,
}

impl Default for TypeScores {
    fn default() -> Self {
        TypeScores {
            speed: 5.0,
            damage: 5.0,
            health: 3.0,
        }
    }
}

impl TypeScores {
    pub fn score(&self, powerup: PowerupType) -> f64 {
        match powerup {
            PowerupType::Speed => self.speed,
            PowerupType::Damage => self.damage,
            PowerupType::Health => self.health,
        }
    }
}

/// Configuration for the decision engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-axis gap to the closing boundary that triggers the escape.
    pub boundary_margin: f64,
    /// Where to retreat when the boundary is close. None means the arena centre.
    pub escape_point: Option<Point>,
    /// Beyond this distance the tank drives at the enemy instead of circling.
    pub chase_distance: f64,
    /// Powerups within this distance skip the reachability check.
    pub reach_check_radius: f64,
    /// Own speed in units per tick.
    pub base_speed: f64,
    /// Own speed while holding a SPEED powerup.
    pub boosted_speed: f64,
    /// Closing boundary speed in units per tick.
    pub boundary_speed: f64,
    /// Dwell after returning to the active state.
    pub active_dwell_ticks: u32,
    /// Dwell after a voluntary turn or circle manoeuvre.
    pub wait_dwell_ticks: u32,
    /// Dwell after a boundary escape.
    pub emergency_dwell_ticks: u32,
    /// Heading change applied on a periodic direction switch.
    pub turn_offset_deg: f64,
    /// Maximum random deviation, in whole degrees, while circling.
    pub circle_jitter_deg: i32,
    pub type_scores: TypeScores,
    /// Scale for the distance-to-self score family.
    pub self_scale: f64,
    /// Scale for the distance-to-enemy score family.
    pub enemy_scale: f64,
    /// Scale for the distance-to-boundary score family.
    pub boundary_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            boundary_margin: 25.0,
            escape_point: None,
            chase_distance: 100.0,
            reach_check_radius: 150.0,
            base_speed: 100.0,
            boosted_speed: 200.0,
            boundary_speed: 10.0,
            active_dwell_ticks: 5,
            wait_dwell_ticks: 5,
            emergency_dwell_ticks: 4,
            turn_offset_deg: 45.0,
            circle_jitter_deg: 90,
            type_scores: TypeScores::default(),
            self_scale: -10.0,
            enemy_scale: 1.0,
            boundary_scale: 2.0,
        }
    }
}

impl EngineConfig {
    /// Loads a config from a JSON file at the given path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Parses a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = EngineConfig::from_json(
            r#"{"boundary_margin": 40, "escape_point": [870, 375], "type_scores": {"health": 9}}"#,
        )
        .unwrap();
        assert_eq!(config.boundary_margin, 40.0);
        assert_eq!(config.escape_point, Some(Point::new(870.0, 375.0)));
        assert_eq!(config.type_scores.score(PowerupType::Health), 9.0);
        assert_eq!(config.type_scores.score(PowerupType::Speed), 5.0);
        assert_eq!(config.chase_distance, 100.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json("{boundary_margin"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = EngineConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
