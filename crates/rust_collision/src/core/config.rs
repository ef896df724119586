//! # Physics Configuration
//!
//! Settings for a [`PhysicsEngine`](crate::physics::PhysicsEngine), loadable
//! from TOML or RON through the [`Config`] trait.
//!
//! ```toml
//! raycast_policy = "nearest"
//! tunneling_safeguard = true
//! log_level = "info"
//!
//! [world_bound]
//! x = 0.0
//! y = 0.0
//! width = 640.0
//! height = 480.0
//! ```

use crate::foundation::math::Rect;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use crate::config::{Config, ConfigError};

/// How a raycast picks a hit when several boxes lie on the ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaycastPolicy {
    /// The hit closest to the ray origin over all candidates
    #[default]
    Nearest,
    /// The closest point on the first candidate (in registration order) the
    /// ray passes through
    FirstCandidate,
}

/// # Physics Engine Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Hit selection for raycasts
    pub raycast_policy: RaycastPolicy,
    /// Refuse moves whose path crosses an obstacle the target box skips over
    pub tunneling_safeguard: bool,
    /// Log filter used by [`logging::init_with_filter`](crate::foundation::logging::init_with_filter)
    pub log_level: String,
    /// Outer boundary of the playable world, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_bound: Option<Rect>,
}

impl PhysicsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            world_bound: None,
            raycast_policy: RaycastPolicy::default(),
            tunneling_safeguard: true,
            log_level: "info".to_string(),
        }
    }

    /// Set the world bound
    pub fn with_world_bound(mut self, bound: Rect) -> Self {
        self.world_bound = Some(bound);
        self
    }

    /// Set the raycast policy
    pub fn with_raycast_policy(mut self, policy: RaycastPolicy) -> Self {
        self.raycast_policy = policy;
        self
    }

    /// Enable or disable the tunneling safeguard
    pub fn with_tunneling_safeguard(mut self, enabled: bool) -> Self {
        self.tunneling_safeguard = enabled;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// The parsed log level
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)))
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bound) = self.world_bound {
            let finite = [bound.x, bound.y, bound.width, bound.height]
                .iter()
                .all(|value| value.is_finite());
            if !finite || bound.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "world bound must have a finite, positive size, got {bound:?}"
                )));
            }
        }

        self.level_filter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhysicsConfig::default();

        assert_eq!(config.world_bound, None);
        assert_eq!(config.raycast_policy, RaycastPolicy::Nearest);
        assert!(config.tunneling_safeguard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PhysicsConfig = toml::from_str("raycast_policy = \"first_candidate\"").unwrap();

        assert_eq!(config.raycast_policy, RaycastPolicy::FirstCandidate);
        assert!(config.tunneling_safeguard);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_ron_world_bound() {
        let config: PhysicsConfig = ron::from_str(
            "(world_bound: Some((x: 0.0, y: 0.0, width: 320.0, height: 240.0)), tunneling_safeguard: false)",
        )
        .unwrap();

        assert_eq!(config.world_bound, Some(Rect::new(0.0, 0.0, 320.0, 240.0)));
        assert!(!config.tunneling_safeguard);
    }

    #[test]
    fn test_validate_rejects_empty_bound() {
        let config = PhysicsConfig::new().with_world_bound(Rect::new(0.0, 0.0, 0.0, 100.0));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let config = PhysicsConfig::new().with_log_level("chatty");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = PhysicsConfig::new().with_log_level("TRACE");
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Trace);
    }
}
