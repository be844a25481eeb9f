//! Player configuration: TOML file, then environment overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_SKIP_FORWARD: &str = "PLAYCLOCK_SKIP_FORWARD";
pub const ENV_SKIP_BACKWARD: &str = "PLAYCLOCK_SKIP_BACKWARD";
pub const ENV_LOG: &str = "PLAYCLOCK_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Seconds jumped by a skip-forward command.
    pub skip_forward_seconds: f64,
    /// Seconds jumped by a skip-backward command. Independent of the forward interval.
    pub skip_backward_seconds: f64,
    /// Cadence of the simulated engine's telemetry, in milliseconds.
    pub tick_interval_ms: u64,
    pub log_filter: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            skip_forward_seconds: 15.0,
            skip_backward_seconds: 15.0,
            tick_interval_ms: 250,
            log_filter: "info".to_string(),
        }
    }
}

impl PlayerConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PlayerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Environment variables win over file values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(ENV_SKIP_FORWARD) {
            self.skip_forward_seconds = parse_seconds(ENV_SKIP_FORWARD, &raw)?;
        }
        if let Ok(raw) = std::env::var(ENV_SKIP_BACKWARD) {
            self.skip_backward_seconds = parse_seconds(ENV_SKIP_BACKWARD, &raw)?;
        }
        if let Ok(filter) = std::env::var(ENV_LOG) {
            self.log_filter = filter;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("skip_forward_seconds", self.skip_forward_seconds),
            ("skip_backward_seconds", self.skip_backward_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be greater than zero".to_string()));
        }
        Ok(())
    }
}

fn parse_seconds(var: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| Error::Config(format!("{}={:?} is not a number: {}", var, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = PlayerConfig::from_toml("skip_backward_seconds = 5.0").unwrap();
        assert_eq!(config.skip_backward_seconds, 5.0);
        assert_eq!(config.skip_forward_seconds, 15.0);
        assert_eq!(config.tick_interval_ms, 250);
    }

    #[test]
    fn negative_interval_is_rejected() {
        let err = PlayerConfig::from_toml("skip_forward_seconds = -1.0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(PlayerConfig::from_toml("tick_interval_ms = 0").is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = PlayerConfig::from_toml("skip_forward_seconds = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
