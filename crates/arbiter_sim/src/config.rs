//! # Simulation Configuration
//!
//! Loaded once, validated once. Every field has a default, so an empty
//! TOML document is a valid config.
//!
//! ```toml
//! time_scale = 0.05
//! log_events = false
//! channel_capacity = 256
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Knobs for a simulation run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Multiplier applied to every scenario delay and duration.
    pub time_scale: f64,
    /// Emit an `info` event per lifecycle transition.
    pub log_events: bool,
    /// Bound on the runner-to-harness event channel. `None` is unbounded.
    pub channel_capacity: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            log_events: true,
            channel_capacity: None,
        }
    }
}

impl SimulationConfig {
    /// Test config: scaled-down wall clock, no per-event logging.
    #[must_use]
    pub const fn fast(time_scale: f64) -> Self {
        Self {
            time_scale,
            log_events: false,
            channel_capacity: None,
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys,
    /// otherwise whatever [`SimulationConfig::validate`] returns.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the harness relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeScale`] unless `time_scale` is
    /// finite and positive, and [`ConfigError::ZeroChannelCapacity`] for a
    /// zero-sized bounded channel.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        if self.channel_capacity == Some(0) {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok(())
    }

    /// Applies `time_scale` to a scenario duration.
    ///
    /// Saturates instead of panicking when the product overflows.
    #[must_use]
    pub fn scale(&self, duration: Duration) -> Duration {
        Duration::try_from_secs_f64(duration.as_secs_f64() * self.time_scale).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert!((config.time_scale - 1.0).abs() < f64::EPSILON);
        assert!(config.log_events);
        assert_eq!(config.channel_capacity, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SimulationConfig::from_toml_str("").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = SimulationConfig::from_toml_str(
            "time_scale = 0.05\nlog_events = false\nchannel_capacity = 256\n",
        )
        .unwrap();
        assert!((config.time_scale - 0.05).abs() < f64::EPSILON);
        assert!(!config.log_events);
        assert_eq!(config.channel_capacity, Some(256));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(matches!(
            SimulationConfig::from_toml_str("time_scael = 2.0").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for scale in ["0.0", "-1.0", "nan", "inf"] {
            let err = SimulationConfig::from_toml_str(&format!("time_scale = {scale}")).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeScale(_)), "{scale}: {err}");
        }
        assert!(matches!(
            SimulationConfig::from_toml_str("channel_capacity = 0").unwrap_err(),
            ConfigError::ZeroChannelCapacity
        ));
    }

    #[test]
    fn test_scale() {
        let config = SimulationConfig::fast(0.1);
        assert_eq!(config.scale(Duration::from_secs(3)), Duration::from_millis(300));
        assert_eq!(config.scale(Duration::ZERO), Duration::ZERO);
        assert_eq!(SimulationConfig::fast(f64::MAX).scale(Duration::from_secs(2)), Duration::MAX);
    }
}
