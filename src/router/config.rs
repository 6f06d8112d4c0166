//! Router configuration: which scheduling group and submission service
//! group routed work runs under, and how much concurrency the cross-core
//! executor is allowed. Adapted from the teacher crate's
//! `message_router/config.rs` builder-and-presets style.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::router::traits::{SchedulingGroup, SubmissionServiceGroup};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field failed validation.
    #[error("invalid configuration: {field} - {reason}")]
    ValidationError {
        /// Name of the offending field.
        field: String,
        /// Human-readable reason.
        reason: String,
    },

    /// I/O failure while loading/saving a config file.
    #[error("I/O error: {source}")]
    IoError {
        /// Underlying error.
        #[from]
        source: std::io::Error,
    },

    /// (De)serialization failure while loading/saving a config file.
    #[error("serialization error: {source}")]
    SerializationError {
        /// Underlying error.
        #[from]
        source: serde_json::Error,
    },
}

/// Complete router configuration.
///
/// The router itself is stateless (`spec.md` §3, invariant 3); this type
/// exists purely to wire up which scheduling group and submission service
/// group its routed work runs under, and to bound cross-core concurrency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Scheduling group id every routed group-manager invocation runs
    /// inside, for CPU accounting and preemption class.
    pub scheduling_group_id: usize,
    /// Submission service group id bounding concurrent in-flight cross-core
    /// calls.
    pub submission_service_group_id: usize,
    /// Maximum number of concurrent cross-core calls the submission service
    /// group admits.
    pub max_in_flight_cross_core_calls: usize,
}

impl RouterConfig {
    /// Development configuration: a single scheduling group, low
    /// concurrency, easy to reason about under a debugger.
    #[must_use]
    pub fn development() -> Self {
        Self {
            scheduling_group_id: 0,
            submission_service_group_id: 0,
            max_in_flight_cross_core_calls: 16,
        }
    }

    /// Production configuration: dedicated scheduling/submission groups and
    /// concurrency scaled to the number of cores on the box.
    #[must_use]
    pub fn production() -> Self {
        Self {
            scheduling_group_id: 1,
            submission_service_group_id: 1,
            max_in_flight_cross_core_calls: (num_cpus::get() * 64).max(256),
        }
    }

    /// Minimal configuration for tests: one in-flight call at a time, so
    /// ordering assertions in integration tests are deterministic.
    #[must_use]
    pub fn testing() -> Self {
        Self {
            scheduling_group_id: 0,
            submission_service_group_id: 0,
            max_in_flight_cross_core_calls: 1,
        }
    }

    /// Creates a configuration builder for custom settings.
    #[must_use]
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::new()
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    /// Returns [`ConfigError::ValidationError`] when a field is out of its
    /// allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_in_flight_cross_core_calls == 0 {
            return Err(ConfigError::ValidationError {
                field: "max_in_flight_cross_core_calls".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The scheduling group handle derived from this configuration.
    #[must_use]
    pub fn scheduling_group(&self) -> SchedulingGroup {
        SchedulingGroup {
            id: self.scheduling_group_id,
        }
    }

    /// The submission service group handle derived from this configuration.
    #[must_use]
    pub fn submission_service_group(&self) -> SubmissionServiceGroup {
        SubmissionServiceGroup {
            id: self.submission_service_group_id,
        }
    }

    /// Saves configuration to a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on I/O or serialization failure.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads configuration from a JSON file, validating it on the way in.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on I/O, deserialization, or validation
    /// failure.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Builder for custom router configurations.
pub struct RouterConfigBuilder {
    config: RouterConfig,
}

impl RouterConfigBuilder {
    /// Starts from development defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RouterConfig::development(),
        }
    }

    /// Sets the scheduling group id.
    #[must_use]
    pub fn scheduling_group_id(mut self, id: usize) -> Self {
        self.config.scheduling_group_id = id;
        self
    }

    /// Sets the submission service group id.
    #[must_use]
    pub fn submission_service_group_id(mut self, id: usize) -> Self {
        self.config.submission_service_group_id = id;
        self
    }

    /// Sets the maximum number of concurrent in-flight cross-core calls.
    #[must_use]
    pub fn max_in_flight_cross_core_calls(mut self, max: usize) -> Self {
        self.config.max_in_flight_cross_core_calls = max;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the resulting configuration is invalid.
    pub fn build(self) -> Result<RouterConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for RouterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_config_is_valid() {
        assert!(RouterConfig::development().validate().is_ok());
    }

    #[test]
    fn production_config_is_valid() {
        assert!(RouterConfig::production().validate().is_ok());
    }

    #[test]
    fn testing_config_is_valid() {
        assert!(RouterConfig::testing().validate().is_ok());
    }

    #[test]
    fn builder_rejects_zero_concurrency() {
        let result = RouterConfig::builder()
            .max_in_flight_cross_core_calls(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_produces_requested_values() {
        let config = RouterConfig::builder()
            .scheduling_group_id(7)
            .submission_service_group_id(9)
            .max_in_flight_cross_core_calls(42)
            .build()
            .unwrap();
        assert_eq!(config.scheduling_group().id, 7);
        assert_eq!(config.submission_service_group().id, 9);
        assert_eq!(config.max_in_flight_cross_core_calls, 42);
    }

    #[test]
    fn config_round_trips_through_a_file() {
        let config = RouterConfig::production();
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        let loaded = RouterConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(
            loaded.max_in_flight_cross_core_calls,
            config.max_in_flight_cross_core_calls
        );
    }
}
