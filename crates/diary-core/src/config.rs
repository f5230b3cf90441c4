//! Dispatcher configuration
//!
//! Defaults match the behaviour expected by every feature module: validators
//! run one after another in registration order and rejected requests are
//! logged. Deployments can override both knobs from JSON.

use serde::{Deserialize, Serialize};

/// How the validators of one request are executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Await each validator in registration order
    #[default]
    Sequential,
    /// Poll all validators of a request together
    ///
    /// Failures are still flattened in registration order, so the surfaced
    /// error is the same as in sequential mode.
    Concurrent,
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Validator execution strategy
    pub validation_mode: ValidationMode,
    /// Emit a tracing event when validation rejects a request
    pub log_validation_failures: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::Sequential,
            log_validation_failures: true,
        }
    }
}

impl DispatchConfig {
    /// Parse a configuration document; missing fields take their defaults
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if `json` is not a valid document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Use the given validation mode
    #[must_use]
    pub const fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Enable or disable logging of rejected requests
    #[must_use]
    pub const fn with_validation_logging(mut self, enabled: bool) -> Self {
        self.log_validation_failures = enabled;
        self
    }
}

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Malformed configuration document
    #[error("invalid dispatch configuration: {0}")]
    Parse(String),
}
