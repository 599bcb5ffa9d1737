//! Wait defaults, loadable from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::result::WaitResult;
use crate::wait::{validate_ms, DEFAULT_POLL_TIMEOUT_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Defaults applied when a wait request leaves timing unspecified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WaitConfig {
    /// Timeout in milliseconds (0 = no deadline)
    pub timeout_ms: f64,
    /// Delay between evaluations in milliseconds
    pub poll_timeout_ms: f64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
        }
    }
}

impl WaitConfig {
    /// Standard defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: f64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the default polling interval
    #[must_use]
    pub const fn with_poll_timeout_ms(mut self, poll_timeout_ms: f64) -> Self {
        self.poll_timeout_ms = poll_timeout_ms;
        self
    }

    /// Parse from YAML. Missing keys keep their defaults.
    pub fn from_yaml_str(source: &str) -> WaitResult<Self> {
        let config: Self = serde_yaml_ng::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> WaitResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&source)
    }

    /// Check both values the same way a wait request is checked
    pub fn validate(&self) -> WaitResult<()> {
        validate_ms("timeout", self.timeout_ms)?;
        validate_ms("pollTimeout", self.poll_timeout_ms)?;
        Ok(())
    }
}
