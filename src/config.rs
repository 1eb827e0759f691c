//! Engine configuration
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the stock limits: 100 admissions per 60 seconds per integration,
//! 30 second call timeout, 10 000 retained executions.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default admissions per window
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default sliding window length in seconds
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Default per-call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of executions kept by the ledger
pub const DEFAULT_LEDGER_CAPACITY: usize = 10_000;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-integration admission control
    pub rate_limit: RateLimitSettings,
    /// Timeout applied when a request does not carry one
    pub default_timeout_secs: u64,
    /// `User-Agent` sent on every outgoing call
    pub user_agent: String,
    /// Execution history retention
    pub ledger: LedgerSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitSettings::default(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            ledger: LedgerSettings::default(),
        }
    }
}

/// `integration-engine/<version>`
pub fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional path, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.max_requests == 0 {
            return Err(Error::config("rate_limit.max_requests must be at least 1"));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(Error::config("rate_limit.window_secs must be at least 1"));
        }
        if self.ledger.capacity == Some(0) {
            return Err(Error::config("ledger.capacity must be at least 1 or null"));
        }
        Ok(())
    }

    /// Default timeout as a `Duration`
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

/// Sliding window settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Admissions allowed per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

/// Ledger retention settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Maximum retained executions; `None` keeps everything
    pub capacity: Option<usize>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_LEDGER_CAPACITY),
        }
    }
}
