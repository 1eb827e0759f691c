//! Engine types
//!
//! `ExecuteRequest` is the caller-supplied description of one call. It lives
//! only for the duration of `ExecutionEngine::execute`.

use crate::auth::AuthConfig;
use crate::types::{JsonValue, StringMap, ValueMap};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request to execute one endpoint of an integration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Target endpoint id within the connector definition
    pub endpoint_id: String,
    /// Values for `{name}` placeholders and declared query parameters
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: ValueMap,
    /// JSON payload for POST/PUT/PATCH
    #[serde(default)]
    pub body: Option<JsonValue>,
    /// Caller-supplied headers; authentication headers take precedence
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: StringMap,
    /// Per-call authentication
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    /// Timeout in seconds; the engine default applies when absent
    #[serde(default)]
    pub timeout: Option<u64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ExecuteRequest {
    /// Create a request for an endpoint
    pub fn new(endpoint_id: impl Into<String>) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            ..Default::default()
        }
    }

    /// Set a parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set authentication
    #[must_use]
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set timeout in seconds
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// Effective timeout
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.map_or(default, Duration::from_secs)
    }
}
