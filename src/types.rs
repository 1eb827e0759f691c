//! Common types used throughout the integration engine
//!
//! This module contains shared type definitions, type aliases,
//! and the closed vocabularies (HTTP method, execution status).

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, insertion-ordered
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Call parameters; iteration follows insertion order
pub type ValueMap = JsonObject;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method supported by endpoint definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }

    /// Whether a JSON body is sent with this method
    pub fn sends_body(self) -> bool {
        match self {
            Method::POST | Method::PUT | Method::PATCH => true,
            Method::GET | Method::DELETE => false,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigurationError;

    /// Endpoint definitions come from generators of varying quality, so the
    /// method name is matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(ConfigurationError::unsupported_method(s)),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Execution Status
// ============================================================================

/// Outcome of one execution
///
/// `Pending` and `Running` belong to the vocabulary but are never assigned:
/// execution is synchronous end-to-end, so every stored record carries one of
/// the four terminal statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Success,
    Failed,
    Timeout,
    RateLimited,
}

impl ExecutionStatus {
    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Timeout => "timeout",
            ExecutionStatus::RateLimited => "rate_limited",
        }
    }

    /// Whether this status ends an execution
    pub fn is_terminal(self) -> bool {
        match self {
            ExecutionStatus::Pending | ExecutionStatus::Running => false,
            ExecutionStatus::Success
            | ExecutionStatus::Failed
            | ExecutionStatus::Timeout
            | ExecutionStatus::RateLimited => true,
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ExecutionStatus::Pending),
            "running" => Ok(ExecutionStatus::Running),
            "success" => Ok(ExecutionStatus::Success),
            "failed" => Ok(ExecutionStatus::Failed),
            "timeout" => Ok(ExecutionStatus::Timeout),
            "rate_limited" => Ok(ExecutionStatus::RateLimited),
            other => Err(crate::error::Error::config(format!(
                "Unknown execution status: {other}"
            ))),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let patch: reqwest::Method = Method::PATCH.into();
        assert_eq!(reqwest::Method::PATCH, patch);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::GET);
        assert_eq!(" Delete ".parse::<Method>().unwrap(), Method::DELETE);
        assert_eq!(
            "TRACE".parse::<Method>().unwrap_err(),
            ConfigurationError::unsupported_method("TRACE")
        );
    }

    #[test]
    fn test_method_sends_body() {
        assert!(Method::POST.sends_body());
        assert!(Method::PUT.sends_body());
        assert!(Method::PATCH.sends_body());
        assert!(!Method::GET.sends_body());
        assert!(!Method::DELETE.sends_body());
    }

    #[test]
    fn test_execution_status_serde() {
        let status: ExecutionStatus = serde_json::from_str("\"rate_limited\"").unwrap();
        assert_eq!(status, ExecutionStatus::RateLimited);

        let json = serde_json::to_string(&ExecutionStatus::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }

    #[test]
    fn test_execution_status_parse() {
        assert_eq!(
            "TIMEOUT".parse::<ExecutionStatus>().unwrap(),
            ExecutionStatus::Timeout
        );
        assert!("done".parse::<ExecutionStatus>().is_err());
    }

    #[test]
    fn test_execution_status_terminal() {
        assert!(!ExecutionStatus::Pending.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(ExecutionStatus::Success.is_terminal());
        assert!(ExecutionStatus::RateLimited.is_terminal());
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!(String::new().none_if_empty(), None);
    }
}
