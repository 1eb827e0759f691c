//! Ledger types
//!
//! `ExecutionResult` is the unit of record. Its serde shape is the wire
//! format returned by the HTTP front door.

use crate::types::{ExecutionStatus, JsonValue, StringMap};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of records returned by `list`
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Allocate a new execution id
pub fn new_execution_id() -> String {
    format!("exec_{}", Uuid::new_v4().simple())
}

/// Current UTC time as fixed-width RFC 3339 (`2024-05-01T12:00:00.123456Z`)
///
/// Fixed width keeps lexical order equal to chronological order.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Immutable record of one execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub execution_id: String,
    pub integration_id: String,
    pub endpoint_id: String,
    pub status: ExecutionStatus,
    /// Outgoing request with credential headers removed
    pub request: RequestSnapshot,
    pub response: Option<ResponseSnapshot>,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub executed_at: String,
    pub executed_by: String,
}

impl ExecutionResult {
    /// Whether the execution reached the upstream and got a 2xx
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Redacted snapshot of the outgoing request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    pub headers: StringMap,
    pub body: Option<JsonValue>,
}

/// Parsed upstream response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status_code: u16,
    pub headers: StringMap,
    /// Decoded JSON, or the raw text when the body is not JSON
    pub body: JsonValue,
}

/// Optional filters for listing executions, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutionFilter {
    #[serde(default)]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
}

impl ExecutionFilter {
    /// Filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one integration
    #[must_use]
    pub fn integration(mut self, integration_id: impl Into<String>) -> Self {
        self.integration_id = Some(integration_id.into());
        self
    }

    /// Restrict to one actor
    #[must_use]
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Restrict to one status
    #[must_use]
    pub fn status(mut self, status: ExecutionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Check a record against every set filter
    pub fn matches(&self, result: &ExecutionResult) -> bool {
        self.integration_id
            .as_ref()
            .map_or(true, |id| &result.integration_id == id)
            && self
                .user_id
                .as_ref()
                .map_or(true, |user| &result.executed_by == user)
            && self.status.map_or(true, |status| result.status == status)
    }
}
