//! Execution engine module
//!
//! Runs one declarative endpoint call end to end.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ExecutionEngine` - Admission, request synthesis, dispatch and recording
//! - `ExecuteRequest` - Caller-supplied description of one call
//!
//! # Outcomes
//!
//! `execute` returns `Err` only for a `ConfigurationError` (unknown endpoint,
//! unsupported method, incomplete auth). Everything else becomes an
//! `ExecutionResult` with one of four terminal statuses, and every result is
//! appended to the ledger:
//!
//! | Status | Trigger | Admission recorded |
//! |---|---|---|
//! | `success` | 2xx response | yes |
//! | `failed` | non-2xx, connection or serialization error | no |
//! | `timeout` | transport timeout | no |
//! | `rate_limited` | window full; no network call | no |

mod types;

pub use types::ExecuteRequest;

use crate::config::EngineConfig;
use crate::error::{ConfigurationError, Error, Result};
use crate::http::{
    build_url, normalize_body, redact_headers, DispatchOutcome, HttpDispatcher, RateLimiter,
    RequestBuilder,
};
use crate::ledger::{
    new_execution_id, timestamp_now, ExecutionFilter, ExecutionLedger, ExecutionResult,
    RequestSnapshot,
};
use crate::loader::ConnectorDefinition;
use crate::types::ExecutionStatus;
use std::time::Instant;
use tracing::{info, warn};

/// Executes connector endpoints and records every outcome
#[derive(Debug)]
pub struct ExecutionEngine {
    /// Request synthesis
    builder: RequestBuilder,
    /// HTTP transport
    dispatcher: HttpDispatcher,
    /// Per-integration admission control
    rate_limiter: RateLimiter,
    /// Execution history
    ledger: ExecutionLedger,
    /// Engine configuration
    config: EngineConfig,
}

impl ExecutionEngine {
    /// Create an engine from configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self::with_dispatcher(config, HttpDispatcher::new()?))
    }

    /// Create an engine around an existing dispatcher
    pub fn with_dispatcher(config: EngineConfig, dispatcher: HttpDispatcher) -> Self {
        Self {
            builder: RequestBuilder::new(config.user_agent.clone()),
            dispatcher,
            rate_limiter: RateLimiter::new(config.rate_limit.into()),
            ledger: ExecutionLedger::new(config.ledger.capacity),
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the rate limiter
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Get the ledger
    pub fn ledger(&self) -> &ExecutionLedger {
        &self.ledger
    }

    /// Execute one endpoint of `connector` on behalf of `actor_id`
    pub async fn execute(
        &self,
        integration_id: &str,
        request: ExecuteRequest,
        actor_id: &str,
        connector: &ConnectorDefinition,
    ) -> std::result::Result<ExecutionResult, ConfigurationError> {
        let execution_id = new_execution_id();

        let Some(permit) = self.rate_limiter.try_acquire(integration_id) else {
            warn!(
                integration_id,
                endpoint_id = %request.endpoint_id,
                max_requests = self.rate_limiter.config().max_requests,
                "Rate limit exceeded"
            );
            let result = ExecutionResult {
                execution_id,
                integration_id: integration_id.to_string(),
                endpoint_id: request.endpoint_id.clone(),
                status: ExecutionStatus::RateLimited,
                request: rejected_snapshot(connector, &request),
                response: None,
                error: Some(format!(
                    "Rate limit exceeded for integration {integration_id}"
                )),
                duration_ms: 0,
                executed_at: timestamp_now(),
                executed_by: actor_id.to_string(),
            };
            self.ledger.append(result.clone());
            return Ok(result);
        };

        let endpoint = connector.endpoint(&request.endpoint_id)?;
        let prepared = self.builder.build(connector, endpoint, &request)?;
        let timeout = request.timeout_or(self.config.default_timeout());

        let executed_at = timestamp_now();
        let start = Instant::now();
        let outcome = self.dispatcher.dispatch(&prepared, timeout).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let status = outcome.status();
        let (response, error) = match outcome {
            DispatchOutcome::Success(response) => {
                permit.commit();
                (Some(response), None)
            }
            DispatchOutcome::Timeout { timeout } => {
                let error = Error::Timeout {
                    timeout_secs: timeout.as_secs(),
                };
                (None, Some(error.to_string()))
            }
            DispatchOutcome::Failed { error, response } => {
                warn!(
                    integration_id,
                    endpoint_id = %endpoint.id,
                    error = %error,
                    "Upstream call failed"
                );
                (response, Some(error.to_string()))
            }
        };

        let result = ExecutionResult {
            execution_id,
            integration_id: integration_id.to_string(),
            endpoint_id: endpoint.id.clone(),
            status,
            request: prepared.snapshot(),
            response,
            error,
            duration_ms,
            executed_at,
            executed_by: actor_id.to_string(),
        };

        info!(
            execution_id = %result.execution_id,
            integration_id,
            endpoint_id = %result.endpoint_id,
            status = %result.status,
            duration_ms,
            "Execution finished"
        );

        self.ledger.append(result.clone());
        Ok(result)
    }

    /// Look up one execution
    pub fn get(&self, execution_id: &str) -> Option<ExecutionResult> {
        self.ledger.get(execution_id)
    }

    /// List executions matching `filter`, newest first, at most `limit`
    pub fn list(&self, filter: &ExecutionFilter, limit: usize) -> Vec<ExecutionResult> {
        self.ledger.list(filter, limit)
    }
}

/// Best-effort snapshot for a call rejected before request synthesis
fn rejected_snapshot(connector: &ConnectorDefinition, request: &ExecuteRequest) -> RequestSnapshot {
    let endpoint = connector.find_endpoint(&request.endpoint_id);
    RequestSnapshot {
        method: endpoint.map_or_else(String::new, |e| e.method.to_ascii_uppercase()),
        url: endpoint.map_or_else(String::new, |e| {
            build_url(&connector.base_url, &e.path, &request.params)
        }),
        headers: redact_headers(&request.headers, &[]),
        body: normalize_body(request.body.as_ref()),
    }
}
