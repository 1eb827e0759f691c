//! HTTP dispatcher
//!
//! Issues a single attempt per call and classifies the raw outcome:
//! - 2xx: success, with the parsed response
//! - transport timeout: timeout
//! - anything else (non-2xx, connection error, invalid header, body
//!   serialization): failure carrying the stringified cause
//!
//! There are no retries. A non-2xx response is a failure regardless of
//! status class; its parsed body is still captured.

use super::request::PreparedRequest;
use crate::error::{Error, Result};
use crate::ledger::ResponseSnapshot;
use crate::types::{ExecutionStatus, JsonValue, StringMap};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Classified outcome of one dispatch
#[derive(Debug)]
pub enum DispatchOutcome {
    /// 2xx response
    Success(ResponseSnapshot),
    /// The transport gave up after `timeout`
    Timeout { timeout: Duration },
    /// Any other failure; `response` is set when the upstream answered
    Failed {
        error: Error,
        response: Option<ResponseSnapshot>,
    },
}

impl DispatchOutcome {
    /// Execution status for this outcome
    pub fn status(&self) -> ExecutionStatus {
        match self {
            DispatchOutcome::Success(_) => ExecutionStatus::Success,
            DispatchOutcome::Timeout { .. } => ExecutionStatus::Timeout,
            DispatchOutcome::Failed { .. } => ExecutionStatus::Failed,
        }
    }

    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success(_))
    }
}

/// Sends prepared requests
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
}

impl HttpDispatcher {
    /// Create a dispatcher with a default client
    ///
    /// Timeouts are applied per request, so the client has none of its own.
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Send `request` with `timeout` and classify the outcome
    pub async fn dispatch(&self, request: &PreparedRequest, timeout: Duration) -> DispatchOutcome {
        match self.send(request, timeout).await {
            Ok((response, _)) if (200..300).contains(&response.status_code) => {
                debug!(status = response.status_code, "Request succeeded");
                DispatchOutcome::Success(response)
            }
            Ok((response, raw_body)) => DispatchOutcome::Failed {
                error: Error::http_status(response.status_code, raw_body),
                response: Some(response),
            },
            Err(e) if e.is_timeout() => DispatchOutcome::Timeout { timeout },
            Err(error) => DispatchOutcome::Failed {
                error,
                response: None,
            },
        }
    }

    /// Send the request and read the full body
    async fn send(
        &self,
        request: &PreparedRequest,
        timeout: Duration,
    ) -> Result<(ResponseSnapshot, String)> {
        let mut req = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(timeout);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.wire_body() {
            req = req.json(body);
        }

        let response = req.send().await?;
        read_response(response).await
    }
}

/// Capture status, headers and body of a response
async fn read_response(response: Response) -> Result<(ResponseSnapshot, String)> {
    let status_code = response.status().as_u16();
    let headers = header_map_to_strings(response.headers());
    let raw = response.text().await?;

    Ok((
        ResponseSnapshot {
            status_code,
            headers,
            body: parse_body(&raw),
        },
        raw,
    ))
}

/// Decode a body as JSON, keeping the raw text when it is not JSON
pub fn parse_body(raw: &str) -> JsonValue {
    if raw.is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

/// Flatten response headers; repeated names are joined with `, `
fn header_map_to_strings(headers: &HeaderMap) -> StringMap {
    let mut out = StringMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match out.get_mut(name.as_str()) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                out.insert(name.as_str().to_string(), value);
            }
        }
    }
    out
}
