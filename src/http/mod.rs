//! HTTP module
//!
//! Request synthesis, dispatch and admission control.
//!
//! # Features
//!
//! - **Request building**: URL templating, layered headers, auth headers last
//! - **Dispatch**: single attempt with timeout, outcome classification
//! - **Rate limiting**: per-integration sliding window
//! - **Redaction**: credential headers never reach persisted snapshots

mod client;
mod rate_limit;
mod request;

pub use client::{parse_body, DispatchOutcome, HttpDispatcher};
pub use rate_limit::{AdmissionPermit, RateLimiter, RateLimiterConfig};
pub use request::{
    build_url, is_sensitive_header, normalize_body, param_to_string, redact_headers,
    PreparedRequest, RequestBuilder,
};
