// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Integration Engine
//!
//! Executes declaratively described calls against third-party HTTP APIs.
//! A connector definition lists endpoint templates; callers name an endpoint
//! and supply parameters, headers, a body and credentials, and the engine
//! turns that into one outbound request.
//!
//! ## Features
//!
//! - **Endpoint templates**: `{name}` path placeholders and declared query parameters
//! - **Auth**: API key, bearer, OAuth2 access token, Basic, custom headers
//! - **Rate limiting**: per-integration sliding window, recorded on success
//! - **Execution history**: every outcome recorded with a redacted request snapshot
//! - **HTTP front door**: axum routes for execute, list and lookup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use integration_engine::engine::{ExecuteRequest, ExecutionEngine};
//! use integration_engine::auth::AuthConfig;
//! use integration_engine::config::EngineConfig;
//! use integration_engine::load_connector;
//!
//! #[tokio::main]
//! async fn main() -> integration_engine::Result<()> {
//!     let connector = load_connector("connectors/github.yaml")?;
//!     let engine = ExecutionEngine::new(EngineConfig::default())?;
//!
//!     let request = ExecuteRequest::new("get_user")
//!         .param("username", "octocat")
//!         .auth(AuthConfig::bearer("ghp_..."));
//!
//!     let result = engine.execute("github", request, "user-1", &connector).await?;
//!     println!("{} in {}ms", result.status, result.duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   ExecutionEngine::execute(integration, request, actor, def) │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────┬────────────────┼───────────────┬───────────────┐
//! │ RateLimiter │ RequestBuilder │ HttpDispatcher│ ExecutionLedger│
//! ├─────────────┼────────────────┼───────────────┼───────────────┤
//! │ per key     │ URL template   │ single attempt│ filter/sort   │
//! │ sliding     │ header layers  │ timeout       │ FIFO retention│
//! │ window      │ AuthResolver   │ JSON or text  │ redacted      │
//! └─────────────┴────────────────┴───────────────┴───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the engine
pub mod error;

/// Common types and type aliases
pub mod types;

/// Engine configuration
pub mod config;

/// Connector definitions and loading
pub mod loader;

/// Authentication header resolution
pub mod auth;

/// Request synthesis, dispatch and rate limiting
pub mod http;

/// Execution history
pub mod ledger;

/// Main execution engine
pub mod engine;

/// Connector registry
pub mod registry;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ConfigurationError, Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{ExecuteRequest, ExecutionEngine};
pub use ledger::{ExecutionFilter, ExecutionResult};
pub use loader::{load_connector, load_connector_from_str, ConnectorDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
