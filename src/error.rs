//! Error types for the integration engine
//!
//! Two channels exist on purpose. `ConfigurationError` is the only failure
//! `ExecutionEngine::execute` returns to its caller; every execution-time
//! failure becomes an `ExecutionResult` instead. `Error` covers everything
//! else (loading, dispatch, the HTTP front door).

use thiserror::Error;

/// A connector definition or call cannot be turned into an HTTP request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Endpoint {endpoint_id} not found")]
    EndpointNotFound { endpoint_id: String },

    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod { method: String },

    #[error("Missing required field '{field}' for {auth_type} authentication")]
    MissingAuthField {
        auth_type: &'static str,
        field: &'static str,
    },
}

impl ConfigurationError {
    /// Create an endpoint-not-found error
    pub fn endpoint_not_found(endpoint_id: impl Into<String>) -> Self {
        Self::EndpointNotFound {
            endpoint_id: endpoint_id.into(),
        }
    }

    /// Create an unsupported-method error
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create a missing auth field error
    pub fn missing_auth_field(auth_type: &'static str, field: &'static str) -> Self {
        Self::MissingAuthField { auth_type, field }
    }
}

/// The main error type for the integration engine
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ============================================================================
    // Lookup Errors
    // ============================================================================
    #[error("Integration not found: {integration_id}")]
    IntegrationNotFound { integration_id: String },

    #[error("Execution not found: {execution_id}")]
    ExecutionNotFound { execution_id: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an integration-not-found error
    pub fn integration_not_found(integration_id: impl Into<String>) -> Self {
        Self::IntegrationNotFound {
            integration_id: integration_id.into(),
        }
    }

    /// Create an execution-not-found error
    pub fn execution_not_found(execution_id: impl Into<String>) -> Self {
        Self::ExecutionNotFound {
            execution_id: execution_id.into(),
        }
    }

    /// Check if this error is a transport timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if this error is a configuration problem rather than a runtime failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::Configuration(_)
        )
    }
}

/// Result type alias for the integration engine
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
