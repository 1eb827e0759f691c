//! Loader types
//!
//! Declarative connector definition types. Definitions are produced by the
//! registry or by connector generators (OpenAPI, Postman, ...); the engine
//! only reads them.

use crate::error::ConfigurationError;
use crate::types::{JsonValue, Method};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Matches `{name}` placeholders in endpoint path templates
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").unwrap());

// ============================================================================
// Connector Definition
// ============================================================================

/// Top-level connector definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectorDefinition {
    /// Connector identifier
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Connector version
    #[serde(default = "default_version")]
    pub version: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Base URL for all endpoints
    pub base_url: String,
    /// Authentication methods the API accepts (informational)
    #[serde(default)]
    pub auth_methods: Vec<AuthMethod>,
    /// Endpoint templates, ids unique within the definition
    #[serde(default)]
    pub endpoints: Vec<EndpointDefinition>,
    /// Upstream rate limit hints (informational)
    #[serde(default)]
    pub rate_limits: JsonValue,
    /// Arbitrary metadata
    #[serde(default)]
    pub metadata: JsonValue,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl ConnectorDefinition {
    /// Create a definition with a base URL and no endpoints
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            version: default_version(),
            ..Default::default()
        }
    }

    /// Add an endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: EndpointDefinition) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Find an endpoint by id
    pub fn find_endpoint(&self, endpoint_id: &str) -> Option<&EndpointDefinition> {
        self.endpoints.iter().find(|e| e.id == endpoint_id)
    }

    /// Find an endpoint by id, failing with a configuration error
    pub fn endpoint(&self, endpoint_id: &str) -> Result<&EndpointDefinition, ConfigurationError> {
        self.find_endpoint(endpoint_id)
            .ok_or_else(|| ConfigurationError::endpoint_not_found(endpoint_id))
    }
}

/// Authentication method advertised by a connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthMethod {
    /// Method type: oauth2, api_key, basic, bearer, custom
    #[serde(rename = "type")]
    pub auth_type: String,
    /// Method-specific settings
    #[serde(default)]
    pub config: JsonValue,
}

// ============================================================================
// Endpoint Definition
// ============================================================================

/// One templated HTTP operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// Endpoint identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// HTTP method name; parsed when the endpoint is executed
    #[serde(default = "default_method")]
    pub method: String,
    /// Path template with `{name}` placeholders
    pub path: String,
    /// Declared parameters
    #[serde(default)]
    pub parameters: Vec<EndpointParameter>,
    /// Request body schema (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<JsonValue>,
    /// Whether the upstream expects credentials
    #[serde(default = "default_true")]
    pub auth_required: bool,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_true() -> bool {
    true
}

impl EndpointDefinition {
    /// Create an endpoint
    pub fn new(id: impl Into<String>, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            method: method.into(),
            path: path.into(),
            parameters: Vec::new(),
            request_body: None,
            auth_required: true,
            tags: Vec::new(),
        }
    }

    /// Add a declared parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: EndpointParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Parse the method
    pub fn http_method(&self) -> Result<Method, ConfigurationError> {
        self.method.parse()
    }

    /// Placeholder names in the path template, in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        placeholders(&self.path)
    }

    /// Parameters declared as query parameters
    pub fn query_parameters(&self) -> impl Iterator<Item = &EndpointParameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Query)
    }
}

/// Placeholder names (`{name}`) in a template
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// A declared endpoint parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointParameter {
    /// Parameter name
    pub name: String,
    /// Where the parameter goes
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    /// Whether the upstream requires it
    #[serde(default)]
    pub required: bool,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

impl EndpointParameter {
    /// Path parameter
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            required: true,
            description: String::new(),
        }
    }

    /// Optional query parameter
    pub fn query(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Query,
            required: false,
            description: String::new(),
        }
    }
}

/// Parameter location, as in OpenAPI's `in`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    #[default]
    Path,
    Query,
    Header,
    Cookie,
    Body,
    #[serde(other)]
    Other,
}
