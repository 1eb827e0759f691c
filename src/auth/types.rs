//! Auth configuration types
//!
//! `AuthConfig` is supplied per call, never stored on a connector
//! definition. The serde shape matches the wire format:
//! `{"type": "api_key", "api_key": "...", "api_key_header": "X-Api-Key"}`.

use crate::types::StringMap;
use serde::{Deserialize, Serialize};

/// Header used when an API key does not name its own header
pub const DEFAULT_API_KEY_HEADER: &str = "Authorization";

/// Authentication configuration for a single call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// API key placed verbatim in a header
    ApiKey {
        /// The API key value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        /// Header name, `Authorization` when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key_header: Option<String>,
    },

    /// Static bearer token
    BearerToken {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bearer_token: Option<String>,
    },

    /// OAuth2 access token obtained by the caller (no refresh)
    Oauth2 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        oauth2_access_token: Option<String>,
    },

    /// HTTP Basic authentication
    BasicAuth {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        basic_username: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        basic_password: Option<String>,
    },

    /// Arbitrary headers merged verbatim
    Custom {
        #[serde(default)]
        custom_headers: StringMap,
    },
}

impl AuthConfig {
    /// API key auth with an explicit header
    pub fn api_key(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKey {
            api_key: Some(key.into()),
            api_key_header: Some(header.into()),
        }
    }

    /// Bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::BearerToken {
            bearer_token: Some(token.into()),
        }
    }

    /// OAuth2 access token auth
    pub fn oauth2(access_token: impl Into<String>) -> Self {
        Self::Oauth2 {
            oauth2_access_token: Some(access_token.into()),
        }
    }

    /// Basic auth
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::BasicAuth {
            basic_username: Some(username.into()),
            basic_password: Some(password.into()),
        }
    }

    /// Custom header auth
    pub fn custom(headers: StringMap) -> Self {
        Self::Custom {
            custom_headers: headers,
        }
    }

    /// Wire tag of this variant
    pub fn type_name(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::ApiKey { .. } => "api_key",
            AuthConfig::BearerToken { .. } => "bearer_token",
            AuthConfig::Oauth2 { .. } => "oauth2",
            AuthConfig::BasicAuth { .. } => "basic_auth",
            AuthConfig::Custom { .. } => "custom",
        }
    }
}
