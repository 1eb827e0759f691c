//! Auth resolver
//!
//! Turns an `AuthConfig` into the headers it contributes to a request.
//! Resolution is pure: no token fetching, refresh or caching happens here.

use super::types::{AuthConfig, DEFAULT_API_KEY_HEADER};
use crate::error::ConfigurationError;
use crate::types::{OptionStringExt, StringMap};
use base64::Engine as _;

/// Resolves authentication configuration into HTTP headers
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthResolver;

impl AuthResolver {
    /// Create a new resolver
    pub fn new() -> Self {
        Self
    }

    /// Resolve the headers for an optional auth configuration
    pub fn resolve_optional(
        &self,
        config: Option<&AuthConfig>,
    ) -> Result<StringMap, ConfigurationError> {
        config.map_or_else(|| Ok(StringMap::new()), |c| self.resolve(c))
    }

    /// Resolve the headers for an auth configuration
    ///
    /// A variant missing its credential fails with
    /// `ConfigurationError::MissingAuthField` instead of sending a placeholder.
    pub fn resolve(&self, config: &AuthConfig) -> Result<StringMap, ConfigurationError> {
        let mut headers = StringMap::new();

        match config {
            AuthConfig::None => {}

            AuthConfig::ApiKey {
                api_key,
                api_key_header,
            } => {
                let key = required(api_key, "api_key", "api_key")?;
                let header = api_key_header
                    .clone()
                    .none_if_empty()
                    .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string());
                headers.insert(header, key);
            }

            AuthConfig::BearerToken { bearer_token } => {
                let token = required(bearer_token, "bearer_token", "bearer_token")?;
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
            }

            AuthConfig::Oauth2 {
                oauth2_access_token,
            } => {
                let token = required(oauth2_access_token, "oauth2", "oauth2_access_token")?;
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
            }

            AuthConfig::BasicAuth {
                basic_username,
                basic_password,
            } => {
                let username = required(basic_username, "basic_auth", "basic_username")?;
                // Empty password allowed
                let password = basic_password
                    .clone()
                    .ok_or_else(|| {
                        ConfigurationError::missing_auth_field("basic_auth", "basic_password")
                    })?;
                headers.insert(
                    "Authorization".to_string(),
                    format!("Basic {}", basic_credentials(&username, &password)),
                );
            }

            AuthConfig::Custom { custom_headers } => {
                headers.extend(
                    custom_headers
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone())),
                );
            }
        }

        Ok(headers)
    }
}

/// Base64 of `username:password`
pub fn basic_credentials(username: &str, password: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"))
}

fn required(
    value: &Option<String>,
    auth_type: &'static str,
    field: &'static str,
) -> Result<String, ConfigurationError> {
    value
        .clone()
        .none_if_empty()
        .ok_or_else(|| ConfigurationError::missing_auth_field(auth_type, field))
}
