//! Request synthesis
//!
//! Turns an endpoint template, call-time parameters and headers into a
//! concrete method/URL/headers/body tuple.
//!
//! Path parameter values are substituted as-is, without percent-encoding,
//! and placeholders with no matching parameter stay in the URL verbatim.
//! Callers passing untrusted values are responsible for encoding them.

use crate::auth::{AuthConfig, AuthResolver};
use crate::engine::ExecuteRequest;
use crate::error::ConfigurationError;
use crate::ledger::RequestSnapshot;
use crate::loader::{placeholders, ConnectorDefinition, EndpointDefinition};
use crate::types::{JsonValue, Method, StringMap, ValueMap};
use tracing::{debug, warn};

/// Header names whose values are credentials regardless of who set them
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "api-key",
    "x-api-key",
];

/// Substrings marking a header name as credential-bearing
const SENSITIVE_FRAGMENTS: &[&str] = &["api-key", "api_key", "apikey", "token", "secret"];

/// A fully synthesized outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: StringMap,
    /// Normalized body; `None` for an absent, null or empty-object payload
    pub body: Option<JsonValue>,
    /// Header names contributed by the auth resolver
    pub credential_headers: Vec<String>,
}

impl PreparedRequest {
    /// Snapshot safe to persist: credential headers removed
    pub fn snapshot(&self) -> RequestSnapshot {
        RequestSnapshot {
            method: self.method.to_string(),
            url: self.url.clone(),
            headers: redact_headers(&self.headers, &self.credential_headers),
            body: self.body.clone(),
        }
    }

    /// Body to put on the wire, only for write methods
    pub fn wire_body(&self) -> Option<&JsonValue> {
        if self.method.sends_body() {
            self.body.as_ref()
        } else {
            None
        }
    }
}

/// Builds concrete requests from endpoint templates
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    user_agent: String,
    auth: AuthResolver,
}

impl RequestBuilder {
    /// Create a builder sending the given `User-Agent`
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            auth: AuthResolver::new(),
        }
    }

    /// Build the outgoing request for `request` against `endpoint`
    pub fn build(
        &self,
        connector: &ConnectorDefinition,
        endpoint: &EndpointDefinition,
        request: &ExecuteRequest,
    ) -> Result<PreparedRequest, ConfigurationError> {
        let method = endpoint.http_method()?;
        let auth_headers = self.auth.resolve_optional(request.auth.as_ref())?;

        let mut url = build_url(&connector.base_url, &endpoint.path, &request.params);
        let unresolved = placeholders(&url);
        if !unresolved.is_empty() {
            warn!(
                endpoint_id = %endpoint.id,
                placeholders = ?unresolved,
                "Path placeholders left unresolved"
            );
        }
        append_query(&mut url, endpoint, &request.params);

        let headers = self.build_headers(&request.headers, &auth_headers);
        let body = normalize_body(request.body.as_ref());

        debug!(
            method = %method,
            url = %url,
            auth = request.auth.as_ref().map_or("none", AuthConfig::type_name),
            "Prepared outgoing request"
        );

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            credential_headers: auth_headers.into_keys().collect(),
        })
    }

    /// Layer headers: defaults, then caller headers, then auth headers
    ///
    /// Keys compare case-insensitively and later layers win, so caller
    /// headers can never replace authentication headers.
    pub fn build_headers(&self, custom: &StringMap, auth: &StringMap) -> StringMap {
        let mut headers = StringMap::new();
        set_header(&mut headers, "Content-Type", "application/json");
        set_header(&mut headers, "User-Agent", &self.user_agent);

        for (key, value) in custom {
            set_header(&mut headers, key, value);
        }
        for (key, value) in auth {
            set_header(&mut headers, key, value);
        }

        headers
    }
}

/// Join `base_url` and `path` with exactly one `/`, then substitute every
/// `{key}` occurrence with the string form of `params[key]`
///
/// Parameters are applied in insertion order, so a value that itself
/// contains a later parameter's placeholder is substituted again.
pub fn build_url(base_url: &str, path: &str, params: &ValueMap) -> String {
    let mut url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    for (key, value) in params {
        url = url.replace(&format!("{{{key}}}"), &param_to_string(value));
    }

    url
}

/// String form of a parameter: strings raw, everything else as JSON text
pub fn param_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Append declared query parameters that no placeholder consumed
fn append_query(url: &mut String, endpoint: &EndpointDefinition, params: &ValueMap) {
    let in_path = endpoint.placeholders();
    let pairs: Vec<(&str, String)> = endpoint
        .query_parameters()
        .filter(|p| !in_path.contains(&p.name.as_str()))
        .filter_map(|p| params.get(&p.name).map(|v| (p.name.as_str(), param_to_string(v))))
        .collect();

    if pairs.is_empty() {
        return;
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(&query);
}

/// Treat `null` and `{}` the same as no body
pub fn normalize_body(body: Option<&JsonValue>) -> Option<JsonValue> {
    match body {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::Object(map)) if map.is_empty() => None,
        Some(value) => Some(value.clone()),
    }
}

/// Insert a header, replacing any existing key that differs only in case
fn set_header(headers: &mut StringMap, key: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
    headers.insert(key.to_string(), value.to_string());
}

/// Whether a header name carries credentials by convention
pub fn is_sensitive_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SENSITIVE_HEADERS.contains(&lower.as_str())
        || SENSITIVE_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Drop credential headers: the explicit `credential` names plus every
/// conventionally sensitive name
pub fn redact_headers(headers: &StringMap, credential: &[String]) -> StringMap {
    headers
        .iter()
        .filter(|(name, _)| {
            !is_sensitive_header(name) && !credential.iter().any(|c| c.eq_ignore_ascii_case(name))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
