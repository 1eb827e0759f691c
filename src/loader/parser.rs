//! Parser for connector definitions
//!
//! Loads definitions from YAML or JSON (JSON parses as YAML) and validates
//! them before they reach the engine.

use crate::error::{Error, Result};
use crate::loader::types::{ConnectorDefinition, EndpointDefinition};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a connector definition from a file path
///
/// # Examples
///
/// ```ignore
/// let connector = load_connector("./connectors/github.yaml")?;
/// ```
pub fn load_connector(path: impl AsRef<Path>) -> Result<ConnectorDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read connector file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_connector_from_str(&content)
}

/// Load a connector definition from a YAML or JSON string
pub fn load_connector_from_str(content: &str) -> Result<ConnectorDefinition> {
    let def: ConnectorDefinition = serde_yaml::from_str(content)
        .map_err(|e| Error::config(format!("Failed to parse connector definition: {e}")))?;

    validate_connector(&def)?;
    Ok(def)
}

/// Validate a connector definition
pub fn validate_connector(def: &ConnectorDefinition) -> Result<()> {
    if def.base_url.trim().is_empty() {
        return Err(Error::config("Connector base_url cannot be empty"));
    }

    let mut seen = HashSet::new();
    for endpoint in &def.endpoints {
        validate_endpoint(endpoint)?;
        if !seen.insert(endpoint.id.as_str()) {
            return Err(Error::config(format!(
                "Duplicate endpoint id: {}",
                endpoint.id
            )));
        }
    }

    Ok(())
}

/// Validate an endpoint definition
fn validate_endpoint(endpoint: &EndpointDefinition) -> Result<()> {
    if endpoint.id.is_empty() {
        return Err(Error::config("Endpoint id cannot be empty"));
    }

    endpoint.http_method().map_err(|e| {
        Error::config(format!("Endpoint '{}': {e}", endpoint.id))
    })?;

    Ok(())
}
