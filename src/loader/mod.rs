//! Loader module
//!
//! Parse connector definitions from YAML or JSON files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ConnectorDefinition` - Base URL plus endpoint templates
//! - `EndpointDefinition` - One templated HTTP operation
//! - Parsing with validation (unique endpoint ids, supported methods)

mod parser;
mod types;

pub use parser::{load_connector, load_connector_from_str, validate_connector};
pub use types::{
    placeholders, AuthMethod, ConnectorDefinition, EndpointDefinition, EndpointParameter,
    ParameterLocation,
};
