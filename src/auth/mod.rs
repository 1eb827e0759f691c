//! Authentication module
//!
//! Supports: None, API Key, Bearer, OAuth2 (caller-supplied token), Basic, Custom Headers
//!
//! `AuthResolver` maps an `AuthConfig` to the headers it contributes. The
//! request builder applies these last so caller headers can never override them.

mod resolver;
mod types;

pub use resolver::{basic_credentials, AuthResolver};
pub use types::{AuthConfig, DEFAULT_API_KEY_HEADER};
