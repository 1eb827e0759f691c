//! Connector registry module
//!
//! The engine never looks connectors up itself: callers resolve the
//! definition through a `ConnectorRegistry` and pass it to `execute`.
//!
//! # Overview
//!
//! The registry module provides:
//! - `ConnectorRegistry` - Lookup and installation checks
//! - `InMemoryRegistry` - Process-local registry loaded from files

mod memory;

pub use memory::InMemoryRegistry;

use crate::error::Result;
use crate::loader::ConnectorDefinition;
use async_trait::async_trait;
use std::sync::Arc;

// ============================================================================
// Registry Trait
// ============================================================================

/// Source of connector definitions and installations
#[async_trait]
pub trait ConnectorRegistry: Send + Sync {
    /// Definition registered for an integration, if any
    async fn get_connector_definition(
        &self,
        integration_id: &str,
    ) -> Result<Option<Arc<ConnectorDefinition>>>;

    /// Whether `user_id` has installed the integration
    async fn is_installed(&self, integration_id: &str, user_id: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests;
