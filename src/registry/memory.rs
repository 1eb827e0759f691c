//! In-memory connector registry

use super::ConnectorRegistry;
use crate::error::{Error, Result, ResultExt};
use crate::loader::{load_connector, ConnectorDefinition};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

const DEFINITION_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Registry holding definitions and installations in process memory
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    connectors: RwLock<BTreeMap<String, Arc<ConnectorDefinition>>>,
    /// integration id -> users that installed it
    installations: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, returning the one it replaced
    pub fn register(
        &self,
        integration_id: impl Into<String>,
        definition: ConnectorDefinition,
    ) -> Option<Arc<ConnectorDefinition>> {
        let integration_id = integration_id.into();
        debug!(%integration_id, endpoints = definition.endpoints.len(), "Registering connector");
        self.connectors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(integration_id, Arc::new(definition))
    }

    /// Load every `*.yaml`, `*.yml` and `*.json` definition in `dir`
    ///
    /// The integration id is the definition's `id`, or the file stem when
    /// the definition has none. Returns the number of definitions loaded.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::FileNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| DEFINITION_EXTENSIONS.contains(&ext))
            })
            .collect();
        paths.sort();

        for path in &paths {
            let definition = load_connector(path)
                .with_context(|| format!("Failed to load connector '{}'", path.display()))?;
            let integration_id = if definition.id.is_empty() {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or_default()
                    .to_string()
            } else {
                definition.id.clone()
            };
            self.register(integration_id, definition);
        }

        info!(dir = %dir.display(), count = paths.len(), "Loaded connector definitions");
        Ok(paths.len())
    }

    /// Look up a definition
    pub fn get(&self, integration_id: &str) -> Option<Arc<ConnectorDefinition>> {
        self.connectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(integration_id)
            .cloned()
    }

    /// Registered integration ids, sorted
    pub fn integration_ids(&self) -> Vec<String> {
        self.connectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.connectors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no definitions are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record that `user_id` installed an integration
    pub fn install(&self, integration_id: impl Into<String>, user_id: impl Into<String>) {
        self.installations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(integration_id.into())
            .or_default()
            .insert(user_id.into());
    }

    /// Remove an installation; returns whether it existed
    pub fn uninstall(&self, integration_id: &str, user_id: &str) -> bool {
        self.installations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(integration_id)
            .is_some_and(|users| users.remove(user_id))
    }

    fn installed(&self, integration_id: &str, user_id: &str) -> bool {
        self.installations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(integration_id)
            .is_some_and(|users| users.contains(user_id))
    }
}

#[async_trait]
impl ConnectorRegistry for InMemoryRegistry {
    async fn get_connector_definition(
        &self,
        integration_id: &str,
    ) -> Result<Option<Arc<ConnectorDefinition>>> {
        Ok(self.get(integration_id))
    }

    async fn is_installed(&self, integration_id: &str, user_id: &str) -> Result<bool> {
        Ok(self.installed(integration_id, user_id))
    }
}
