//! Tests for registry module

use super::*;
use crate::error::Error;
use std::fs;
use tempfile::TempDir;

const GITHUB_YAML: &str = r#"
id: github
name: GitHub
base_url: https://api.github.com
endpoints:
  - id: get_user
    method: GET
    path: /users/{username}
"#;

const SLACK_JSON: &str = r#"{
  "base_url": "https://slack.com/api",
  "endpoints": [{"id": "post_message", "method": "POST", "path": "/chat.postMessage"}]
}"#;

#[tokio::test]
async fn test_register_and_lookup() {
    let registry = InMemoryRegistry::new();
    assert!(registry.is_empty());

    let previous = registry.register("github", ConnectorDefinition::new("https://api.github.com"));
    assert!(previous.is_none());

    let def = registry.get_connector_definition("github").await.unwrap().unwrap();
    assert_eq!(def.base_url, "https://api.github.com");
    assert!(registry.get_connector_definition("gitlab").await.unwrap().is_none());

    let previous = registry.register("github", ConnectorDefinition::new("https://ghe.local"));
    assert_eq!(previous.unwrap().base_url, "https://api.github.com");
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_installations() {
    let registry = InMemoryRegistry::new();
    registry.install("github", "alice");

    assert!(registry.is_installed("github", "alice").await.unwrap());
    assert!(!registry.is_installed("github", "bob").await.unwrap());
    assert!(!registry.is_installed("slack", "alice").await.unwrap());

    assert!(registry.uninstall("github", "alice"));
    assert!(!registry.uninstall("github", "alice"));
    assert!(!registry.is_installed("github", "alice").await.unwrap());
}

#[test]
fn test_load_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gh.yaml"), GITHUB_YAML).unwrap();
    fs::write(dir.path().join("slack.json"), SLACK_JSON).unwrap();
    fs::write(dir.path().join("README.md"), "not a connector").unwrap();

    let registry = InMemoryRegistry::new();
    let count = registry.load_dir(dir.path()).unwrap();

    assert_eq!(count, 2);
    // `id` wins over the file name; the stem is the fallback
    assert_eq!(registry.integration_ids(), vec!["github", "slack"]);
    let slack = registry.get("slack").unwrap();
    assert_eq!(slack.endpoints[0].id, "post_message");
}

#[test]
fn test_load_dir_rejects_invalid_definition() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.yml"), "base_url: ''\nendpoints: []\n").unwrap();

    let err = InMemoryRegistry::new().load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("bad.yml"));
}

#[test]
fn test_load_dir_missing() {
    let err = InMemoryRegistry::new()
        .load_dir("/definitely/not/here")
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_registry_as_trait_object() {
    let registry: Arc<dyn ConnectorRegistry> = Arc::new(InMemoryRegistry::new());
    assert!(registry.get_connector_definition("x").await.unwrap().is_none());
}
