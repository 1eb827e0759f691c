//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: connector YAML → engine → upstream → ledger

use integration_engine::auth::AuthConfig;
use integration_engine::config::EngineConfig;
use integration_engine::registry::{ConnectorRegistry, InMemoryRegistry};
use integration_engine::{
    load_connector_from_str, ConfigurationError, ExecuteRequest, ExecutionEngine,
    ExecutionFilter, ExecutionStatus,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector_yaml(base_url: &str) -> String {
    format!(
        r#"
id: example
name: Example API
version: "2.1.0"
base_url: {base_url}
auth_methods:
  - type: api_key
    config:
      header: X-Api-Key
endpoints:
  - id: get_user
    name: Get user
    method: GET
    path: /users/{{id}}
    parameters:
      - name: id
        in: path
        required: true
  - id: search_users
    method: get
    path: /users
    parameters:
      - name: q
        in: query
  - id: create_user
    method: POST
    path: /users
    tags: [write]
"#
    )
}

// ============================================================================
// End-to-end Scenario
// ============================================================================

#[tokio::test]
async fn test_get_user_with_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connector = load_connector_from_str(&connector_yaml(&mock_server.uri())).unwrap();
    assert_eq!(connector.version, "2.1.0");

    let engine = ExecutionEngine::new(EngineConfig::default()).unwrap();
    let request: ExecuteRequest = serde_json::from_value(json!({
        "endpoint_id": "get_user",
        "params": {"id": "7"},
        "auth": {"type": "api_key", "api_key_header": "X-Api-Key", "api_key": "secret"}
    }))
    .unwrap();

    let result = engine
        .execute("example", request, "user-1", &connector)
        .await
        .unwrap();

    assert_eq!(result.status, ExecutionStatus::Success);
    assert_eq!(result.request.url, format!("{}/users/7", mock_server.uri()));
    assert_eq!(result.response.as_ref().unwrap().body, json!({"id": 7}));

    let wire = serde_json::to_value(&result).unwrap();
    assert_eq!(wire["status"], "success");
    assert!(!wire["request"].to_string().contains("secret"));
    assert!(wire["error"].is_null());
    for key in [
        "execution_id",
        "integration_id",
        "endpoint_id",
        "request",
        "response",
        "duration_ms",
        "executed_at",
        "executed_by",
    ] {
        assert!(wire.get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn test_query_params_and_post_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("q", "ada lovelace"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Authorization", "Basic dTpw"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connector = load_connector_from_str(&connector_yaml(&mock_server.uri())).unwrap();
    let engine = ExecutionEngine::new(EngineConfig::default()).unwrap();

    let search = engine
        .execute(
            "example",
            ExecuteRequest::new("search_users").param("q", "ada lovelace"),
            "user-1",
            &connector,
        )
        .await
        .unwrap();
    assert_eq!(search.status, ExecutionStatus::Success);

    let created = engine
        .execute(
            "example",
            ExecuteRequest::new("create_user")
                .json(json!({"name": "Ada"}))
                .auth(AuthConfig::basic("u", "p")),
            "user-1",
            &connector,
        )
        .await
        .unwrap();
    assert_eq!(created.status, ExecutionStatus::Success);
    assert!(!created.request.headers.contains_key("Authorization"));
}

// ============================================================================
// Registry + Engine
// ============================================================================

#[tokio::test]
async fn test_registry_lookup_then_execute() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("example.yaml"),
        connector_yaml(&mock_server.uri()),
    )
    .unwrap();

    let registry = Arc::new(InMemoryRegistry::new());
    assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
    let connector = registry
        .get_connector_definition("example")
        .await
        .unwrap()
        .unwrap();

    let engine = ExecutionEngine::new(EngineConfig::default()).unwrap();
    let failed = engine
        .execute(
            "example",
            ExecuteRequest::new("get_user").param("id", 1),
            "user-2",
            &connector,
        )
        .await
        .unwrap();

    assert_eq!(failed.status, ExecutionStatus::Failed);
    assert_eq!(failed.error.as_deref(), Some("HTTP 500: boom"));
    assert_eq!(failed.response.as_ref().unwrap().body, json!("boom"));

    let err = engine
        .execute("example", ExecuteRequest::new("missing"), "user-2", &connector)
        .await
        .unwrap_err();
    assert_eq!(err, ConfigurationError::endpoint_not_found("missing"));

    let history = engine.list(&ExecutionFilter::new().user("user-2"), 100);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].execution_id, failed.execution_id);
}

#[tokio::test]
async fn test_configured_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = EngineConfig::from_yaml("rate_limit:\n  max_requests: 2\n").unwrap();
    let engine = ExecutionEngine::new(config).unwrap();
    let connector = load_connector_from_str(&connector_yaml(&mock_server.uri())).unwrap();

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let result = engine
            .execute(
                "example",
                ExecuteRequest::new("get_user").param("id", "7"),
                "user-1",
                &connector,
            )
            .await
            .unwrap();
        statuses.push(result.status);
    }

    assert_eq!(
        statuses,
        vec![
            ExecutionStatus::Success,
            ExecutionStatus::Success,
            ExecutionStatus::RateLimited
        ]
    );
    let limited = engine.list(
        &ExecutionFilter::new().status(ExecutionStatus::RateLimited),
        10,
    );
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].duration_ms, 0);
}
