//! HTTP server mode for REST access to integration execution
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/v1/integrations/:integration_id/execute`
//! - `GET /api/v1/integrations/:integration_id/executions`
//! - `GET /api/v1/executions/:execution_id`
//!
//! The caller is identified by the `X-User-Id` header. Executions are only
//! visible to the actor that ran them.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::engine::{ExecuteRequest, ExecutionEngine};
use crate::error::{ConfigurationError, Error, Result};
use crate::ledger::{ExecutionFilter, ExecutionResult, DEFAULT_LIST_LIMIT};
use crate::registry::{ConnectorRegistry, InMemoryRegistry};
use crate::types::ExecutionStatus;

/// Header carrying the caller identity
pub const USER_ID_HEADER: &str = "x-user-id";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory containing connector definition files
    pub connectors_dir: PathBuf,
    /// Reject executions for integrations the caller has not installed
    pub require_installation: bool,
    /// Actor used when a request carries no `X-User-Id` header
    pub default_actor: String,
    /// Engine configuration
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            connectors_dir: PathBuf::from("connectors"),
            require_installation: false,
            default_actor: "anonymous".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    engine: Arc<ExecutionEngine>,
    registry: Arc<dyn ConnectorRegistry>,
    require_installation: bool,
    default_actor: String,
}

impl AppState {
    /// Create handler state from an engine and a registry
    pub fn new(engine: Arc<ExecutionEngine>, registry: Arc<dyn ConnectorRegistry>) -> Self {
        Self {
            engine,
            registry,
            require_installation: false,
            default_actor: "anonymous".to_string(),
        }
    }

    /// Require an installation before executing
    #[must_use]
    pub fn require_installation(mut self, required: bool) -> Self {
        self.require_installation = required;
        self
    }

    /// Set the fallback actor
    #[must_use]
    pub fn default_actor(mut self, actor: impl Into<String>) -> Self {
        self.default_actor = actor.into();
        self
    }

    fn actor(&self, headers: &HeaderMap) -> String {
        headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| self.default_actor.clone(), str::to_string)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(err: ConfigurationError) -> Self {
        let status = match err {
            ConfigurationError::EndpointNotFound { .. } => StatusCode::NOT_FOUND,
            ConfigurationError::UnsupportedMethod { .. }
            | ConfigurationError::MissingAuthField { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Configuration(inner) => inner.into(),
            Error::IntegrationNotFound { .. } | Error::ExecutionNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            other if other.is_configuration() => Self::bad_request(other.to_string()),
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the router over `state`
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/integrations/:integration_id/execute",
            post(execute_integration),
        )
        .route(
            "/api/v1/integrations/:integration_id/executions",
            get(list_executions),
        )
        .route("/api/v1/executions/:execution_id", get(get_execution))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let registry = InMemoryRegistry::new();
    if config.connectors_dir.is_dir() {
        registry.load_dir(&config.connectors_dir)?;
    } else {
        warn!(
            dir = %config.connectors_dir.display(),
            "Connectors directory not found, starting with an empty registry"
        );
    }

    let engine = ExecutionEngine::new(config.engine.clone())?;
    let state = AppState::new(Arc::new(engine), Arc::new(registry))
        .require_installation(config.require_installation)
        .default_actor(config.default_actor.clone());

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": crate::NAME,
        "version": crate::VERSION,
    }))
}

/// Execute one endpoint of an integration
async fn execute_integration(
    State(state): State<AppState>,
    Path(integration_id): Path<String>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ExecuteRequest>, JsonRejection>,
) -> std::result::Result<Json<ExecutionResult>, ApiError> {
    let Json(request) = payload?;
    let actor = state.actor(&headers);

    let connector = state
        .registry
        .get_connector_definition(&integration_id)
        .await?
        .ok_or_else(|| Error::integration_not_found(&integration_id))?;

    if state.require_installation && !state.registry.is_installed(&integration_id, &actor).await? {
        return Err(ApiError::forbidden(format!(
            "Integration {integration_id} is not installed"
        )));
    }

    let result = state
        .engine
        .execute(&integration_id, request, &actor, &connector)
        .await?;

    Ok(Json(result))
}

/// Query string for listing executions
#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
    limit: Option<usize>,
}

/// List the caller's executions for an integration
async fn list_executions(
    State(state): State<AppState>,
    Path(integration_id): Path<String>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> std::result::Result<Json<Vec<ExecutionResult>>, ApiError> {
    let mut filter = ExecutionFilter::new()
        .integration(integration_id)
        .user(state.actor(&headers));

    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status: ExecutionStatus = status
            .parse()
            .map_err(|e: Error| ApiError::bad_request(e.to_string()))?;
        filter = filter.status(status);
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(state.engine.list(&filter, limit)))
}

/// Fetch one execution owned by the caller
async fn get_execution(
    State(state): State<AppState>,
    Path(execution_id): Path<String>,
    headers: HeaderMap,
) -> std::result::Result<Json<ExecutionResult>, ApiError> {
    let result = state
        .engine
        .get(&execution_id)
        .ok_or_else(|| Error::execution_not_found(&execution_id))?;

    if result.executed_by != state.actor(&headers) {
        return Err(ApiError::forbidden("Access denied"));
    }

    Ok(Json(result))
}

#[cfg(test)]
mod server_tests {
    use super::*;
    use crate::loader::{ConnectorDefinition, EndpointDefinition};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup(require_installation: bool) -> (MockServer, Router, Arc<InMemoryRegistry>) {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .mount(&mock_server)
            .await;

        let registry = Arc::new(InMemoryRegistry::new());
        registry.register(
            "github",
            ConnectorDefinition::new(mock_server.uri())
                .with_endpoint(EndpointDefinition::new("get_user", "GET", "/users/{id}"))
                .with_endpoint(EndpointDefinition::new("trace_root", "TRACE", "/")),
        );

        let engine = Arc::new(ExecutionEngine::new(EngineConfig::default()).unwrap());
        let state = AppState::new(engine, registry.clone())
            .require_installation(require_installation);

        (mock_server, router(state), registry)
    }

    fn execute_request(integration: &str, user: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/integrations/{integration}/execute"))
            .header("content-type", "application/json")
            .header(USER_ID_HEADER, user)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, user: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(USER_ID_HEADER, user)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_user_body() -> Value {
        json!({"endpoint_id": "get_user", "params": {"id": "7"}})
    }

    #[tokio::test]
    async fn test_health() {
        let (_server, app, _) = setup(false).await;
        let (status, body) = send(&app, get_request("/health", "alice")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], crate::VERSION);
    }

    #[tokio::test]
    async fn test_execute_success() {
        let (_server, app, _) = setup(false).await;
        let (status, body) = send(&app, execute_request("github", "alice", &get_user_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["executed_by"], "alice");
        assert_eq!(body["response"]["body"], json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_execute_uses_default_actor() {
        let (_server, app, _) = setup(false).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/integrations/github/execute")
            .header("content-type", "application/json")
            .body(Body::from(get_user_body().to_string()))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["executed_by"], "anonymous");
    }

    #[tokio::test]
    async fn test_execute_malformed_body_renders_json_error() {
        let (_server, app, _) = setup(false).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/integrations/github/execute")
            .header("content-type", "application/json")
            .header(USER_ID_HEADER, "alice")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_missing_endpoint_id_renders_json_error() {
        let (_server, app, _) = setup(false).await;
        let (status, body) =
            send(&app, execute_request("github", "alice", &json!({"params": {}}))).await;

        assert!(status.is_client_error());
        assert!(body["error"].as_str().unwrap().contains("endpoint_id"));
    }

    #[tokio::test]
    async fn test_execute_unknown_integration() {
        let (_server, app, _) = setup(false).await;
        let (status, body) = send(&app, execute_request("gitlab", "alice", &get_user_body())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Integration not found: gitlab");
    }

    #[tokio::test]
    async fn test_execute_unknown_endpoint() {
        let (_server, app, _) = setup(false).await;
        let (status, body) = send(
            &app,
            execute_request("github", "alice", &json!({"endpoint_id": "nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint nope not found");
    }

    #[tokio::test]
    async fn test_execute_unsupported_method() {
        let (_server, app, _) = setup(false).await;
        let (status, body) = send(
            &app,
            execute_request("github", "alice", &json!({"endpoint_id": "trace_root"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unsupported HTTP method: TRACE");
    }

    #[tokio::test]
    async fn test_execute_requires_installation() {
        let (_server, app, registry) = setup(true).await;

        let (status, _) = send(&app, execute_request("github", "alice", &get_user_body())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        registry.install("github", "alice");
        let (status, _) = send(&app, execute_request("github", "alice", &get_user_body())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_and_get_executions() {
        let (_server, app, _) = setup(false).await;

        let (_, first) = send(&app, execute_request("github", "alice", &get_user_body())).await;
        send(&app, execute_request("github", "bob", &get_user_body())).await;

        let (status, listed) = send(
            &app,
            get_request("/api/v1/integrations/github/executions?status=success", "alice"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["execution_id"], first["execution_id"]);

        let execution_id = first["execution_id"].as_str().unwrap();
        let uri = format!("/api/v1/executions/{execution_id}");

        let (status, fetched) = send(&app, get_request(&uri, "alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, first);

        let (status, body) = send(&app, get_request(&uri, "bob")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Access denied");
    }

    #[tokio::test]
    async fn test_list_limit_and_bad_status() {
        let (_server, app, _) = setup(false).await;
        for _ in 0..3 {
            send(&app, execute_request("github", "alice", &get_user_body())).await;
        }

        let (_, listed) = send(
            &app,
            get_request("/api/v1/integrations/github/executions?limit=2", "alice"),
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 2);

        let (status, _) = send(
            &app,
            get_request("/api/v1/integrations/github/executions?status=bogus", "alice"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_execution() {
        let (_server, app, _) = setup(false).await;
        let (status, body) = send(&app, get_request("/api/v1/executions/exec_nope", "alice")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Execution not found: exec_nope");
    }
}
