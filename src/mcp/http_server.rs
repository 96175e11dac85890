//! HTTP transport
//!
//! Routes:
//! - `POST /mcp` - JSON-RPC endpoint
//! - `GET /mcp` - server info
//! - `GET /health` - liveness probe
//! - `POST /api/generate`, `POST /api/parse` - REST shortcuts for the two tools

use crate::mcp::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, PARSE_ERROR, TOOL_EXECUTION_ERROR,
    UNKNOWN_TOOL,
};
use crate::mcp::tools::ToolName;
use crate::mcp::McpServer;
use crate::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub server: Arc<McpServer>,
}

impl AppState {
    pub fn new(server: McpServer) -> Self {
        Self {
            server: Arc::new(server),
        }
    }
}

/// Build the router with all routes and layers
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_request).get(mcp_info))
        .route("/health", get(health_check))
        .route("/api/generate", post(api_generate))
        .route("/api/parse", post(api_parse))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(server: McpServer) -> Result<()> {
    let addr = server.config().bind_address()?;
    let app = router(AppState::new(server));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "HTTP server listening");
    println!("✓ Server listening on http://{}", addr);
    println!("  MCP endpoint: http://{}/mcp", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// JSON-RPC endpoint; notifications get `202 Accepted` with an empty body
async fn handle_mcp_request(State(state): State<AppState>, body: Bytes) -> Response {
    match state.server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => (StatusCode::ACCEPTED, "").into_response(),
    }
}

/// Human-readable description of the server
async fn mcp_info(State(state): State<AppState>) -> Json<Value> {
    let server = &state.server;
    let info = &server.config().server;
    let tools: Vec<&str> = server
        .tools()
        .list_tools()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    let resources: Vec<&str> = server
        .resources()
        .list()
        .iter()
        .map(|r| r.uri.as_str())
        .collect();

    Json(json!({
        "name": info.name,
        "version": info.version,
        "protocolVersion": info.protocol_version,
        "transport": "POST JSON-RPC 2.0 requests to this endpoint",
        "tools": tools,
        "resources": resources,
    }))
}

/// REST shortcut for `generate_diagram`
async fn api_generate(State(state): State<AppState>, body: Bytes) -> Response {
    call_tool(&state, ToolName::GenerateDiagram, &body).await
}

/// REST shortcut for `parse_file`
async fn api_parse(State(state): State<AppState>, body: Bytes) -> Response {
    call_tool(&state, ToolName::ParseFile, &body).await
}

/// Run a tool through the JSON-RPC dispatcher and unwrap its structured content.
/// A body that is not JSON gets a 400 `{error}` body with code -32700.
async fn call_tool(state: &AppState, tool: ToolName, body: &[u8]) -> Response {
    let arguments: Value = match serde_json::from_slice(body) {
        Ok(arguments) => arguments,
        Err(e) => {
            return error_body(
                StatusCode::BAD_REQUEST,
                json!({ "code": PARSE_ERROR, "message": format!("Parse error: {}", e) }),
            )
        }
    };

    let request = JsonRpcRequest::new(
        format!("rest-{}", tool),
        "tools/call",
        Some(json!({ "name": tool.as_str(), "arguments": arguments })),
    );

    let request = match serde_json::to_value(&request) {
        Ok(value) => value,
        Err(e) => return error_body(StatusCode::INTERNAL_SERVER_ERROR, json!(e.to_string())),
    };

    rest_response(state.server.handle(&request).await)
}

fn rest_response(response: JsonRpcResponse) -> Response {
    match (response.result, response.error) {
        (_, Some(error)) => {
            let status = match error.code {
                INVALID_PARAMS => StatusCode::UNPROCESSABLE_ENTITY,
                TOOL_EXECUTION_ERROR => StatusCode::BAD_REQUEST,
                UNKNOWN_TOOL => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let error = serde_json::to_value(&error).unwrap_or_else(|_| json!(error.message));
            error_body(status, error)
        }
        (Some(mut result), None) => {
            let content = result
                .get_mut("structuredContent")
                .map(Value::take)
                .unwrap_or(Value::Null);
            (StatusCode::OK, Json(content)).into_response()
        }
        (None, None) => error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!("Empty response from dispatcher"),
        ),
    }
}

fn error_body(status: StatusCode, error: Value) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}
