//! MCP Server Implementation
//!
//! Validates JSON-RPC 2.0 envelopes and routes MCP methods to the tool
//! registry and resource store. Transports (stdio here, HTTP in
//! [`crate::mcp::http_server`]) only move bytes in and out.

use crate::config::ServerConfig;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{JsonRpcResponse, Method, JSONRPC_VERSION};
use crate::mcp::resources::{
    BundledResourceStore, FileResourceStore, ResourceCatalog, ResourceStore,
};
use crate::mcp::tools::ToolRegistry;
use crate::Result;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Method prefix of client notifications, which never get a response
const NOTIFICATION_PREFIX: &str = "notifications/";

/// A request envelope that passed validation
struct Envelope<'a> {
    id: Value,
    method: Method,
    params: Option<&'a Map<String, Value>>,
}

/// MCP Server
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent requests behind an `Arc`.
pub struct McpServer {
    config: ServerConfig,
    tools: ToolRegistry,
    resources: ResourceCatalog,
    store: Arc<dyn ResourceStore>,
}

impl McpServer {
    /// Create a server, reading templates from `resources.templates_dir` when
    /// configured and from the bundled copies otherwise
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store: Arc<dyn ResourceStore> = match &config.resources.templates_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "serving templates from disk");
                Arc::new(FileResourceStore::new(dir))
            }
            None => Arc::new(BundledResourceStore),
        };
        Self::with_store(config, store)
    }

    /// Create a server with an explicit resource store
    pub fn with_store(config: ServerConfig, store: Arc<dyn ResourceStore>) -> Result<Self> {
        let tools = ToolRegistry::new()?;
        Ok(Self {
            config,
            tools,
            resources: ResourceCatalog::new(),
            store,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn resources(&self) -> &ResourceCatalog {
        &self.resources
    }

    /// Run the MCP server, reading from stdin and writing to stdout
    pub async fn run_stdio(&self) -> Result<()> {
        info!("stdio server started, waiting for requests");
        self.serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("stdin closed, stdio server stopped");
        Ok(())
    }

    /// Answer newline-delimited messages until the reader hits EOF.
    ///
    /// Lines are read as raw bytes; a line that is not UTF-8 is answered
    /// with a parse error like any other malformed message.
    pub async fn serve_lines<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            if buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            if let Some(response) = self.handle_message(&buf).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    /// Handle one raw JSON-RPC message.
    ///
    /// Bytes that are not valid UTF-8 JSON get a parse error with a null id.
    /// Returns `None` for notifications, which get no response.
    pub async fn handle_message(&self, raw: &[u8]) -> Option<JsonRpcResponse> {
        let request: Value = match serde_json::from_slice(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable message");
                let err = McpError::Parse(e.to_string());
                return Some(JsonRpcResponse::failure(Value::Null, err.to_rpc_error()));
            }
        };

        if is_notification(&request) {
            debug!(method = ?request.get("method"), "ignoring notification");
            return None;
        }

        Some(self.handle(&request).await)
    }

    /// Handle one parsed JSON-RPC request. Always produces a response.
    pub async fn handle(&self, request: &Value) -> JsonRpcResponse {
        let envelope = match parse_envelope(request) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(code = err.code(), error = %err, "rejected request");
                return JsonRpcResponse::failure(request_id(request), err.to_rpc_error());
            }
        };

        debug!(method = envelope.method.as_str(), id = %envelope.id, "handling request");

        match self.dispatch(envelope.method, envelope.params).await {
            Ok(result) => JsonRpcResponse::success(envelope.id, result),
            Err(err) => {
                warn!(
                    method = envelope.method.as_str(),
                    id = %envelope.id,
                    code = err.code(),
                    error = %err,
                    "request failed"
                );
                JsonRpcResponse::failure(envelope.id, err.to_rpc_error())
            }
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        params: Option<&Map<String, Value>>,
    ) -> std::result::Result<Value, McpError> {
        match method {
            Method::Initialize => Ok(self.handle_initialize()),
            Method::ToolsList => Ok(json!({ "tools": self.tools.list_tools() })),
            Method::ToolsCall => self.handle_tools_call(params),
            Method::ResourcesList => Ok(json!({ "resources": self.resources.list() })),
            Method::ResourcesRead => self.handle_resources_read(params).await,
        }
    }

    /// Handle `initialize` request
    fn handle_initialize(&self) -> Value {
        let server = &self.config.server;
        json!({
            "protocolVersion": server.protocol_version,
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": server.name,
                "version": server.version
            }
        })
    }

    /// Handle `tools/call` request
    fn handle_tools_call(
        &self,
        params: Option<&Map<String, Value>>,
    ) -> std::result::Result<Value, McpError> {
        let name = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::InvalidParams("Missing tool name".to_string()))?;

        let arguments = match params.and_then(|p| p.get("arguments")) {
            None | Some(Value::Null) => json!({}),
            Some(args) => args.clone(),
        };

        debug!(tool = name, "calling tool");

        let result = self.tools.call_tool(name, &arguments)?;
        serde_json::to_value(result).map_err(|e| McpError::Internal(e.to_string()))
    }

    /// Handle `resources/read` request
    async fn handle_resources_read(
        &self,
        params: Option<&Map<String, Value>>,
    ) -> std::result::Result<Value, McpError> {
        let uri = params
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::InvalidParams("Missing resource uri".to_string()))?;

        let resource = self
            .resources
            .find(uri)
            .ok_or_else(|| McpError::ResourceNotFound(uri.to_string()))?;

        let text = self.store.read(resource).await?;

        Ok(json!({
            "contents": [{
                "uri": resource.uri,
                "mimeType": resource.mime_type,
                "text": text
            }]
        }))
    }
}

/// Validate the JSON-RPC envelope.
///
/// Checks run in order: object shape, version, id, method, params, then the
/// method name. An unknown method is only reported for otherwise valid
/// envelopes.
fn parse_envelope(request: &Value) -> std::result::Result<Envelope<'_>, McpError> {
    let obj = request
        .as_object()
        .ok_or_else(|| McpError::InvalidRequest("Request must be a JSON object".to_string()))?;

    if let Some(version) = obj.get("jsonrpc") {
        if version.as_str() != Some(JSONRPC_VERSION) {
            return Err(McpError::InvalidRequest(format!(
                "Unsupported JSON-RPC version: {}",
                version
            )));
        }
    }

    let id = match obj.get("id") {
        None => return Err(McpError::InvalidRequest("Missing request id".to_string())),
        Some(id @ (Value::String(_) | Value::Number(_) | Value::Null)) => id.clone(),
        Some(other) => {
            return Err(McpError::InvalidRequest(format!(
                "Request id must be a string, number or null, got {}",
                other
            )))
        }
    };

    let method_name = match obj.get("method") {
        Some(Value::String(name)) if !name.is_empty() => name.as_str(),
        Some(Value::String(_)) => {
            return Err(McpError::InvalidRequest(
                "Method must not be empty".to_string(),
            ))
        }
        Some(_) => {
            return Err(McpError::InvalidRequest(
                "Method must be a string".to_string(),
            ))
        }
        None => return Err(McpError::InvalidRequest("Missing method".to_string())),
    };

    let params = match obj.get("params") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            return Err(McpError::InvalidRequest(
                "Params must be an object".to_string(),
            ))
        }
    };

    let method = Method::parse(method_name)
        .ok_or_else(|| McpError::MethodNotFound(method_name.to_string()))?;

    Ok(Envelope { id, method, params })
}

/// Best-effort id for error responses to rejected envelopes
fn request_id(request: &Value) -> Value {
    match request.get("id") {
        Some(id @ (Value::String(_) | Value::Number(_))) => id.clone(),
        _ => Value::Null,
    }
}

/// Notifications carry no id and a `notifications/*` method
fn is_notification(request: &Value) -> bool {
    request.get("id").is_none()
        && request
            .get("method")
            .and_then(Value::as_str)
            .is_some_and(|m| m.starts_with(NOTIFICATION_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};

    fn server() -> McpServer {
        McpServer::new(ServerConfig::default()).unwrap()
    }

    #[test]
    fn test_envelope_checks() {
        let cases = [
            (json!([1, 2]), INVALID_REQUEST),
            (json!({"jsonrpc": "1.0", "id": 1, "method": "initialize"}), INVALID_REQUEST),
            (json!({"jsonrpc": "2.0", "method": "initialize"}), INVALID_REQUEST),
            (json!({"jsonrpc": "2.0", "id": [1], "method": "initialize"}), INVALID_REQUEST),
            (json!({"jsonrpc": "2.0", "id": 1}), INVALID_REQUEST),
            (json!({"jsonrpc": "2.0", "id": 1, "method": 5}), INVALID_REQUEST),
            (json!({"jsonrpc": "2.0", "id": 1, "method": ""}), INVALID_REQUEST),
            (
                json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": [1]}),
                INVALID_REQUEST,
            ),
            (
                json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": "x"}),
                INVALID_REQUEST,
            ),
            (json!({"jsonrpc": "2.0", "id": 1, "method": "prompts/list"}), METHOD_NOT_FOUND),
        ];
        for (request, code) in cases {
            let err = parse_envelope(&request).err().unwrap();
            assert_eq!(err.code(), code, "request: {}", request);
        }
    }

    #[test]
    fn test_envelope_accepts_null_id_and_missing_version() {
        let request = json!({"id": null, "method": "tools/list", "params": null});
        let envelope = parse_envelope(&request).unwrap();
        assert_eq!(envelope.id, Value::Null);
        assert_eq!(envelope.method, Method::ToolsList);
        assert!(envelope.params.is_none());
    }

    #[test]
    fn test_notification_detection() {
        let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert!(is_notification(&notification));
        let with_id = json!({"jsonrpc": "2.0", "id": 1, "method": "notifications/initialized"});
        assert!(!is_notification(&with_id));
        assert!(!is_notification(&json!({"jsonrpc": "2.0", "method": "tools/list"})));
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let response = server().handle_message(b"{not json").await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_parse_error() {
        let response = server().handle_message(b"\xff\xfe\xfd").await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_serve_lines_survives_invalid_utf8() {
        let input: &[u8] = b"\xff\xfe not utf8\n\n\
            {\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n\
            {\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"tools/list\"}\n";
        let mut output = Vec::new();
        server().serve_lines(input, &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(lines[0]["id"], Value::Null);
        assert_eq!(lines[1]["id"], 7);
        assert_eq!(lines[1]["result"]["tools"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let raw = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(server().handle_message(raw.as_bytes()).await.is_none());
    }

    #[tokio::test]
    async fn test_rejected_envelope_echoes_id() {
        let response = server()
            .handle(&json!({"jsonrpc": "2.0", "id": "abc", "method": "nope"}))
            .await;
        assert_eq!(response.id, json!("abc"));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_uses_config() {
        let mut config = ServerConfig::default();
        config.server.name = "custom".to_string();
        let server = McpServer::new(config).unwrap();
        let response = server
            .handle(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "custom");
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_without_name() {
        let response = server()
            .handle(&json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {}}))
            .await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }
}
