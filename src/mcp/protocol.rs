//! JSON-RPC 2.0 envelope types and MCP method names

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// Server-defined error codes
pub const UNKNOWN_TOOL: i32 = -32001;
pub const RESOURCE_NOT_FOUND: i32 = -32002;
pub const TOOL_EXECUTION_ERROR: i32 = -32003;

/// JSON-RPC 2.0 Request
///
/// Only used for typed construction (REST passthroughs, tests). Incoming
/// requests are validated from raw JSON so an absent `id` can be told apart
/// from `id: null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: &str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.to_string(),
            params,
        }
    }
}

/// JSON-RPC 2.0 Response
///
/// Exactly one of `result` / `error` is set; build through
/// [`JsonRpcResponse::success`] and [`JsonRpcResponse::failure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The MCP methods this server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
}

impl Method {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Method::Initialize),
            "tools/list" => Some(Method::ToolsList),
            "tools/call" => Some(Method::ToolsCall),
            "resources/list" => Some(Method::ResourcesList),
            "resources/read" => Some(Method::ResourcesRead),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::ResourcesList => "resources/list",
            Method::ResourcesRead => "resources/read",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_success() {
        let response = JsonRpcResponse::success(json!(1), json!({"status": "ok"}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"result\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_serialize_failure() {
        let response = JsonRpcResponse::failure(
            Value::Null,
            JsonRpcError {
                code: METHOD_NOT_FOUND,
                message: "Method not found: nope".to_string(),
                data: None,
            },
        );
        let json: Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], -32601);
        assert!(json.get("result").is_none());
        assert!(json["error"].get("data").is_none());
        assert_eq!(json["id"], Value::Null);
    }

    #[test]
    fn test_method_names() {
        for name in [
            "initialize",
            "tools/list",
            "tools/call",
            "resources/list",
            "resources/read",
        ] {
            assert_eq!(Method::parse(name).unwrap().as_str(), name);
        }
        assert_eq!(Method::parse("prompts/list"), None);
    }

    #[test]
    fn test_request_without_params_omits_field() {
        let request = JsonRpcRequest::new(7, "tools/list", None);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert!(json.get("params").is_none());
    }
}
