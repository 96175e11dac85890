//! Protocol-level errors and their JSON-RPC codes

use crate::mcp::protocol::{
    JsonRpcError, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, RESOURCE_NOT_FOUND, TOOL_EXECUTION_ERROR, UNKNOWN_TOOL,
};
use crate::mcp::resources::ResourceError;
use crate::mcp::tools::ToolError;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    pub fn code(&self) -> i32 {
        match self {
            McpError::Parse(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::Tool(err) => match err {
                ToolError::UnknownTool(_) => UNKNOWN_TOOL,
                ToolError::Schema { .. } => INVALID_PARAMS,
                ToolError::Execution { .. } => TOOL_EXECUTION_ERROR,
                ToolError::InvalidSchema { .. } => INTERNAL_ERROR,
            },
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// Machine-readable detail attached to the error object
    pub fn data(&self) -> Option<Value> {
        match self {
            McpError::Tool(ToolError::UnknownTool(tool)) => Some(json!({ "tool": tool })),
            McpError::Tool(ToolError::Schema { violations, .. }) => Some(json!(violations)),
            McpError::Tool(ToolError::Execution { tool, file_type, .. }) => {
                let mut data = json!({ "tool": tool });
                if let Some(file_type) = file_type {
                    data["file_type"] = json!(file_type);
                }
                Some(data)
            }
            McpError::ResourceNotFound(uri) => Some(json!({ "uri": uri })),
            _ => None,
        }
    }

    pub fn to_rpc_error(&self) -> JsonRpcError {
        JsonRpcError {
            code: self.code(),
            message: self.to_string(),
            data: self.data(),
        }
    }
}

impl From<ResourceError> for McpError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(uri) => McpError::ResourceNotFound(uri),
            read @ ResourceError::Read { .. } => McpError::Internal(read.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::SchemaViolation;

    #[test]
    fn test_tool_error_codes() {
        assert_eq!(
            McpError::from(ToolError::UnknownTool("x".into())).code(),
            UNKNOWN_TOOL
        );
        assert_eq!(
            McpError::from(ToolError::Schema {
                tool: "generate_diagram".into(),
                violations: vec![],
            })
            .code(),
            INVALID_PARAMS
        );
        assert_eq!(
            McpError::from(ToolError::Execution {
                tool: "parse_file".into(),
                message: "boom".into(),
                file_type: Some("csv".into()),
            })
            .code(),
            TOOL_EXECUTION_ERROR
        );
    }

    #[test]
    fn test_schema_error_data_lists_violations() {
        let err = McpError::from(ToolError::Schema {
            tool: "parse_file".into(),
            violations: vec![SchemaViolation {
                path: "/file_type".into(),
                message: "\"xml\" is not one of [\"csv\",\"json\",\"txt\"]".into(),
            }],
        });
        let rpc = err.to_rpc_error();
        assert_eq!(rpc.code, -32602);
        assert_eq!(rpc.data.unwrap()[0]["path"], "/file_type");
    }

    #[test]
    fn test_execution_error_data() {
        let err = McpError::from(ToolError::Execution {
            tool: "parse_file".into(),
            message: "bad".into(),
            file_type: Some("json".into()),
        });
        assert_eq!(
            err.data().unwrap(),
            json!({"tool": "parse_file", "file_type": "json"})
        );
    }

    #[test]
    fn test_resource_read_failure_is_internal() {
        let err = McpError::from(ResourceError::Read {
            uri: "template://mermaid-viewer".into(),
            path: "/nowhere/mermaid-viewer.html".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(err.code(), INTERNAL_ERROR);
        assert!(err.data().is_none());
    }
}
