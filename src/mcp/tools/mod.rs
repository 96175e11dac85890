//! MCP Tool Registry and Implementations
//!
//! Each tool declares a JSON Schema for its arguments. The registry checks
//! arguments against that schema before the tool body ever sees them, then
//! wraps the tool output in the MCP tool-result envelope.
//!
//! ## Tools
//! - `generate_diagram` - Free text to Mermaid code
//! - `parse_file` - CSV / JSON / text content to Mermaid code

pub mod generate_diagram;
pub mod parse_file;
pub mod schema;

use crate::mcp::resources::VIEWER_URI;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use schema::{SchemaValidator, SchemaViolation};

/// The tools this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    GenerateDiagram,
    ParseFile,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::GenerateDiagram, ToolName::ParseFile];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GenerateDiagram => "generate_diagram",
            ToolName::ParseFile => "parse_file",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hints attached to a tool and echoed in its results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMetadata {
    /// Resource URI of the UI template that renders the result
    pub output_template: String,
    /// Status text while the tool runs
    pub invoking: String,
    /// Status text once the tool finished
    pub invoked: String,
    pub widget_accessible: bool,
}

impl OutputMetadata {
    pub fn viewer(invoking: &str, invoked: &str) -> Self {
        Self {
            output_template: VIEWER_URI.to_string(),
            invoking: invoking.to_string(),
            invoked: invoked.to_string(),
            widget_accessible: true,
        }
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_metadata: OutputMetadata,
}

/// One block of human-readable tool output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Result envelope of a successful tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    pub structured_content: Value,
    pub output_metadata: OutputMetadata,
}

impl ToolResult {
    /// Build a result whose text summary embeds the same Mermaid code as the
    /// structured content
    pub fn diagram(
        summary: &str,
        mermaid_code: &str,
        structured_content: Value,
        output_metadata: OutputMetadata,
    ) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: format!("{}\n\n```mermaid\n{}```", summary, mermaid_code),
            }],
            structured_content,
            output_metadata,
        }
    }

    /// The Mermaid code carried in the structured content
    pub fn mermaid_code(&self) -> Option<&str> {
        self.structured_content.get("mermaid_code").and_then(Value::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {}", summarize(.violations))]
    Schema {
        tool: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("Tool '{tool}' failed: {message}")]
    Execution {
        tool: String,
        message: String,
        /// Declared file type, for parse failures
        file_type: Option<String>,
    },

    #[error("Invalid input schema for tool '{tool}': {message}")]
    InvalidSchema { tool: String, message: String },
}

fn summarize(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.path, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A tool definition together with its compiled argument validator
struct RegisteredTool {
    name: ToolName,
    definition: ToolDefinition,
    validator: SchemaValidator,
}

/// Registry of available MCP tools
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new tool registry with all available tools
    pub fn new() -> Result<Self, ToolError> {
        let tools = ToolName::ALL
            .iter()
            .map(|&name| {
                let definition = match name {
                    ToolName::GenerateDiagram => generate_diagram::definition(),
                    ToolName::ParseFile => parse_file::definition(),
                };
                let validator =
                    SchemaValidator::compile(&definition.input_schema).map_err(|message| {
                        ToolError::InvalidSchema {
                            tool: name.to_string(),
                            message,
                        }
                    })?;
                Ok(RegisteredTool {
                    name,
                    definition,
                    validator,
                })
            })
            .collect::<Result<Vec<_>, ToolError>>()?;

        Ok(Self { tools })
    }

    /// List all available tools in MCP format
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| &t.definition).collect()
    }

    /// Look up a tool definition by name
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        let name = ToolName::parse(name)?;
        self.tools.iter().find(|t| t.name == name).map(|t| &t.definition)
    }

    /// Validate the arguments and call a tool by name
    pub fn call_tool(&self, name: &str, arguments: &Value) -> Result<ToolResult, ToolError> {
        let tool = ToolName::parse(name)
            .and_then(|name| self.tools.iter().find(|t| t.name == name))
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tool.validator
            .validate(arguments)
            .map_err(|violations| ToolError::Schema {
                tool: name.to_string(),
                violations,
            })?;

        match tool.name {
            ToolName::GenerateDiagram => generate_diagram::execute(arguments),
            ToolName::ParseFile => parse_file::execute(arguments),
        }
    }
}

/// Deserialize validated arguments into a tool's typed argument struct
pub(crate) fn parse_args<T: DeserializeOwned>(
    tool: ToolName,
    arguments: &Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone()).map_err(|e| ToolError::Schema {
        tool: tool.to_string(),
        violations: vec![SchemaViolation {
            path: "/".to_string(),
            message: e.to_string(),
        }],
    })
}
