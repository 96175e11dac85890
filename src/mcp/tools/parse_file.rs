//! parse_file MCP Tool
//!
//! Converts the text of a CSV, JSON or plain-text file into a Mermaid
//! diagram and returns the parsed data alongside it.

use super::{parse_args, OutputMetadata, ToolDefinition, ToolError, ToolName, ToolResult};
use crate::converter::{self, ConvertError, FileType};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct ParseFileArgs {
    file_content: String,
    file_type: FileType,
}

fn output_metadata() -> OutputMetadata {
    OutputMetadata::viewer("Parsing file...", "File converted to diagram")
}

/// Get the tool definition for parse_file
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: ToolName::ParseFile.to_string(),
        description: "Parse CSV, JSON or plain-text file content and convert it into a \
                      Mermaid diagram. CSV rows and JSON arrays become flowcharts, JSON \
                      objects become class diagrams, text lines or arrow chains become \
                      flowcharts."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["file_content", "file_type"],
            "properties": {
                "file_content": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Raw text content of the file"
                },
                "file_type": {
                    "type": "string",
                    "enum": FileType::names(),
                    "description": "Format of the file content"
                }
            }
        }),
        output_metadata: output_metadata(),
    }
}

/// Execute the parse_file tool
pub fn execute(args: &Value) -> Result<ToolResult, ToolError> {
    let args: ParseFileArgs = parse_args(ToolName::ParseFile, args)?;

    let converted = converter::convert(&args.file_content, args.file_type).map_err(|e| {
        let file_type = match &e {
            ConvertError::Parse { file_type, .. } => *file_type,
            ConvertError::UnsupportedFileType(_) => args.file_type,
        };
        ToolError::Execution {
            tool: ToolName::ParseFile.to_string(),
            message: e.to_string(),
            file_type: Some(file_type.to_string()),
        }
    })?;

    tracing::debug!(file_type = %args.file_type, kind = %converted.kind, "converted file");

    Ok(ToolResult::diagram(
        &format!(
            "Converted {} content into a {} diagram:",
            args.file_type, converted.kind
        ),
        &converted.source_text,
        json!({
            "mermaid_code": converted.source_text,
            "diagram_type": converted.kind,
            "file_type": args.file_type,
            "parsed_data": converted.structured,
        }),
        output_metadata(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_content() {
        let result = execute(&json!({
            "file_content": "name,age\nJohn,30\nJane,25",
            "file_type": "csv"
        }))
        .unwrap();
        assert_eq!(result.structured_content["file_type"], "csv");
        assert_eq!(result.structured_content["diagram_type"], "flowchart");
        assert_eq!(
            result.structured_content["parsed_data"],
            json!([{"name": "John", "age": "30"}, {"name": "Jane", "age": "25"}])
        );
        assert!(result.mermaid_code().unwrap().contains("node0 --> node1"));
    }

    #[test]
    fn test_json_object_content() {
        let result = execute(&json!({
            "file_content": "{\"id\": 1, \"name\": \"x\"}",
            "file_type": "json"
        }))
        .unwrap();
        assert_eq!(result.structured_content["diagram_type"], "class");
    }

    #[test]
    fn test_malformed_json_reports_file_type() {
        let err = execute(&json!({"file_content": "{oops", "file_type": "json"})).unwrap_err();
        match err {
            ToolError::Execution { tool, file_type, message } => {
                assert_eq!(tool, "parse_file");
                assert_eq!(file_type.as_deref(), Some("json"));
                assert!(message.starts_with("Failed to parse json content"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_definition_requires_both_arguments() {
        let def = definition();
        assert_eq!(
            def.input_schema["required"],
            json!(["file_content", "file_type"])
        );
        assert_eq!(
            def.input_schema["properties"]["file_type"]["enum"],
            json!(["csv", "json", "txt"])
        );
        assert!(!def.description.contains("  "));
        assert!(def.description.ends_with("become flowcharts."));
    }
}
