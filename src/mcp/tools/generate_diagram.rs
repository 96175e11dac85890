//! generate_diagram MCP Tool
//!
//! Turns a free-text description into Mermaid code. The diagram kind is
//! taken from `diagramType` or detected from the text.

use super::{parse_args, OutputMetadata, ToolDefinition, ToolError, ToolName, ToolResult};
use crate::diagram::{self, DiagramKind};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct GenerateDiagramArgs {
    text: String,
    #[serde(rename = "diagramType")]
    diagram_type: Option<DiagramKind>,
}

fn output_metadata() -> OutputMetadata {
    OutputMetadata::viewer("Generating diagram...", "Diagram generated")
}

/// Get the tool definition for generate_diagram
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: ToolName::GenerateDiagram.to_string(),
        description: "Generate a Mermaid diagram from a natural-language description. \
                      Supports flowchart, sequence, class, er, gantt, pie and git diagrams; \
                      the type is detected from the text when omitted."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["text"],
            "properties": {
                "text": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Description of what the diagram should show"
                },
                "diagramType": {
                    "type": "string",
                    "enum": DiagramKind::names(),
                    "description":
                        "Kind of diagram to generate (detected from the text when omitted)"
                }
            }
        }),
        output_metadata: output_metadata(),
    }
}

/// Execute the generate_diagram tool
pub fn execute(args: &Value) -> Result<ToolResult, ToolError> {
    let args: GenerateDiagramArgs = parse_args(ToolName::GenerateDiagram, args)?;

    let kind = args.diagram_type.map(|k| k.as_str());
    let generated = diagram::generate(&args.text, kind).map_err(|e| ToolError::Execution {
        tool: ToolName::GenerateDiagram.to_string(),
        message: e.to_string(),
        file_type: None,
    })?;

    tracing::debug!(kind = %generated.kind, "generated diagram");

    Ok(ToolResult::diagram(
        &format!("Generated {} diagram:", generated.kind),
        &generated.source_text,
        json!({
            "mermaid_code": generated.source_text,
            "diagram_type": generated.kind,
            "description": args.text,
        }),
        output_metadata(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_kind() {
        let result = execute(&json!({"text": "Monthly budget", "diagramType": "pie"})).unwrap();
        assert_eq!(result.structured_content["diagram_type"], "pie");
        assert_eq!(result.structured_content["description"], "Monthly budget");
        assert!(result.mermaid_code().unwrap().starts_with("pie title"));
    }

    #[test]
    fn test_detected_kind() {
        let result = execute(&json!({"text": "User -> System: Login"})).unwrap();
        assert_eq!(result.structured_content["diagram_type"], "sequence");
        assert!(result
            .mermaid_code()
            .unwrap()
            .contains("User->>System: Login"));
    }

    #[test]
    fn test_whitespace_text_is_execution_error() {
        let err = execute(&json!({"text": "   "})).unwrap_err();
        assert!(matches!(err, ToolError::Execution { .. }));
    }

    #[test]
    fn test_definition_lists_all_kinds() {
        let def = definition();
        let kinds = &def.input_schema["properties"]["diagramType"]["enum"];
        assert_eq!(kinds.as_array().unwrap().len(), 7);
        assert_eq!(def.input_schema["required"], json!(["text"]));
        assert!(def.description.contains("description. Supports flowchart"));
        assert!(def.description.contains("diagrams; the type"));
    }
}
