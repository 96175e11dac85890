//! One-shot `generate` and `parse` subcommands
//!
//! Run the same tool pipeline as the MCP server and print the result.

use crate::converter::FileType;
use crate::mcp::tools::{ToolName, ToolRegistry, ToolResult};
use crate::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::Path;

/// Generate a diagram from text
pub fn run_generate(text: &str, diagram_type: Option<&str>, json: bool) -> Result<()> {
    let registry = ToolRegistry::new()?;

    let mut args = json!({ "text": text });
    if let Some(kind) = diagram_type {
        args["diagramType"] = json!(kind);
    }

    let result = registry.call_tool(ToolName::GenerateDiagram.as_str(), &args)?;
    print_result(&result, json)
}

/// Convert a file into a diagram. The file type defaults to the extension.
pub fn run_parse(path: &Path, file_type: Option<&str>, json: bool) -> Result<()> {
    let file_type = resolve_file_type(path, file_type)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let registry = ToolRegistry::new()?;
    let args = json!({ "file_content": content, "file_type": file_type });
    let result = registry.call_tool(ToolName::ParseFile.as_str(), &args)?;
    print_result(&result, json)
}

fn resolve_file_type(path: &Path, explicit: Option<&str>) -> Result<String> {
    if let Some(file_type) = explicit {
        return Ok(file_type.to_string());
    }
    FileType::from_path(path)
        .map(|t| t.to_string())
        .with_context(|| {
            format!(
                "Cannot infer file type of {}; pass --type ({})",
                path.display(),
                FileType::names().join("|")
            )
        })
}

fn print_result(result: &ToolResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result.structured_content)?);
        return Ok(());
    }

    let kind = result.structured_content["diagram_type"]
        .as_str()
        .unwrap_or("mermaid");
    eprintln!("{}", format!("✓ Generated {} diagram", kind).green());
    print!("{}", result.mermaid_code().unwrap_or_default());
    Ok(())
}
