// Mermaid MCP - Diagram generation server for AI agents
// Turns text descriptions and CSV/JSON/text files into Mermaid diagrams over MCP

pub mod cli;
pub mod config;
pub mod converter;
pub mod diagram;
pub mod mcp;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use config::ServerConfig;
pub use converter::{ConvertError, ConvertedFile, FileType};
pub use diagram::{DiagramError, DiagramKind, GeneratedDiagram};
pub use mcp::{McpError, McpServer};
