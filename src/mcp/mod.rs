//! MCP (Model Context Protocol) Server for Mermaid diagrams
//!
//! Exposes diagram generation to agents over JSON-RPC 2.0.
//!
//! ## Tools
//! - `generate_diagram` - Generate Mermaid code from a text description
//! - `parse_file` - Convert CSV / JSON / text content into Mermaid code
//!
//! ## Resources
//! - `template://mermaid-viewer` - HTML template that renders tool results

pub mod error;
pub mod http_server;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use error::McpError;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Method};
pub use server::McpServer;
