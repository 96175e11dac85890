//! `serve` and `stdio` subcommands
//!
//! Both transports share one [`McpServer`]; they differ only in how
//! messages reach it.

use crate::config::ServerConfig;
use crate::mcp::{http_server, McpServer};
use crate::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Interface to bind (default: 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP server port (default: 3456)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Serve templates from this directory instead of the bundled copies
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.http.host = host.clone();
        }
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(dir) = &self.templates_dir {
            config.resources.templates_dir = Some(dir.clone());
        }
    }
}

/// Run the HTTP transport
pub async fn run_http(mut config: ServerConfig, args: &ServeArgs) -> Result<()> {
    args.apply(&mut config);
    info!(
        name = %config.server.name,
        version = %config.server.version,
        "starting HTTP transport"
    );
    let server = McpServer::new(config)?;
    http_server::start_server(server).await
}

/// Run the stdio transport until stdin closes
pub async fn run_stdio(mut config: ServerConfig, templates_dir: Option<PathBuf>) -> Result<()> {
    if templates_dir.is_some() {
        config.resources.templates_dir = templates_dir;
    }
    let server = McpServer::new(config)?;
    server.run_stdio().await
}
