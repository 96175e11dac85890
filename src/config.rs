//! Server configuration
//!
//! Loaded from `config.toml`; every section and field is optional and falls
//! back to its default.

use crate::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// MCP protocol revision reported by `initialize`
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";
pub const DEFAULT_HTTP_PORT: u16 = 3456;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerInfoConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub resources: ResourcesConfig,
}

/// Identity reported to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfoConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
}

fn default_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_protocol_version() -> String {
    DEFAULT_PROTOCOL_VERSION.to_string()
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            protocol_version: default_protocol_version(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_HTTP_PORT
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Directory holding template files; the bundled templates are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Default config file location (`~/.config/mermaid-mcp/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mermaid-mcp").join("config.toml"))
    }

    /// Load config from an explicit path, or from the default location if
    /// present, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load config from a TOML file that must exist
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ServerConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Socket address for the HTTP transport
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.http.host, self.http.port);
        addr.parse::<SocketAddr>()
            .with_context(|| format!("Invalid HTTP bind address: {}", addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.name, "mermaid-mcp");
        assert_eq!(config.server.protocol_version, "2024-11-05");
        assert_eq!(config.http.port, 3456);
        assert!(config.resources.templates_dir.is_none());
        assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:3456");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml_str("[http]\nport = 8080\n").unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.server, ServerInfoConfig::default());
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_full_file() {
        let config = ServerConfig::from_toml_str(
            r#"
[server]
name = "diagrams"
version = "9.9.9"

[http]
host = "0.0.0.0"
port = 9000

[resources]
templates_dir = "/srv/templates"
"#,
        )
        .unwrap();
        assert_eq!(config.server.name, "diagrams");
        assert_eq!(config.server.version, "9.9.9");
        assert_eq!(config.server.protocol_version, DEFAULT_PROTOCOL_VERSION);
        assert_eq!(config.bind_address().unwrap().port(), 9000);
        assert_eq!(
            config.resources.templates_dir,
            Some(PathBuf::from("/srv/templates"))
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(ServerConfig::from_toml_str("[http\nport = ").is_err());
        assert!(ServerConfig::from_toml_str("[http]\nport = \"high\"").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nname = \"from-file\"\n").unwrap();

        let config = ServerConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.server.name, "from-file");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let err = ServerConfig::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_bad_host() {
        let mut config = ServerConfig::default();
        config.http.host = "not a host".to_string();
        assert!(config.bind_address().is_err());
    }
}
