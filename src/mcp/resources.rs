//! MCP resources
//!
//! The server publishes a single static resource: the HTML template used to
//! render diagram results. The catalog is fixed; where the bytes come from
//! is decided by the [`ResourceStore`] the server was built with.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// URI of the diagram viewer template
pub const VIEWER_URI: &str = "template://mermaid-viewer";

/// File name of the viewer template inside a templates directory
pub const VIEWER_FILE: &str = "mermaid-viewer.html";

const VIEWER_HTML: &str = include_str!("../../templates/mermaid-viewer.html");

/// Resource entry as listed by `resources/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
    #[serde(skip)]
    pub file_name: String,
}

/// The fixed set of resources this server publishes
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    resources: Vec<ResourceDescriptor>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self {
            resources: vec![ResourceDescriptor {
                uri: VIEWER_URI.to_string(),
                name: "Mermaid Viewer".to_string(),
                description: "HTML template that renders Mermaid diagram tool results".to_string(),
                mime_type: "text/html".to_string(),
                file_name: VIEWER_FILE.to_string(),
            }],
        }
    }

    pub fn list(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    /// Find a resource by exact URI
    pub fn find(&self, uri: &str) -> Option<&ResourceDescriptor> {
        self.resources.iter().find(|r| r.uri == uri)
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to read resource '{uri}' from {}: {source}", .path.display())]
    Read {
        uri: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of resource contents
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Read the full text of a catalog resource
    async fn read(&self, resource: &ResourceDescriptor) -> Result<String, ResourceError>;
}

/// Serves the templates compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledResourceStore;

#[async_trait]
impl ResourceStore for BundledResourceStore {
    async fn read(&self, resource: &ResourceDescriptor) -> Result<String, ResourceError> {
        match resource.file_name.as_str() {
            VIEWER_FILE => Ok(VIEWER_HTML.to_string()),
            _ => Err(ResourceError::NotFound(resource.uri.clone())),
        }
    }
}

/// Reads templates from a directory on disk, so they can be edited without
/// rebuilding
#[derive(Debug, Clone)]
pub struct FileResourceStore {
    root: PathBuf,
}

impl FileResourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResourceStore for FileResourceStore {
    async fn read(&self, resource: &ResourceDescriptor) -> Result<String, ResourceError> {
        let path = self.root.join(&resource.file_name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ResourceError::Read {
                uri: resource.uri.clone(),
                path,
                source,
            })
    }
}
