//! File-to-diagram conversion
//!
//! Turns the raw text of an uploaded CSV, JSON or plain-text file into
//! Mermaid source plus a structured view of what was parsed.

mod plain_text;
mod structured;
mod tabular;

use crate::diagram::DiagramKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Longest label generated for a single JSON array element
pub const MAX_ELEMENT_LABEL: usize = 50;

/// Declared type of the incoming file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Json,
    Txt,
}

impl FileType {
    pub const ALL: [FileType; 3] = [FileType::Csv, FileType::Json, FileType::Txt];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Csv => "csv",
            FileType::Json => "json",
            FileType::Txt => "txt",
        }
    }

    /// Names of all file types, in schema enum order
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }

    /// Infer the file type from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileType::Csv),
            "json" => Some(FileType::Json),
            "txt" | "text" | "md" => Some(FileType::Txt),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConvertError::UnsupportedFileType(s.to_string()))
    }
}

/// Result of converting a file: diagram source plus the parsed structure
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedFile {
    pub source_text: String,
    pub kind: DiagramKind,
    /// Records for CSV, the parsed value for JSON, `{"lines": [...]}` for text
    pub structured: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to parse {file_type} content: {message}")]
    Parse { file_type: FileType, message: String },

    #[error("Unsupported file type '{0}'. Must be one of: csv, json, txt")]
    UnsupportedFileType(String),
}

/// Convert raw file content of the declared type into a diagram
pub fn convert(content: &str, file_type: FileType) -> Result<ConvertedFile, ConvertError> {
    match file_type {
        FileType::Csv => tabular::convert(content),
        FileType::Json => structured::convert(content),
        FileType::Txt => Ok(plain_text::convert(content)),
    }
}
