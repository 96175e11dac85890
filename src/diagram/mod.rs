//! Text-to-Mermaid diagram generation
//!
//! [`generate`] maps free text plus an optional diagram kind to Mermaid
//! source. When no kind is given the kind is sniffed from the text with
//! [`detect_kind`]. Each kind lives in its own module with a small library of
//! templates picked by secondary keywords.
//!
//! Generation is pure: the same `(text, kind)` always yields the same output.

pub mod class_diagram;
pub mod erd;
pub mod escape;
pub mod flowchart;
pub mod gantt;
pub mod git_graph;
pub mod pie;
pub mod sequence;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub use escape::{escape_label, to_ident};

/// Arrow token shared by kind detection and the text converters
pub const ARROW: &str = "->";

/// The seven supported diagram categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Class,
    Er,
    Gantt,
    Pie,
    Git,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 7] = [
        DiagramKind::Flowchart,
        DiagramKind::Sequence,
        DiagramKind::Class,
        DiagramKind::Er,
        DiagramKind::Gantt,
        DiagramKind::Pie,
        DiagramKind::Git,
    ];

    /// Name used in tool arguments and results
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Class => "class",
            DiagramKind::Er => "er",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Pie => "pie",
            DiagramKind::Git => "git",
        }
    }

    /// Names of all kinds, in schema enum order
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramKind {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DiagramError::InvalidDiagramType(s.to_string()))
    }
}

/// Generated Mermaid source plus the kind it was generated as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDiagram {
    pub source_text: String,
    pub kind: DiagramKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error(
        "Invalid diagram type '{0}'. \
         Must be one of: flowchart, sequence, class, er, gantt, pie, git"
    )]
    InvalidDiagramType(String),

    #[error("Diagram text must not be empty")]
    EmptyText,
}

/// Guess the diagram kind from marker words in the text.
///
/// Priority: sequence markers, then class markers, then entity markers,
/// then flowchart. First match wins.
pub fn detect_kind(text: &str) -> DiagramKind {
    let lower = text.to_lowercase();

    if lower.contains("sequence") || lower.contains(ARROW) {
        DiagramKind::Sequence
    } else if lower.contains("class") || lower.contains('{') || lower.contains('}') {
        DiagramKind::Class
    } else if lower.contains("entity") || lower.contains("relationship") {
        DiagramKind::Er
    } else {
        DiagramKind::Flowchart
    }
}

/// Generate a diagram from text, resolving the kind by name or detection
pub fn generate(text: &str, kind: Option<&str>) -> Result<GeneratedDiagram, DiagramError> {
    if text.trim().is_empty() {
        return Err(DiagramError::EmptyText);
    }

    let kind = match kind {
        Some(name) => name.parse::<DiagramKind>()?,
        None => detect_kind(text),
    };

    Ok(generate_kind(text, kind))
}

/// Generate a diagram of a known kind
pub fn generate_kind(text: &str, kind: DiagramKind) -> GeneratedDiagram {
    let source_text = match kind {
        DiagramKind::Flowchart => flowchart::generate(text),
        DiagramKind::Sequence => sequence::generate(text),
        DiagramKind::Class => class_diagram::generate(text),
        DiagramKind::Er => erd::generate(text),
        DiagramKind::Gantt => gantt::generate(text),
        DiagramKind::Pie => pie::generate(text),
        DiagramKind::Git => git_graph::generate(text),
    };

    GeneratedDiagram { source_text, kind }
}

/// Split on arrow tokens (`->`, `-->`, `->>`), dropping empty segments
pub(crate) fn split_arrows(text: &str) -> Vec<&str> {
    static SPLITTER: OnceLock<Regex> = OnceLock::new();
    SPLITTER
        .get_or_init(|| Regex::new(r"\s*-+>+\s*").expect("arrow regex is valid"))
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Case-insensitive check for any of the given keywords
pub(crate) fn mentions(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}
