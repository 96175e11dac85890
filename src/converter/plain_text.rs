//! Plain-text conversion
//!
//! The first line containing an arrow is read as a chain (`a -> b -> c`).
//! Without arrows, every non-blank line becomes one node in order.

use super::ConvertedFile;
use crate::diagram::{flowchart, split_arrows, DiagramKind, ARROW};
use serde_json::json;

pub(super) fn convert(content: &str) -> ConvertedFile {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let source_text = match lines.iter().find(|l| l.contains(ARROW)) {
        Some(line) => flowchart::chain(&split_arrows(line)),
        None => flowchart::chain(&lines),
    };

    ConvertedFile {
        source_text,
        kind: DiagramKind::Flowchart,
        structured: json!({ "lines": lines }),
    }
}
