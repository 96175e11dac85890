//! JSON conversion
//!
//! Arrays become a linear flowchart of their elements, objects become a
//! class diagram with one class per top-level key. Scalars produce an empty
//! flowchart.

use super::{ConvertError, ConvertedFile, FileType, MAX_ELEMENT_LABEL};
use crate::diagram::escape::truncate_chars;
use crate::diagram::{class_diagram, flowchart, DiagramKind};
use serde_json::Value;

pub(super) fn convert(content: &str) -> Result<ConvertedFile, ConvertError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ConvertError::Parse {
        file_type: FileType::Json,
        message: e.to_string(),
    })?;

    let (source_text, kind) = match &value {
        Value::Array(items) => {
            let labels: Vec<String> = items.iter().map(element_label).collect();
            (flowchart::chain(&labels), DiagramKind::Flowchart)
        }
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            (class_diagram::from_keys(&keys), DiagramKind::Class)
        }
        _ => {
            let empty: [&str; 0] = [];
            (flowchart::chain(&empty), DiagramKind::Flowchart)
        }
    };

    Ok(ConvertedFile {
        source_text,
        kind,
        structured: value,
    })
}

/// Raw text for strings, compact JSON for everything else
fn element_label(item: &Value) -> String {
    let label = match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate_chars(&label, MAX_ELEMENT_LABEL)
}
