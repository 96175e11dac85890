//! CSV conversion: one flowchart node per record, chained in file order

use super::{ConvertError, ConvertedFile, FileType};
use crate::diagram::{flowchart, DiagramKind};
use serde_json::{Map, Value};

pub(super) fn convert(content: &str) -> Result<ConvertedFile, ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(parse_error)?.clone();

    let mut records = Vec::new();
    let mut labels = Vec::new();
    for result in reader.records() {
        let record = result.map_err(parse_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut row = Map::new();
        let mut values = Vec::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            let cell = record.get(i).unwrap_or("");
            row.insert(header.to_string(), Value::String(cell.to_string()));
            if !cell.is_empty() {
                values.push(cell);
            }
        }

        labels.push(values.join(", "));
        records.push(Value::Object(row));
    }

    Ok(ConvertedFile {
        source_text: flowchart::chain(&labels),
        kind: DiagramKind::Flowchart,
        structured: Value::Array(records),
    })
}

fn parse_error(err: csv::Error) -> ConvertError {
    ConvertError::Parse {
        file_type: FileType::Csv,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_and_chain() {
        let result = convert("name,age\nJohn,30\nJane,25").unwrap();
        assert_eq!(
            result.structured,
            json!([{"name": "John", "age": "30"}, {"name": "Jane", "age": "25"}])
        );
        assert_eq!(
            result.source_text,
            "flowchart TD\n    node0[\"John, 30\"]\n    node1[\"Jane, 25\"]\n    node0 --> node1\n"
        );
        assert_eq!(result.kind, DiagramKind::Flowchart);
    }

    #[test]
    fn test_records_keep_header_order() {
        let result = convert("name,age,city\nJohn,30,Oslo").unwrap();
        assert_eq!(
            serde_json::to_string(&result.structured).unwrap(),
            r#"[{"name":"John","age":"30","city":"Oslo"}]"#
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        let result = convert("step,owner\n\nDraft,Ann\n   \nReview,Bob\n").unwrap();
        assert_eq!(result.structured.as_array().unwrap().len(), 2);
        assert!(result.source_text.contains("node1[\"Review, Bob\"]"));
    }

    #[test]
    fn test_header_only() {
        let result = convert("name,age\n").unwrap();
        assert_eq!(result.structured, json!([]));
        assert_eq!(result.source_text, "flowchart TD\n");
    }

    #[test]
    fn test_ragged_rows() {
        let result = convert("a,b,c\n1\n4,5,6,7").unwrap();
        assert_eq!(
            result.structured,
            json!([{"a": "1", "b": "", "c": ""}, {"a": "4", "b": "5", "c": "6"}])
        );
        assert!(result.source_text.contains("node0[\"1\"]"));
        assert!(result.source_text.contains("node1[\"4, 5, 6\"]"));
    }

    #[test]
    fn test_quoted_cells_escaped_in_labels() {
        let result = convert("title\n\"He said \"\"hi\"\" [twice]\"").unwrap();
        assert_eq!(result.structured, json!([{"title": "He said \"hi\" [twice]"}]));
        assert!(result
            .source_text
            .contains("node0[\"He said #quot;hi#quot; #91;twice#93;\"]"));
    }
}
