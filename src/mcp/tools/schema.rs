//! JSON Schema validation for tool arguments
//!
//! Each tool's `inputSchema` is compiled once when the registry is built and
//! every call's arguments are checked against it before the tool body runs.

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One argument that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending argument (`/text`), `/` for the whole object
    pub path: String,
    pub message: String,
}

/// Compiled validator for one tool's input schema
pub struct SchemaValidator {
    validator: Validator,
}

impl SchemaValidator {
    /// Compile a JSON Schema
    pub fn compile(schema: &Value) -> Result<Self, String> {
        let validator = Validator::new(schema).map_err(|e| e.to_string())?;
        Ok(Self { validator })
    }

    /// Validate arguments, collecting every violation
    pub fn validate(&self, args: &Value) -> Result<(), Vec<SchemaViolation>> {
        let violations: Vec<SchemaViolation> = self
            .validator
            .iter_errors(args)
            .map(|error| {
                let mut path = error.instance_path.to_string();
                // Missing properties are reported on their parent; point at the property itself
                if let ValidationErrorKind::Required { property } = &error.kind {
                    if let Some(name) = property.as_str() {
                        path = format!("{}/{}", path, name);
                    }
                }
                if path.is_empty() {
                    path = "/".to_string();
                }
                SchemaViolation {
                    path,
                    message: error.to_string(),
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> SchemaValidator {
        SchemaValidator::compile(&json!({
            "type": "object",
            "required": ["text"],
            "properties": {
                "text": {"type": "string", "minLength": 1},
                "mode": {"type": "string", "enum": ["a", "b"]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_arguments() {
        assert!(validator().validate(&json!({"text": "hi", "mode": "a"})).is_ok());
        assert!(validator().validate(&json!({"text": "hi"})).is_ok());
    }

    #[test]
    fn test_missing_required_points_at_property() {
        let violations = validator().validate(&json!({})).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "/text");
        assert!(violations[0].message.contains("required"));
    }

    #[test]
    fn test_empty_string_rejected() {
        let violations = validator().validate(&json!({"text": ""})).unwrap_err();
        assert_eq!(violations[0].path, "/text");
    }

    #[test]
    fn test_collects_all_violations() {
        let violations = validator()
            .validate(&json!({"text": 5, "mode": "c"}))
            .unwrap_err();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"/text"));
        assert!(paths.contains(&"/mode"));
    }

    #[test]
    fn test_non_object_arguments() {
        let violations = validator().validate(&json!("just a string")).unwrap_err();
        assert_eq!(violations[0].path, "/");
    }

    #[test]
    fn test_invalid_schema_fails_to_compile() {
        assert!(SchemaValidator::compile(&json!({"type": "no-such-type"})).is_err());
    }
}
