use anyhow::{Result, anyhow};
use jsonschema::Validator;
use serde_json::Value;

/// One structural violation, located by its JSON Pointer into the instance.
#[derive(Debug, Clone)]
pub struct SchemaViolation {
    pub instance_path: String,
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Compile an externally authored JSON Schema document. A malformed schema
/// is a hard error, unlike a missing one (the caller decides to skip).
pub fn compile_schema(schema: &Value) -> Result<Validator> {
    jsonschema::validator_for(schema).map_err(|e| anyhow!("Invalid schema document: {e}"))
}

/// Check an instance document, collecting every violation.
#[must_use]
pub fn check_document(validator: &Validator, instance: &Value) -> Vec<SchemaViolation> {
    validator
        .iter_errors(instance)
        .map(|error| SchemaViolation {
            instance_path: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect()
}
