use serde_json::{Map, Value};

use crate::errors::RecordError;
use crate::profile::lenient::scalar_to_string;

/// One scraped profile, kept as the untyped JSON object it arrived as.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RecordError::InvalidRecord(format!(
                "expected a profile object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Non-null value at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Scalar at `key` rendered as text; empty strings count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(scalar_to_string)
            .filter(|s| !s.is_empty())
    }

    /// Array at `key`, or empty when missing or not an array.
    pub fn list(&self, key: &str) -> &[Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Name used in logs, falling back to "Unknown".
    pub fn display_name(&self) -> String {
        self.text("name").unwrap_or_else(|| "Unknown".to_string())
    }
}

/// A document holds either one profile object or an array of them.
pub fn split_document(document: Value) -> Vec<Value> {
    match document {
        Value::Array(items) => items,
        single => vec![single],
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
