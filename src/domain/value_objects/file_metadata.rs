use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FileHash;

/// Free-form JSON attached to a case-study file.
///
/// Holds the raw extractor submission response at creation time and is
/// replaced by the extractor's result metadata once the job completes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMetadata {
    properties: Map<String, Value>,
}

impl FileMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-object JSON is kept under a `value` key so nothing the extractor
    /// returns is dropped.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(properties) => Self { properties },
            Value::Null => Self::default(),
            other => Self::default().with_property("value", other),
        }
    }

    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn set_property(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }

    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn set_source_hash(&mut self, hash: &FileHash) {
        self.set_property("source_sha256", Value::String(hash.to_string()));
    }

    pub fn source_hash(&self) -> Option<&str> {
        self.get_property("source_sha256").and_then(Value::as_str)
    }

    pub fn set_page_count(&mut self, count: i64) {
        self.set_property("page_count", Value::Number(count.into()));
    }

    pub fn page_count(&self) -> Option<i64> {
        self.get_property("page_count").and_then(Value::as_i64)
    }
}

impl From<FileMetadata> for Value {
    fn from(metadata: FileMetadata) -> Self {
        Value::Object(metadata.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_object_value() {
        let metadata = FileMetadata::from_value(json!({"request_id": "abc", "success": true}));
        assert_eq!(metadata.get_property("request_id"), Some(&json!("abc")));
        assert_eq!(metadata.get_property("success"), Some(&json!(true)));
    }

    #[test]
    fn test_from_scalar_and_null() {
        assert!(FileMetadata::from_value(Value::Null).is_empty());

        let wrapped = FileMetadata::from_value(json!([1, 2]));
        assert_eq!(wrapped.get_property("value"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_helpers() {
        let mut metadata = FileMetadata::new();
        metadata.set_source_hash(&FileHash::from_bytes(b"pdf"));
        metadata.set_page_count(12);

        assert_eq!(metadata.source_hash().map(str::len), Some(64));
        assert_eq!(metadata.page_count(), Some(12));
    }

    #[test]
    fn test_round_trips_through_value() {
        let metadata = FileMetadata::new().with_property("k", json!("v"));
        let value: Value = metadata.clone().into();
        assert_eq!(value, json!({"k": "v"}));
        assert_eq!(FileMetadata::from_value(value), metadata);
    }
}
