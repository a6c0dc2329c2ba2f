//! Search-engine-ready documents

use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// A flat mapping of field keys to encoded values
///
/// Keys are kept sorted so that serializing the same document twice yields
/// identical bytes. An absent key means the field's extractor found no value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous value under the key
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Get the value stored under a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether a value is stored under the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over populated fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Take the underlying map
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.fields
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut doc = Document::new();
        assert!(doc.is_empty());
        doc.insert("title", Value::text("A"));
        doc.insert("year", Value::text("2020"));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("title"), Some(&Value::text("A")));
        assert!(!doc.contains_key("missing"));
    }

    #[test]
    fn test_json_is_key_ordered() {
        let mut doc = Document::new();
        doc.insert("z", Value::Int(1));
        doc.insert("a", Value::Bool(true));
        assert_eq!(doc.to_json().unwrap(), r#"{"a":true,"z":1}"#);
    }
}
