//! Field specifications and value encoding

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// How an extracted value is handed to the field's encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// The whole value is encoded once
    #[default]
    Single,

    /// Each element is encoded individually, producing a list
    Multiple,
}

/// Caller-supplied encoding function
pub type EncodeFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Converts an extracted value into its stored form
#[derive(Clone)]
pub enum Encoder {
    /// Store the value unchanged
    Identity,

    /// Store the value rendered as plain text
    Text,

    /// Store the value serialized as a JSON string
    Json,

    /// Store paths (or labeled paths) as joined path strings
    FacetPath {
        /// Separator placed between path segments
        separator: String,
    },

    /// Caller-supplied encoding
    Custom(EncodeFn),
}

impl Encoder {
    /// Encode a single value
    ///
    /// # Examples
    ///
    /// ```
    /// use colophon_domain::{Encoder, Value};
    ///
    /// let encoder = Encoder::FacetPath { separator: ".".to_string() };
    /// let value = Value::labeled(Value::path(["A", "B"]), "Topic B");
    /// assert_eq!(encoder.encode(&value), Value::text("A.B"));
    /// ```
    pub fn encode(&self, value: &Value) -> Value {
        match self {
            Encoder::Identity => value.clone(),
            Encoder::Text => Value::Text(value.to_string()),
            Encoder::Json => match serde_json::to_string(value) {
                Ok(json) => Value::Text(json),
                Err(_) => Value::Text(value.to_string()),
            },
            Encoder::FacetPath { separator } => Value::Text(join_path(value, separator)),
            Encoder::Custom(encode) => encode(value),
        }
    }
}

fn join_path(value: &Value, separator: &str) -> String {
    match value {
        Value::Path(segments) => segments.join(separator),
        Value::Labeled(inner, _) => join_path(inner, separator),
        other => other.to_string(),
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::Identity
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoder::Identity => f.write_str("Identity"),
            Encoder::Text => f.write_str("Text"),
            Encoder::Json => f.write_str("Json"),
            Encoder::FacetPath { separator } => f
                .debug_struct("FacetPath")
                .field("separator", separator)
                .finish(),
            Encoder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Description of one output field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Document key the encoded value is stored under
    pub key: String,

    /// Encoder applied to extracted values
    pub encoder: Encoder,

    /// Facet root collection, for collection facet fields
    pub collection_key: Option<String>,
}

impl FieldSpec {
    /// Create a field spec storing values unchanged
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            encoder: Encoder::Identity,
            collection_key: None,
        }
    }

    /// Set the encoder
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the facet root collection
    pub fn with_collection_key(mut self, collection_key: impl Into<String>) -> Self {
        self.collection_key = Some(collection_key.into());
        self
    }

    /// Encode a single value
    pub fn encode(&self, value: &Value) -> Value {
        self.encoder.encode(value)
    }

    /// Encode a value according to the extractor's encoding
    pub fn encode_with(&self, encoding: Encoding, value: &Value) -> Value {
        match encoding {
            Encoding::Single => self.encode(value),
            Encoding::Multiple => Value::List(
                value
                    .elements()
                    .iter()
                    .map(|element| self.encode(element))
                    .collect(),
            ),
        }
    }
}
