//! Extracted and encoded values

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// Private-use control character joining multiple logical values inside a
/// single text-search field
pub const RECORD_SEPARATOR: &str = "\x1e";

/// A value produced by an extractor, or the encoded form stored in a document
///
/// Values serialize untagged, so a document renders as plain JSON:
/// paths become arrays of strings and labeled values become `[value, label]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag, e.g. collection membership
    Bool(bool),

    /// An integer, e.g. a packed `YYYYMMDD` sort key
    Int(i64),

    /// A text value
    Text(String),

    /// A calendar date
    Date(NaiveDate),

    /// Ordered path segments of a hierarchical facet
    Path(Vec<String>),

    /// A value paired with its human-readable label
    Labeled(Box<Value>, String),

    /// Structured data passed through verbatim
    Json(JsonValue),

    /// Multiple values
    List(Vec<Value>),
}

impl Value {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Create a labeled value
    ///
    /// # Examples
    ///
    /// ```
    /// use colophon_domain::Value;
    ///
    /// let value = Value::labeled(Value::text("fra"), "French");
    /// assert_eq!(value.to_string(), "fra");
    /// assert_eq!(value.label(), Some("French"));
    /// ```
    pub fn labeled(value: Value, label: impl Into<String>) -> Self {
        Value::Labeled(Box::new(value), label.into())
    }

    /// Create a path value from its segments
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Path(segments.into_iter().map(Into::into).collect())
    }

    /// Convert a JSON value, keeping scalars as native variants
    ///
    /// Returns `None` for JSON `null`.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => None,
            JsonValue::Bool(b) => Some(Value::Bool(*b)),
            JsonValue::String(s) => Some(Value::Text(s.clone())),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int(i)),
                None => Some(Value::Json(value.clone())),
            },
            JsonValue::Array(_) | JsonValue::Object(_) => Some(Value::Json(value.clone())),
        }
    }

    /// Get the text content, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer, if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the elements, if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the label of a labeled value
    pub fn label(&self) -> Option<&str> {
        match self {
            Value::Labeled(_, label) => Some(label),
            _ => None,
        }
    }

    /// Whether the value carries anything
    ///
    /// `false`, `0`, empty strings, empty collections and JSON `null`
    /// are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Text(s) => !s.is_empty(),
            Value::Date(_) => true,
            Value::Path(segments) => !segments.is_empty(),
            Value::Labeled(_, _) => true,
            Value::List(items) => !items.is_empty(),
            Value::Json(json) => match json {
                JsonValue::Null => false,
                JsonValue::Bool(b) => *b,
                JsonValue::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
                JsonValue::String(s) => !s.is_empty(),
                JsonValue::Array(a) => !a.is_empty(),
                JsonValue::Object(o) => !o.is_empty(),
            },
        }
    }

    /// Split into elements for per-element encoding
    ///
    /// Lists and JSON arrays yield their elements; any other value is a
    /// single element.
    pub fn elements(&self) -> Vec<Value> {
        match self {
            Value::List(items) => items.clone(),
            Value::Json(JsonValue::Array(items)) => {
                items.iter().filter_map(Value::from_json).collect()
            }
            other => vec![other.clone()],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Path(segments) => f.write_str(&segments.join("/")),
            Value::Labeled(value, _) => write!(f, "{}", value),
            Value::Json(JsonValue::String(s)) => f.write_str(s),
            Value::Json(json) => write!(f, "{}", json),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join(RECORD_SEPARATOR))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}
