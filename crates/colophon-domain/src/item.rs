//! Zotero items
//!
//! An [`Item`] mirrors one object of the Zotero web API item response. The
//! well-known sections get typed fields; any other top-level key (`bib`,
//! `ris`, `version`, ...) is kept in [`Item::extra`].

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// A bibliographic record, note or attachment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item key (8 characters, unique within the library)
    #[serde(default)]
    pub key: String,

    /// Bibliographic fields (`itemType`, `title`, `creators`, `tags`, ...)
    #[serde(default)]
    pub data: JsonMap<String, JsonValue>,

    /// Derived metadata (`parsedDate`, `creatorSummary`, ...)
    #[serde(default)]
    pub meta: JsonMap<String, JsonValue>,

    /// Named hyperlinks, each an object with `href` and `type`
    #[serde(default)]
    pub links: JsonMap<String, JsonValue>,

    /// Child notes and attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,

    /// Full text content, on attachment children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulltext: Option<String>,

    /// Any other top-level section
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

/// A borrowed view of one entry of an item's `creators`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Creator<'a> {
    /// Role, e.g. `author` or `editor`
    pub creator_type: &'a str,

    /// Given name (two-field mode)
    pub first_name: &'a str,

    /// Family name (two-field mode)
    pub last_name: &'a str,

    /// Display name (single-field mode)
    pub name: &'a str,
}

impl<'a> Creator<'a> {
    fn from_json(value: &'a JsonValue) -> Self {
        let field = |key: &str| value.get(key).and_then(JsonValue::as_str).unwrap_or("");
        Self {
            creator_type: field("creatorType"),
            first_name: field("firstName"),
            last_name: field("lastName"),
            name: field("name"),
        }
    }
}

impl Item {
    /// Parse an item from its Zotero API JSON representation
    pub fn from_json(value: JsonValue) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Get a top-level section by name
    ///
    /// Typed sections are returned as their JSON form; an empty `key` or
    /// `fulltext` is reported as absent.
    pub fn get(&self, key: &str) -> Option<JsonValue> {
        match key {
            "key" if !self.key.is_empty() => Some(JsonValue::String(self.key.clone())),
            "key" => None,
            "data" => Some(JsonValue::Object(self.data.clone())),
            "meta" => Some(JsonValue::Object(self.meta.clone())),
            "links" => Some(JsonValue::Object(self.links.clone())),
            "children" => serde_json::to_value(&self.children).ok(),
            "fulltext" => self.fulltext.clone().map(JsonValue::String),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Get a field of the item data
    pub fn data_value(&self, field: &str) -> Option<&JsonValue> {
        self.data.get(field)
    }

    /// Get a text field of the item data
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(JsonValue::as_str)
    }

    /// Get an array field of the item data, or an empty slice
    pub fn data_array(&self, field: &str) -> &[JsonValue] {
        self.data
            .get(field)
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get the item type (`book`, `journalArticle`, `note`, ...)
    pub fn item_type(&self) -> Option<&str> {
        self.data_str("itemType").filter(|t| !t.is_empty())
    }

    /// Get a text field of the item metadata
    pub fn meta_str(&self, field: &str) -> Option<&str> {
        self.meta.get(field).and_then(JsonValue::as_str)
    }

    /// Iterate over the item's creators
    pub fn creators(&self) -> impl Iterator<Item = Creator<'_>> {
        self.data_array("creators").iter().map(Creator::from_json)
    }

    /// Iterate over the item's tag names
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.data_array("tags")
            .iter()
            .filter_map(|tag| tag.get("tag").and_then(JsonValue::as_str))
    }

    /// Iterate over the keys of the collections the item belongs to
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.data_array("collections")
            .iter()
            .filter_map(JsonValue::as_str)
    }

    /// Whether the item data has any field at all
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}
