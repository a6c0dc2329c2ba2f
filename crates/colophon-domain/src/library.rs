//! Library context: the reference data shared by all extractions of a run

use crate::collection::Collections;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of Zotero library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    /// A personal library
    #[default]
    User,

    /// A group library
    Group,
}

impl LibraryType {
    /// Get the library type name as used by the Zotero API
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryType::User => "user",
            LibraryType::Group => "group",
        }
    }

    /// Parse a library type name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(LibraryType::User),
            "group" => Some(LibraryType::Group),
            _ => None,
        }
    }
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field schema entry, as returned by the Zotero `itemTypeFields` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field name, e.g. `title` or `caseName`
    pub field: String,

    /// Human-readable field label
    #[serde(default)]
    pub localized: String,
}

impl FieldMeta {
    /// Create a field schema entry
    pub fn new(field: impl Into<String>, localized: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            localized: localized.into(),
        }
    }
}

/// Creator-type schema entry, as returned by `itemTypeCreatorTypes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorTypeMeta {
    /// Creator type, e.g. `author`
    #[serde(rename = "creatorType")]
    pub creator_type: String,

    /// Human-readable creator type label
    #[serde(default)]
    pub localized: String,
}

impl CreatorTypeMeta {
    /// Create a creator-type schema entry
    pub fn new(creator_type: impl Into<String>, localized: impl Into<String>) -> Self {
        Self {
            creator_type: creator_type.into(),
            localized: localized.into(),
        }
    }
}

/// Read-only library metadata consulted by extractors
///
/// Schema lists keep Zotero's order: the first field of an item type is its
/// title-like field, and the first creator type is the primary one.
#[derive(Debug, Clone, Default)]
pub struct LibraryContext {
    /// Library identifier (user or group id)
    pub library_id: String,

    /// Kind of library
    pub library_type: LibraryType,

    /// Item type key → localized label
    pub item_types: BTreeMap<String, String>,

    /// Item type key → ordered field schema
    pub item_fields: BTreeMap<String, Vec<FieldMeta>>,

    /// Item type key → ordered creator-type schema
    pub creator_types: BTreeMap<String, Vec<CreatorTypeMeta>>,

    /// Collection hierarchy
    pub collections: Collections,
}

impl LibraryContext {
    /// Create an empty context for a library
    pub fn new(library_id: impl Into<String>, library_type: LibraryType) -> Self {
        Self {
            library_id: library_id.into(),
            library_type,
            ..Self::default()
        }
    }

    /// Register an item type with its label and field schema
    pub fn with_item_type(
        mut self,
        item_type: impl Into<String>,
        label: impl Into<String>,
        fields: Vec<FieldMeta>,
    ) -> Self {
        let item_type = item_type.into();
        self.item_types.insert(item_type.clone(), label.into());
        self.item_fields.insert(item_type, fields);
        self
    }

    /// Register the creator-type schema of an item type
    pub fn with_creator_types(
        mut self,
        item_type: impl Into<String>,
        creator_types: Vec<CreatorTypeMeta>,
    ) -> Self {
        self.creator_types.insert(item_type.into(), creator_types);
        self
    }

    /// Set the collection hierarchy
    pub fn with_collections(mut self, collections: Collections) -> Self {
        self.collections = collections;
        self
    }

    /// Get the label of an item type
    pub fn item_type_label(&self, item_type: &str) -> Option<&str> {
        self.item_types.get(item_type).map(String::as_str)
    }

    /// Get the field schema of an item type
    pub fn fields_of(&self, item_type: &str) -> Option<&[FieldMeta]> {
        self.item_fields.get(item_type).map(Vec::as_slice)
    }

    /// Get the creator-type schema of an item type, or an empty slice
    pub fn creator_types_of(&self, item_type: &str) -> &[CreatorTypeMeta] {
        self.creator_types
            .get(item_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
