//! Collection hierarchy

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// A user-defined, folder-like grouping of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Collection key
    pub key: String,

    /// Collection name
    pub name: String,

    /// Key of the parent collection, `None` for top-level collections
    pub parent: Option<String>,
}

#[derive(Deserialize)]
struct RawCollection {
    key: String,
    #[serde(default)]
    data: RawCollectionData,
}

#[derive(Deserialize, Default)]
struct RawCollectionData {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "parentCollection")]
    parent_collection: JsonValue,
}

impl Collection {
    /// Create a collection
    pub fn new(key: impl Into<String>, name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            parent: parent.map(str::to_string),
        }
    }

    /// Parse a collection from its Zotero API JSON representation
    ///
    /// Zotero reports a top-level collection with `parentCollection: false`.
    pub fn from_json(value: JsonValue) -> Result<Self, serde_json::Error> {
        let raw: RawCollection = serde_json::from_value(value)?;
        let parent = raw
            .data
            .parent_collection
            .as_str()
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        Ok(Self {
            key: raw.key,
            name: raw.data.name,
            parent,
        })
    }
}

/// All collections of a library, indexed by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    by_key: BTreeMap<String, Collection>,
}

impl Collections {
    /// Create an empty hierarchy
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hierarchy from Zotero API collection records
    pub fn from_json_records<I>(records: I) -> Result<Self, serde_json::Error>
    where
        I: IntoIterator<Item = JsonValue>,
    {
        let mut collections = Self::new();
        for record in records {
            collections.insert(Collection::from_json(record)?);
        }
        Ok(collections)
    }

    /// Add or replace a collection
    pub fn insert(&mut self, collection: Collection) {
        self.by_key.insert(collection.key.clone(), collection);
    }

    /// Get a collection by key
    pub fn get(&self, key: &str) -> Option<&Collection> {
        self.by_key.get(key)
    }

    /// Whether the collection exists
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Number of collections
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the library has no collection
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Get the trimmed name of a collection, or an empty string
    pub fn name(&self, key: &str) -> &str {
        self.get(key).map(|c| c.name.trim()).unwrap_or("")
    }

    /// Get the ancestor chain of a collection, top-level first, inclusive
    ///
    /// Returns an empty list for unknown keys. A chain that leaves the known
    /// hierarchy stops at the last known collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use colophon_domain::{Collection, Collections};
    ///
    /// let mut collections = Collections::new();
    /// collections.insert(Collection::new("ROOT", "Root", None));
    /// collections.insert(Collection::new("A", "Topic A", Some("ROOT")));
    /// collections.insert(Collection::new("B", "Topic B", Some("A")));
    ///
    /// assert_eq!(collections.ancestors("B"), vec!["ROOT", "A", "B"]);
    /// ```
    pub fn ancestors(&self, key: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self.get(key);
        while let Some(collection) = current {
            // A cycle in the parent links would otherwise never terminate
            if chain.len() > self.by_key.len() || chain.contains(&collection.key.as_str()) {
                break;
            }
            chain.push(collection.key.as_str());
            current = collection.parent.as_deref().and_then(|p| self.get(p));
        }
        chain.reverse();
        chain
    }
}
