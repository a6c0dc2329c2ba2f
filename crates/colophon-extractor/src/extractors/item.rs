//! Extractors reading item sections, fields and type metadata

use super::{text_list, warning};
use colophon_domain::{Extractor, FieldSpec, Format, Item, LibraryContext, Value};
use serde_json::Value as JsonValue;

/// Item types that have no title field
const UNTITLED_TYPES: [&str; 2] = ["annotation", "note"];

/// Item type that has no label nor schema, on purpose
const ATTACHMENT: &str = "attachment";

/// Extracts a top-level section of the item (`key`, `version`, `bib`, ...)
#[derive(Debug, Clone)]
pub struct ItemExtractor {
    key: String,
    format: Format,
}

impl ItemExtractor {
    /// Read the section `key`
    ///
    /// Sections named after a response format (`bib`, `ris`, `coins`)
    /// require that format; anything else requires `data`.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let format = match key.as_str() {
            "bib" | "ris" | "coins" => Format::parse(&key),
            _ => Format::Data,
        };
        Self { key, format }
    }

    /// Override the required format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

impl Extractor for ItemExtractor {
    fn name(&self) -> &'static str {
        "ItemExtractor"
    }

    fn format(&self) -> Format {
        self.format.clone()
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        item.get(&self.key).as_ref().and_then(Value::from_json)
    }
}

/// Extracts a field of the item data
#[derive(Debug, Clone)]
pub struct ItemDataExtractor {
    key: String,
}

impl ItemDataExtractor {
    /// Read the data field `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Extractor for ItemDataExtractor {
    fn name(&self) -> &'static str {
        "ItemDataExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        item.data_value(&self.key).and_then(Value::from_json)
    }
}

/// Extracts the whole item data, verbatim
#[derive(Debug, Clone, Default)]
pub struct RawDataExtractor;

impl Extractor for RawDataExtractor {
    fn name(&self) -> &'static str {
        "RawDataExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        item.has_data()
            .then(|| Value::Json(JsonValue::Object(item.data.clone())))
    }
}

/// Extracts the title of an item
///
/// The title-like field depends on the item type (`title`, `caseName`,
/// `subject`, ...) but is always the first field of the type's schema.
#[derive(Debug, Clone, Default)]
pub struct ItemTitleExtractor;

/// Get the title of an item, or an empty text for untitled or unknown types
pub(crate) fn title_of(item: &Item, library: &LibraryContext) -> Option<Value> {
    let empty = Some(Value::text(""));
    let Some(item_type) = item.item_type().filter(|t| !UNTITLED_TYPES.contains(t)) else {
        return empty;
    };
    match library.fields_of(item_type).and_then(<[_]>::first) {
        Some(first) => match item.data_value(&first.field) {
            Some(value) => Value::from_json(value),
            None => empty,
        },
        None => empty,
    }
}

impl Extractor for ItemTitleExtractor {
    fn name(&self) -> &'static str {
        "ItemTitleExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        title_of(item, library)
    }
}

/// Extracts the related item URIs of a given predicate
///
/// Yields an empty list when the item has no such relation.
#[derive(Debug, Clone)]
pub struct ItemRelationsExtractor {
    predicate: String,
}

impl ItemRelationsExtractor {
    /// Read relations of `predicate`, e.g. `dc:relation`
    pub fn new(predicate: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
        }
    }
}

impl Extractor for ItemRelationsExtractor {
    fn name(&self) -> &'static str {
        "ItemRelationsExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let relations = item
            .data_value("relations")
            .and_then(|relations| relations.get(&self.predicate));
        let uris = match relations {
            Some(JsonValue::String(uri)) if !uri.is_empty() => vec![uri.clone()],
            Some(JsonValue::Array(uris)) => uris
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        Some(text_list(uris))
    }
}

/// Extracts the label of the item's type
#[derive(Debug, Clone, Default)]
pub struct ItemTypeLabelExtractor;

impl Extractor for ItemTypeLabelExtractor {
    fn name(&self) -> &'static str {
        "ItemTypeLabelExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let item_type = item.item_type();
        if let Some(label) = item_type.and_then(|t| library.item_type_label(t)) {
            return Some(Value::text(label));
        }
        if item_type != Some(ATTACHMENT) {
            warn_unknown_type(self.name(), item);
        }
        None
    }
}

pub(crate) fn warn_unknown_type(extractor: &'static str, item: &Item) {
    let message = format!(
        "Missing or unknown item type '{}'",
        item.item_type().unwrap_or_default()
    );
    warning(extractor, &message, Some(item));
}

/// Extracts the schema of the fields present in the item
#[derive(Debug, Clone, Default)]
pub struct ItemFieldsExtractor;

impl Extractor for ItemFieldsExtractor {
    fn name(&self) -> &'static str {
        "ItemFieldsExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let item_type = item.item_type();
        if let Some(fields) = item_type.and_then(|t| library.fields_of(t)) {
            let present: Vec<_> = fields
                .iter()
                .filter(|meta| item.data.contains_key(&meta.field))
                .collect();
            return serde_json::to_value(present).ok().map(Value::Json);
        }
        if item_type != Some(ATTACHMENT) {
            warn_unknown_type(self.name(), item);
        }
        None
    }
}

/// Extracts the item type for faceting, as a `(type, label)` pair
///
/// The label falls back to the type key when the type is unknown.
#[derive(Debug, Clone, Default)]
pub struct ItemTypeFacetExtractor;

impl Extractor for ItemTypeFacetExtractor {
    fn name(&self) -> &'static str {
        "ItemTypeFacetExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        match item.item_type() {
            Some(item_type) => {
                let label = library.item_type_label(item_type).unwrap_or(item_type);
                Some(Value::labeled(Value::text(item_type), label))
            }
            None => {
                warning(self.name(), "Missing itemType", Some(item));
                None
            }
        }
    }
}

/// Tells whether a data field holds a non-blank link
#[derive(Debug, Clone)]
pub struct ItemDataLinkFacetExtractor {
    key: String,
}

impl ItemDataLinkFacetExtractor {
    /// Check the data field `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Extractor for ItemDataLinkFacetExtractor {
    fn name(&self) -> &'static str {
        "ItemDataLinkFacetExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let present = item
            .data_str(&self.key)
            .is_some_and(|link| !link.trim().is_empty());
        Some(Value::Bool(present))
    }
}
