//! Extractors reading child notes and attachments

use super::{join_records, text_list};
use crate::error::ExtractorError;
use crate::predicates::{is_file_attachment, is_link_attachment, TagGate};
use crate::text::strip_tags;
use crate::transformers::{item_ids_in_links, item_ids_in_text};
use colophon_domain::{Extractor, FieldSpec, Item, LibraryContext, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

const NOTE: &str = "note";
const ATTACHMENT: &str = "attachment";

/// Selects the children of a given item type that pass a tag gate
#[derive(Debug, Clone)]
pub struct ChildrenFilter {
    item_type: &'static str,
    gate: TagGate,
}

impl ChildrenFilter {
    fn new(item_type: &'static str) -> Self {
        Self {
            item_type,
            gate: TagGate::default(),
        }
    }

    fn gated<S: AsRef<str>>(
        item_type: &'static str,
        include_re: &[S],
        exclude_re: &[S],
    ) -> Result<Self, ExtractorError> {
        Ok(Self {
            item_type,
            gate: TagGate::new(include_re, exclude_re)?,
        })
    }

    /// Get the accepted children, or `None` when there is none
    pub fn accepted<'a>(&self, item: &'a Item) -> Option<Vec<&'a Item>> {
        let children: Vec<&Item> = item
            .children
            .iter()
            .filter(|child| child.item_type() == Some(self.item_type) && self.gate.check(child))
            .collect();
        (!children.is_empty()).then_some(children)
    }
}

fn child_json(child: &Item, field: &str) -> JsonValue {
    child.data_value(field).cloned().unwrap_or(JsonValue::Null)
}

macro_rules! gated_constructors {
    ($item_type:expr) => {
        /// Accept every child
        pub fn new() -> Self {
            Self::from_filter(ChildrenFilter::new($item_type))
        }

        /// Accept children whose tags pass the gate
        ///
        /// Every include pattern must match one of the child's tags; the
        /// child is rejected when every exclude pattern matches one of them.
        pub fn gated<S: AsRef<str>>(include_re: &[S], exclude_re: &[S]) -> Result<Self, ExtractorError> {
            Ok(Self::from_filter(ChildrenFilter::gated($item_type, include_re, exclude_re)?))
        }
    };
}

/// Extracts the metadata of stored copies of files
#[derive(Debug, Clone)]
pub struct ChildFileAttachmentsExtractor {
    filter: ChildrenFilter,
    mime_types: Vec<String>,
}

impl ChildFileAttachmentsExtractor {
    gated_constructors!(ATTACHMENT);

    fn from_filter(filter: ChildrenFilter) -> Self {
        Self {
            filter,
            mime_types: Vec::new(),
        }
    }

    /// Restrict to the given MIME types
    pub fn with_mime_types(mut self, mime_types: Vec<String>) -> Self {
        self.mime_types = mime_types;
        self
    }
}

impl Extractor for ChildFileAttachmentsExtractor {
    fn name(&self) -> &'static str {
        "ChildFileAttachmentsExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let children = self.filter.accepted(item)?;
        let files: Vec<JsonValue> = children
            .into_iter()
            .filter(|child| is_file_attachment(child, &self.mime_types))
            .map(|child| {
                json!({
                    "id": child.key,
                    "data": {
                        "contentType": child_json(child, "contentType"),
                        "filename": child_json(child, "filename"),
                        "md5": child_json(child, "md5"),
                        "mtime": child_json(child, "mtime"),
                    }
                })
            })
            .collect();
        Some(Value::Json(JsonValue::Array(files)))
    }
}

/// Extracts attached links to URIs
#[derive(Debug, Clone)]
pub struct ChildLinkedUriAttachmentsExtractor {
    filter: ChildrenFilter,
}

impl ChildLinkedUriAttachmentsExtractor {
    gated_constructors!(ATTACHMENT);

    fn from_filter(filter: ChildrenFilter) -> Self {
        Self { filter }
    }
}

impl Extractor for ChildLinkedUriAttachmentsExtractor {
    fn name(&self) -> &'static str {
        "ChildLinkedUriAttachmentsExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let children = self.filter.accepted(item)?;
        let links: Vec<JsonValue> = children
            .into_iter()
            .filter(|child| is_link_attachment(child))
            .map(|child| {
                let url = child_json(child, "url");
                let title = child.data_value("title").cloned().unwrap_or_else(|| url.clone());
                json!({"title": title, "url": url})
            })
            .collect();
        Some(Value::Json(JsonValue::Array(links)))
    }
}

/// Extracts the text content of file attachments
#[derive(Debug, Clone)]
pub struct ChildAttachmentsFulltextExtractor {
    filter: ChildrenFilter,
    mime_types: Vec<String>,
}

impl ChildAttachmentsFulltextExtractor {
    gated_constructors!(ATTACHMENT);

    fn from_filter(filter: ChildrenFilter) -> Self {
        Self {
            filter,
            mime_types: Vec::new(),
        }
    }

    /// Restrict to the given MIME types
    pub fn with_mime_types(mut self, mime_types: Vec<String>) -> Self {
        self.mime_types = mime_types;
        self
    }
}

impl Extractor for ChildAttachmentsFulltextExtractor {
    fn name(&self) -> &'static str {
        "ChildAttachmentsFulltextExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let children = self.filter.accepted(item)?;
        let texts: Vec<String> = children
            .into_iter()
            .filter(|child| is_file_attachment(child, &self.mime_types))
            .filter_map(|child| child.fulltext.as_deref())
            .filter(|text| !text.is_empty())
            .map(strip_tags)
            .collect();
        Some(Value::Text(join_records(&texts)))
    }
}

fn note_of(child: &Item) -> Option<&str> {
    child.data_str("note").filter(|note| !note.is_empty())
}

/// Extracts the text of child notes for text search
#[derive(Debug, Clone)]
pub struct ChildNotesTextExtractor {
    filter: ChildrenFilter,
}

impl ChildNotesTextExtractor {
    gated_constructors!(NOTE);

    fn from_filter(filter: ChildrenFilter) -> Self {
        Self { filter }
    }
}

impl Extractor for ChildNotesTextExtractor {
    fn name(&self) -> &'static str {
        "ChildNotesTextExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let children = self.filter.accepted(item)?;
        let notes: Vec<String> = children.into_iter().filter_map(note_of).map(strip_tags).collect();
        Some(Value::Text(join_records(&notes)))
    }
}

/// Extracts the raw HTML of child notes, for storage
#[derive(Debug, Clone)]
pub struct RawChildNotesExtractor {
    filter: ChildrenFilter,
}

impl RawChildNotesExtractor {
    gated_constructors!(NOTE);

    fn from_filter(filter: ChildrenFilter) -> Self {
        Self { filter }
    }
}

impl Extractor for RawChildNotesExtractor {
    fn name(&self) -> &'static str {
        "RawChildNotesExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let children = self.filter.accepted(item)?;
        Some(text_list(
            children.into_iter().filter_map(note_of).map(str::to_string),
        ))
    }
}

/// Extracts the keys of items referenced in child notes
///
/// References are found in the `href` of links, then in the plain text of
/// the note.
#[derive(Debug, Clone)]
pub struct RelationsInChildNotesExtractor {
    filter: ChildrenFilter,
}

impl RelationsInChildNotesExtractor {
    gated_constructors!(NOTE);

    fn from_filter(filter: ChildrenFilter) -> Self {
        Self { filter }
    }
}

impl Extractor for RelationsInChildNotesExtractor {
    fn name(&self) -> &'static str {
        "RelationsInChildNotesExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/>").unwrap());

        let mut refs = BTreeSet::new();
        for child in self.filter.accepted(item).unwrap_or_default() {
            let note = child.data_str("note").unwrap_or_default();
            refs.extend(item_ids_in_links(note));
            let plain = strip_tags(&LINE_BREAK.replace_all(note, "\n"));
            refs.extend(item_ids_in_text(&plain));
        }
        (!refs.is_empty()).then(|| text_list(refs))
    }
}

macro_rules! default_to_new {
    ($($extractor:ty),+) => {
        $(impl Default for $extractor {
            fn default() -> Self {
                Self::new()
            }
        })+
    };
}

default_to_new!(
    ChildFileAttachmentsExtractor,
    ChildLinkedUriAttachmentsExtractor,
    ChildAttachmentsFulltextExtractor,
    ChildNotesTextExtractor,
    RawChildNotesExtractor,
    RelationsInChildNotesExtractor
);
