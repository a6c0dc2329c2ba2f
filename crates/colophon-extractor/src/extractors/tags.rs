//! Tag extractors

use super::{join_records, text_list};
use crate::error::ExtractorError;
use crate::predicates::TagFilter;
use crate::text::sort_normalize;
use colophon_domain::{Encoding, Extractor, FieldSpec, Item, LibraryContext, Value};
use std::collections::BTreeSet;

fn filtered_tags(item: &Item, filter: &TagFilter) -> BTreeSet<String> {
    item.tags()
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && filter.accepts(tag))
        .map(str::to_string)
        .collect()
}

/// Extracts the item's tags for text search
#[derive(Debug, Clone, Default)]
pub struct TagsTextExtractor {
    filter: TagFilter,
}

impl TagsTextExtractor {
    /// Keep every tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep tags matching `include_re` but not `exclude_re`
    ///
    /// Patterns match at the start of the tag; an empty pattern is ignored.
    pub fn filtered(include_re: &str, exclude_re: &str) -> Result<Self, ExtractorError> {
        Ok(Self {
            filter: TagFilter::new(include_re, exclude_re)?,
        })
    }
}

impl Extractor for TagsTextExtractor {
    fn name(&self) -> &'static str {
        "TagsTextExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let tags = filtered_tags(item, &self.filter);
        if tags.is_empty() {
            return None;
        }
        let mut sorted: Vec<String> = tags.into_iter().collect();
        sorted.sort_by_cached_key(|tag| sort_normalize(tag));
        Some(Value::Text(join_records(&sorted)))
    }
}

/// Extracts the item's tags for faceting
#[derive(Debug, Clone, Default)]
pub struct TagsFacetExtractor {
    filter: TagFilter,
}

impl TagsFacetExtractor {
    /// Keep every tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep tags matching `include_re` but not `exclude_re`
    pub fn filtered(include_re: &str, exclude_re: &str) -> Result<Self, ExtractorError> {
        Ok(Self {
            filter: TagFilter::new(include_re, exclude_re)?,
        })
    }
}

impl Extractor for TagsFacetExtractor {
    fn name(&self) -> &'static str {
        "TagsFacetExtractor"
    }

    fn encoding(&self) -> Encoding {
        Encoding::Multiple
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let tags = filtered_tags(item, &self.filter);
        (!tags.is_empty()).then(|| text_list(tags))
    }
}
