//! Sort key extractors

use super::item::title_of;
use crate::text::prepare_sort_text;
use colophon_domain::{Creator, Extractor, FieldSpec, Item, LibraryContext, Value};

/// Separates the name parts of a creator
const PART_SEPARATOR: &str = " zzz ";

/// Separates creators
const CREATOR_SEPARATOR: &str = " zzzzzz ";

fn sort_value(value: Value) -> Value {
    Value::Text(prepare_sort_text(&value.to_string()))
}

/// Extracts a data field folded for sorting
#[derive(Debug, Clone)]
pub struct SortItemDataExtractor {
    key: String,
}

impl SortItemDataExtractor {
    /// Read the data field `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Extractor for SortItemDataExtractor {
    fn name(&self) -> &'static str {
        "SortItemDataExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        item.data_value(&self.key)
            .and_then(Value::from_json)
            .map(sort_value)
    }
}

/// Extracts the title folded for sorting
#[derive(Debug, Clone, Default)]
pub struct SortTitleExtractor;

impl Extractor for SortTitleExtractor {
    fn name(&self) -> &'static str {
        "SortTitleExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        title_of(item, library).map(sort_value)
    }
}

/// Extracts the creators folded for sorting
///
/// Creator types are ranked by the item type's schema, primary creators
/// first. Only the creators of the first type that has any are used, as
/// lesser creators may not appear in citations.
#[derive(Debug, Clone, Default)]
pub struct SortCreatorExtractor;

fn creator_key(creator: &Creator<'_>) -> String {
    [creator.last_name, creator.first_name, creator.name]
        .iter()
        .map(|part| prepare_sort_text(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR)
}

impl Extractor for SortCreatorExtractor {
    fn name(&self) -> &'static str {
        "SortCreatorExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let schema = item
            .item_type()
            .map(|t| library.creator_types_of(t))
            .unwrap_or_default();
        let keys = schema
            .iter()
            .map(|meta| {
                item.creators()
                    .filter(|c| c.creator_type == meta.creator_type)
                    .map(|c| creator_key(&c))
                    .collect::<Vec<_>>()
            })
            .find(|keys| !keys.is_empty())
            .unwrap_or_default();
        Some(Value::Text(keys.join(CREATOR_SEPARATOR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{item, run};
    use serde_json::json;

    #[test]
    fn test_sort_data_field() {
        let book = item(json!({"key": "B", "data": {"itemType": "book", "publisher": "<b>Éditions</b> Straße"}}));
        assert_eq!(
            run(&SortItemDataExtractor::new("publisher"), &book),
            Some(Value::text("editions strasse"))
        );
        assert_eq!(run(&SortItemDataExtractor::new("place"), &book), None);
    }

    #[test]
    fn test_sort_title() {
        let book = item(json!({"key": "B", "data": {"itemType": "book", "title": "L'<i>Été</i>"}}));
        assert_eq!(run(&SortTitleExtractor, &book), Some(Value::text("l'ete")));

        let note = item(json!({"key": "N", "data": {"itemType": "note"}}));
        assert_eq!(run(&SortTitleExtractor, &note), Some(Value::text("")));
    }

    #[test]
    fn test_sort_creator_uses_primary_type_only() {
        let book = item(json!({"key": "B", "data": {"itemType": "book", "creators": [
            {"creatorType": "editor", "lastName": "Aardvark", "firstName": "Al"},
            {"creatorType": "author", "lastName": "Zola", "firstName": "Émile"},
            {"creatorType": "author", "name": "ACME"}
        ]}}));
        assert_eq!(
            run(&SortCreatorExtractor, &book),
            Some(Value::text("zola zzz emile zzzzzz acme"))
        );
    }

    #[test]
    fn test_sort_creator_falls_back_to_lesser_types() {
        let book = item(json!({"key": "B", "data": {"itemType": "book", "creators": [
            {"creatorType": "editor", "lastName": "Aardvark"}
        ]}}));
        assert_eq!(run(&SortCreatorExtractor, &book), Some(Value::text("aardvark")));

        let none = item(json!({"key": "B", "data": {"itemType": "book"}}));
        assert_eq!(run(&SortCreatorExtractor, &none), Some(Value::text("")));
    }
}
