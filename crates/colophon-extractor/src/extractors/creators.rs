//! Creator extractors

use super::item::warn_unknown_type;
use super::{join_records, warning};
use crate::text::strip_tags;
use colophon_domain::{Extractor, FieldSpec, Item, LibraryContext, Value};

/// Extracts the schema of the creator types present among the item's creators
///
/// Types keep the schema order.
#[derive(Debug, Clone, Default)]
pub struct CreatorTypesExtractor;

impl Extractor for CreatorTypesExtractor {
    fn name(&self) -> &'static str {
        "CreatorTypesExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let item_type = item.item_type();
        let Some(schema) = item_type.and_then(|t| library.creator_types.get(t)) else {
            if item_type != Some("attachment") {
                warn_unknown_type(self.name(), item);
            }
            return None;
        };

        let present: Vec<_> = schema
            .iter()
            .filter(|meta| {
                item.creators()
                    .any(|c| !c.creator_type.is_empty() && c.creator_type == meta.creator_type)
            })
            .collect();
        if !present.is_empty() {
            return serde_json::to_value(present).ok().map(Value::Json);
        }
        if item.creators().next().is_some() {
            let message = format!(
                "Missing creator types for item type '{}'.",
                item_type.unwrap_or_default()
            );
            warning(self.name(), &message, Some(item));
        }
        None
    }
}

/// Flattens creator names for text search
///
/// A display name is kept as is. First and last names produce both
/// `First Last` and `Last, First` to help phrase searches.
#[derive(Debug, Clone, Default)]
pub struct CreatorsExtractor;

impl Extractor for CreatorsExtractor {
    fn name(&self) -> &'static str {
        "CreatorsExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let mut names = Vec::new();
        for creator in item.creators() {
            let full_name = strip_tags(creator.name);
            if !full_name.is_empty() {
                names.push(full_name);
            }
            let first = strip_tags(creator.first_name);
            let last = strip_tags(creator.last_name);
            match (first.is_empty(), last.is_empty()) {
                (false, false) => {
                    names.push(format!("{} {}", first, last));
                    names.push(format!("{}, {}", last, first));
                }
                (false, true) => names.push(first),
                (true, false) => names.push(last),
                (true, true) => {}
            }
        }
        (!names.is_empty()).then(|| Value::Text(join_records(&names)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{item, run};
    use serde_json::json;

    #[test]
    fn test_two_field_creator() {
        let book = item(json!({"key": "B", "data": {"creators": [
            {"creatorType": "author", "firstName": "Jane", "lastName": "Doe"}
        ]}}));
        assert_eq!(
            run(&CreatorsExtractor, &book),
            Some(Value::text("Jane Doe\x1eDoe, Jane"))
        );
    }

    #[test]
    fn test_single_field_and_partial_creators() {
        let book = item(json!({"key": "B", "data": {"creators": [
            {"creatorType": "author", "name": "<i>ACME</i> Corp"},
            {"creatorType": "editor", "lastName": "Solo"},
            {"creatorType": "editor", "firstName": " ", "lastName": ""}
        ]}}));
        assert_eq!(run(&CreatorsExtractor, &book), Some(Value::text("ACME Corp\x1eSolo")));
    }

    #[test]
    fn test_no_creators() {
        let book = item(json!({"key": "B", "data": {"creators": []}}));
        assert_eq!(run(&CreatorsExtractor, &book), None);
    }

    #[test]
    fn test_creator_types_in_schema_order() {
        let book = item(json!({"key": "B", "data": {"itemType": "book", "creators": [
            {"creatorType": "editor", "lastName": "E"},
            {"creatorType": "author", "lastName": "A"},
            {"creatorType": "author", "lastName": "A2"}
        ]}}));
        assert_eq!(
            run(&CreatorTypesExtractor, &book),
            Some(Value::Json(json!([
                {"creatorType": "author", "localized": "Author"},
                {"creatorType": "editor", "localized": "Editor"}
            ])))
        );
    }

    #[test]
    fn test_creator_types_missing_from_schema() {
        let book = item(json!({"key": "B", "data": {"itemType": "book", "creators": [
            {"creatorType": "translator", "lastName": "T"}
        ]}}));
        assert_eq!(run(&CreatorTypesExtractor, &book), None);

        let unknown = item(json!({"key": "U", "data": {"itemType": "hologram"}}));
        assert_eq!(run(&CreatorTypesExtractor, &unknown), None);
    }
}
