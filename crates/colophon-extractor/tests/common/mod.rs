//! Fixtures shared by the integration tests

#![allow(dead_code)]

use colophon_domain::{
    Collection, Collections, CreatorTypeMeta, FieldMeta, Item, LibraryContext, LibraryType,
};
use serde_json::{json, Value as JsonValue};

/// A user library with book and journal article schemas
pub fn library() -> LibraryContext {
    let mut collections = Collections::new();
    collections.insert(Collection::new("HIST0000", "History", None));
    collections.insert(Collection::new("MODERN00", "Modern", Some("HIST0000")));
    collections.insert(Collection::new("WAR00000", "Wars", Some("MODERN00")));

    LibraryContext::new("123456", LibraryType::User)
        .with_item_type(
            "book",
            "Book",
            vec![
                FieldMeta::new("title", "Title"),
                FieldMeta::new("date", "Date"),
                FieldMeta::new("language", "Language"),
            ],
        )
        .with_item_type(
            "journalArticle",
            "Journal Article",
            vec![
                FieldMeta::new("title", "Title"),
                FieldMeta::new("publicationTitle", "Publication"),
            ],
        )
        .with_creator_types(
            "book",
            vec![
                CreatorTypeMeta::new("author", "Author"),
                CreatorTypeMeta::new("editor", "Editor"),
            ],
        )
        .with_creator_types("journalArticle", vec![CreatorTypeMeta::new("author", "Author")])
        .with_collections(collections)
}

/// Parse an item, panicking on malformed fixtures
pub fn item(json: JsonValue) -> Item {
    Item::from_json(json).expect("fixture item is well-formed")
}

/// A book item with a date and a language field
pub fn book(key: &str, parsed_date: &str, language: &str) -> Item {
    item(json!({
        "key": key,
        "data": {
            "key": key,
            "itemType": "book",
            "title": format!("Book {}", key),
            "language": language,
            "creators": [{"creatorType": "author", "firstName": "Ada", "lastName": "Lovelace"}],
            "collections": ["WAR00000"],
            "tags": [{"tag": "computing"}]
        },
        "meta": {"parsedDate": parsed_date}
    }))
}
