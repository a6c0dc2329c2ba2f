//! Fixtures shared by unit tests

use colophon_domain::{
    Collection, Collections, CreatorTypeMeta, Extractor, FieldMeta, FieldSpec, Item,
    LibraryContext, LibraryType, Value,
};
use serde_json::Value as JsonValue;

pub(crate) fn collections() -> Collections {
    let mut collections = Collections::new();
    collections.insert(Collection::new("ROOT0000", "Root", None));
    collections.insert(Collection::new("TOPICA00", " Topic A ", Some("ROOT0000")));
    collections.insert(Collection::new("TOPICB00", "Topic B", Some("TOPICA00")));
    collections.insert(Collection::new("TOPICD00", "Émigrés", Some("ROOT0000")));
    collections.insert(Collection::new("OTHER000", "Other", None));
    collections
}

pub(crate) fn library() -> LibraryContext {
    LibraryContext::new("123456", LibraryType::User)
        .with_item_type(
            "book",
            "Book",
            vec![
                FieldMeta::new("title", "Title"),
                FieldMeta::new("abstractNote", "Abstract"),
                FieldMeta::new("date", "Date"),
                FieldMeta::new("language", "Language"),
                FieldMeta::new("url", "URL"),
            ],
        )
        .with_item_type(
            "case",
            "Case",
            vec![FieldMeta::new("caseName", "Case Name"), FieldMeta::new("court", "Court")],
        )
        .with_item_type("note", "Note", vec![])
        .with_creator_types(
            "book",
            vec![
                CreatorTypeMeta::new("author", "Author"),
                CreatorTypeMeta::new("contributor", "Contributor"),
                CreatorTypeMeta::new("editor", "Editor"),
            ],
        )
        .with_creator_types("case", vec![CreatorTypeMeta::new("author", "Author")])
        .with_collections(collections())
}

pub(crate) fn group_library() -> LibraryContext {
    let mut library = library();
    library.library_id = "7777".to_string();
    library.library_type = LibraryType::Group;
    library
}

pub(crate) fn item(json: JsonValue) -> Item {
    Item::from_json(json).unwrap()
}

pub(crate) fn run(extractor: &dyn Extractor, item: &Item) -> Option<Value> {
    extractor.extract(item, &library(), &FieldSpec::new("field"))
}

pub(crate) fn texts(values: &[&str]) -> Value {
    Value::List(values.iter().map(|v| Value::text(*v)).collect())
}
