//! Extractors building links to the item

use colophon_domain::{Extractor, FieldSpec, Item, LibraryContext, LibraryType, Value};

/// Extracts the `href` of a named entry of the item's links
#[derive(Debug, Clone)]
pub struct ItemLinkExtractor {
    link_key: String,
    link_type: String,
}

impl ItemLinkExtractor {
    /// Read `links[link_key]` when its type is `link_type`
    pub fn new(link_key: impl Into<String>, link_type: impl Into<String>) -> Self {
        Self {
            link_key: link_key.into(),
            link_type: link_type.into(),
        }
    }
}

impl Extractor for ItemLinkExtractor {
    fn name(&self) -> &'static str {
        "ItemLinkExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let link = item.links.get(&self.link_key)?;
        if link.get("type").and_then(|t| t.as_str()) != Some(self.link_type.as_str()) {
            return None;
        }
        link.get("href").and_then(Value::from_json)
    }
}

/// Extracts the item's page on zotero.org
#[derive(Debug, Clone)]
pub struct ZoteroWebItemUrlExtractor(ItemLinkExtractor);

impl ZoteroWebItemUrlExtractor {
    /// Read the `alternate` HTML link
    pub fn new() -> Self {
        Self(ItemLinkExtractor::new("alternate", "text/html"))
    }
}

impl Default for ZoteroWebItemUrlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ZoteroWebItemUrlExtractor {
    fn name(&self) -> &'static str {
        "ZoteroWebItemUrlExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, spec: &FieldSpec) -> Option<Value> {
        self.0.extract(item, library, spec)
    }
}

/// Builds a link opening the item in the Zotero desktop app
#[derive(Debug, Clone, Default)]
pub struct ZoteroAppItemUrlExtractor;

impl Extractor for ZoteroAppItemUrlExtractor {
    fn name(&self) -> &'static str {
        "ZoteroAppItemUrlExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let url = match library.library_type {
            LibraryType::Group => format!(
                "zotero://select/groups/{}/items/{}",
                library.library_id, item.key
            ),
            LibraryType::User => format!("zotero://select/library/items/{}", item.key),
        };
        Some(Value::Text(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{group_library, item, run};
    use serde_json::json;

    fn linked() -> Item {
        item(json!({"key": "ABCD2345", "data": {}, "links": {
            "self": {"href": "https://api.zotero.org/users/1/items/ABCD2345", "type": "application/json"},
            "alternate": {"href": "https://www.zotero.org/users/1/items/ABCD2345", "type": "text/html"}
        }}))
    }

    #[test]
    fn test_web_url() {
        assert_eq!(
            run(&ZoteroWebItemUrlExtractor::new(), &linked()),
            Some(Value::text("https://www.zotero.org/users/1/items/ABCD2345"))
        );
    }

    #[test]
    fn test_link_type_must_match() {
        let extractor = ItemLinkExtractor::new("self", "text/html");
        assert_eq!(run(&extractor, &linked()), None);
        let missing = ItemLinkExtractor::new("enclosure", "application/pdf");
        assert_eq!(run(&missing, &linked()), None);
    }

    #[test]
    fn test_app_url() {
        assert_eq!(
            run(&ZoteroAppItemUrlExtractor, &linked()),
            Some(Value::text("zotero://select/library/items/ABCD2345"))
        );
        let value =
            ZoteroAppItemUrlExtractor.extract(&linked(), &group_library(), &FieldSpec::new("f"));
        assert_eq!(value, Some(Value::text("zotero://select/groups/7777/items/ABCD2345")));
    }
}
