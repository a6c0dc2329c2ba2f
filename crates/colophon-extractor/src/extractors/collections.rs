//! Collection extractors

use super::{expand_paths, join_records};
use crate::text::sort_normalize;
use colophon_domain::{Encoding, Extractor, FieldSpec, Item, LibraryContext, Value};
use std::collections::BTreeSet;

/// Extracts the names of the item's collections for text search
///
/// Names are de-duplicated and sorted by their folded form.
#[derive(Debug, Clone, Default)]
pub struct CollectionNamesExtractor;

impl Extractor for CollectionNamesExtractor {
    fn name(&self) -> &'static str {
        "CollectionNamesExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let names: BTreeSet<(String, &str)> = item
            .collections()
            .map(|key| library.collections.name(key))
            .filter(|name| !name.is_empty())
            .map(|name| (sort_normalize(name), name))
            .collect();
        (!names.is_empty()).then(|| Value::Text(join_records(names.iter().map(|(_, name)| *name))))
    }
}

/// Extracts the hierarchical facet values of the item's collections
///
/// Only collections below the facet root named by the field spec's
/// `collection_key` contribute. Each one yields every prefix of its path
/// below the root, paired with the name of the path's last collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionFacetTreeExtractor;

impl Extractor for CollectionFacetTreeExtractor {
    fn name(&self) -> &'static str {
        "CollectionFacetTreeExtractor"
    }

    fn encoding(&self) -> Encoding {
        Encoding::Multiple
    }

    fn extract(&self, item: &Item, library: &LibraryContext, spec: &FieldSpec) -> Option<Value> {
        let root = spec.collection_key.as_deref()?;
        // Collections sharing ancestors produce the same prefixes
        let mut facets: BTreeSet<(Vec<String>, String)> = BTreeSet::new();
        for key in item.collections() {
            let ancestors = library.collections.ancestors(key);
            if ancestors.len() <= 1 || ancestors[0] != root {
                continue;
            }
            let below_root: Vec<String> = ancestors[1..].iter().map(|k| k.to_string()).collect();
            for path in expand_paths(&below_root) {
                let label = path
                    .last()
                    .map(|last| library.collections.name(last).to_string())
                    .unwrap_or_default();
                facets.insert((path, label));
            }
        }
        (!facets.is_empty()).then(|| {
            Value::List(
                facets
                    .into_iter()
                    .map(|(path, label)| Value::labeled(Value::Path(path), label))
                    .collect(),
            )
        })
    }
}

/// Tells whether an item belongs to a collection
#[derive(Debug, Clone)]
pub struct InCollectionExtractor {
    collection_key: String,
    true_only: bool,
    check_subcollections: bool,
}

impl InCollectionExtractor {
    /// Test membership in `collection_key`, subcollections included
    ///
    /// Yields `true` for members and `None` otherwise.
    pub fn new(collection_key: impl Into<String>) -> Self {
        Self {
            collection_key: collection_key.into(),
            true_only: true,
            check_subcollections: true,
        }
    }

    /// When `false`, non-members yield `false` instead of `None`
    pub fn with_true_only(mut self, true_only: bool) -> Self {
        self.true_only = true_only;
        self
    }

    /// When `false`, only direct membership counts
    pub fn with_check_subcollections(mut self, check_subcollections: bool) -> Self {
        self.check_subcollections = check_subcollections;
        self
    }

    fn is_member(&self, item: &Item, library: &LibraryContext) -> bool {
        let target = self.collection_key.as_str();
        item.collections().any(|key| {
            if self.check_subcollections {
                library.collections.ancestors(key).contains(&target)
            } else {
                key == target
            }
        })
    }
}

impl Extractor for InCollectionExtractor {
    fn name(&self) -> &'static str {
        "InCollectionExtractor"
    }

    fn extract(&self, item: &Item, library: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        match (self.is_member(item, library), self.true_only) {
            (true, _) => Some(Value::Bool(true)),
            (false, true) => None,
            (false, false) => Some(Value::Bool(false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{item, library, run};
    use serde_json::json;

    fn in_collections(keys: &[&str]) -> Item {
        item(json!({"key": "BOOK0001", "data": {"itemType": "book", "collections": keys}}))
    }

    #[test]
    fn test_collection_names_sorted_and_unique() {
        let book = in_collections(&["TOPICB00", "TOPICD00", "TOPICA00", "TOPICB00", "UNKNOWN0"]);
        assert_eq!(
            run(&CollectionNamesExtractor, &book),
            Some(Value::text("Émigrés\x1eTopic A\x1eTopic B"))
        );
        assert_eq!(run(&CollectionNamesExtractor, &in_collections(&[])), None);
    }

    #[test]
    fn test_facet_tree_excludes_root() {
        let spec = FieldSpec::new("facet_topic").with_collection_key("ROOT0000");
        let book = in_collections(&["TOPICB00"]);
        let value = CollectionFacetTreeExtractor.extract(&book, &library(), &spec);
        assert_eq!(
            value,
            Some(Value::List(vec![
                Value::labeled(Value::path(["TOPICA00"]), "Topic A"),
                Value::labeled(Value::path(["TOPICA00", "TOPICB00"]), "Topic B"),
            ]))
        );
    }

    #[test]
    fn test_facet_tree_merges_shared_ancestors() {
        let spec = FieldSpec::new("facet_topic").with_collection_key("ROOT0000");
        let book = in_collections(&["TOPICB00", "TOPICA00", "OTHER000"]);
        let value = CollectionFacetTreeExtractor.extract(&book, &library(), &spec).unwrap();
        assert_eq!(value.as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_facet_tree_ignores_other_roots() {
        let spec = FieldSpec::new("facet_topic").with_collection_key("ROOT0000");
        let root_only = in_collections(&["ROOT0000", "OTHER000"]);
        assert_eq!(CollectionFacetTreeExtractor.extract(&root_only, &library(), &spec), None);

        let no_root = FieldSpec::new("facet_topic");
        let book = in_collections(&["TOPICB00"]);
        assert_eq!(CollectionFacetTreeExtractor.extract(&book, &library(), &no_root), None);
    }

    #[test]
    fn test_in_collection_through_subcollections() {
        let book = in_collections(&["TOPICB00"]);
        assert_eq!(run(&InCollectionExtractor::new("ROOT0000"), &book), Some(Value::Bool(true)));
        assert_eq!(run(&InCollectionExtractor::new("OTHER000"), &book), None);
        assert_eq!(
            run(&InCollectionExtractor::new("OTHER000").with_true_only(false), &book),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn test_in_collection_direct_membership() {
        let book = in_collections(&["TOPICB00"]);
        let direct = InCollectionExtractor::new("ROOT0000")
            .with_check_subcollections(false)
            .with_true_only(false);
        assert_eq!(run(&direct, &book), Some(Value::Bool(false)));

        let own = InCollectionExtractor::new("TOPICB00").with_check_subcollections(false);
        assert_eq!(run(&own, &book), Some(Value::Bool(true)));
    }
}
