//! Leaf extractors, one per derivable field

mod children;
mod collections;
mod creators;
mod dates;
mod item;
mod language;
mod links;
mod sort;
mod tags;

pub use children::{
    ChildAttachmentsFulltextExtractor, ChildFileAttachmentsExtractor,
    ChildLinkedUriAttachmentsExtractor, ChildNotesTextExtractor, ChildrenFilter,
    RawChildNotesExtractor, RelationsInChildNotesExtractor,
};
pub use collections::{CollectionFacetTreeExtractor, CollectionNamesExtractor, InCollectionExtractor};
pub use creators::{CreatorTypesExtractor, CreatorsExtractor};
pub use dates::{MaximizeParsedDateExtractor, SortDateExtractor, YearExtractor, YearFacetExtractor};
pub use item::{
    ItemDataExtractor, ItemDataLinkFacetExtractor, ItemExtractor, ItemFieldsExtractor,
    ItemRelationsExtractor, ItemTitleExtractor, ItemTypeFacetExtractor, ItemTypeLabelExtractor,
    RawDataExtractor,
};
pub use language::{InvalidLabelFn, LanguageExtractor, LanguageOptions};
pub use links::{ItemLinkExtractor, ZoteroAppItemUrlExtractor, ZoteroWebItemUrlExtractor};
pub use sort::{SortCreatorExtractor, SortItemDataExtractor, SortTitleExtractor};
pub use tags::{TagsFacetExtractor, TagsTextExtractor};

use colophon_domain::{Item, Value, RECORD_SEPARATOR};
use tracing::warn;

/// Report a data-quality problem, tagged with the extractor and item key
pub(crate) fn warning(extractor: &'static str, message: &str, item: Option<&Item>) {
    match item.map(|item| item.key.as_str()).filter(|key| !key.is_empty()) {
        Some(key) => warn!(extractor = extractor, item = key, "{}", message),
        None => warn!(extractor = extractor, "{}", message),
    }
}

/// Join text values with the record separator
pub(crate) fn join_records<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}

/// Build the expanding prefixes of a path: `[a, b]` gives `[a]`, `[a, b]`
pub(crate) fn expand_paths(path: &[String]) -> Vec<Vec<String>> {
    (1..=path.len()).map(|end| path[..end].to_vec()).collect()
}

/// Wrap a list of texts into a list value
pub(crate) fn text_list<I: IntoIterator<Item = String>>(values: I) -> Value {
    Value::List(values.into_iter().map(Value::Text).collect())
}
