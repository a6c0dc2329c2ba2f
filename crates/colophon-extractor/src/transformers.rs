//! Value transformers applied by [`TransformerExtractor`]
//!
//! [`TransformerExtractor`]: crate::composite::TransformerExtractor

use crate::error::ExtractorError;
use crate::text::{prepare_sort_text, strip_tags};
use colophon_domain::Value;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied transformation
pub type TransformFn = Arc<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

static ZOTERO_ITEM_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:https?://zotero\.org/(?:users|groups)/[0-9]+|zotero://select/(?:library|users/[0-9]+|groups/[0-9]+))/items/([A-Z0-9]{8})\b",
    )
    .unwrap()
});

static ANCHOR_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*["']([^"']*)["']"#).unwrap());

/// A pure transformation of an extracted value
#[derive(Clone)]
pub enum Transformer {
    /// Keep the given capture group of the first match
    FindRegex {
        /// Pattern to search
        regex: Regex,
        /// Capture group to keep; 0 is the whole match
        group: usize,
    },

    /// Keep every match, as a list
    FindAllRegex(Regex),

    /// Split on a pattern, keeping trimmed, non-empty pieces
    SplitRegex(Regex),

    /// Map a list of Zotero item URIs to item keys
    ZoteroItemIdsInUris,

    /// Find Zotero item keys referenced anywhere in plain text
    ZoteroItemIdsInText,

    /// Find Zotero item keys in the `href` of HTML anchors
    ZoteroItemIdsInLinks,

    /// Remove markup
    StripTags,

    /// Strip markup and fold for sorting
    SortText,

    /// Caller-supplied function
    Custom(TransformFn),
}

impl Transformer {
    /// Keep the first capture group of the first match of `pattern`
    pub fn find_regex(pattern: &str) -> Result<Self, ExtractorError> {
        Self::find_regex_group(pattern, 1)
    }

    /// Keep a given capture group of the first match of `pattern`
    pub fn find_regex_group(pattern: &str, group: usize) -> Result<Self, ExtractorError> {
        Ok(Transformer::FindRegex {
            regex: compile(pattern)?,
            group,
        })
    }

    /// Keep every match of `pattern`
    pub fn find_all_regex(pattern: &str) -> Result<Self, ExtractorError> {
        compile(pattern).map(Transformer::FindAllRegex)
    }

    /// Split on `pattern`
    pub fn split_regex(pattern: &str) -> Result<Self, ExtractorError> {
        compile(pattern).map(Transformer::SplitRegex)
    }

    /// Wrap a caller-supplied function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        Transformer::Custom(Arc::new(f))
    }

    /// Apply the transformation
    ///
    /// Built-in transformers map `None` to `None`.
    pub fn apply(&self, value: Option<Value>) -> Option<Value> {
        if let Transformer::Custom(f) = self {
            return f(value);
        }
        let value = value?;
        let texts = texts_of(&value);
        match self {
            Transformer::FindRegex { regex, group } => texts.iter().find_map(|text| {
                regex
                    .captures(text)
                    .and_then(|caps| caps.get(*group))
                    .map(|m| Value::text(m.as_str()))
            }),
            Transformer::FindAllRegex(regex) => Some(Value::List(
                texts
                    .iter()
                    .flat_map(move |text| regex.find_iter(text).map(|m| Value::text(m.as_str())))
                    .collect(),
            )),
            Transformer::SplitRegex(regex) => Some(Value::List(
                texts
                    .iter()
                    .flat_map(move |text| regex.split(text))
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(Value::text)
                    .collect(),
            )),
            Transformer::ZoteroItemIdsInUris => Some(ids_value(
                texts.iter().filter_map(|uri| item_id_in_uri(uri)),
            )),
            Transformer::ZoteroItemIdsInText => Some(ids_value(
                texts.iter().flat_map(|text| item_ids_in_text(text)),
            )),
            Transformer::ZoteroItemIdsInLinks => Some(ids_value(
                texts.iter().flat_map(|html| item_ids_in_links(html)),
            )),
            Transformer::StripTags => Some(map_text(value, &strip_tags)),
            Transformer::SortText => Some(map_text(value, &prepare_sort_text)),
            Transformer::Custom(_) => None,
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformer::FindRegex { regex, group } => f
                .debug_struct("FindRegex")
                .field("regex", &regex.as_str())
                .field("group", group)
                .finish(),
            Transformer::FindAllRegex(regex) => {
                f.debug_tuple("FindAllRegex").field(&regex.as_str()).finish()
            }
            Transformer::SplitRegex(regex) => {
                f.debug_tuple("SplitRegex").field(&regex.as_str()).finish()
            }
            Transformer::ZoteroItemIdsInUris => f.write_str("ZoteroItemIdsInUris"),
            Transformer::ZoteroItemIdsInText => f.write_str("ZoteroItemIdsInText"),
            Transformer::ZoteroItemIdsInLinks => f.write_str("ZoteroItemIdsInLinks"),
            Transformer::StripTags => f.write_str("StripTags"),
            Transformer::SortText => f.write_str("SortText"),
            Transformer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, ExtractorError> {
    Regex::new(pattern).map_err(|e| ExtractorError::invalid_regex(pattern, e))
}

fn texts_of(value: &Value) -> Vec<String> {
    value.elements().iter().map(ToString::to_string).collect()
}

fn map_text(value: Value, f: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::List(items) => Value::List(items.into_iter().map(|v| map_text(v, f)).collect()),
        other => Value::Text(f(&other.to_string())),
    }
}

fn ids_value<I: IntoIterator<Item = String>>(ids: I) -> Value {
    let unique: IndexSet<String> = ids.into_iter().collect();
    Value::List(unique.into_iter().map(Value::Text).collect())
}

/// Get the item key of a Zotero item URI
///
/// # Examples
///
/// ```
/// use colophon_extractor::transformers::item_id_in_uri;
///
/// assert_eq!(
///     item_id_in_uri("http://zotero.org/groups/1234/items/ABCD2345"),
///     Some("ABCD2345".to_string())
/// );
/// assert_eq!(item_id_in_uri("https://example.org/items/ABCD2345"), None);
/// ```
pub fn item_id_in_uri(uri: &str) -> Option<String> {
    ZOTERO_ITEM_URI
        .captures(uri.trim())
        .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Find the item keys of all Zotero item URIs in a text
pub fn item_ids_in_text(text: &str) -> Vec<String> {
    ZOTERO_ITEM_URI
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Find the item keys of Zotero item URIs in the `href` of HTML anchors
pub fn item_ids_in_links(html: &str) -> Vec<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(|href| item_id_in_uri(href.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_regex() {
        let t = Transformer::find_regex(r"ISBN:\s*([0-9X-]+)").unwrap();
        assert_eq!(
            t.apply(Some(Value::text("Print ISBN: 978-3-16 (pbk)"))),
            Some(Value::text("978-3-16"))
        );
        assert_eq!(t.apply(Some(Value::text("none"))), None);
        assert_eq!(t.apply(None), None);
    }

    #[test]
    fn test_find_all_regex() {
        let t = Transformer::find_all_regex(r"#\w+").unwrap();
        assert_eq!(
            t.apply(Some(Value::text("#a and #b"))),
            Some(Value::List(vec![Value::text("#a"), Value::text("#b")]))
        );
    }

    #[test]
    fn test_split_regex() {
        let t = Transformer::split_regex(r"[;,]").unwrap();
        assert_eq!(
            t.apply(Some(Value::text(" x ; y,, z "))),
            Some(Value::List(vec![Value::text("x"), Value::text("y"), Value::text("z")]))
        );
    }

    #[test]
    fn test_item_ids_in_uris() {
        let uris = Value::List(vec![
            Value::text("http://zotero.org/users/42/items/AAAA1111"),
            Value::text("zotero://select/library/items/BBBB2222"),
            Value::text("https://example.org/"),
            Value::text("http://zotero.org/users/42/items/AAAA1111"),
        ]);
        assert_eq!(
            Transformer::ZoteroItemIdsInUris.apply(Some(uris)),
            Some(Value::List(vec![Value::text("AAAA1111"), Value::text("BBBB2222")]))
        );
    }

    #[test]
    fn test_item_ids_in_links() {
        let html = r#"<p>See <a href="http://zotero.org/groups/7/items/CCCC3333">this</a>
            and <a class="x" href='https://elsewhere.org/'>that</a>.</p>"#;
        assert_eq!(item_ids_in_links(html), vec!["CCCC3333".to_string()]);
    }

    #[test]
    fn test_item_ids_in_text() {
        let text = "refs: zotero://select/groups/7/items/DDDD4444, https://zotero.org/users/1/items/EEEE5555";
        assert_eq!(item_ids_in_text(text), vec!["DDDD4444", "EEEE5555"]);
    }

    #[test]
    fn test_strip_and_sort_text() {
        let value = Some(Value::text("<b>Éloge</b>"));
        assert_eq!(Transformer::StripTags.apply(value.clone()), Some(Value::text("Éloge")));
        assert_eq!(Transformer::SortText.apply(value), Some(Value::text("eloge")));
    }

    #[test]
    fn test_custom_sees_none() {
        let t = Transformer::custom(|v| v.or(Some(Value::text("default"))));
        assert_eq!(t.apply(None), Some(Value::text("default")));
    }
}
