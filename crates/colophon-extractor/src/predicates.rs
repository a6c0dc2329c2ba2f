//! Predicates shared by extractors: attachment kinds and tag gating

use crate::error::ExtractorError;
use colophon_domain::Item;
use regex::Regex;

/// MIME type assumed for attachments that report none
pub const DEFAULT_CONTENT_TYPE: &str = "octet-stream";

/// Whether an item is a stored copy of a file
///
/// When `mime_types` is non-empty, the attachment's content type must also be
/// one of them.
pub fn is_file_attachment(item: &Item, mime_types: &[String]) -> bool {
    if !item.has_data() || item.data_str("key").map_or(true, str::is_empty) {
        return false;
    }
    if !matches!(item.data_str("linkMode"), Some("imported_file" | "imported_url")) {
        return false;
    }
    if !mime_types.is_empty() {
        let content_type = item.data_str("contentType").unwrap_or(DEFAULT_CONTENT_TYPE);
        return mime_types.iter().any(|m| m == content_type);
    }
    true
}

/// Whether an item is a link to a URI
pub fn is_link_attachment(item: &Item) -> bool {
    item.has_data()
        && item.data_str("key").is_some_and(|k| !k.is_empty())
        && item.data_str("linkMode") == Some("linked_url")
        && item.data_str("url").is_some_and(|u| !u.is_empty())
}

/// Compile a pattern that must match at the start of the text
pub fn compile_anchored(pattern: &str) -> Result<Regex, ExtractorError> {
    Regex::new(&format!("^(?:{})", pattern))
        .map_err(|e| ExtractorError::invalid_regex(pattern, e))
}

fn compile_optional(pattern: &str) -> Result<Option<Regex>, ExtractorError> {
    if pattern.is_empty() {
        Ok(None)
    } else {
        compile_anchored(pattern).map(Some)
    }
}

/// Include/exclude filter applied to individual tags
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl TagFilter {
    /// Create a filter; an empty pattern disables its side of the filter
    ///
    /// # Examples
    ///
    /// ```
    /// use colophon_extractor::predicates::TagFilter;
    ///
    /// let filter = TagFilter::new("public", "public-internal").unwrap();
    /// assert!(filter.accepts("public-release"));
    /// assert!(!filter.accepts("public-internal-draft"));
    /// assert!(!filter.accepts("draft"));
    /// ```
    pub fn new(include_re: &str, exclude_re: &str) -> Result<Self, ExtractorError> {
        Ok(Self {
            include: compile_optional(include_re)?,
            exclude: compile_optional(exclude_re)?,
        })
    }

    /// Whether a tag passes the filter
    pub fn accepts(&self, tag: &str) -> bool {
        self.include.as_ref().map_or(true, |re| re.is_match(tag))
            && !self.exclude.as_ref().is_some_and(|re| re.is_match(tag))
    }
}

/// Gate accepting or rejecting an item based on the whole set of its tags
///
/// The item is rejected unless every include pattern matches at least one of
/// its tags. It is also rejected when every exclude pattern matches at least
/// one of its tags.
#[derive(Debug, Clone, Default)]
pub struct TagGate {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl TagGate {
    /// Create a gate; empty patterns are ignored
    pub fn new<S: AsRef<str>>(include_re: &[S], exclude_re: &[S]) -> Result<Self, ExtractorError> {
        let compile = |patterns: &[S]| -> Result<Vec<Regex>, ExtractorError> {
            patterns
                .iter()
                .map(AsRef::as_ref)
                .filter(|p| !p.is_empty())
                .map(compile_anchored)
                .collect()
        };
        Ok(Self {
            include: compile(include_re)?,
            exclude: compile(exclude_re)?,
        })
    }

    /// Whether the gate lets everything through
    pub fn is_open(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check an item against the gate
    pub fn check(&self, item: &Item) -> bool {
        if self.is_open() {
            return true;
        }
        let tags: Vec<&str> = item.tags().collect();
        let matches_some = |re: &Regex| tags.iter().any(|tag| re.is_match(tag));
        if !self.include.iter().all(matches_some) {
            return false;
        }
        if !self.exclude.is_empty() && self.exclude.iter().all(matches_some) {
            return false;
        }
        true
    }
}
