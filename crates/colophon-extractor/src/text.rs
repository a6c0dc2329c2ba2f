//! Text normalization: markup stripping and sort-key folding

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove markup from rich text
///
/// Drops HTML comments and tags, collapses runs of whitespace into single
/// spaces, then decodes character references.
///
/// # Examples
///
/// ```
/// use colophon_extractor::text::strip_tags;
///
/// assert_eq!(strip_tags("<p>Fish &amp;\n <b>Chips</b></p>"), "Fish & Chips");
/// ```
pub fn strip_tags(html: &str) -> String {
    static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
    static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

    let text = COMMENTS.replace_all(html, "");
    let text = TAGS.replace_all(&text, "");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    unescape(&collapsed)
}

/// Decode HTML character references
pub fn unescape(text: &str) -> String {
    static ENTITY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            decode_entity(entity).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from);
    }
    let decoded = match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        _ => return None,
    };
    Some(decoded.to_string())
}

/// Fold text into a key for locale-independent ordering
///
/// Applies compatibility decomposition, drops combining marks and folds case,
/// so that `"Émile"` and `"emile"` produce the same key.
pub fn sort_normalize(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .replace('ß', "ss")
}

/// Strip markup, then fold the result for sorting
pub fn prepare_sort_text(text: &str) -> String {
    sort_normalize(&strip_tags(text))
}

/// Uppercase the first letter of every word and lowercase the rest
///
/// Any non-alphabetic character starts a new word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
