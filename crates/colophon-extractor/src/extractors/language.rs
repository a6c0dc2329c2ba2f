//! Language extractor

use super::warning;
use crate::error::ExtractorError;
use crate::languages::{base_locale, LanguageDatabase, TranslationCatalog};
use crate::text::title_case;
use colophon_domain::{Encoding, Extractor, FieldSpec, Item, LibraryContext, Value};
use indexmap::IndexSet;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

static DEFAULT_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(";").unwrap());

/// Normalizes the label of a language value missing from the database
pub type InvalidLabelFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Options of the [`LanguageExtractor`]
#[derive(Clone)]
pub struct LanguageOptions {
    /// Pattern separating multiple values of the language field
    pub values_separator_re: String,

    /// Resolve values through the language database; when `false`, values
    /// are used verbatim as both code and label
    pub normalize: bool,

    /// Locale to translate language names into
    pub locale: String,

    /// Keep values missing from the database
    pub allow_invalid: bool,

    /// Label normalizer for values missing from the database
    pub normalize_invalid: InvalidLabelFn,

    /// Directory searched for `<locale>.tsv` catalogs before the bundled ones
    pub catalog_dir: Option<PathBuf>,
}

impl Default for LanguageOptions {
    fn default() -> Self {
        Self {
            values_separator_re: ";".to_string(),
            normalize: true,
            locale: "en".to_string(),
            allow_invalid: true,
            normalize_invalid: Arc::new(title_case),
            catalog_dir: None,
        }
    }
}

impl fmt::Debug for LanguageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageOptions")
            .field("values_separator_re", &self.values_separator_re)
            .field("normalize", &self.normalize)
            .field("locale", &self.locale)
            .field("allow_invalid", &self.allow_invalid)
            .field("catalog_dir", &self.catalog_dir)
            .finish_non_exhaustive()
    }
}

/// Extracts the item's languages as `(code, name)` pairs
///
/// Known languages resolve to their ISO 639-3 code and their name translated
/// into the configured locale. Duplicates are dropped, keeping the first
/// occurrence.
#[derive(Debug)]
pub struct LanguageExtractor {
    separator: Regex,
    options: LanguageOptions,
    database: &'static LanguageDatabase,
    translations: OnceCell<Option<TranslationCatalog>>,
}

impl LanguageExtractor {
    /// Create an extractor with default options
    pub fn new() -> Self {
        Self::build(DEFAULT_SEPARATOR.clone(), LanguageOptions::default())
    }

    /// Create an extractor with the given options
    pub fn with_options(options: LanguageOptions) -> Result<Self, ExtractorError> {
        let separator = Regex::new(&options.values_separator_re)
            .map_err(|e| ExtractorError::invalid_regex(&options.values_separator_re, e))?;
        Ok(Self::build(separator, options))
    }

    fn build(separator: Regex, options: LanguageOptions) -> Self {
        Self {
            separator,
            options,
            database: LanguageDatabase::bundled(),
            translations: OnceCell::new(),
        }
    }

    fn catalog(&self) -> Option<&TranslationCatalog> {
        self.translations
            .get_or_init(|| {
                let locale = self.options.locale.replace('-', "_");
                if base_locale(&locale) == "en" {
                    return None;
                }
                match TranslationCatalog::load(&locale, self.options.catalog_dir.as_deref()) {
                    Ok(Some(catalog)) => Some(catalog),
                    Ok(None) => {
                        let message =
                            format!("No language translations found for locale '{}'.", locale);
                        warning(self.name(), &message, None);
                        None
                    }
                    Err(e) => {
                        let message = format!(
                            "Could not load language translations for locale '{}': {}",
                            locale, e
                        );
                        warning(self.name(), &message, None);
                        None
                    }
                }
            })
            .as_ref()
    }

    fn translate(&self, name: &str) -> String {
        match self.catalog() {
            Some(catalog) => catalog.translate(name).to_string(),
            None => name.to_string(),
        }
    }

    /// Resolve one value into a `(code, label)` pair
    pub fn normalize_language(&self, value: &str) -> Option<(String, String)> {
        let value = value.trim();
        if let Some(language) = self.database.lookup(value) {
            return Some((language.alpha_3.clone(), self.translate(&language.name)));
        }
        if !value.is_empty() && self.options.allow_invalid {
            return Some((value.to_lowercase(), (self.options.normalize_invalid)(value)));
        }
        None
    }
}

impl Default for LanguageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for LanguageExtractor {
    fn name(&self) -> &'static str {
        "LanguageExtractor"
    }

    fn encoding(&self) -> Encoding {
        Encoding::Multiple
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let raw = item.data_str("language").unwrap_or_default();
        let pieces = self.separator.split(raw);
        let pairs: IndexSet<(String, String)> = if self.options.normalize {
            pieces.filter_map(|v| self.normalize_language(v)).collect()
        } else {
            pieces
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (v.to_string(), v.to_string()))
                .collect()
        };
        (!pairs.is_empty()).then(|| {
            Value::List(
                pairs
                    .into_iter()
                    .map(|(code, label)| Value::labeled(Value::Text(code), label))
                    .collect(),
            )
        })
    }
}
