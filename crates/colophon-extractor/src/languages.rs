//! Language database and translation catalogs
//!
//! The bundled table is the complete ISO 639-3 code set, generated from the
//! iso-codes project, with each language's 3-letter (ISO 639-3),
//! bibliographic (ISO 639-2/B) and 2-letter (ISO 639-1) codes and English
//! name. Catalogs map English names to localized names. The crate ships the
//! iso-codes catalogs for `fr`, `de` and `es`; they only list names whose
//! translation differs from English, and a name missing from a catalog is
//! shown in English. More catalogs can be read from a directory of
//! `<locale>.tsv` files.

use crate::error::ExtractorError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

static ISO639_TABLE: &str = include_str!("../data/iso639.tsv");

static BUNDLED: Lazy<LanguageDatabase> = Lazy::new(|| {
    LanguageDatabase::parse(ISO639_TABLE).expect("bundled ISO 639 table is well-formed")
});

/// One language of the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-3 code
    pub alpha_3: String,

    /// ISO 639-2/B code, when it differs from the ISO 639-3 code
    pub bibliographic: Option<String>,

    /// ISO 639-1 code
    pub alpha_2: Option<String>,

    /// English name
    pub name: String,
}

/// Case-insensitive lookup of languages by code or English name
#[derive(Debug, Clone, Default)]
pub struct LanguageDatabase {
    languages: Vec<Language>,
    by_alpha_3: HashMap<String, usize>,
    by_bibliographic: HashMap<String, usize>,
    by_alpha_2: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl LanguageDatabase {
    /// Get the database bundled with the crate
    pub fn bundled() -> &'static LanguageDatabase {
        &BUNDLED
    }

    /// Parse a tab-separated table of `alpha_3, bibliographic, alpha_2, name`
    ///
    /// Empty lines and lines starting with `#` are ignored. Empty code
    /// columns mean the language has no such code.
    pub fn parse(table: &str) -> Result<Self, ExtractorError> {
        let mut db = Self::default();
        for (idx, line) in table.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = line.split('\t').map(str::trim).collect();
            let [alpha_3, bibliographic, alpha_2, name] = columns[..] else {
                return Err(ExtractorError::LanguageData {
                    line: idx + 1,
                    message: format!("expected 4 columns, found {}", columns.len()),
                });
            };
            if alpha_3.len() != 3 || name.is_empty() {
                return Err(ExtractorError::LanguageData {
                    line: idx + 1,
                    message: "a 3-letter code and a name are required".to_string(),
                });
            }
            let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
            db.push(Language {
                alpha_3: alpha_3.to_string(),
                bibliographic: non_empty(bibliographic),
                alpha_2: non_empty(alpha_2),
                name: name.to_string(),
            });
        }
        Ok(db)
    }

    fn push(&mut self, language: Language) {
        let idx = self.languages.len();
        self.by_alpha_3.insert(language.alpha_3.to_lowercase(), idx);
        if let Some(code) = &language.bibliographic {
            self.by_bibliographic.insert(code.to_lowercase(), idx);
        }
        if let Some(code) = &language.alpha_2 {
            self.by_alpha_2.insert(code.to_lowercase(), idx);
        }
        self.by_name.insert(language.name.to_lowercase(), idx);
        self.languages.push(language);
    }

    /// Number of languages
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Whether the database is empty
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Find a language by ISO 639-3 code
    pub fn by_alpha_3(&self, code: &str) -> Option<&Language> {
        self.find(&self.by_alpha_3, code)
    }

    /// Find a language by ISO 639-2/B code
    pub fn by_bibliographic(&self, code: &str) -> Option<&Language> {
        self.find(&self.by_bibliographic, code)
    }

    /// Find a language by ISO 639-1 code
    pub fn by_alpha_2(&self, code: &str) -> Option<&Language> {
        self.find(&self.by_alpha_2, code)
    }

    /// Find a language by English name
    pub fn by_name(&self, name: &str) -> Option<&Language> {
        self.find(&self.by_name, name)
    }

    fn find(&self, index: &HashMap<String, usize>, key: &str) -> Option<&Language> {
        index
            .get(&key.to_lowercase())
            .and_then(|&idx| self.languages.get(idx))
    }

    /// Resolve a free-form language value
    ///
    /// A region suffix after `-` or `_` is ignored for code lookups. A
    /// 3-letter value is tried as an ISO 639-3 code, then as a bibliographic
    /// code; a 2-letter value as an ISO 639-1 code; anything else as an
    /// English name.
    ///
    /// # Examples
    ///
    /// ```
    /// use colophon_extractor::languages::LanguageDatabase;
    ///
    /// let db = LanguageDatabase::bundled();
    /// assert_eq!(db.lookup("fre").unwrap().alpha_3, "fra");
    /// assert_eq!(db.lookup("en-GB").unwrap().alpha_3, "eng");
    /// assert_eq!(db.lookup("german").unwrap().alpha_3, "deu");
    /// ```
    pub fn lookup(&self, value: &str) -> Option<&Language> {
        let value = value.trim();
        let code = value.split(['-', '_']).next().unwrap_or_default();
        match code.chars().count() {
            3 => self
                .by_alpha_3(code)
                .or_else(|| self.by_bibliographic(code)),
            2 => self.by_alpha_2(code),
            _ => self.by_name(value),
        }
    }
}

/// English-to-localized language names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationCatalog {
    entries: HashMap<String, String>,
}

impl TranslationCatalog {
    /// Parse a tab-separated table of `english name, translation`
    pub fn parse(table: &str) -> Result<Self, ExtractorError> {
        let mut entries = HashMap::new();
        for (idx, line) in table.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, translation)) = line.split_once('\t') else {
                return Err(ExtractorError::LanguageData {
                    line: idx + 1,
                    message: "expected a tab-separated name and translation".to_string(),
                });
            };
            entries.insert(name.trim().to_string(), translation.trim().to_string());
        }
        Ok(Self { entries })
    }

    /// Load the catalog of a locale
    ///
    /// Locales may use `-` or `_` (`fr-CA`, `fr_CA`). The full locale is
    /// tried before its base language, first in `catalog_dir` and then
    /// among the bundled catalogs. Returns `Ok(None)` when no catalog
    /// exists for the locale.
    pub fn load(locale: &str, catalog_dir: Option<&Path>) -> Result<Option<Self>, ExtractorError> {
        let locale = locale.replace('-', "_");
        let base = base_locale(&locale);
        let mut candidates = vec![locale.as_str()];
        if base != locale {
            candidates.push(base);
        }

        if let Some(dir) = catalog_dir {
            for candidate in &candidates {
                let path = dir.join(format!("{}.tsv", candidate));
                match std::fs::read_to_string(&path) {
                    Ok(table) => return Self::parse(&table).map(Some),
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }

        for candidate in &candidates {
            if let Some(table) = bundled_catalog(candidate) {
                return Self::parse(table).map(Some);
            }
        }
        Ok(None)
    }

    /// Translate an English language name, or return it unchanged
    pub fn translate<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Number of translated names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Get the language part of a locale (`fr` for `fr_CA`)
pub fn base_locale(locale: &str) -> &str {
    locale
        .split(['_', '-'])
        .next()
        .unwrap_or_default()
        .trim()
}

fn bundled_catalog(locale: &str) -> Option<&'static str> {
    match locale {
        "fr" => Some(include_str!("../data/locales/fr.tsv")),
        "de" => Some(include_str!("../data/locales/de.tsv")),
        "es" => Some(include_str!("../data/locales/es.tsv")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_database_loads() {
        let db = LanguageDatabase::bundled();
        assert!(db.len() > 7800);
        assert_eq!(db.by_alpha_2("fr").unwrap().name, "French");
        assert_eq!(db.by_bibliographic("ger").unwrap().alpha_3, "deu");
    }

    #[test]
    fn test_lookup_priority() {
        let db = LanguageDatabase::bundled();
        assert_eq!(db.lookup("ENG").unwrap().name, "English");
        assert_eq!(db.lookup("cze").unwrap().alpha_3, "ces");
        assert_eq!(db.lookup("pt_BR").unwrap().alpha_3, "por");
        assert_eq!(db.lookup("Ancient Greek (to 1453)").unwrap().alpha_3, "grc");
        assert!(db.lookup("elvish").is_none());
        assert!(db.lookup("zz").is_none());
        assert!(db.lookup("").is_none());
    }

    #[test]
    fn test_languages_without_two_letter_codes() {
        let db = LanguageDatabase::bundled();
        assert_eq!(db.lookup("chr").unwrap().name, "Cherokee");
        assert_eq!(db.lookup("Cherokee").unwrap().alpha_3, "chr");
        assert_eq!(db.lookup("klingon").unwrap().alpha_3, "tlh");
        assert_eq!(db.lookup("syc").unwrap().name, "Classical Syriac");
        assert_eq!(db.lookup("Old Irish (to 900)").unwrap().alpha_3, "sga");
        assert_eq!(db.lookup("sga").unwrap().alpha_2, None);
    }

    #[test]
    fn test_parse_rejects_short_rows() {
        let err = LanguageDatabase::parse("eng\ten\tEnglish").unwrap_err();
        assert!(matches!(err, ExtractorError::LanguageData { line: 1, .. }));
    }

    #[test]
    fn test_load_bundled_catalog_with_region() {
        let catalog = TranslationCatalog::load("fr-CA", None).unwrap().unwrap();
        assert_eq!(catalog.translate("French"), "français");
        assert_eq!(catalog.translate("Cherokee"), "tchérokî");
        assert_eq!(catalog.translate("Elvish"), "Elvish");
    }

    #[test]
    fn test_untranslated_name_stays_english() {
        let catalog = TranslationCatalog::load("es", None).unwrap().unwrap();
        assert_eq!(catalog.translate("German"), "Alemán");
        assert_eq!(catalog.translate("Ancient Greek (to 1453)"), "Ancient Greek (to 1453)");
    }

    #[test]
    fn test_load_missing_catalog() {
        assert!(TranslationCatalog::load("xx", None).unwrap().is_none());
    }

    #[test]
    fn test_catalog_dir_takes_precedence() {
        let dir = std::env::temp_dir().join(format!("colophon-catalogs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("fr.tsv"), "French\tFrançais (custom)\n").unwrap();

        let catalog = TranslationCatalog::load("fr_BE", Some(&dir)).unwrap().unwrap();
        assert_eq!(catalog.translate("French"), "Français (custom)");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_base_locale() {
        assert_eq!(base_locale("fr_CA"), "fr");
        assert_eq!(base_locale("en"), "en");
    }
}
