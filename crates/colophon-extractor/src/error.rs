//! Error types for building extractors

use colophon_domain::Format;
use thiserror::Error;

/// Errors raised while configuring extractors and pipelines
///
/// Extraction itself never fails: a field that cannot be derived is simply
/// left out of the document.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A configured regular expression does not compile
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        /// The offending pattern
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },

    /// A composite holds a child reading another response format
    #[error("Format mismatch: parent uses '{parent}' but child requires '{child}'")]
    FormatMismatch {
        /// Format of the composite
        parent: Format,
        /// Format of the offending child
        child: Format,
    },

    /// Language data does not have the expected shape
    #[error("Invalid language data at line {line}: {message}")]
    LanguageData {
        /// 1-based line number
        line: usize,
        /// What is wrong with the line
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(String),

    /// I/O error while reading a resource
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    pub(crate) fn invalid_regex(pattern: &str, source: regex::Error) -> Self {
        ExtractorError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        }
    }
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::TomlParse(e.to_string())
    }
}
