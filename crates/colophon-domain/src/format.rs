//! Zotero response formats

use serde::{Deserialize, Serialize};
use std::fmt;

/// A section of the Zotero item response that an extractor depends on
///
/// The fetch layer must request (`include=...`) every format required by
/// the configured fields before extraction runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    /// Raw item data (`data`, `meta`, `links`, children)
    Data,

    /// Formatted bibliography entry
    Bib,

    /// RIS export
    Ris,

    /// COinS metadata
    Coins,

    /// Any other include name
    Custom(String),
}

impl Format {
    /// Get the include name used in Zotero API requests
    pub fn as_str(&self) -> &str {
        match self {
            Format::Data => "data",
            Format::Bib => "bib",
            Format::Ris => "ris",
            Format::Coins => "coins",
            Format::Custom(name) => name,
        }
    }

    /// Parse an include name
    pub fn parse(name: &str) -> Self {
        match name {
            "data" => Format::Data,
            "bib" => Format::Bib,
            "ris" => Format::Ris,
            "coins" => Format::Coins,
            other => Format::Custom(other.to_string()),
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Data
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Format {
    fn from(value: String) -> Self {
        Format::parse(&value)
    }
}

impl From<&str> for Format {
    fn from(value: &str) -> Self {
        Format::parse(value)
    }
}

impl From<Format> for String {
    fn from(value: Format) -> Self {
        value.as_str().to_string()
    }
}
