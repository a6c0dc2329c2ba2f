//! Declarative configuration of the fields of a pipeline

use crate::composite::{BoxedExtractor, ChainExtractor, MultiExtractor, TransformerExtractor};
use crate::error::ExtractorError;
use crate::extractors::*;
use crate::text::title_case;
use crate::transformers::Transformer;
use colophon_domain::{Encoder, FieldSpec, Format};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Separator of facet paths when none is configured
pub const DEFAULT_PATH_SEPARATOR: &str = "/";

/// Encoder applied to the values of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderConfig {
    /// Store values unchanged
    #[default]
    Identity,
    /// Store values as plain text
    Text,
    /// Store values as JSON strings
    Json,
    /// Store paths joined by the field's separator
    FacetPath,
}

/// Normalization of the labels of unknown languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCase {
    /// `klingon speech` becomes `Klingon Speech`
    #[default]
    Title,
    /// Lowercase the label
    Lower,
    /// Uppercase the label
    Upper,
    /// Keep the label as written
    Verbatim,
}

impl LabelCase {
    fn normalizer(self) -> InvalidLabelFn {
        match self {
            LabelCase::Title => Arc::new(title_case),
            LabelCase::Lower => Arc::new(str::to_lowercase),
            LabelCase::Upper => Arc::new(str::to_uppercase),
            LabelCase::Verbatim => Arc::new(str::to_string),
        }
    }
}

/// One pattern or a list of patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    /// A single pattern
    One(String),
    /// Several patterns
    Many(Vec<String>),
}

impl Patterns {
    /// Get the patterns as a list
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Patterns::One(pattern) => vec![pattern.clone()],
            Patterns::Many(patterns) => patterns.clone(),
        }
    }

    /// Whether no pattern is set
    pub fn is_empty(&self) -> bool {
        match self {
            Patterns::One(pattern) => pattern.is_empty(),
            Patterns::Many(patterns) => patterns.iter().all(String::is_empty),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Patterns::Many(Vec::new())
    }
}

fn default_true() -> bool {
    true
}

fn default_separator_re() -> String {
    ";".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_group() -> usize {
    1
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Transformer of a `transform` extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformerConfig {
    /// Keep a capture group of the first match
    FindRegex {
        /// Pattern to search
        pattern: String,
        /// Capture group to keep
        #[serde(default = "default_group")]
        group: usize,
    },
    /// Keep every match
    FindAllRegex {
        /// Pattern to search
        pattern: String,
    },
    /// Split on a pattern
    SplitRegex {
        /// Separator pattern
        pattern: String,
    },
    /// Map Zotero item URIs to item keys
    ZoteroItemIdsInUris,
    /// Find Zotero item keys in plain text
    ZoteroItemIdsInText,
    /// Find Zotero item keys in HTML links
    ZoteroItemIdsInLinks,
    /// Remove markup
    StripTags,
    /// Fold for sorting
    SortText,
}

impl TransformerConfig {
    /// Build the transformer
    pub fn build(&self) -> Result<Transformer, ExtractorError> {
        match self {
            TransformerConfig::FindRegex { pattern, group } => {
                Transformer::find_regex_group(pattern, *group)
            }
            TransformerConfig::FindAllRegex { pattern } => Transformer::find_all_regex(pattern),
            TransformerConfig::SplitRegex { pattern } => Transformer::split_regex(pattern),
            TransformerConfig::ZoteroItemIdsInUris => Ok(Transformer::ZoteroItemIdsInUris),
            TransformerConfig::ZoteroItemIdsInText => Ok(Transformer::ZoteroItemIdsInText),
            TransformerConfig::ZoteroItemIdsInLinks => Ok(Transformer::ZoteroItemIdsInLinks),
            TransformerConfig::StripTags => Ok(Transformer::StripTags),
            TransformerConfig::SortText => Ok(Transformer::SortText),
        }
    }
}

/// Extractor of a field, selected by its `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractorConfig {
    /// Top-level section of the item
    Item {
        /// Section name
        key: String,
        /// Required format, derived from the key when unset
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<Format>,
    },
    /// Field of the item data
    ItemData {
        /// Field name
        key: String,
    },
    /// Whole item data
    RawData,
    /// Title-like field of the item type
    ItemTitle,
    /// Related item URIs
    ItemRelations {
        /// Relation predicate
        predicate: String,
    },
    /// Label of the item type
    ItemTypeLabel,
    /// Schema of the fields present in the item
    ItemFields,
    /// Item type facet
    ItemTypeFacet,
    /// Whether a data field holds a link
    ItemDataLinkFacet {
        /// Field name
        key: String,
    },
    /// Entry of the item's links
    ItemLink {
        /// Link name
        link_key: String,
        /// Expected link type
        link_type: String,
    },
    /// Page on zotero.org
    ZoteroWebItemUrl,
    /// Link opening the Zotero app
    ZoteroAppItemUrl,
    /// Schema of the creator types present
    CreatorTypes,
    /// Creator names for text search
    Creators,
    /// Collection names for text search
    CollectionNames,
    /// Hierarchical collection facet; the root is the field's `collection_key`
    CollectionFacetTree,
    /// Membership in a collection
    InCollection {
        /// Collection to test
        collection_key: String,
        /// Yield nothing rather than `false`
        #[serde(default = "default_true", skip_serializing_if = "is_true")]
        true_only: bool,
        /// Count membership through subcollections
        #[serde(default = "default_true", skip_serializing_if = "is_true")]
        check_subcollections: bool,
    },
    /// Tags for text search
    TagsText {
        /// Tags must match this pattern
        #[serde(default, skip_serializing_if = "String::is_empty")]
        include_re: String,
        /// Tags must not match this pattern
        #[serde(default, skip_serializing_if = "String::is_empty")]
        exclude_re: String,
    },
    /// Tags for faceting
    TagsFacet {
        /// Tags must match this pattern
        #[serde(default, skip_serializing_if = "String::is_empty")]
        include_re: String,
        /// Tags must not match this pattern
        #[serde(default, skip_serializing_if = "String::is_empty")]
        exclude_re: String,
    },
    /// Languages as `(code, name)` pairs
    Language {
        /// Pattern separating values
        #[serde(default = "default_separator_re")]
        values_separator_re: String,
        /// Resolve values through the language database
        #[serde(default = "default_true")]
        normalize: bool,
        /// Locale of the language names
        #[serde(default = "default_locale")]
        locale: String,
        /// Keep unknown languages
        #[serde(default = "default_true")]
        allow_invalid: bool,
        /// Label normalization of unknown languages
        #[serde(default)]
        normalize_invalid: LabelCase,
        /// Directory of additional translation catalogs
        #[serde(default, skip_serializing_if = "Option::is_none")]
        catalog_dir: Option<PathBuf>,
    },
    /// Stored file attachments
    ChildFileAttachments {
        /// Every pattern must match a tag of the attachment
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        include_re: Patterns,
        /// Attachments whose tags match every pattern are left out
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        exclude_re: Patterns,
        /// Accepted MIME types; empty accepts all
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        mime_types: Vec<String>,
    },
    /// Linked URI attachments
    ChildLinkedUriAttachments {
        /// Every pattern must match a tag of the attachment
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        include_re: Patterns,
        /// Attachments whose tags match every pattern are left out
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        exclude_re: Patterns,
    },
    /// Text content of file attachments
    ChildAttachmentsFulltext {
        /// Every pattern must match a tag of the attachment
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        include_re: Patterns,
        /// Attachments whose tags match every pattern are left out
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        exclude_re: Patterns,
        /// Accepted MIME types; empty accepts all
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        mime_types: Vec<String>,
    },
    /// Child notes for text search
    ChildNotesText {
        /// Every pattern must match a tag of the note
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        include_re: Patterns,
        /// Notes whose tags match every pattern are left out
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        exclude_re: Patterns,
    },
    /// Child notes as raw HTML
    RawChildNotes {
        /// Every pattern must match a tag of the note
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        include_re: Patterns,
        /// Notes whose tags match every pattern are left out
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        exclude_re: Patterns,
    },
    /// Items referenced in child notes
    RelationsInChildNotes {
        /// Every pattern must match a tag of the note
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        include_re: Patterns,
        /// Notes whose tags match every pattern are left out
        #[serde(default, skip_serializing_if = "Patterns::is_empty")]
        exclude_re: Patterns,
    },
    /// Year of publication
    Year,
    /// Year of publication as a century/decade/year facet
    YearFacet,
    /// Latest day covered by the date
    MaximizeParsedDate,
    /// Date packed for sorting
    SortDate,
    /// Data field folded for sorting
    SortItemData {
        /// Field name
        key: String,
    },
    /// Title folded for sorting
    SortTitle,
    /// Primary creators folded for sorting
    SortCreator,
    /// Another extractor followed by transformers
    Transform {
        /// Wrapped extractor
        extractor: Box<ExtractorConfig>,
        /// Transformers, applied in order
        #[serde(default)]
        transformers: Vec<TransformerConfig>,
        /// Skip the transformers when nothing was extracted
        #[serde(default = "default_true", skip_serializing_if = "is_true")]
        skip_none_value: bool,
    },
    /// First value found by a list of extractors
    Chain {
        /// Extractors tried in order
        extractors: Vec<ExtractorConfig>,
        /// Format shared by the extractors
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<Format>,
    },
    /// Values of several extractors merged into one list
    Multi {
        /// Merged extractors
        extractors: Vec<ExtractorConfig>,
        /// Format shared by the extractors
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<Format>,
    },
}

fn gate(include_re: &Patterns, exclude_re: &Patterns) -> (Vec<String>, Vec<String>) {
    (include_re.to_vec(), exclude_re.to_vec())
}

impl ExtractorConfig {
    /// Build the extractor, compiling its patterns
    pub fn build(&self) -> Result<BoxedExtractor, ExtractorError> {
        let extractor: BoxedExtractor = match self {
            ExtractorConfig::Item { key, format } => {
                let extractor = ItemExtractor::new(key.as_str());
                match format {
                    Some(format) => Box::new(extractor.with_format(format.clone())),
                    None => Box::new(extractor),
                }
            }
            ExtractorConfig::ItemData { key } => Box::new(ItemDataExtractor::new(key.as_str())),
            ExtractorConfig::RawData => Box::new(RawDataExtractor),
            ExtractorConfig::ItemTitle => Box::new(ItemTitleExtractor),
            ExtractorConfig::ItemRelations { predicate } => {
                Box::new(ItemRelationsExtractor::new(predicate.as_str()))
            }
            ExtractorConfig::ItemTypeLabel => Box::new(ItemTypeLabelExtractor),
            ExtractorConfig::ItemFields => Box::new(ItemFieldsExtractor),
            ExtractorConfig::ItemTypeFacet => Box::new(ItemTypeFacetExtractor),
            ExtractorConfig::ItemDataLinkFacet { key } => {
                Box::new(ItemDataLinkFacetExtractor::new(key.as_str()))
            }
            ExtractorConfig::ItemLink {
                link_key,
                link_type,
            } => Box::new(ItemLinkExtractor::new(link_key.as_str(), link_type.as_str())),
            ExtractorConfig::ZoteroWebItemUrl => Box::new(ZoteroWebItemUrlExtractor::new()),
            ExtractorConfig::ZoteroAppItemUrl => Box::new(ZoteroAppItemUrlExtractor),
            ExtractorConfig::CreatorTypes => Box::new(CreatorTypesExtractor),
            ExtractorConfig::Creators => Box::new(CreatorsExtractor),
            ExtractorConfig::CollectionNames => Box::new(CollectionNamesExtractor),
            ExtractorConfig::CollectionFacetTree => Box::new(CollectionFacetTreeExtractor),
            ExtractorConfig::InCollection {
                collection_key,
                true_only,
                check_subcollections,
            } => Box::new(
                InCollectionExtractor::new(collection_key.as_str())
                    .with_true_only(*true_only)
                    .with_check_subcollections(*check_subcollections),
            ),
            ExtractorConfig::TagsText {
                include_re,
                exclude_re,
            } => Box::new(TagsTextExtractor::filtered(include_re, exclude_re)?),
            ExtractorConfig::TagsFacet {
                include_re,
                exclude_re,
            } => Box::new(TagsFacetExtractor::filtered(include_re, exclude_re)?),
            ExtractorConfig::Language {
                values_separator_re,
                normalize,
                locale,
                allow_invalid,
                normalize_invalid,
                catalog_dir,
            } => Box::new(LanguageExtractor::with_options(LanguageOptions {
                values_separator_re: values_separator_re.clone(),
                normalize: *normalize,
                locale: locale.clone(),
                allow_invalid: *allow_invalid,
                normalize_invalid: normalize_invalid.normalizer(),
                catalog_dir: catalog_dir.clone(),
            })?),
            ExtractorConfig::ChildFileAttachments {
                include_re,
                exclude_re,
                mime_types,
            } => {
                let (include, exclude) = gate(include_re, exclude_re);
                Box::new(
                    ChildFileAttachmentsExtractor::gated(&include, &exclude)?
                        .with_mime_types(mime_types.clone()),
                )
            }
            ExtractorConfig::ChildLinkedUriAttachments {
                include_re,
                exclude_re,
            } => {
                let (include, exclude) = gate(include_re, exclude_re);
                Box::new(ChildLinkedUriAttachmentsExtractor::gated(&include, &exclude)?)
            }
            ExtractorConfig::ChildAttachmentsFulltext {
                include_re,
                exclude_re,
                mime_types,
            } => {
                let (include, exclude) = gate(include_re, exclude_re);
                Box::new(
                    ChildAttachmentsFulltextExtractor::gated(&include, &exclude)?
                        .with_mime_types(mime_types.clone()),
                )
            }
            ExtractorConfig::ChildNotesText {
                include_re,
                exclude_re,
            } => {
                let (include, exclude) = gate(include_re, exclude_re);
                Box::new(ChildNotesTextExtractor::gated(&include, &exclude)?)
            }
            ExtractorConfig::RawChildNotes {
                include_re,
                exclude_re,
            } => {
                let (include, exclude) = gate(include_re, exclude_re);
                Box::new(RawChildNotesExtractor::gated(&include, &exclude)?)
            }
            ExtractorConfig::RelationsInChildNotes {
                include_re,
                exclude_re,
            } => {
                let (include, exclude) = gate(include_re, exclude_re);
                Box::new(RelationsInChildNotesExtractor::gated(&include, &exclude)?)
            }
            ExtractorConfig::Year => Box::new(YearExtractor),
            ExtractorConfig::YearFacet => Box::new(YearFacetExtractor),
            ExtractorConfig::MaximizeParsedDate => Box::new(MaximizeParsedDateExtractor),
            ExtractorConfig::SortDate => Box::new(SortDateExtractor),
            ExtractorConfig::SortItemData { key } => {
                Box::new(SortItemDataExtractor::new(key.as_str()))
            }
            ExtractorConfig::SortTitle => Box::new(SortTitleExtractor),
            ExtractorConfig::SortCreator => Box::new(SortCreatorExtractor),
            ExtractorConfig::Transform {
                extractor,
                transformers,
                skip_none_value,
            } => {
                let transformers = transformers
                    .iter()
                    .map(TransformerConfig::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(
                    TransformerExtractor::boxed(extractor.build()?, transformers)
                        .with_skip_none_value(*skip_none_value),
                )
            }
            ExtractorConfig::Chain { extractors, format } => Box::new(ChainExtractor::with_format(
                format.clone().unwrap_or_default(),
                build_all(extractors)?,
            )?),
            ExtractorConfig::Multi { extractors, format } => Box::new(MultiExtractor::with_format(
                format.clone().unwrap_or_default(),
                build_all(extractors)?,
            )?),
        };
        Ok(extractor)
    }
}

fn build_all(configs: &[ExtractorConfig]) -> Result<Vec<BoxedExtractor>, ExtractorError> {
    configs.iter().map(ExtractorConfig::build).collect()
}

/// Configuration of one output field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Document key
    pub key: String,

    /// Encoder of the extracted values
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Path separator of the `facet_path` encoder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Facet root, for collection facets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_key: Option<String>,

    /// Extractor deriving the field
    pub extractor: ExtractorConfig,
}

impl FieldConfig {
    /// Create a field storing values unchanged
    pub fn new(key: impl Into<String>, extractor: ExtractorConfig) -> Self {
        Self {
            key: key.into(),
            encoder: EncoderConfig::Identity,
            separator: None,
            collection_key: None,
            extractor,
        }
    }

    /// Set the encoder
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the facet root collection
    pub fn with_collection_key(mut self, collection_key: impl Into<String>) -> Self {
        self.collection_key = Some(collection_key.into());
        self
    }

    /// Build the field spec
    pub fn spec(&self) -> FieldSpec {
        let encoder = match self.encoder {
            EncoderConfig::Identity => Encoder::Identity,
            EncoderConfig::Text => Encoder::Text,
            EncoderConfig::Json => Encoder::Json,
            EncoderConfig::FacetPath => Encoder::FacetPath {
                separator: self
                    .separator
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PATH_SEPARATOR.to_string()),
            },
        };
        let spec = FieldSpec::new(self.key.as_str()).with_encoder(encoder);
        match &self.collection_key {
            Some(collection_key) => spec.with_collection_key(collection_key.as_str()),
            None => spec,
        }
    }
}

/// Configuration of a pipeline: its fields, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Output fields
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        let mut keys = HashSet::new();
        for field in &self.fields {
            if field.key.trim().is_empty() {
                return Err(ExtractorError::Config("field key must not be empty".to_string()));
            }
            if !keys.insert(field.key.as_str()) {
                return Err(ExtractorError::Config(format!(
                    "duplicate field key '{}'",
                    field.key
                )));
            }
            if field.separator.is_some() && field.encoder != EncoderConfig::FacetPath {
                return Err(ExtractorError::Config(format!(
                    "field '{}' sets a separator without the facet_path encoder",
                    field.key
                )));
            }
        }
        Ok(())
    }

    /// A field set covering search, facets, sorting and display
    pub fn standard() -> Self {
        let notes_gate = || Patterns::One("^_private".to_string());
        Self {
            fields: vec![
                FieldConfig::new(
                    "id",
                    ExtractorConfig::Item {
                        key: "key".to_string(),
                        format: None,
                    },
                ),
                FieldConfig::new(
                    "version",
                    ExtractorConfig::Item {
                        key: "version".to_string(),
                        format: None,
                    },
                ),
                FieldConfig::new("data", ExtractorConfig::RawData).with_encoder(EncoderConfig::Json),
                FieldConfig::new("item_type", ExtractorConfig::ItemTypeLabel),
                FieldConfig::new("item_fields", ExtractorConfig::ItemFields)
                    .with_encoder(EncoderConfig::Json),
                FieldConfig::new("creator_types", ExtractorConfig::CreatorTypes)
                    .with_encoder(EncoderConfig::Json),
                FieldConfig::new("text_title", ExtractorConfig::ItemTitle),
                FieldConfig::new("text_creator", ExtractorConfig::Creators),
                FieldConfig::new("text_collections", ExtractorConfig::CollectionNames),
                FieldConfig::new(
                    "text_tags",
                    ExtractorConfig::TagsText {
                        include_re: String::new(),
                        exclude_re: "_".to_string(),
                    },
                ),
                FieldConfig::new(
                    "text_notes",
                    ExtractorConfig::ChildNotesText {
                        include_re: Patterns::default(),
                        exclude_re: notes_gate(),
                    },
                ),
                FieldConfig::new(
                    "text_fulltext",
                    ExtractorConfig::ChildAttachmentsFulltext {
                        include_re: Patterns::default(),
                        exclude_re: notes_gate(),
                        mime_types: Vec::new(),
                    },
                ),
                FieldConfig::new("year", ExtractorConfig::Year),
                FieldConfig::new("date", ExtractorConfig::MaximizeParsedDate),
                FieldConfig::new("facet_item_type", ExtractorConfig::ItemTypeFacet)
                    .with_encoder(EncoderConfig::Json),
                FieldConfig::new("facet_year", ExtractorConfig::YearFacet)
                    .with_encoder(EncoderConfig::FacetPath),
                FieldConfig::new(
                    "facet_tag",
                    ExtractorConfig::TagsFacet {
                        include_re: String::new(),
                        exclude_re: "_".to_string(),
                    },
                ),
                FieldConfig::new(
                    "facet_language",
                    ExtractorConfig::Language {
                        values_separator_re: default_separator_re(),
                        normalize: true,
                        locale: default_locale(),
                        allow_invalid: true,
                        normalize_invalid: LabelCase::Title,
                        catalog_dir: None,
                    },
                )
                .with_encoder(EncoderConfig::Json),
                FieldConfig::new(
                    "facet_link",
                    ExtractorConfig::ItemDataLinkFacet {
                        key: "url".to_string(),
                    },
                ),
                FieldConfig::new("sort_title", ExtractorConfig::SortTitle),
                FieldConfig::new("sort_creator", ExtractorConfig::SortCreator),
                FieldConfig::new("sort_date", ExtractorConfig::SortDate),
                FieldConfig::new(
                    "attachments",
                    ExtractorConfig::ChildFileAttachments {
                        include_re: Patterns::default(),
                        exclude_re: notes_gate(),
                        mime_types: Vec::new(),
                    },
                ),
                FieldConfig::new(
                    "links",
                    ExtractorConfig::ChildLinkedUriAttachments {
                        include_re: Patterns::default(),
                        exclude_re: notes_gate(),
                    },
                ),
                FieldConfig::new(
                    "rel_related",
                    ExtractorConfig::Multi {
                        extractors: vec![
                            ExtractorConfig::Transform {
                                extractor: Box::new(ExtractorConfig::ItemRelations {
                                    predicate: "dc:relation".to_string(),
                                }),
                                transformers: vec![TransformerConfig::ZoteroItemIdsInUris],
                                skip_none_value: true,
                            },
                            ExtractorConfig::RelationsInChildNotes {
                                include_re: Patterns::default(),
                                exclude_re: notes_gate(),
                            },
                        ],
                        format: None,
                    },
                ),
                FieldConfig::new("zotero_app_url", ExtractorConfig::ZoteroAppItemUrl),
                FieldConfig::new("zotero_web_url", ExtractorConfig::ZoteroWebItemUrl),
                FieldConfig::new(
                    "bib",
                    ExtractorConfig::Item {
                        key: "bib".to_string(),
                        format: None,
                    },
                ),
            ],
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colophon_domain::{Encoding, Extractor, Value};

    #[test]
    fn test_standard_config_is_valid() {
        let config = PipelineConfig::standard();
        assert!(config.validate().is_ok());
        for field in &config.fields {
            assert!(field.extractor.build().is_ok(), "field {} does not build", field.key);
        }
    }

    #[test]
    fn test_duplicate_key() {
        let mut config = PipelineConfig::standard();
        config.fields.push(FieldConfig::new("id", ExtractorConfig::Year));
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_empty_key() {
        let config = PipelineConfig {
            fields: vec![FieldConfig::new(" ", ExtractorConfig::Year)],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_separator_requires_facet_path() {
        let mut field = FieldConfig::new("facet_year", ExtractorConfig::YearFacet);
        field.separator = Some(".".to_string());
        let config = PipelineConfig { fields: vec![field] };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config = PipelineConfig::from_toml(
            r#"
            [[fields]]
            key = "facet_tag"
            encoder = "identity"
            [fields.extractor]
            type = "tags_facet"
            include_re = "^public"

            [[fields]]
            key = "text_notes"
            [fields.extractor]
            type = "child_notes_text"
            include_re = ["^_publish", "^_lang"]
            exclude_re = "^_private"

            [[fields]]
            key = "facet_topic"
            encoder = "facet_path"
            separator = "."
            collection_key = "ROOT0000"
            [fields.extractor]
            type = "collection_facet_tree"
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.fields.len(), 3);
        assert_eq!(
            config.fields[0].extractor,
            ExtractorConfig::TagsFacet {
                include_re: "^public".to_string(),
                exclude_re: String::new(),
            }
        );
        assert_eq!(
            config.fields[1].extractor,
            ExtractorConfig::ChildNotesText {
                include_re: Patterns::Many(vec!["^_publish".to_string(), "^_lang".to_string()]),
                exclude_re: Patterns::One("^_private".to_string()),
            }
        );

        let spec = config.fields[2].spec();
        assert_eq!(spec.collection_key.as_deref(), Some("ROOT0000"));
        assert_eq!(
            spec.encode(&Value::path(["A", "B"])),
            Value::text("A.B")
        );
    }

    #[test]
    fn test_language_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            [[fields]]
            key = "facet_language"
            [fields.extractor]
            type = "language"
            locale = "fr"
            "#,
        )
        .unwrap();
        match &config.fields[0].extractor {
            ExtractorConfig::Language {
                values_separator_re,
                normalize,
                allow_invalid,
                normalize_invalid,
                ..
            } => {
                assert_eq!(values_separator_re, ";");
                assert!(*normalize);
                assert!(*allow_invalid);
                assert_eq!(*normalize_invalid, LabelCase::Title);
            }
            other => panic!("unexpected extractor {:?}", other),
        }
    }

    #[test]
    fn test_nested_composites() {
        let config = PipelineConfig::from_toml(
            r#"
            [[fields]]
            key = "isbn"
            [fields.extractor]
            type = "chain"

            [[fields.extractor.extractors]]
            type = "transform"
            extractor = { type = "item_data", key = "extra" }
            transformers = [{ type = "find_regex", pattern = 'ISBN:\s*([0-9X-]+)' }]

            [[fields.extractor.extractors]]
            type = "item_data"
            key = "ISBN"
            "#,
        )
        .unwrap();
        let extractor = config.fields[0].extractor.build().unwrap();
        assert_eq!(extractor.name(), "ChainExtractor");
        assert_eq!(extractor.encoding(), Encoding::Single);
    }

    #[test]
    fn test_invalid_regex_fails_build() {
        let config = ExtractorConfig::TagsText {
            include_re: "(".to_string(),
            exclude_re: String::new(),
        };
        assert!(matches!(config.build(), Err(ExtractorError::InvalidRegex { .. })));

        let transform = ExtractorConfig::Transform {
            extractor: Box::new(ExtractorConfig::ItemTitle),
            transformers: vec![TransformerConfig::SplitRegex {
                pattern: "[".to_string(),
            }],
            skip_none_value: true,
        };
        assert!(transform.build().is_err());
    }

    #[test]
    fn test_format_mismatch_fails_build() {
        let config = ExtractorConfig::Chain {
            extractors: vec![
                ExtractorConfig::Item {
                    key: "bib".to_string(),
                    format: None,
                },
                ExtractorConfig::ItemTitle,
            ],
            format: Some(Format::Bib),
        };
        assert!(matches!(
            config.build(),
            Err(ExtractorError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let result = PipelineConfig::from_toml(
            r#"
            [[fields]]
            key = "x"
            [fields.extractor]
            type = "telepathy"
            "#,
        );
        assert!(matches!(result, Err(ExtractorError::TomlParse(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::standard();
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
