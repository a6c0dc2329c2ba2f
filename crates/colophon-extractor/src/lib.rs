//! Colophon Extractor
//!
//! Derives search-engine-ready documents from Zotero items.
//!
//! # Overview
//!
//! Every output field is produced by an [`Extractor`] reading the item and
//! the shared [`LibraryContext`]. Leaf extractors implement one field each
//! (titles, creators, tags, collections, languages, dates, attachments,
//! notes, links, sort keys). Composites combine them: transform-wrap runs
//! transformers over a result, chains fall back from one extractor to the
//! next, and multi-merges flatten several results into one list.
//!
//! # Architecture
//!
//! ```text
//! PipelineConfig (TOML) → Pipeline → [FieldSpec + Extractor]* → Document
//! ```
//!
//! Extraction never fails: a field without value is left out of the
//! document, and data-quality problems are reported as `tracing` warnings
//! tagged with the extractor name and the item key. Configuration problems
//! (invalid patterns, format mismatches) are reported as [`ExtractorError`]
//! when the pipeline is built.
//!
//! # Example Usage
//!
//! ```
//! use colophon_domain::{FieldSpec, Item, LibraryContext, LibraryType, Value};
//! use colophon_extractor::{Pipeline, SortDateExtractor, TagsTextExtractor};
//!
//! let pipeline = Pipeline::new()
//!     .with_field(FieldSpec::new("sort_date"), SortDateExtractor)
//!     .with_field(FieldSpec::new("text_tags"), TagsTextExtractor::new());
//!
//! let item = Item::from_json(serde_json::json!({
//!     "key": "ABCD2345",
//!     "data": {"itemType": "book", "tags": [{"tag": "history"}]},
//!     "meta": {"parsedDate": "1999"}
//! }))
//! .unwrap();
//! let library = LibraryContext::new("1", LibraryType::User);
//!
//! let document = pipeline.build_document(&item, &library);
//! assert_eq!(document.get("sort_date"), Some(&Value::Int(19990101)));
//! assert_eq!(document.get("text_tags"), Some(&Value::text("history")));
//! ```

#![warn(missing_docs)]

mod error;

pub mod composite;
pub mod config;
pub mod date;
pub mod extractors;
pub mod languages;
pub mod pipeline;
pub mod predicates;
pub mod text;
pub mod transformers;

#[cfg(test)]
mod test_support;


pub use colophon_domain::{Extractor, LibraryContext};
pub use composite::{BoxedExtractor, ChainExtractor, MultiExtractor, TransformerExtractor};
pub use config::{
    EncoderConfig, ExtractorConfig, FieldConfig, LabelCase, Patterns, PipelineConfig,
    TransformerConfig,
};
pub use error::ExtractorError;
pub use extractors::*;
pub use pipeline::Pipeline;
pub use transformers::Transformer;
