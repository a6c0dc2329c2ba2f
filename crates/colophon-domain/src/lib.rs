//! Colophon Domain Layer
//!
//! This crate defines the data model shared by every Colophon component:
//! the Zotero items being indexed, the library metadata they are read
//! against, the field specifications describing the output, and the
//! documents handed to the search index.
//!
//! ## Key Concepts
//!
//! - **Item**: A bibliographic record (book, article, ...) or one of its
//!   child notes/attachments, as returned by the Zotero web API
//! - **Library context**: Read-only item-type schemas, creator-type schemas,
//!   collection hierarchy and library identity, shared across a run
//! - **Field spec**: Output key plus the encoder applied to extracted values
//! - **Document**: The flat mapping of field keys to encoded values
//! - **Extractor**: The capability of deriving one field from an item
//!
//! ## Architecture
//!
//! - Pure data types, no I/O
//! - Inputs are never mutated by extraction
//! - The [`traits::Extractor`] contract is implemented in `colophon-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod document;
pub mod field;
pub mod format;
pub mod item;
pub mod library;
pub mod traits;
pub mod value;

// Re-exports for convenience
pub use collection::{Collection, Collections};
pub use document::Document;
pub use field::{EncodeFn, Encoder, Encoding, FieldSpec};
pub use format::Format;
pub use item::{Creator, Item};
pub use library::{CreatorTypeMeta, FieldMeta, LibraryContext, LibraryType};
pub use traits::Extractor;
pub use value::{Value, RECORD_SEPARATOR};
