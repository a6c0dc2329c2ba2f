//! Trait definitions for extraction
//!
//! The extraction contract lives here so that every layer can hold
//! extractors without depending on their implementations.
//! Implementations live in `colophon-extractor`.

use crate::{Document, Encoding, FieldSpec, Format, Item, LibraryContext, Value};

/// Derives the value of one field from an item
///
/// Extractors hold their configuration; they keep no state across items
/// beyond idempotent lazy caches, and never mutate the item or the context.
///
/// Implemented by the application layer (colophon-extractor)
pub trait Extractor: Send + Sync {
    /// Name used to tag warnings
    fn name(&self) -> &'static str;

    /// Response section this extractor reads from
    fn format(&self) -> Format {
        Format::Data
    }

    /// How extracted values are passed to the field encoder
    fn encoding(&self) -> Encoding {
        Encoding::Single
    }

    /// Retrieve the value from the item and library context
    ///
    /// Returns `None` when no value could be extracted.
    fn extract(&self, item: &Item, library: &LibraryContext, spec: &FieldSpec) -> Option<Value>;

    /// Extract a value and store its encoded version in the document
    ///
    /// The document is left untouched when nothing was extracted.
    fn extract_and_store(
        &self,
        document: &mut Document,
        item: &Item,
        library: &LibraryContext,
        spec: &FieldSpec,
    ) {
        if let Some(value) = self.extract(item, library, spec) {
            document.insert(spec.key.clone(), spec.encode_with(self.encoding(), &value));
        }
    }
}

impl<E: Extractor + ?Sized> Extractor for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn format(&self) -> Format {
        (**self).format()
    }

    fn encoding(&self) -> Encoding {
        (**self).encoding()
    }

    fn extract(&self, item: &Item, library: &LibraryContext, spec: &FieldSpec) -> Option<Value> {
        (**self).extract(item, library, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<Value>);

    impl Extractor for Fixed {
        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn extract(&self, _: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
            self.0.clone()
        }
    }

    #[test]
    fn test_store_only_when_extracted() {
        let item = Item::default();
        let library = LibraryContext::default();
        let spec = FieldSpec::new("k");
        let mut doc = Document::new();

        Fixed(None).extract_and_store(&mut doc, &item, &library, &spec);
        assert!(doc.is_empty());

        Fixed(Some(Value::text("v"))).extract_and_store(&mut doc, &item, &library, &spec);
        assert_eq!(doc.get("k"), Some(&Value::text("v")));
    }

    #[test]
    fn test_boxed_extractor_delegates() {
        let boxed: Box<dyn Extractor> = Box::new(Fixed(Some(Value::Int(1))));
        assert_eq!(boxed.name(), "Fixed");
        assert_eq!(boxed.format(), Format::Data);
        assert_eq!(
            boxed.extract(&Item::default(), &LibraryContext::default(), &FieldSpec::new("k")),
            Some(Value::Int(1))
        );
    }
}
