//! Builds documents by running every configured field over an item

use crate::composite::BoxedExtractor;
use crate::config::PipelineConfig;
use crate::error::ExtractorError;
use colophon_domain::{Document, Extractor, FieldSpec, Format, Item, LibraryContext};
use std::collections::BTreeSet;
use tracing::debug;

/// One configured output field
struct Field {
    spec: FieldSpec,
    extractor: BoxedExtractor,
}

/// The ordered set of fields making up a document
///
/// Fields are independent: one that yields nothing is left out of the
/// document without affecting the others.
#[derive(Default)]
pub struct Pipeline {
    fields: Vec<Field>,
}

impl Pipeline {
    /// Create a pipeline with no fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn add_field(&mut self, spec: FieldSpec, extractor: impl Extractor + 'static) {
        self.add_boxed(spec, Box::new(extractor));
    }

    /// Add a field, builder style
    pub fn with_field(mut self, spec: FieldSpec, extractor: impl Extractor + 'static) -> Self {
        self.add_field(spec, extractor);
        self
    }

    fn add_boxed(&mut self, spec: FieldSpec, extractor: BoxedExtractor) {
        let format = extractor.format();
        debug!(
            field = spec.key.as_str(),
            extractor = extractor.name(),
            format = format.as_str(),
            "Adding field"
        );
        self.fields.push(Field { spec, extractor });
    }

    /// Build a pipeline from a validated configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        let mut pipeline = Self::new();
        for field in &config.fields {
            pipeline.add_boxed(field.spec(), field.extractor.build()?);
        }
        debug!(fields = pipeline.len(), "Pipeline built");
        Ok(pipeline)
    }

    /// Build a pipeline from a TOML configuration
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        Self::from_config(&PipelineConfig::from_toml(toml_str)?)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the pipeline has no field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys of the fields, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.spec.key.as_str())
    }

    /// Response formats that must be fetched for every field to work
    pub fn required_formats(&self) -> BTreeSet<Format> {
        self.fields
            .iter()
            .map(|field| field.extractor.format())
            .collect()
    }

    /// Build the document of an item
    pub fn build_document(&self, item: &Item, library: &LibraryContext) -> Document {
        let mut document = Document::new();
        for field in &self.fields {
            field
                .extractor
                .extract_and_store(&mut document, item, library, &field.spec);
        }
        document
    }

    /// Build the documents of several items
    pub fn build_documents<'a, I>(
        &'a self,
        items: I,
        library: &'a LibraryContext,
    ) -> impl Iterator<Item = Document> + 'a
    where
        I: IntoIterator<Item = &'a Item>,
        I::IntoIter: 'a,
    {
        items
            .into_iter()
            .map(move |item| self.build_document(item, library))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{ItemExtractor, ItemTitleExtractor, TagsFacetExtractor, YearExtractor};
    use crate::test_support::{item, library};
    use colophon_domain::{Encoder, Value};
    use serde_json::json;

    fn book() -> Item {
        item(json!({
            "key": "BOOK0001",
            "bib": "<div>Doe, J. (2023). A Book.</div>",
            "data": {"itemType": "book", "title": "A Book", "tags": [{"tag": "b"}, {"tag": "a"}]},
            "meta": {}
        }))
    }

    #[test]
    fn test_build_document() {
        let pipeline = Pipeline::new()
            .with_field(FieldSpec::new("title"), ItemTitleExtractor)
            .with_field(FieldSpec::new("year"), YearExtractor)
            .with_field(
                FieldSpec::new("facet_tag").with_encoder(Encoder::Text),
                TagsFacetExtractor::new(),
            );
        let document = pipeline.build_document(&book(), &library());

        assert_eq!(document.get("title"), Some(&Value::text("A Book")));
        assert!(!document.contains_key("year"));
        assert_eq!(
            document.get("facet_tag"),
            Some(&Value::List(vec![Value::text("a"), Value::text("b")]))
        );
    }

    #[test]
    fn test_required_formats() {
        let mut pipeline = Pipeline::new();
        pipeline.add_field(FieldSpec::new("id"), ItemExtractor::new("key"));
        pipeline.add_field(FieldSpec::new("bib"), ItemExtractor::new("bib"));
        pipeline.add_field(FieldSpec::new("title"), ItemTitleExtractor);

        let formats: Vec<_> = pipeline.required_formats().into_iter().collect();
        assert_eq!(formats, vec![Format::Data, Format::Bib]);
        assert_eq!(pipeline.keys().collect::<Vec<_>>(), vec!["id", "bib", "title"]);
    }

    #[test]
    fn test_build_documents() {
        let pipeline = Pipeline::new().with_field(FieldSpec::new("id"), ItemExtractor::new("key"));
        let items = vec![book(), item(json!({"key": "BOOK0002", "data": {}}))];
        let ids: Vec<_> = pipeline
            .build_documents(&items, &library())
            .map(|document| document.get("id").cloned())
            .collect();
        assert_eq!(ids, vec![Some(Value::text("BOOK0001")), Some(Value::text("BOOK0002"))]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Pipeline::from_toml(
            r#"
            [[fields]]
            key = "text_tags"
            [fields.extractor]
            type = "tags_text"
            include_re = "("
            "#,
        );
        assert!(matches!(result, Err(ExtractorError::InvalidRegex { .. })));
    }
}
