//! Combinators over other extractors

use crate::error::ExtractorError;
use crate::transformers::Transformer;
use colophon_domain::{Encoding, Extractor, FieldSpec, Format, Item, LibraryContext, Value};
use serde_json::Value as JsonValue;

/// Boxed extractor owned by a composite
pub type BoxedExtractor = Box<dyn Extractor>;

fn check_formats(parent: &Format, children: &[BoxedExtractor]) -> Result<(), ExtractorError> {
    match children.iter().find(|child| child.format() != *parent) {
        Some(child) => Err(ExtractorError::FormatMismatch {
            parent: parent.clone(),
            child: child.format(),
        }),
        None => Ok(()),
    }
}

/// Wraps an extractor and transforms its result
///
/// Transformers are chained in order. By default a `None` result is
/// returned as is, without running the transformers.
pub struct TransformerExtractor {
    extractor: BoxedExtractor,
    transformers: Vec<Transformer>,
    skip_none_value: bool,
}

impl TransformerExtractor {
    /// Wrap an extractor
    pub fn new(extractor: impl Extractor + 'static, transformers: Vec<Transformer>) -> Self {
        Self::boxed(Box::new(extractor), transformers)
    }

    /// Wrap an already boxed extractor
    pub fn boxed(extractor: BoxedExtractor, transformers: Vec<Transformer>) -> Self {
        Self {
            extractor,
            transformers,
            skip_none_value: true,
        }
    }

    /// Whether transformers are skipped on a `None` result
    pub fn with_skip_none_value(mut self, skip_none_value: bool) -> Self {
        self.skip_none_value = skip_none_value;
        self
    }

    fn apply_transformers(&self, value: Option<Value>) -> Option<Value> {
        if value.is_none() && self.skip_none_value {
            return None;
        }
        self.transformers
            .iter()
            .fold(value, |value, transformer| transformer.apply(value))
    }
}

impl Extractor for TransformerExtractor {
    fn name(&self) -> &'static str {
        "TransformerExtractor"
    }

    fn format(&self) -> Format {
        self.extractor.format()
    }

    fn extract(&self, item: &Item, library: &LibraryContext, spec: &FieldSpec) -> Option<Value> {
        self.apply_transformers(self.extractor.extract(item, library, spec))
    }
}

/// Tries extractors in order and returns the first value found
pub struct ChainExtractor {
    format: Format,
    extractors: Vec<BoxedExtractor>,
}

impl ChainExtractor {
    /// Create a chain over `data` extractors
    pub fn new(extractors: Vec<BoxedExtractor>) -> Result<Self, ExtractorError> {
        Self::with_format(Format::Data, extractors)
    }

    /// Create a chain whose extractors all read `format`
    ///
    /// Fails with [`ExtractorError::FormatMismatch`] when a child reads
    /// another format.
    pub fn with_format(format: Format, extractors: Vec<BoxedExtractor>) -> Result<Self, ExtractorError> {
        check_formats(&format, &extractors)?;
        Ok(Self { format, extractors })
    }
}

impl Extractor for ChainExtractor {
    fn name(&self) -> &'static str {
        "ChainExtractor"
    }

    fn format(&self) -> Format {
        self.format.clone()
    }

    fn extract(&self, item: &Item, library: &LibraryContext, spec: &FieldSpec) -> Option<Value> {
        self.extractors
            .iter()
            .find_map(|extractor| extractor.extract(item, library, spec))
    }
}

/// Merges the values of several extractors into one list
///
/// List results are flattened into the accumulated values; other truthy
/// results are appended. Values are encoded one by one unless the encoding
/// is overridden.
pub struct MultiExtractor {
    format: Format,
    encoding: Encoding,
    extractors: Vec<BoxedExtractor>,
}

impl MultiExtractor {
    /// Create a merge over `data` extractors
    pub fn new(extractors: Vec<BoxedExtractor>) -> Result<Self, ExtractorError> {
        Self::with_format(Format::Data, extractors)
    }

    /// Create a merge whose extractors all read `format`
    pub fn with_format(format: Format, extractors: Vec<BoxedExtractor>) -> Result<Self, ExtractorError> {
        check_formats(&format, &extractors)?;
        Ok(Self {
            format,
            encoding: Encoding::Multiple,
            extractors,
        })
    }

    /// Override how the merged list is encoded
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

impl Extractor for MultiExtractor {
    fn name(&self) -> &'static str {
        "MultiExtractor"
    }

    fn format(&self) -> Format {
        self.format.clone()
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn extract(&self, item: &Item, library: &LibraryContext, spec: &FieldSpec) -> Option<Value> {
        let mut values = Vec::new();
        for extractor in &self.extractors {
            match extractor.extract(item, library, spec) {
                Some(Value::List(items)) => values.extend(items),
                Some(json @ Value::Json(JsonValue::Array(_))) => values.extend(json.elements()),
                Some(value) if value.is_truthy() => values.push(value),
                _ => {}
            }
        }
        (!values.is_empty()).then_some(Value::List(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        format: Format,
        value: Option<Value>,
    }

    impl Fixed {
        fn boxed(value: Option<Value>) -> BoxedExtractor {
            Box::new(Self { format: Format::Data, value })
        }
    }

    impl Extractor for Fixed {
        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn format(&self) -> Format {
            self.format.clone()
        }

        fn extract(&self, _: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
            self.value.clone()
        }
    }

    fn run(extractor: &dyn Extractor) -> Option<Value> {
        extractor.extract(&Item::default(), &LibraryContext::default(), &FieldSpec::new("k"))
    }

    #[test]
    fn test_chain_returns_first_value() {
        let chain = ChainExtractor::new(vec![
            Fixed::boxed(None),
            Fixed::boxed(Some(Value::text("second"))),
            Fixed::boxed(Some(Value::text("third"))),
        ])
        .unwrap();
        assert_eq!(run(&chain), Some(Value::text("second")));
    }

    #[test]
    fn test_chain_keeps_empty_string() {
        let chain = ChainExtractor::new(vec![
            Fixed::boxed(Some(Value::text(""))),
            Fixed::boxed(Some(Value::text("fallback"))),
        ])
        .unwrap();
        assert_eq!(run(&chain), Some(Value::text("")));
    }

    #[test]
    fn test_format_mismatch_is_rejected() {
        let bib = Box::new(Fixed { format: Format::Bib, value: None });
        let err = ChainExtractor::new(vec![bib]).err().unwrap();
        assert!(matches!(
            err,
            ExtractorError::FormatMismatch { parent: Format::Data, child: Format::Bib }
        ));

        let bib = Box::new(Fixed { format: Format::Bib, value: None });
        assert!(MultiExtractor::with_format(Format::Bib, vec![bib]).is_ok());
    }

    #[test]
    fn test_multi_flattens_and_skips_falsy() {
        let multi = MultiExtractor::new(vec![
            Fixed::boxed(Some(Value::List(vec![Value::text("a"), Value::text("b")]))),
            Fixed::boxed(Some(Value::text(""))),
            Fixed::boxed(None),
            Fixed::boxed(Some(Value::text("c"))),
        ])
        .unwrap();
        assert_eq!(multi.encoding(), Encoding::Multiple);
        assert_eq!(
            run(&multi),
            Some(Value::List(vec![Value::text("a"), Value::text("b"), Value::text("c")]))
        );
    }

    #[test]
    fn test_multi_empty_is_none() {
        let multi = MultiExtractor::new(vec![Fixed::boxed(Some(Value::Bool(false)))]).unwrap();
        assert_eq!(run(&multi), None);
    }

    #[test]
    fn test_transformer_skips_none_by_default() {
        let default = Transformer::custom(|_| Some(Value::text("x")));
        let wrapped = TransformerExtractor::boxed(Fixed::boxed(None), vec![default.clone()]);
        assert_eq!(run(&wrapped), None);

        let forced = TransformerExtractor::boxed(Fixed::boxed(None), vec![default])
            .with_skip_none_value(false);
        assert_eq!(run(&forced), Some(Value::text("x")));
    }

    #[test]
    fn test_transformers_are_chained() {
        let wrapped = TransformerExtractor::boxed(
            Fixed::boxed(Some(Value::text("<b>A; B</b>"))),
            vec![Transformer::StripTags, Transformer::split_regex(";").unwrap()],
        );
        assert_eq!(
            run(&wrapped),
            Some(Value::List(vec![Value::text("A"), Value::text("B")]))
        );
    }
}
