//! Extractors reading the item's parsed date

use super::expand_paths;
use crate::date::{parse_partial_date, pack, PartialDate};
use colophon_domain::{Encoding, Extractor, FieldSpec, Item, LibraryContext, Value};

fn parsed_date(item: &Item) -> Option<PartialDate> {
    item.meta_str("parsedDate")
        .filter(|date| !date.is_empty())
        .and_then(PartialDate::parse)
}

/// Extracts the year of publication, as text
///
/// An item whose `parsedDate` is missing or not `YYYY[-MM[-DD]]` gets no
/// year at all rather than `"0"`, so undated items stay out of year
/// queries and facets.
#[derive(Debug, Clone, Default)]
pub struct YearExtractor;

impl Extractor for YearExtractor {
    fn name(&self) -> &'static str {
        "YearExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        parsed_date(item).map(|date| Value::Text(date.year.to_string()))
    }
}

/// Extracts the year of publication as a `century / decade / year` facet
///
/// `2023-05-14` yields the paths `[2000]`, `[2000, 2020]` and
/// `[2000, 2020, 2023]`.
#[derive(Debug, Clone, Default)]
pub struct YearFacetExtractor;

impl Extractor for YearFacetExtractor {
    fn name(&self) -> &'static str {
        "YearFacetExtractor"
    }

    fn encoding(&self) -> Encoding {
        Encoding::Multiple
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let year = parsed_date(item)?.year;
        let decade = year / 10 * 10;
        let century = year / 100 * 100;
        let path = [century, decade, year].map(|n| n.to_string());
        Some(Value::List(
            expand_paths(&path).into_iter().map(Value::Path).collect(),
        ))
    }
}

/// Extracts the latest day covered by the parsed date
///
/// Used for range queries, where `2023` must include all of December.
#[derive(Debug, Clone, Default)]
pub struct MaximizeParsedDateExtractor;

impl Extractor for MaximizeParsedDateExtractor {
    fn name(&self) -> &'static str {
        "MaximizeParsedDateExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        parsed_date(item)?.maximize().map(Value::Date)
    }
}

/// Extracts a `YYYYMMDD` integer for sorting by date
///
/// Missing components take their lowest valid value, so an undated item
/// sorts first.
#[derive(Debug, Clone, Default)]
pub struct SortDateExtractor;

impl Extractor for SortDateExtractor {
    fn name(&self) -> &'static str {
        "SortDateExtractor"
    }

    fn extract(&self, item: &Item, _: &LibraryContext, _: &FieldSpec) -> Option<Value> {
        let (year, month, day) = parse_partial_date(item.meta_str("parsedDate").unwrap_or_default());
        Some(Value::Int(pack(year, month, day)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{item, run};
    use chrono::NaiveDate;
    use serde_json::json;

    fn dated(parsed_date: &str) -> Item {
        item(json!({"key": "BOOK0001", "data": {}, "meta": {"parsedDate": parsed_date}}))
    }

    fn undated() -> Item {
        item(json!({"key": "BOOK0001", "data": {}, "meta": {}}))
    }

    #[test]
    fn test_year() {
        assert_eq!(run(&YearExtractor, &dated("2023-05-14")), Some(Value::text("2023")));
        assert_eq!(run(&YearExtractor, &dated("")), None);
        assert_eq!(run(&YearExtractor, &dated("sometime")), None);
        assert_eq!(run(&YearExtractor, &dated("x2023-05")), None);
        assert_eq!(run(&YearExtractor, &undated()), None);
    }

    #[test]
    fn test_year_facet_paths() {
        assert_eq!(
            run(&YearFacetExtractor, &dated("2023-05-14")),
            Some(Value::List(vec![
                Value::path(["2000"]),
                Value::path(["2000", "2020"]),
                Value::path(["2000", "2020", "2023"]),
            ]))
        );
        assert_eq!(run(&YearFacetExtractor, &undated()), None);
    }

    #[test]
    fn test_year_facet_pre_modern() {
        let value = run(&YearFacetExtractor, &dated("0987")).unwrap();
        assert_eq!(value.elements().last(), Some(&Value::path(["900", "980", "987"])));
    }

    #[test]
    fn test_maximized_date() {
        let date = |y, m, d| Some(Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap()));
        assert_eq!(run(&MaximizeParsedDateExtractor, &dated("2023")), date(2023, 12, 31));
        assert_eq!(run(&MaximizeParsedDateExtractor, &dated("2024-02")), date(2024, 2, 29));
        assert_eq!(run(&MaximizeParsedDateExtractor, &dated("2023-04-05")), date(2023, 4, 5));
        assert_eq!(run(&MaximizeParsedDateExtractor, &dated("2023-02-30")), None);
        assert_eq!(run(&MaximizeParsedDateExtractor, &undated()), None);
    }

    #[test]
    fn test_sort_date() {
        assert_eq!(run(&SortDateExtractor, &dated("1999")), Some(Value::Int(19990101)));
        assert_eq!(run(&SortDateExtractor, &dated("12345")), Some(Value::Int(101)));
        assert_eq!(run(&SortDateExtractor, &dated("2023-00-00")), Some(Value::Int(20230101)));
        assert_eq!(run(&SortDateExtractor, &dated("2023-05-14")), Some(Value::Int(20230514)));
        assert_eq!(run(&SortDateExtractor, &undated()), Some(Value::Int(101)));
    }
}
