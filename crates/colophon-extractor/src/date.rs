//! Partial dates
//!
//! Zotero normalizes free-form dates into `meta.parsedDate`, which holds
//! `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. Month and day may be missing, or be
//! reported as `00`.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Lowest valid year used when none can be parsed
pub const DEFAULT_YEAR: i32 = 0;

/// Lowest valid month
pub const DEFAULT_MONTH: u32 = 1;

/// Lowest valid day
pub const DEFAULT_DAY: u32 = 1;

/// A date with possibly missing month and day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    /// Year
    pub year: i32,

    /// Month (1-12), if known
    pub month: Option<u32>,

    /// Day of month (1-31), if known
    pub day: Option<u32>,
}

impl PartialDate {
    /// Parse a `YYYY[-MM[-DD]]` date, as found in Zotero's `parsedDate`
    ///
    /// Surrounding whitespace is ignored. Returns `None` when the text has
    /// any other shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use colophon_extractor::date::PartialDate;
    ///
    /// let date = PartialDate::parse("2023-05").unwrap();
    /// assert_eq!((date.year, date.month, date.day), (2023, Some(5), None));
    /// assert_eq!(PartialDate::parse("circa 1999"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        static DATE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$").unwrap());

        let caps = DATE.captures(text.trim())?;
        let year = caps.get(1)?.as_str().parse().ok()?;
        let component = |i: usize, max: u32| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .filter(|n| (1..=max).contains(n))
        };
        let month = component(2, 12);
        // A day without a month carries no meaning
        let day = month.and(component(3, 31));
        Some(Self { year, month, day })
    }

    /// Fill missing components with their lowest valid values
    pub fn resolve(&self) -> (i32, u32, u32) {
        (
            self.year,
            self.month.unwrap_or(DEFAULT_MONTH),
            self.day.unwrap_or(DEFAULT_DAY),
        )
    }

    /// Fill missing components with their highest valid values
    ///
    /// A year-only date becomes December 31st, a year-month date becomes the
    /// last day of that month. Returns `None` for impossible dates such as
    /// February 30th.
    pub fn maximize(&self) -> Option<NaiveDate> {
        let month = self.month.unwrap_or(12);
        let day = match self.day {
            Some(day) => day,
            None => last_day_of_month(self.year, month)?,
        };
        NaiveDate::from_ymd_opt(self.year, month, day)
    }

    /// Pack the resolved date into a `YYYYMMDD` integer
    pub fn sort_key(&self) -> i64 {
        let (year, month, day) = self.resolve();
        pack(year, month, day)
    }
}

/// Parse a date, falling back to the lowest valid date components
pub fn parse_partial_date(text: &str) -> (i32, u32, u32) {
    PartialDate::parse(text)
        .map(|date| date.resolve())
        .unwrap_or((DEFAULT_YEAR, DEFAULT_MONTH, DEFAULT_DAY))
}

/// Pack date components into a `YYYYMMDD` integer
pub fn pack(year: i32, month: u32, day: u32) -> i64 {
    i64::from(year) * 10_000 + i64::from(month) * 100 + i64::from(day)
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt().map(|d| d.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_and_partial() {
        assert_eq!(
            PartialDate::parse("2023-05-14"),
            Some(PartialDate { year: 2023, month: Some(5), day: Some(14) })
        );
        assert_eq!(
            PartialDate::parse("1850"),
            Some(PartialDate { year: 1850, month: None, day: None })
        );
        assert_eq!(PartialDate::parse("no date"), None);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert_eq!(PartialDate::parse("12345"), None);
        assert_eq!(PartialDate::parse("x2023-05"), None);
        assert_eq!(PartialDate::parse("2023-05-14T10:00"), None);
        assert_eq!(PartialDate::parse("circa 1999"), None);
        assert_eq!(PartialDate::parse(" 2023-05 ").unwrap().month, Some(5));
    }

    #[test]
    fn test_zero_components_are_missing() {
        let date = PartialDate::parse("2001-00-00").unwrap();
        assert_eq!(date.month, None);
        assert_eq!(date.day, None);
        assert_eq!(date.resolve(), (2001, 1, 1));
    }

    #[test]
    fn test_maximize() {
        let year_only = PartialDate::parse("2020").unwrap();
        assert_eq!(year_only.maximize(), NaiveDate::from_ymd_opt(2020, 12, 31));

        let leap_feb = PartialDate::parse("2024-02").unwrap();
        assert_eq!(leap_feb.maximize(), NaiveDate::from_ymd_opt(2024, 2, 29));

        let impossible = PartialDate::parse("2023-02-30").unwrap();
        assert_eq!(impossible.maximize(), None);
    }

    #[test]
    fn test_sort_key_packing() {
        assert_eq!(PartialDate::parse("1999").unwrap().sort_key(), 19990101);
        assert_eq!(PartialDate::parse("2023-05-14").unwrap().sort_key(), 20230514);
        let (y, m, d) = parse_partial_date("");
        assert_eq!(pack(y, m, d), 101);
    }
}
