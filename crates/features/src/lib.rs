//! Per-record feature extraction for patent analytics.
//!
//! Provides pure functions used by the aggregation engine:
//! - Filing date parsing and normalization
//! - Month keys for trend bucketing
//! - The applicant / date-range filter predicate
//! - One-decimal percentage rounding

pub use chrono::NaiveDate;
use patentlens_model::{FilterSpec, PatentRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Malformed date: {0:?}")]
    Malformed(String),
}

/// Parse a filing date in `YYYY-MM-DD` or `YYYYMMDD` form.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateError> {
    let s = raw.trim();
    let bytes = s.as_bytes();

    let format = match bytes.len() {
        10 if bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit()) =>
        {
            "%Y-%m-%d"
        }
        8 if bytes.iter().all(u8::is_ascii_digit) => "%Y%m%d",
        _ => return Err(DateError::Malformed(raw.to_string())),
    };

    NaiveDate::parse_from_str(s, format).map_err(|_| DateError::Malformed(raw.to_string()))
}

/// Normalize a filing date to `YYYY-MM-DD`.
pub fn normalize_date(raw: &str) -> Result<String, DateError> {
    parse_date(raw).map(|d| d.format("%Y-%m-%d").to_string())
}

/// `YYYY-MM` bucket key for a filing date.
pub fn month_key(raw: &str) -> Result<String, DateError> {
    parse_date(raw).map(|d| d.format("%Y-%m").to_string())
}

/// Normalize a month key given as `YYYY-MM` or `YYYYMM`.
pub fn normalize_month(raw: &str) -> Result<String, DateError> {
    let s = raw.trim();
    let digits: String = match s.len() {
        7 if s.as_bytes()[4] == b'-' => format!("{}{}", &s[..4], &s[5..]),
        6 => s.to_string(),
        _ => return Err(DateError::Malformed(raw.to_string())),
    };
    parse_date(&format!("{digits}01")).map(|d| d.format("%Y-%m").to_string())
}

/// Compact `YYYYMMDD` form.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Parse an optional bound, treating blank as absent.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, DateError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(s).map(Some),
        None => Ok(None),
    }
}

/// Inclusive filing date range. Absent bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn from_filter(filter: &FilterSpec) -> Result<Self, DateError> {
        Ok(Self {
            start: parse_optional_date(filter.start_date.as_deref())?,
            end: parse_optional_date(filter.end_date.as_deref())?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// A `FilterSpec` with its bounds parsed, ready to test many records.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    applicant: Option<String>,
    range: DateRange,
}

impl RecordFilter {
    pub fn new(filter: &FilterSpec) -> Result<Self, DateError> {
        Ok(Self {
            applicant: filter.applicant_needle().map(str::to_lowercase),
            range: DateRange::from_filter(filter)?,
        })
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Applicant substring AND both date bounds.
    ///
    /// A record whose filing date does not parse fails any present bound.
    pub fn matches(&self, record: &PatentRecord) -> bool {
        if let Some(needle) = &self.applicant {
            if !record.applicant.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if self.range.is_unbounded() {
            return true;
        }

        match parse_date(&record.application_date) {
            Ok(date) => self.range.contains(date),
            Err(_) => {
                tracing::debug!(
                    application_number = %record.application_number,
                    date = %record.application_date,
                    "Excluding record with malformed filing date from date-bounded filter"
                );
                false
            }
        }
    }
}

/// Check a single record against a filter.
pub fn matches(record: &PatentRecord, filter: &FilterSpec) -> Result<bool, DateError> {
    RecordFilter::new(filter).map(|f| f.matches(record))
}

/// Share of `count` in `total` as a percentage with one decimal place.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_both_forms() {
        assert_eq!(parse_date("2024-01-15"), Ok(ymd(2024, 1, 15)));
        assert_eq!(parse_date("20240115"), Ok(ymd(2024, 1, 15)));
        assert_eq!(parse_date(" 2024-01-15 "), Ok(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_date("").is_err());
        assert!(parse_date("2024-1-5").is_err());
        assert!(parse_date("2024/01/15").is_err());
        assert!(parse_date("20241301").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_normalize_and_month_key() {
        assert_eq!(normalize_date("20240220").unwrap(), "2024-02-20");
        assert_eq!(month_key("20240220").unwrap(), "2024-02");
        assert_eq!(month_key("2023-12-31").unwrap(), "2023-12");
        assert_eq!(compact_date(ymd(2024, 3, 1)), "20240301");
    }

    #[test]
    fn test_normalize_month() {
        assert_eq!(normalize_month("2024-03").unwrap(), "2024-03");
        assert_eq!(normalize_month("202403").unwrap(), "2024-03");
        assert!(normalize_month("2024-13").is_err());
        assert!(normalize_month("March").is_err());
    }

    #[test]
    fn test_applicant_case_insensitive_substring() {
        let record = PatentRecord::new("1", "t").with_applicant("ACME Corporation");
        assert!(matches(&record, &FilterSpec::new().with_applicant("acme")).unwrap());
        assert!(matches(&record, &FilterSpec::new().with_applicant("corp")).unwrap());
        assert!(!matches(&record, &FilterSpec::new().with_applicant("globex")).unwrap());
        assert!(matches(&record, &FilterSpec::new().with_applicant("")).unwrap());
        assert!(matches(&record, &FilterSpec::new()).unwrap());
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let record = PatentRecord::new("1", "t").with_date("20240201");
        let on_start = FilterSpec::new().with_start_date("2024-02-01");
        let on_end = FilterSpec::new().with_end_date("2024-02-01");
        let after = FilterSpec::new().with_start_date("2024-02-02");
        let before = FilterSpec::new().with_end_date("20240131");
        assert!(matches(&record, &on_start).unwrap());
        assert!(matches(&record, &on_end).unwrap());
        assert!(!matches(&record, &after).unwrap());
        assert!(!matches(&record, &before).unwrap());
    }

    #[test]
    fn test_malformed_record_date() {
        let record = PatentRecord::new("1", "t").with_date("soon");
        assert!(matches(&record, &FilterSpec::new()).unwrap());
        assert!(!matches(&record, &FilterSpec::new().with_start_date("2000-01-01")).unwrap());
        assert!(!matches(&record, &FilterSpec::new().with_end_date("2099-01-01")).unwrap());
    }

    #[test]
    fn test_malformed_filter_bound_is_error() {
        let record = PatentRecord::new("1", "t").with_date("2024-01-01");
        let filter = FilterSpec::new().with_start_date("yesterday");
        assert_eq!(
            matches(&record, &filter),
            Err(DateError::Malformed("yesterday".to_string()))
        );
    }

    #[test]
    fn test_blank_filter_bound_is_open() {
        let record = PatentRecord::new("1", "t").with_date("2024-01-01");
        let filter = FilterSpec::new().with_start_date("  ").with_end_date("");
        assert!(matches(&record, &filter).unwrap());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 2), 50.0);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(7, 7), 100.0);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(2.0), 2.0);
        assert_eq!(round1(10.0 / 3.0), 3.3);
    }
}
