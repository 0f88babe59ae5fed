//! Query translation and dialect generation.
//!
//! Converts an abstract `SearchQuery` into backend-specific request syntax:
//! - REST query parameters for the patent search and summary endpoints

use patentlens_features::{compact_date, parse_optional_date, DateError};
use patentlens_model::SearchQuery;
use thiserror::Error;

/// Largest page the search API serves.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid date bound: {0}")]
    InvalidDate(#[from] DateError),
    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),
}

/// Trait for translating queries to backend-specific syntax.
pub trait QueryDialect {
    /// The output type (usually a parameter list or a query string)
    type Output;

    /// Translate a SearchQuery to this dialect
    fn translate(&self, query: &SearchQuery) -> Result<Self::Output, QueryError>;
}

/// REST parameter dialect of the patent search API.
///
/// Dates go out in compact `YYYYMMDD` form and statuses as short codes.
#[derive(Debug, Default)]
pub struct RestDialect;

impl QueryDialect for RestDialect {
    type Output = Vec<(&'static str, String)>;

    fn translate(&self, query: &SearchQuery) -> Result<Self::Output, QueryError> {
        if query.page_size == 0 || query.page_size > MAX_PAGE_SIZE {
            return Err(QueryError::InvalidPageSize(query.page_size));
        }

        let filter = &query.filter;
        let start = parse_optional_date(filter.start_date.as_deref())?;
        let end = parse_optional_date(filter.end_date.as_deref())?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(QueryError::InvertedRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }

        let mut params = Vec::new();

        if let Some(applicant) = filter.applicant_needle() {
            params.push(("applicant", applicant.to_string()));
        }
        if let Some(start) = start {
            params.push(("startDate", compact_date(start)));
        }
        if let Some(end) = end {
            params.push(("endDate", compact_date(end)));
        }
        if let Some(status) = query.status_filter {
            params.push(("status", status.short_code().to_string()));
        }

        params.push(("page", query.page.max(1).to_string()));
        params.push(("size", query.page_size.to_string()));

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentlens_model::{FilterSpec, StatusCode};

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_rest_basic() {
        let query = SearchQuery::new(
            FilterSpec::new()
                .with_applicant(" Acme ")
                .with_start_date("2024-01-01")
                .with_end_date("20240331"),
        );
        let params = RestDialect.translate(&query).unwrap();
        assert_eq!(param(&params, "applicant"), Some("Acme"));
        assert_eq!(param(&params, "startDate"), Some("20240101"));
        assert_eq!(param(&params, "endDate"), Some("20240331"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "size"), Some("20"));
        assert_eq!(param(&params, "status"), None);
    }

    #[test]
    fn test_rest_status_short_code() {
        let query = SearchQuery::default().with_status(StatusCode::Registered);
        let params = RestDialect.translate(&query).unwrap();
        assert_eq!(param(&params, "status"), Some("G"));
        assert_eq!(param(&params, "applicant"), None);
    }

    #[test]
    fn test_inverted_range_error() {
        let query = SearchQuery::new(
            FilterSpec::new()
                .with_start_date("2024-03-01")
                .with_end_date("2024-01-01"),
        );
        assert!(matches!(
            RestDialect.translate(&query),
            Err(QueryError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_invalid_date_error() {
        let query = SearchQuery::new(FilterSpec::new().with_end_date("March"));
        assert!(matches!(
            RestDialect.translate(&query),
            Err(QueryError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_page_size_bounds() {
        let zero = SearchQuery::default().with_page(1, 0);
        let huge = SearchQuery::default().with_page(1, MAX_PAGE_SIZE + 1);
        assert!(matches!(
            RestDialect.translate(&zero),
            Err(QueryError::InvalidPageSize(0))
        ));
        assert!(RestDialect.translate(&huge).is_err());
    }
}
