//! Monthly filing trend.

use std::collections::BTreeMap;

use patentlens_features::month_key;
use patentlens_model::{PatentRecord, TrendBucket};

/// Bucket records by filing month, oldest first, with running totals.
///
/// Records whose filing date does not parse are left out.
pub fn monthly_trend<'a, I>(records: I) -> Vec<TrendBucket>
where
    I: IntoIterator<Item = &'a PatentRecord>,
{
    // Zero-padded `YYYY-MM` keys sort chronologically
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        match month_key(&record.application_date) {
            Ok(month) => *counts.entry(month).or_insert(0) += 1,
            Err(e) => tracing::debug!(
                application_number = %record.application_number,
                error = %e,
                "Skipping record in monthly trend"
            ),
        }
    }

    let mut cumulative = 0;
    counts
        .into_iter()
        .map(|(month, count)| {
            cumulative += count;
            TrendBucket {
                month,
                count,
                cumulative_count: cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dated(id: &str, date: &str) -> PatentRecord {
        PatentRecord::new(id, "t").with_date(date)
    }

    fn bucket(month: &str, count: usize, cumulative_count: usize) -> TrendBucket {
        TrendBucket {
            month: month.to_string(),
            count,
            cumulative_count,
        }
    }

    #[test]
    fn test_chronological_with_cumulative() {
        let records = vec![
            dated("1", "2024-03-02"),
            dated("2", "20231130"),
            dated("3", "2024-01-15"),
            dated("4", "2024-03-28"),
            dated("5", "20240101"),
        ];
        assert_eq!(
            monthly_trend(&records),
            vec![
                bucket("2023-11", 1, 1),
                bucket("2024-01", 2, 3),
                bucket("2024-03", 2, 5),
            ]
        );
    }

    #[test]
    fn test_malformed_dates_skipped() {
        let records = vec![dated("1", "2024-01-15"), dated("2", ""), dated("3", "15/01/2024")];
        assert_eq!(monthly_trend(&records), vec![bucket("2024-01", 1, 1)]);
    }

    #[test]
    fn test_empty() {
        let records: Vec<PatentRecord> = Vec::new();
        assert!(monthly_trend(&records).is_empty());
    }
}
