//! Grouping, counting and ranking of records by a key.

use indexmap::IndexMap;
use patentlens_features::percentage;
use patentlens_model::{status_label, DistributionEntry, PatentRecord};

/// Count records per key and rank the keys by count.
///
/// Records for which `key_fn` yields `None` are not counted but still
/// contribute to the percentage denominator. `Some("")` is an ordinary key
/// and gets its own bucket. Ties keep first-encounter order.
pub fn distribution<'a, I, F>(records: I, key_fn: F) -> Vec<DistributionEntry>
where
    I: IntoIterator<Item = &'a PatentRecord>,
    F: Fn(&PatentRecord) -> Option<String>,
{
    let mut total = 0;
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for record in records {
        total += 1;
        if let Some(key) = key_fn(record) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    if total == 0 {
        return Vec::new();
    }

    let mut entries: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(key, count)| DistributionEntry {
            key,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    // Stable, so equal counts stay in encounter order
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    entries
}

/// Top `top_n` primary IPC codes. Records without one are skipped.
pub fn ipc_distribution<'a, I>(records: I, top_n: usize) -> Vec<DistributionEntry>
where
    I: IntoIterator<Item = &'a PatentRecord>,
{
    let mut entries = distribution(records, |r| r.ipc_code().map(str::to_string));
    entries.truncate(top_n);
    entries
}

/// Every observed status, keyed by display label.
pub fn status_distribution<'a, I>(records: I) -> Vec<DistributionEntry>
where
    I: IntoIterator<Item = &'a PatentRecord>,
{
    distribution(records, |r| Some(status_label(&r.status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(id: &str, ipc: Option<&str>, status: &str) -> PatentRecord {
        let record = PatentRecord::new(id, "t").with_status(status);
        match ipc {
            Some(code) => record.with_ipc(code),
            None => record,
        }
    }

    fn keys(entries: &[DistributionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<PatentRecord> = Vec::new();
        assert!(ipc_distribution(&records, 5).is_empty());
        assert!(status_distribution(&records).is_empty());
    }

    #[test]
    fn test_sorted_descending_stable_on_ties() {
        let records = vec![
            rec("1", Some("H01M"), "pending"),
            rec("2", Some("G06F"), "pending"),
            rec("3", Some("G06F"), "pending"),
            rec("4", Some("A61K"), "pending"),
            rec("5", Some("H01M"), "pending"),
            rec("6", Some("B60L"), "pending"),
            rec("7", Some("G06F"), "pending"),
        ];
        let entries = ipc_distribution(&records, 5);
        assert_eq!(keys(&entries), vec!["G06F", "H01M", "A61K", "B60L"]);
        assert_eq!(entries[0].count, 3);
        assert_eq!(entries[0].percentage, 42.9);
        assert_eq!(entries[2].percentage, 14.3);
    }

    #[test]
    fn test_ipc_truncated_to_top_n() {
        let codes = ["A01B", "B02C", "C03D", "D04E", "E05F", "F06G", "G07H"];
        let records: Vec<_> = codes
            .iter()
            .enumerate()
            .map(|(i, c)| rec(&i.to_string(), Some(*c), "pending"))
            .collect();
        let entries = ipc_distribution(&records, 5);
        assert_eq!(keys(&entries), vec!["A01B", "B02C", "C03D", "D04E", "E05F"]);
    }

    #[test]
    fn test_missing_ipc_skipped_but_counted_in_total() {
        let records = vec![
            rec("1", Some("G06F"), "pending"),
            rec("2", None, "pending"),
            rec("3", Some(" "), "pending"),
            rec("4", Some("G06F"), "pending"),
        ];
        let entries = ipc_distribution(&records, 5);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[0].percentage, 50.0);
    }

    #[test]
    fn test_empty_status_code_is_its_own_bucket() {
        let records = vec![rec("1", None, ""), rec("2", None, "registered")];
        let entries = status_distribution(&records);
        assert_eq!(keys(&entries), vec!["", "등록"]);
        assert_eq!(entries[0].count, 1);
        assert_eq!(entries[0].percentage, 50.0);
    }

    #[test]
    fn test_status_uses_labels_and_is_not_truncated() {
        let statuses = [
            "registered", "G", "pending", "examining", "published", "rejected", "abandoned",
            "expired", "mystery",
        ];
        let records: Vec<_> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| rec(&i.to_string(), None, s))
            .collect();
        let entries = status_distribution(&records);
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].key, "등록");
        assert_eq!(entries[0].count, 2);
        assert!(entries.iter().any(|e| e.key == "mystery"));
        assert_eq!(entries.iter().map(|e| e.count).sum::<usize>(), records.len());
    }
}
