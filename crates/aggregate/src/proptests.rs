use patentlens_model::{FilterSpec, PatentRecord};
use proptest::prelude::*;

use crate::summarize;

fn arb_record() -> impl Strategy<Value = PatentRecord> {
    (
        "[0-9]{6}",
        prop::sample::select(vec!["Acme", "ACME Labs", "Globex", "Initech"]),
        (2022i32..=2024, 1u32..=12, 1u32..=28, any::<bool>()),
        prop::option::of(prop::sample::select(vec![
            "G06F", "H04L", "H01M", "A61K", "B60L", "C07D", "G16H",
        ])),
        prop::sample::select(vec![
            "pending", "examining", "published", "registered", "rejected", "G", "A", "",
        ]),
    )
        .prop_map(|(id, applicant, (y, m, d, compact), ipc, status)| {
            let date = if compact {
                format!("{y:04}{m:02}{d:02}")
            } else {
                format!("{y:04}-{m:02}-{d:02}")
            };
            let record = PatentRecord::new(id, "title")
                .with_applicant(applicant)
                .with_date(date)
                .with_status(status);
            match ipc {
                Some(code) => record.with_ipc(code),
                None => record,
            }
        })
}

proptest! {
    #[test]
    fn total_matches_input_without_filter(records in prop::collection::vec(arb_record(), 0..60)) {
        let summary = summarize(&records, &FilterSpec::new()).unwrap();
        prop_assert_eq!(summary.total_patents, records.len());
    }

    #[test]
    fn status_counts_sum_to_total(records in prop::collection::vec(arb_record(), 0..60)) {
        let summary = summarize(&records, &FilterSpec::new().with_applicant("acme")).unwrap();
        let sum: usize = summary.status_distribution.iter().map(|e| e.count).sum();
        prop_assert_eq!(sum, summary.total_patents);
    }

    #[test]
    fn trend_cumulative_is_prefix_sum(records in prop::collection::vec(arb_record(), 0..60)) {
        let summary = summarize(&records, &FilterSpec::new()).unwrap();
        let trend = &summary.monthly_trend;
        let mut running = 0;
        for window in trend.windows(2) {
            prop_assert!(window[0].month < window[1].month);
            prop_assert!(window[0].cumulative_count <= window[1].cumulative_count);
        }
        for bucket in trend {
            running += bucket.count;
            prop_assert_eq!(bucket.cumulative_count, running);
        }
        prop_assert_eq!(trend.last().map_or(0, |b| b.cumulative_count), summary.total_patents);
    }

    #[test]
    fn ipc_capped_and_sorted(records in prop::collection::vec(arb_record(), 0..60)) {
        let summary = summarize(&records, &FilterSpec::new()).unwrap();
        prop_assert!(summary.ipc_distribution.len() <= 5);
        for window in summary.ipc_distribution.windows(2) {
            prop_assert!(window[0].count >= window[1].count);
        }
        prop_assert!(summary.recent_patents.len() <= 5);
    }

    #[test]
    fn summary_is_idempotent(records in prop::collection::vec(arb_record(), 0..60)) {
        let filter = FilterSpec::new().with_start_date("2023-01-01").with_end_date("20240630");
        let first = summarize(&records, &filter).unwrap();
        let second = summarize(&records, &filter).unwrap();
        prop_assert_eq!(first, second);
    }
}
