//! Headline statistics.

use patentlens_features::round1;
use patentlens_model::{DistributionEntry, REGISTERED_LABEL};

/// Scalar metrics shown above the dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub total_patents: usize,
    pub registration_rate: f64,
    pub monthly_average: f64,
}

/// Derive the headline metrics from the other aggregates.
///
/// The monthly average is taken over active months only: months with no
/// filings have no trend bucket and do not count.
pub fn summarize_stats(
    filtered_count: usize,
    status_distribution: &[DistributionEntry],
    bucket_count: usize,
) -> Stats {
    let registration_rate = if filtered_count == 0 {
        0.0
    } else {
        status_distribution
            .iter()
            .find(|e| e.key == REGISTERED_LABEL)
            .map_or(0.0, |e| e.percentage)
    };

    let monthly_average = if bucket_count == 0 {
        0.0
    } else {
        round1(filtered_count as f64 / bucket_count as f64)
    };

    Stats {
        total_patents: filtered_count,
        registration_rate,
        monthly_average,
    }
}
