//! Assembly of the dashboard summary from either data source.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use patentlens_features::{
    normalize_date, normalize_month, parse_date, percentage, round1, DateError, DateRange,
    NaiveDate, RecordFilter,
};
use patentlens_model::{
    status_label, DistributionEntry, FilterSpec, PatentRecord, RecentPatentView, RemotePayload,
    SearchPeriod, StatusCode, SummaryResult, TrendBucket, REGISTERED_LABEL,
};
use thiserror::Error;

use crate::{ipc_distribution, monthly_trend, recent, status_distribution, summarize_stats};

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] DateError),

    #[error("Malformed summary payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Limits applied when building a summary.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Number of IPC codes kept in the distribution
    pub ipc_top_n: usize,
    /// Number of recent patents listed
    pub recent_limit: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            ipc_top_n: 5,
            recent_limit: 5,
        }
    }
}

/// Something a `SummaryResult` can be built from.
pub trait SummarySource {
    fn summarize(&self, config: &SummaryConfig) -> Result<SummaryResult, SummaryError>;
}

/// Raw records filtered and aggregated locally.
#[derive(Debug, Clone, Copy)]
pub struct LocalSource<'a> {
    pub records: &'a [PatentRecord],
    pub filter: &'a FilterSpec,
}

impl<'a> LocalSource<'a> {
    pub fn new(records: &'a [PatentRecord], filter: &'a FilterSpec) -> Self {
        Self { records, filter }
    }
}

impl SummarySource for LocalSource<'_> {
    fn summarize(&self, config: &SummaryConfig) -> Result<SummaryResult, SummaryError> {
        let filter = RecordFilter::new(self.filter)?;
        let filtered: Vec<&PatentRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();

        tracing::debug!(
            input = self.records.len(),
            matched = filtered.len(),
            "Summarizing local records"
        );

        let ipc = ipc_distribution(filtered.iter().copied(), config.ipc_top_n);
        let statuses = status_distribution(filtered.iter().copied());
        let trend = monthly_trend(filtered.iter().copied());
        let stats = summarize_stats(filtered.len(), &statuses, trend.len());

        Ok(SummaryResult {
            total_patents: stats.total_patents,
            registration_rate: stats.registration_rate,
            monthly_average: stats.monthly_average,
            search_period: search_period(filter.range(), filtered.iter().copied()),
            ipc_distribution: ipc,
            monthly_trend: trend,
            status_distribution: statuses,
            recent_patents: recent(filtered.iter().copied(), config.recent_limit),
        })
    }
}

/// Period covered by a summary.
///
/// Filter bounds win; an open bound falls back to the earliest or latest
/// parseable filing date among `records`.
pub fn search_period<'a, I>(range: DateRange, records: I) -> SearchPeriod
where
    I: IntoIterator<Item = &'a PatentRecord>,
{
    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;

    if range.start.is_none() || range.end.is_none() {
        for date in records
            .into_iter()
            .filter_map(|r| parse_date(&r.application_date).ok())
        {
            earliest = Some(earliest.map_or(date, |e| e.min(date)));
            latest = Some(latest.map_or(date, |l| l.max(date)));
        }
    }

    let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    SearchPeriod {
        start_date: range.start.or(earliest).map(fmt),
        end_date: range.end.or(latest).map(fmt),
    }
}

impl SummarySource for RemotePayload {
    /// Reshape the upstream summary without re-aggregating it.
    ///
    /// Only the IPC percentages and the trend running totals are computed
    /// here, since the payload does not carry them.
    fn summarize(&self, config: &SummaryConfig) -> Result<SummaryResult, SummaryError> {
        let total = self.total_count;

        let ipc_distribution = self
            .top_ipc
            .iter()
            .take(config.ipc_top_n)
            .map(|ipc| DistributionEntry {
                key: ipc.code.clone(),
                count: ipc.count,
                percentage: if total == 0 {
                    0.0
                } else {
                    round1(ipc.count as f64 / total as f64 * 100.0)
                },
            })
            .collect();

        let applicant = self.applicant.clone().unwrap_or_default();
        let recent_patents = self
            .recent_patents
            .iter()
            .take(config.recent_limit)
            .map(|p| RecentPatentView {
                application_number: None,
                title: p.title.clone(),
                applicant: applicant.clone(),
                date: normalize_date(&p.date).unwrap_or_else(|_| p.date.clone()),
                ipc: p.ipc_main.clone(),
                status: status_label(&p.status),
                is_favorite: false,
            })
            .collect();

        Ok(SummaryResult {
            total_patents: total,
            registration_rate: registered_percent(self),
            monthly_average: self.avg_monthly_count,
            search_period: self.period.clone(),
            ipc_distribution,
            monthly_trend: remote_trend(self),
            status_distribution: remote_statuses(self),
            recent_patents,
        })
    }
}

/// Upstream registered percentage, keyed by label or, failing that, by code.
fn registered_percent(payload: &RemotePayload) -> f64 {
    payload
        .status_percent
        .get(REGISTERED_LABEL)
        .or_else(|| {
            payload
                .status_percent
                .iter()
                .find(|(k, _)| StatusCode::parse(k) == Some(StatusCode::Registered))
                .map(|(_, v)| v)
        })
        .copied()
        .unwrap_or(0.0)
}

fn remote_trend(payload: &RemotePayload) -> Vec<TrendBucket> {
    // `YYYYMM` and `YYYY-MM` entries for one month share a bucket
    let mut months: BTreeMap<String, usize> = BTreeMap::new();

    for m in &payload.monthly_trend {
        match normalize_month(&m.month) {
            Ok(month) => *months.entry(month).or_insert(0) += m.count,
            Err(e) => tracing::debug!(error = %e, "Skipping upstream trend month"),
        }
    }

    let mut cumulative = 0;
    months
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

fn remote_statuses(payload: &RemotePayload) -> Vec<DistributionEntry> {
    // Label -> (count, upstream percentage). Keys that collapse onto the
    // same label lose the upstream percentage.
    let mut merged: IndexMap<String, (usize, Option<f64>)> = IndexMap::new();

    for (key, &count) in &payload.status_count {
        let label = status_label(key);
        let upstream = payload
            .status_percent
            .get(key)
            .or_else(|| payload.status_percent.get(&label))
            .copied();

        merged
            .entry(label)
            .and_modify(|(c, p)| {
                *c += count;
                *p = None;
            })
            .or_insert((count, upstream));
    }

    let total = payload.total_count;
    let mut entries: Vec<DistributionEntry> = merged
        .into_iter()
        .map(|(key, (count, upstream))| DistributionEntry {
            key,
            count,
            percentage: upstream.unwrap_or_else(|| percentage(count, total)),
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Filter `records` and summarize them with the default limits.
pub fn summarize(
    records: &[PatentRecord],
    filter: &FilterSpec,
) -> Result<SummaryResult, SummaryError> {
    summarize_with(records, filter, &SummaryConfig::default())
}

pub fn summarize_with(
    records: &[PatentRecord],
    filter: &FilterSpec,
    config: &SummaryConfig,
) -> Result<SummaryResult, SummaryError> {
    LocalSource::new(records, filter).summarize(config)
}

/// Parse an upstream summary payload and reshape it.
pub fn summarize_remote_json(
    json: &str,
    config: &SummaryConfig,
) -> Result<SummaryResult, SummaryError> {
    let payload: RemotePayload = serde_json::from_str(json)?;
    payload.summarize(config)
}
