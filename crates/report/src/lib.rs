//! Text rendering of patent summaries.
//!
//! Converts a `SummaryResult` into human-readable dashboard text suitable
//! for the terminal and plain-text exports.

use std::fmt::Write;

use patentlens_model::{DistributionEntry, SummaryResult};

/// Width of the longest bar in distribution charts.
const BAR_WIDTH: usize = 30;

/// One-line summary of the headline metrics.
pub fn headline(summary: &SummaryResult) -> String {
    if summary.is_empty() {
        return "No patents matched the search.".to_string();
    }

    format!(
        "{} patents | registered {:.1}% | {:.1} filings per active month{}",
        summary.total_patents,
        summary.registration_rate,
        summary.monthly_average,
        period_suffix(summary)
    )
}

fn period_suffix(summary: &SummaryResult) -> String {
    let period = &summary.search_period;
    match (&period.start_date, &period.end_date) {
        (None, None) => String::new(),
        (start, end) => format!(
            " | {} ~ {}",
            start.as_deref().unwrap_or("…"),
            end.as_deref().unwrap_or("…")
        ),
    }
}

/// Render the full dashboard as text.
pub fn render_summary(summary: &SummaryResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", headline(summary));
    if summary.is_empty() {
        return out;
    }

    render_distribution(&mut out, "Top IPC", &summary.ipc_distribution);

    if !summary.monthly_trend.is_empty() {
        let _ = writeln!(out, "\nMonthly trend");
        let peak = summary.monthly_trend.iter().map(|b| b.count).max().unwrap_or(0);
        for bucket in &summary.monthly_trend {
            let _ = writeln!(
                out,
                "  {}  {:>4}  {:>5}  {}",
                bucket.month,
                bucket.count,
                bucket.cumulative_count,
                bar(bucket.count, peak)
            );
        }
    }

    render_distribution(&mut out, "Status", &summary.status_distribution);

    if !summary.recent_patents.is_empty() {
        let _ = writeln!(out, "\nRecent filings");
        for (i, patent) in summary.recent_patents.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} [{}] {} ({})",
                i + 1,
                patent.date,
                patent.status,
                patent.title,
                patent.ipc.as_deref().unwrap_or("-")
            );
        }
    }

    out
}

fn render_distribution(out: &mut String, title: &str, entries: &[DistributionEntry]) {
    if entries.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{}", title);
    let peak = entries.iter().map(|e| e.count).max().unwrap_or(0);
    for entry in entries {
        let _ = writeln!(
            out,
            "  {:<8} {:>4} {:>5.1}%  {}",
            entry.key,
            entry.count,
            entry.percentage,
            bar(entry.count, peak)
        );
    }
}

/// Horizontal bar scaled against `peak`.
fn bar(count: usize, peak: usize) -> String {
    if peak == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(peak);
    "#".repeat(len)
}
