//! Summary analytics for patent search results.
//!
//! Takes a raw record set and a filter and derives the dashboard summary:
//! - IPC and status distributions with one-decimal percentages
//! - A chronological monthly trend with cumulative counts
//! - Headline statistics (total, registration rate, monthly average)
//! - The most recent filings
//!
//! Every operation is a pure function of its input. A pre-aggregated
//! upstream payload can be reshaped into the same `SummaryResult` through
//! the `SummarySource` trait.

mod distribution;
mod recent;
mod stats;
mod summary;
mod trend;

pub use distribution::{distribution, ipc_distribution, status_distribution};
pub use recent::recent;
pub use stats::{summarize_stats, Stats};
pub use summary::{
    search_period, summarize, summarize_remote_json, summarize_with, LocalSource, SummaryConfig,
    SummaryError, SummarySource,
};
pub use trend::monthly_trend;

#[cfg(test)]
mod proptests;
