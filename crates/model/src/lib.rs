//! Core domain model for PatentLens patent analytics.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `PatentRecord`: A patent as returned by search or a local fixture
//! - `StatusCode`: Lifecycle stage of a patent and its display label
//! - `FilterSpec` / `SearchQuery`: What the user asked for
//! - `SummaryResult`: The dashboard summary derived from a record set
//! - `RemotePayload`: The pre-aggregated summary shape served upstream

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display label for a registered patent.
pub const REGISTERED_LABEL: &str = "등록";

/// Lifecycle stage of a patent application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    /// Filed, not yet examined
    Pending,
    /// Under examination
    Examining,
    /// Laid open to the public
    Published,
    /// Granted
    Registered,
    /// Refused by the examiner
    Rejected,
    /// Withdrawn by the applicant
    Abandoned,
    /// Lapsed after registration
    Expired,
}

impl StatusCode {
    pub const ALL: [StatusCode; 7] = [
        Self::Pending,
        Self::Examining,
        Self::Published,
        Self::Registered,
        Self::Rejected,
        Self::Abandoned,
        Self::Expired,
    ];

    /// Parse a long (`registered`) or short alternate-schema (`G`) code.
    pub fn from_code(code: &str) -> Option<Self> {
        let status = match code.trim().to_ascii_lowercase().as_str() {
            "pending" | "a" => Self::Pending,
            "examining" | "c" => Self::Examining,
            "published" | "f" => Self::Published,
            "registered" | "g" => Self::Registered,
            "abandoned" | "i" => Self::Abandoned,
            "expired" | "j" => Self::Expired,
            "rejected" | "r" => Self::Rejected,
            _ => return None,
        };
        Some(status)
    }

    /// Find the status whose display label is exactly `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Parse either a status code or a display label.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_code(s).or_else(|| Self::from_label(s))
    }

    /// Canonical display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "출원",
            Self::Examining => "심사중",
            Self::Published => "공개",
            Self::Registered => REGISTERED_LABEL,
            Self::Rejected => "거절",
            Self::Abandoned => "포기",
            Self::Expired => "소멸",
        }
    }

    /// Long code as used by the search API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Examining => "examining",
            Self::Published => "published",
            Self::Registered => "registered",
            Self::Rejected => "rejected",
            Self::Abandoned => "abandoned",
            Self::Expired => "expired",
        }
    }

    /// Single-letter code of the alternate schema.
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Pending => "A",
            Self::Examining => "C",
            Self::Published => "F",
            Self::Registered => "G",
            Self::Abandoned => "I",
            Self::Expired => "J",
            Self::Rejected => "R",
        }
    }
}

/// Map a raw status code to its display label.
///
/// Unknown or empty codes come back unchanged, so this never fails.
pub fn status_label(code: &str) -> String {
    StatusCode::from_code(code)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// A patent record from a search result or fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentRecord {
    /// Application number, unique per record
    pub application_number: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub applicant: String,

    /// Filing date, `YYYY-MM-DD` or `YYYYMMDD`
    #[serde(default, alias = "date")]
    pub application_date: String,

    /// Primary IPC code
    #[serde(default, rename = "ipcMain", alias = "ipc", skip_serializing_if = "Option::is_none")]
    pub ipc: Option<String>,

    /// Raw status code (`registered`, `G`, ...)
    #[serde(default)]
    pub status: String,
}

impl PatentRecord {
    /// Create a minimal record for testing.
    pub fn new(application_number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            application_number: application_number.into(),
            title: title.into(),
            applicant: String::new(),
            application_date: String::new(),
            ipc: None,
            status: String::new(),
        }
    }

    pub fn with_applicant(mut self, applicant: impl Into<String>) -> Self {
        self.applicant = applicant.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.application_date = date.into();
        self
    }

    pub fn with_ipc(mut self, ipc: impl Into<String>) -> Self {
        self.ipc = Some(ipc.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Parsed status, if the raw code is known.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_code(&self.status)
    }

    /// Primary IPC code, treating blank as absent.
    pub fn ipc_code(&self) -> Option<&str> {
        self.ipc.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Filter applied to a record set before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Case-insensitive applicant substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant: Option<String>,

    /// Inclusive lower bound on filing date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Inclusive upper bound on filing date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applicant(mut self, applicant: impl Into<String>) -> Self {
        self.applicant = Some(applicant.into());
        self
    }

    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn with_end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Applicant needle, treating blank as absent.
    pub fn applicant_needle(&self) -> Option<&str> {
        self.applicant
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Query parameters for patent search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(flatten)]
    pub filter: FilterSpec,

    /// Restrict to one lifecycle stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<StatusCode>,

    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            filter: FilterSpec::default(),
            status_filter: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl SearchQuery {
    pub fn new(filter: FilterSpec) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_filter = Some(status);
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// One row of a distribution: a key with its count and share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    /// IPC code or status label
    pub key: String,
    pub count: usize,
    /// Share of the total, one decimal place
    pub percentage: f64,
}

/// Filings in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
    /// Running total up to and including this month
    pub cumulative_count: usize,
}

/// Date span covered by a summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPeriod {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Display projection of a recent patent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPatentView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_number: Option<String>,
    pub title: String,
    pub applicant: String,
    /// Normalized `YYYY-MM-DD`
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipc: Option<String>,
    /// Display label
    pub status: String,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Dashboard summary of a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub total_patents: usize,
    /// Percentage of registered patents, one decimal place
    pub registration_rate: f64,
    /// Mean filings per active month, one decimal place
    pub monthly_average: f64,
    pub search_period: SearchPeriod,
    pub ipc_distribution: Vec<DistributionEntry>,
    pub monthly_trend: Vec<TrendBucket>,
    pub status_distribution: Vec<DistributionEntry>,
    pub recent_patents: Vec<RecentPatentView>,
}

impl SummaryResult {
    pub fn is_empty(&self) -> bool {
        self.total_patents == 0
    }
}

/// Pre-aggregated summary as served by the remote summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePayload {
    pub total_count: usize,

    /// Status (label or code) to percentage
    #[serde(default)]
    pub status_percent: IndexMap<String, f64>,

    #[serde(default)]
    pub avg_monthly_count: f64,

    #[serde(default)]
    pub period: SearchPeriod,

    #[serde(default, rename = "topIPC")]
    pub top_ipc: Vec<RemoteIpcCount>,

    #[serde(default)]
    pub monthly_trend: Vec<RemoteMonthCount>,

    /// Status (label or code) to count
    #[serde(default)]
    pub status_count: IndexMap<String, usize>,

    #[serde(default)]
    pub recent_patents: Vec<RemoteRecentPatent>,

    #[serde(default)]
    pub applicant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIpcCount {
    pub code: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMonthCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecentPatent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub ipc_main: Option<String>,
    #[serde(default)]
    pub status: String,
}
