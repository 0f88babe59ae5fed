//! HTTP backend for the patent search API.
//!
//! Provides the `PatentBackend` trait and its reqwest implementation.
//! This keeps the aggregation engine unaware of where records and
//! pre-aggregated summaries come from.

use std::future::Future;
use std::time::Duration;

use patentlens_model::{PatentRecord, RemotePayload, SearchQuery};
use patentlens_query::{QueryDialect, QueryError, RestDialect};
use thiserror::Error;

/// Errors from backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("Backend not available")]
    Unavailable,
}

/// Trait for patent data backends.
pub trait PatentBackend {
    /// Fetch one page of search results.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<PatentRecord>, BackendError>> + Send;

    /// Fetch the server-side aggregated summary for a query.
    fn fetch_summary(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<RemotePayload, BackendError>> + Send;

    /// Check if the backend is healthy.
    fn health_check(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Get the backend name for logging.
    fn name(&self) -> &'static str;
}

/// HTTP backend configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the patent API
    pub base_url: String,
    pub search_path: String,
    pub summary_path: String,
    pub health_path: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Access token issued by the auth service
    pub bearer_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            search_path: "/api/patents/search".to_string(),
            summary_path: "/api/patents/summary".to_string(),
            health_path: "/api/health".to_string(),
            timeout_secs: 30,
            bearer_token: None,
        }
    }
}

/// reqwest-backed patent API client.
pub struct HttpBackend {
    config: HttpConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a new HTTP backend.
    pub fn new(config: HttpConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json(
        &self,
        path: &str,
        query: &SearchQuery,
    ) -> Result<serde_json::Value, BackendError> {
        let params = RestDialect.translate(query)?;
        let url = self.url(path);

        tracing::debug!(url = %url, params = ?params, "Requesting patent API");

        let mut request = self.client.get(&url).query(&params);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

/// Unwrap an optional `{ "data": ... }` envelope.
fn unwrap_envelope(response: serde_json::Value) -> serde_json::Value {
    match response {
        serde_json::Value::Object(mut map) if map.get("data").is_some_and(|d| d.is_object()) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

/// Parse a search response into records.
///
/// Hits that do not deserialize are skipped; a missing `items` array is an error.
fn parse_search_response(response: serde_json::Value) -> Result<Vec<PatentRecord>, BackendError> {
    let body = unwrap_envelope(response);
    let items = body
        .get("items")
        .and_then(|i| i.as_array())
        .ok_or_else(|| BackendError::Parse("Missing items array".to_string()))?;

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<PatentRecord>(item.clone()) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(error = %e, "Skipping unparseable search hit"),
        }
    }

    Ok(records)
}

fn parse_summary_response(response: serde_json::Value) -> Result<RemotePayload, BackendError> {
    serde_json::from_value(unwrap_envelope(response))
        .map_err(|e| BackendError::Parse(e.to_string()))
}

impl PatentBackend for HttpBackend {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<PatentRecord>, BackendError> {
        let json = self.get_json(&self.config.search_path, query).await?;
        parse_search_response(json)
    }

    async fn fetch_summary(&self, query: &SearchQuery) -> Result<RemotePayload, BackendError> {
        let json = self.get_json(&self.config.summary_path, query).await?;
        parse_summary_response(json)
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.url(&self.config.health_path))
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
