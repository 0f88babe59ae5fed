//! PatentLens command line.
//!
//! Usage:
//!     patentlens summarize --records fixtures.json --applicant acme
//!     patentlens remote --applicant acme --start 2024-01-01
//!     patentlens search --applicant acme --status registered
//!     patentlens health

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use patentlens_aggregate::{summarize_with, SummaryConfig, SummarySource};
use patentlens_backend_http::{HttpBackend, HttpConfig, PatentBackend};
use patentlens_model::{
    status_label, FilterSpec, PatentRecord, SearchQuery, StatusCode, SummaryResult,
};
use patentlens_report::{headline, render_summary};

#[derive(Parser)]
#[command(name = "patentlens")]
#[command(about = "Patent search analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Patent API base URL
    #[arg(long, env = "PATENTLENS_API_URL", default_value = "http://127.0.0.1:8080")]
    api_url: String,

    /// Access token for the patent API
    #[arg(long, env = "PATENTLENS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a local JSON file of patent records
    Summarize {
        /// JSON array of patent records
        #[arg(short, long)]
        records: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        limits: LimitArgs,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Fetch and display the server-side summary
    Remote {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        limits: LimitArgs,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Search patents
    Search {
        #[command(flatten)]
        filter: FilterArgs,

        /// Status code or label (registered, G, 등록, ...)
        #[arg(short, long)]
        status: Option<String>,

        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long, default_value = "20")]
        size: usize,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Check backend health
    Health,
}

#[derive(Args)]
struct FilterArgs {
    /// Applicant name substring (case-insensitive)
    #[arg(short, long)]
    applicant: Option<String>,

    /// Earliest filing date (YYYY-MM-DD or YYYYMMDD)
    #[arg(long)]
    start: Option<String>,

    /// Latest filing date (YYYY-MM-DD or YYYYMMDD)
    #[arg(long)]
    end: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> FilterSpec {
        FilterSpec {
            applicant: self.applicant,
            start_date: self.start,
            end_date: self.end,
        }
    }
}

#[derive(Args)]
struct LimitArgs {
    /// Number of IPC codes to show
    #[arg(long, default_value = "5")]
    ipc_top: usize,

    /// Number of recent filings to show
    #[arg(long, default_value = "5")]
    recent: usize,
}

impl LimitArgs {
    fn into_config(self) -> SummaryConfig {
        SummaryConfig {
            ipc_top_n: self.ipc_top,
            recent_limit: self.recent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patentlens=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = HttpConfig {
        base_url: cli.api_url,
        timeout_secs: cli.timeout,
        bearer_token: cli.token,
        ..Default::default()
    };

    match cli.command {
        Commands::Summarize {
            records,
            filter,
            limits,
            format,
        } => {
            run_summarize(&records, filter.into_filter(), limits.into_config(), format)?;
        }
        Commands::Remote {
            filter,
            limits,
            format,
        } => {
            let backend = HttpBackend::new(config)?;
            let query = SearchQuery::new(filter.into_filter());
            run_remote(&backend, &query, limits.into_config(), format).await?;
        }
        Commands::Search {
            filter,
            status,
            page,
            size,
            format,
        } => {
            let backend = HttpBackend::new(config)?;
            let mut query = SearchQuery::new(filter.into_filter()).with_page(page, size);
            if let Some(status) = status {
                let Some(code) = StatusCode::parse(&status) else {
                    bail!("Unknown status: {}", status);
                };
                query = query.with_status(code);
            }
            run_search(&backend, &query, format).await?;
        }
        Commands::Health => {
            let backend = HttpBackend::new(config)?;
            run_health(&backend).await?;
        }
    }

    Ok(())
}

fn load_records(path: &Path) -> Result<Vec<PatentRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<PatentRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse patent records in {}", path.display()))?;
    Ok(records)
}

fn print_summary(summary: &SummaryResult, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        Format::Text => print!("{}", render_summary(summary)),
    }
    Ok(())
}

fn run_summarize(
    path: &Path,
    filter: FilterSpec,
    config: SummaryConfig,
    format: Format,
) -> Result<()> {
    let records = load_records(path)?;
    tracing::info!(records = records.len(), "Loaded patent records");

    let summary = summarize_with(&records, &filter, &config).context("Analysis failed")?;
    print_summary(&summary, format)
}

async fn run_remote(
    backend: &HttpBackend,
    query: &SearchQuery,
    config: SummaryConfig,
    format: Format,
) -> Result<()> {
    let payload = backend.fetch_summary(query).await?;
    let summary = payload.summarize(&config).context("Analysis failed")?;
    print_summary(&summary, format)
}

async fn run_search(backend: &HttpBackend, query: &SearchQuery, format: Format) -> Result<()> {
    let records = backend.search(query).await?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        Format::Text => {
            for (i, record) in records.iter().enumerate() {
                println!(
                    "{}. {} ({})",
                    result_rank(query.page, query.page_size, i),
                    record.title,
                    record.application_number
                );
                println!(
                    "   {} | {} | {} | {}",
                    record.applicant,
                    record.application_date,
                    record.ipc_code().unwrap_or("-"),
                    status_label(&record.status)
                );
            }
            println!("---");
            println!("Page {}: {} results", query.page, records.len());

            let page_summary =
                summarize_with(&records, &FilterSpec::default(), &SummaryConfig::default())?;
            println!("{}", headline(&page_summary));
        }
    }

    Ok(())
}

/// 1-based position of the `index`-th hit on `page` across all pages.
fn result_rank(page: usize, page_size: usize, index: usize) -> usize {
    (page.max(1) - 1)
        .saturating_mul(page_size)
        .saturating_add(index)
        .saturating_add(1)
}

async fn run_health(backend: &HttpBackend) -> Result<()> {
    print!("Checking {} backend... ", backend.name());

    match backend.health_check().await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED: {}", e);
            std::process::exit(1);
        }
    }
}
