//! Download the PDF documents linked from an index page.
//!
//! Documents land in `<pdf-dir>/<link path>`, the layout `pdf2csv` groups
//! its output by. Files already on disk are not fetched again.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2csv::{fetch_all, FetchConfig, LogLevel};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Download the PDF documents linked from an index page.
#[derive(Parser, Debug)]
#[command(
    name = "pdffetch",
    version,
    about = "Download the PDF documents linked from the table rows of an index page",
    arg_required_else_help = true
)]
struct Cli {
    /// URL of the index page; relative links are resolved against it.
    index_url: String,

    /// Local copy of the index page: read if present, saved after download.
    #[arg(long, env = "PDFFETCH_INDEX_CACHE")]
    index_cache: Option<PathBuf>,

    /// Directory downloaded documents are stored under.
    #[arg(short = 'o', long, env = "PDFFETCH_PDF_DIR", default_value = "PDF")]
    pdf_dir: PathBuf,

    /// HTTP timeout per request in seconds.
    #[arg(long, env = "PDFFETCH_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Enable DEBUG-level logs.
    #[arg(short, long)]
    debug: bool,

    /// Enable TRACE-level logs.
    #[arg(long)]
    trace: bool,

    /// Print the fetch report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.debug, cli.trace);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let config = FetchConfig::builder(&cli.index_url)
        .index_cache(cli.index_cache.clone())
        .pdf_dir(&cli.pdf_dir)
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")?;

    let report = fetch_all(&config).await.context("Fetch failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else {
        eprintln!(
            "{} downloaded, {} already present, {} absolute links skipped",
            report.downloaded.len(),
            report.already_present.len(),
            report.absolute_links.len()
        );
    }
    Ok(())
}
