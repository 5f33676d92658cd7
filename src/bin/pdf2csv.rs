//! CLI binary for pdf2csv.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, binds pdfium and prints the batch result.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2csv::{run, ExtractionConfig, LogLevel, PdfiumExtractor};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every PDF below PDF/, tables to ./outcsv/<year>/<month>/
  pdf2csv 'PDF/**/*.pdf'

  # Only tables at least 3 columns wide and 2 rows high, pages 1-4
  pdf2csv --width 3 --height 2 --first-page 1 --last-page 4 'PDF/2024/*.pdf'

  # Show every table and its cells while extracting
  pdf2csv -v 4 ~/menus/2024/April.pdf

  # Keep going past broken documents, write a timing profile
  pdf2csv --continue-on-error --profile 'PDF/**/*.pdf'

VERBOSITY:
  0  nothing after the per-document line
  1  "<pages> pages <tables> tables"
  2  + one line per page with tables
  3  + width x height of each table
  4  + the cells of every row

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   pdfium library file or directory (default: system library)
  RUST_LOG          overrides the log filter chosen by --debug / --trace
"#;

/// Extract the tables of PDF documents into per-page CSV files.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2csv",
    version,
    about = "Extract the tables of PDF documents into per-page CSV files",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file patterns; `**` recurses and a leading `~` is your home directory.
    #[arg(required = true)]
    patterns: Vec<String>,

    /// Root directory for CSV output.
    #[arg(short = 'o', long, env = "PDF2CSV_CSV_DIR", default_value = "./outcsv")]
    csv_dir: PathBuf,

    /// First page to extract (1-indexed).
    #[arg(short = 'f', long, env = "PDF2CSV_FIRST_PAGE", default_value_t = 1)]
    first_page: usize,

    /// Last page to extract; capped to each document's page count.
    #[arg(short = 'l', long, env = "PDF2CSV_LAST_PAGE", default_value_t = 10_000)]
    last_page: usize,

    /// Minimum table width in cells (0 keeps all).
    #[arg(short = 'w', long, env = "PDF2CSV_WIDTH", default_value_t = 0)]
    width: usize,

    /// Minimum table height in rows (0 keeps all).
    #[arg(short = 'H', long, env = "PDF2CSV_HEIGHT", default_value_t = 0)]
    height: usize,

    /// Per-document summary detail, 0–4.
    #[arg(short, long, env = "PDF2CSV_VERBOSE", default_value_t = 1,
          value_parser = clap::value_parser!(u8).range(0..=4))]
    verbose: u8,

    /// Enable DEBUG-level logs.
    #[arg(short, long, env = "PDF2CSV_DEBUG")]
    debug: bool,

    /// Enable TRACE-level logs.
    #[arg(long, env = "PDF2CSV_TRACE")]
    trace: bool,

    /// Write a JSON timing profile to cpu.profile.
    #[arg(long, env = "PDF2CSV_PROFILE")]
    profile: bool,

    /// Log and skip documents that fail instead of stopping.
    #[arg(long, env = "PDF2CSV_CONTINUE_ON_ERROR")]
    continue_on_error: bool,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "PDF2CSV_JSON")]
    json: bool,

    /// pdfium library file or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    // ── Logging setup ────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let extractor = PdfiumExtractor::new(config.pdfium_lib_path.as_deref())
        .context("Failed to load the PDF engine")?;

    let report = run(&cli.patterns, &config, &extractor).context("Extraction failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else {
        eprintln!(
            "{} {} documents  {} CSV files  →  {}",
            if report.skipped.is_empty() {
                green("✔")
            } else {
                cyan("⚠")
            },
            report.documents.len(),
            bold(&report.tables_written().to_string()),
            config.csv_dir.display(),
        );
        for skipped in &report.skipped {
            eprintln!("  skipped {}: {}", skipped.path.display(), skipped.error);
        }
    }
    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .csv_dir(&cli.csv_dir)
        .first_page(cli.first_page)
        .last_page(cli.last_page)
        .min_width(cli.width)
        .min_height(cli.height)
        .verbosity(cli.verbose)
        .log_level(LogLevel::from_flags(cli.debug, cli.trace))
        .continue_on_error(cli.continue_on_error)
        .home_dir(dirs::home_dir())
        .pdfium_lib_path(cli.pdfium_lib.clone());

    if cli.profile {
        builder = builder.profile_path("cpu.profile");
    }

    builder.build().context("Invalid configuration")
}
