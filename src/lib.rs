//! # pdf2csv
//!
//! Pull the tables out of PDF documents and save each one as a CSV file,
//! grouped by source document and page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! index page ─▶ links ─▶ PDF/<year>/<month>.pdf          (fetch, optional)
//!
//! file patterns
//!  │
//!  ├─ 1. Input    expand `~`, glob (`**` allowed), keep regular files
//!  ├─ 2. Layout   per page, ask the layout extractor for raw table grids
//!  ├─ 3. Model    NFKC + whitespace-collapse every cell into a Table
//!  ├─ 4. Filter   keep tables at least --width x --height
//!  ├─ 5. Report   one summary line per document (verbosity 0–4)
//!  └─ 6. Output   <csv_dir>/<year>/<month>/<doc>.page<N>.table<M>.csv
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2csv::{run, ExtractionConfig, PdfiumExtractor};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .csv_dir("outcsv")
//!         .min_width(2)
//!         .min_height(2)
//!         .build()?;
//!     let extractor = PdfiumExtractor::new(None)?;
//!     let report = run(&["PDF/**/*.pdf".to_string()], &config, &extractor)?;
//!     eprintln!("{} CSV files", report.tables_written());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2csv` and `pdffetch` binaries (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod layout;
pub mod pipeline;
pub mod profile;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, FetchConfig, LogLevel, PageRange};
pub use error::Pdf2CsvError;
pub use extract::{extract_tables, run, save_csv_files, BatchReport, DocumentReport};
pub use fetch::{fetch_all, FetchReport};
pub use layout::{LayoutExtractor, PageSource, PdfiumExtractor, RawCell, RawTable};
pub use pipeline::doc_tables::DocumentTableSet;
pub use pipeline::normalize::normalize;
pub use pipeline::paths::OutputPlan;
pub use pipeline::table::Table;
