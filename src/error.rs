//! Error types for the pdf2csv library.
//!
//! Every failure is fatal for the unit of work it happens in: a bad glob
//! pattern aborts the batch, a page that cannot be read aborts its document,
//! a ragged table aborts its document before anything is written for it.
//! Each variant carries the path, page or row needed to locate the problem.
//! Whether a failed document also stops the rest of the batch is decided by
//! [`crate::config::ExtractionConfig::continue_on_error`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2csv library.
#[derive(Debug, Error)]
pub enum Pdf2CsvError {
    // ── Input resolution ──────────────────────────────────────────────────
    /// A glob pattern could not be compiled.
    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A path matched by a pattern could not be stat-ed.
    #[error("Cannot stat '{path}': {source}")]
    StatFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Document errors ───────────────────────────────────────────────────
    /// The document could not be opened or its page tree could not be read.
    #[error("Could not open '{path}': {detail}")]
    OpenFailed { path: PathBuf, detail: String },

    /// The layout extractor failed on one page; the whole document is dropped.
    #[error("Table extraction failed for '{path}' page {page}: {detail}")]
    PageExtraction {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// A table row does not have the width of row 0.
    ///
    /// This means the layout extractor produced an inconsistent grid. The
    /// table is never truncated or padded to hide it.
    #[error("Ragged table {width} x {height}: row {row} has {len} cells")]
    RaggedTable {
        width: usize,
        height: usize,
        row: usize,
        len: usize,
    },

    /// A table of a document could not be rendered; wraps [`Self::RaggedTable`].
    #[error("Table {table} on page {page} of '{path}': {source}")]
    TableRender {
        path: PathBuf,
        page: usize,
        /// 1-based, as in the CSV file name.
        table: usize,
        #[source]
        source: Box<Pdf2CsvError>,
    },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Output paths ──────────────────────────────────────────────────────
    /// A grouping token could not be taken from the input path.
    #[error("Path '{path}' has no segment {index} to group output by")]
    PathSegmentMissing { path: String, index: usize },

    /// `.` and `..` are refused as output directories.
    #[error("{name}={path:?} not allowed")]
    InvalidDirectory { name: String, path: PathBuf },

    /// Could not create an output directory.
    #[error("Couldn't create directory '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a CSV file, profile or downloaded document.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// A URL could not be parsed or joined.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP request failed or returned a non-success status.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The index page was empty.
    #[error("Index page '{source_name}' is empty")]
    EmptyIndex { source_name: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
