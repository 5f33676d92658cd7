//! Configuration types for table extraction and document fetching.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Process-wide facts (the home directory
//! used for `~` expansion, the log level, where pdfium lives) are resolved
//! once by the binary and carried here rather than looked up deep inside the
//! pipeline.

use crate::error::Pdf2CsvError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default root directory for CSV output.
pub const DEFAULT_CSV_DIR: &str = "./outcsv";

/// Default upper page bound; capped to the page count of each document.
pub const DEFAULT_LAST_PAGE: usize = 10_000;

/// Highest verbosity understood by [`crate::DocumentTableSet::describe`].
pub const MAX_VERBOSITY: u8 = 4;

/// Configuration for a table-extraction batch.
///
/// # Example
/// ```rust
/// use pdf2csv::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .csv_dir("out")
///     .min_width(2)
///     .min_height(2)
///     .verbosity(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.min_width, 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Root of the CSV tree. Default: `./outcsv`.
    pub csv_dir: PathBuf,

    /// First page to extract (1-indexed). Values below 1 are treated as 1. Default: 1.
    pub first_page: usize,

    /// Last page to extract (inclusive), capped to the document's page count. Default: 10000.
    pub last_page: usize,

    /// Minimum table width in cells; 0 keeps every width. Default: 0.
    pub min_width: usize,

    /// Minimum table height in rows; 0 keeps every height. Default: 0.
    pub min_height: usize,

    /// Detail of the per-document summary, 0–4. Default: 1.
    pub verbosity: u8,

    /// Log level the binary installs. Default: [`LogLevel::Info`].
    pub log_level: LogLevel,

    /// Write a timing profile here when the batch ends. Default: None.
    pub profile_path: Option<PathBuf>,

    /// Log and skip a failing document instead of aborting the batch. Default: false.
    pub continue_on_error: bool,

    /// Replacement for `~` in input patterns. Default: None (no expansion).
    pub home_dir: Option<PathBuf>,

    /// Explicit pdfium library to bind. Default: None (system library).
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            first_page: 1,
            last_page: DEFAULT_LAST_PAGE,
            min_width: 0,
            min_height: 0,
            verbosity: 1,
            log_level: LogLevel::default(),
            profile_path: None,
            continue_on_error: false,
            home_dir: None,
            pdfium_lib_path: None,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn csv_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.csv_dir = dir.into();
        self
    }

    pub fn first_page(mut self, page: usize) -> Self {
        self.config.first_page = page.max(1);
        self
    }

    pub fn last_page(mut self, page: usize) -> Self {
        self.config.last_page = page;
        self
    }

    pub fn min_width(mut self, width: usize) -> Self {
        self.config.min_width = width;
        self
    }

    pub fn min_height(mut self, height: usize) -> Self {
        self.config.min_height = height;
        self
    }

    pub fn verbosity(mut self, level: u8) -> Self {
        self.config.verbosity = level;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn profile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.profile_path = Some(path.into());
        self
    }

    pub fn continue_on_error(mut self, v: bool) -> Self {
        self.config.continue_on_error = v;
        self
    }

    pub fn home_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.home_dir = dir;
        self
    }

    pub fn pdfium_lib_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.pdfium_lib_path = path;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2CsvError> {
        let c = &self.config;
        if c.verbosity > MAX_VERBOSITY {
            return Err(Pdf2CsvError::InvalidConfig(format!(
                "verbosity must be 0–{MAX_VERBOSITY}, got {}",
                c.verbosity
            )));
        }
        if c.first_page > c.last_page {
            return Err(Pdf2CsvError::InvalidConfig(format!(
                "first page {} is after last page {}",
                c.first_page, c.last_page
            )));
        }
        if is_degenerate_dir(&c.csv_dir) {
            return Err(Pdf2CsvError::InvalidDirectory {
                name: "CSV directory".into(),
                path: c.csv_dir.clone(),
            });
        }
        Ok(self.config)
    }
}

/// `.` and `..` cannot be used as output directories.
pub(crate) fn is_degenerate_dir(dir: &Path) -> bool {
    dir == Path::new(".") || dir == Path::new("..")
}

/// Log verbosity installed by the binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Pick the level from the `--debug` / `--trace` flags; trace wins.
    pub fn from_flags(debug: bool, trace: bool) -> Self {
        if trace {
            LogLevel::Trace
        } else if debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    /// The `EnvFilter` directive for this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Inclusive 1-indexed page range after clamping to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: usize,
    pub last: usize,
}

impl PageRange {
    /// Clamp `[first, last]` to a document of `total_pages` pages.
    ///
    /// Returns `None` when nothing of the request lies inside the document.
    pub fn clamp(first: usize, last: usize, total_pages: usize) -> Option<Self> {
        let first = first.max(1);
        let last = last.min(total_pages);
        (first <= last).then_some(Self { first, last })
    }

    /// Page numbers in ascending order.
    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

// ── Fetch configuration ──────────────────────────────────────────────────

/// Default local directory for downloaded documents.
pub const DEFAULT_PDF_DIR: &str = "PDF";

/// Configuration for downloading the documents linked from an index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// URL of the index page. Relative links are resolved against it.
    pub index_url: String,

    /// Local copy of the index page; read when present, written when fetched.
    pub index_cache: Option<PathBuf>,

    /// Root directory for downloaded documents. Default: `PDF`.
    pub pdf_dir: PathBuf,

    /// Per-request timeout in seconds. Default: 120.
    pub timeout_secs: u64,
}

impl FetchConfig {
    /// Create a new builder for `FetchConfig`.
    pub fn builder(index_url: impl Into<String>) -> FetchConfigBuilder {
        FetchConfigBuilder {
            config: FetchConfig {
                index_url: index_url.into(),
                index_cache: None,
                pdf_dir: PathBuf::from(DEFAULT_PDF_DIR),
                timeout_secs: 120,
            },
        }
    }
}

/// Builder for [`FetchConfig`].
#[derive(Debug)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    pub fn index_cache(mut self, path: Option<PathBuf>) -> Self {
        self.config.index_cache = path;
        self
    }

    pub fn pdf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.pdf_dir = dir.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<FetchConfig, Pdf2CsvError> {
        let c = &self.config;
        if !(c.index_url.starts_with("http://") || c.index_url.starts_with("https://")) {
            return Err(Pdf2CsvError::InvalidConfig(format!(
                "index URL must be http(s), got '{}'",
                c.index_url
            )));
        }
        if is_degenerate_dir(&c.pdf_dir) {
            return Err(Pdf2CsvError::InvalidDirectory {
                name: "PDF directory".into(),
                path: c.pdf_dir.clone(),
            });
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ExtractionConfig::default();
        assert_eq!(c.csv_dir, PathBuf::from("./outcsv"));
        assert_eq!(c.first_page, 1);
        assert_eq!(c.last_page, 10_000);
        assert_eq!((c.min_width, c.min_height), (0, 0));
        assert_eq!(c.verbosity, 1);
        assert_eq!(c.log_level, LogLevel::Info);
        assert!(!c.continue_on_error);
    }

    #[test]
    fn builder_rejects_verbosity_above_four() {
        assert!(ExtractionConfig::builder().verbosity(5).build().is_err());
        assert!(ExtractionConfig::builder().verbosity(4).build().is_ok());
    }

    #[test]
    fn builder_rejects_dot_dirs() {
        let err = ExtractionConfig::builder().csv_dir("..").build().unwrap_err();
        assert!(matches!(err, Pdf2CsvError::InvalidDirectory { .. }));
        assert!(ExtractionConfig::builder().csv_dir(".").build().is_err());
    }

    #[test]
    fn builder_floors_first_page() {
        let c = ExtractionConfig::builder().first_page(0).build().unwrap();
        assert_eq!(c.first_page, 1);
    }

    #[test]
    fn trace_flag_wins_over_debug() {
        assert_eq!(LogLevel::from_flags(true, true), LogLevel::Trace);
        assert_eq!(LogLevel::from_flags(true, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_flags(false, false).as_filter(), "info");
    }

    #[test]
    fn page_range_clamps_to_document() {
        assert_eq!(
            PageRange::clamp(0, 10_000, 3),
            Some(PageRange { first: 1, last: 3 })
        );
        assert_eq!(
            PageRange::clamp(2, 2, 3),
            Some(PageRange { first: 2, last: 2 })
        );
        assert_eq!(PageRange::clamp(5, 9, 3), None);
        assert_eq!(PageRange::clamp(1, 10, 0), None);
    }

    #[test]
    fn fetch_config_requires_http_url() {
        assert!(FetchConfig::builder("ftp://x/").build().is_err());
        let c = FetchConfig::builder("https://example.org/kondate/")
            .build()
            .unwrap();
        assert_eq!(c.pdf_dir, PathBuf::from("PDF"));
        assert_eq!(c.timeout_secs, 120);
    }
}
