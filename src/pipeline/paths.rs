//! Where CSV files go.
//!
//! Downloaded documents sit in a `<root>/<year>/<month>.pdf` style layout
//! (see [`crate::fetch`]). Output mirrors it:
//!
//! ```text
//! <csv_dir>/<year token>/<month token>/<doc stem>.page<N>.table<M>.csv
//! ```
//!
//! The year token is path segment [`YEAR_SEGMENT`] and the month token is the
//! file name up to its first `.`. Neither is checked to be a date.

use crate::config::is_degenerate_dir;
use crate::error::Pdf2CsvError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Index of the `/`-separated input path segment used as the year token.
pub const YEAR_SEGMENT: usize = 1;

/// Output location for the tables of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// `<csv_dir>/<year>/<month>`
    pub sub_dir: PathBuf,
    /// Document file name without its extension.
    pub base_name: String,
}

impl OutputPlan {
    /// Derive the plan for `input` under `csv_dir`.
    pub fn for_document(csv_dir: &Path, input: &Path) -> Result<Self, Pdf2CsvError> {
        let path = input.to_string_lossy();
        let year = segment_token(&path, YEAR_SEGMENT)?;
        let month = file_token(&path);
        let base_name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            sub_dir: csv_dir.join(year).join(month),
            base_name,
        })
    }

    /// `<sub_dir>/<base_name>`, the prefix every table file of the document shares.
    pub fn csv_root(&self) -> PathBuf {
        self.sub_dir.join(&self.base_name)
    }

    /// Path of table `table_index` (0-based) of `page_num`; the file name
    /// numbers tables from 1.
    pub fn table_path(&self, page_num: usize, table_index: usize) -> PathBuf {
        table_file_path(&self.csv_root(), page_num, table_index)
    }
}

/// `<csv_root>.page<page_num>.table<table_index + 1>.csv`
pub fn table_file_path(csv_root: &Path, page_num: usize, table_index: usize) -> PathBuf {
    let mut name = OsString::from(csv_root.as_os_str());
    name.push(format!(".page{}.table{}.csv", page_num, table_index + 1));
    PathBuf::from(name)
}

/// Segment `index` of the `/`-split `path`, cut at its first `.`.
pub fn segment_token(path: &str, index: usize) -> Result<String, Pdf2CsvError> {
    path.split('/')
        .nth(index)
        .map(first_dot_part)
        .ok_or_else(|| Pdf2CsvError::PathSegmentMissing {
            path: path.to_string(),
            index,
        })
}

/// The last `/`-separated segment of `path`, cut at its first `.`.
pub fn file_token(path: &str) -> String {
    first_dot_part(path.rsplit('/').next().unwrap_or(path))
}

fn first_dot_part(segment: &str) -> String {
    segment.split('.').next().unwrap_or(segment).to_string()
}

/// Create `dir` and its parents. `name` labels the directory in errors.
///
/// An empty path is a no-op; `.` and `..` are refused.
pub fn make_dir(name: &str, dir: &Path) -> Result<(), Pdf2CsvError> {
    if is_degenerate_dir(dir) {
        return Err(Pdf2CsvError::InvalidDirectory {
            name: name.to_string(),
            path: dir.to_path_buf(),
        });
    }
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| Pdf2CsvError::CreateDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    debug!("{} ready: {}", name, dir.display());
    Ok(())
}
