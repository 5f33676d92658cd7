//! Timing profile for `--profile` runs.
//!
//! Records wall-clock time per document and per page and writes it as JSON
//! when the batch ends, so slow documents and slow pages can be picked out
//! without attaching an external profiler.

use crate::error::Pdf2CsvError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timings of one batch.
#[derive(Debug, Default, Serialize)]
pub struct Profile {
    pub documents: Vec<DocumentTiming>,
    pub total_ms: u64,
}

/// Timings of one document.
#[derive(Debug, Serialize)]
pub struct DocumentTiming {
    pub path: PathBuf,
    pub extract_ms: u64,
    pub write_ms: u64,
    pub pages: Vec<PageTiming>,
}

/// Time spent extracting one page.
#[derive(Debug, Serialize)]
pub struct PageTiming {
    pub page: usize,
    pub tables: usize,
    pub ms: u64,
}

impl PageTiming {
    pub fn new(page: usize, tables: usize, elapsed: Duration) -> Self {
        Self {
            page,
            tables,
            ms: elapsed.as_millis() as u64,
        }
    }
}

impl Profile {
    /// Write as pretty JSON to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), Pdf2CsvError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Pdf2CsvError::Internal(format!("profile: {e}")))?;
        std::fs::write(path, json).map_err(|source| Pdf2CsvError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cpu.profile");
        let profile = Profile {
            documents: vec![DocumentTiming {
                path: PathBuf::from("PDF/2024/May.pdf"),
                extract_ms: 40,
                write_ms: 2,
                pages: vec![PageTiming::new(1, 2, Duration::from_millis(40))],
            }],
            total_ms: 45,
        };
        profile.write_to(&path).unwrap();

        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["total_ms"], 45);
        assert_eq!(v["documents"][0]["pages"][0]["tables"], 2);
    }
}
