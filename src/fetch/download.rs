//! Single-attempt HTTP downloads.
//!
//! A destination that already exists is never fetched again. New downloads
//! are written to a temporary file in the destination directory and renamed
//! into place once complete, so an interrupted run never leaves a truncated
//! document behind that a later run would mistake for a finished one.

use crate::error::Pdf2CsvError;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// What [`fetch_to`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already existed.
    Skipped,
    /// Downloaded this many bytes.
    Downloaded(u64),
}

/// HTTP client with a per-request timeout.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, Pdf2CsvError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2CsvError::Internal(format!("HTTP client: {e}")))
}

/// GET `url` and return the body.
pub async fn get_bytes(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<Vec<u8>, Pdf2CsvError> {
    let map_err = |e: reqwest::Error| {
        if e.is_timeout() {
            Pdf2CsvError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2CsvError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(map_err)?;
    if !response.status().is_success() {
        return Err(Pdf2CsvError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }
    let bytes = response.bytes().await.map_err(map_err)?;
    Ok(bytes.to_vec())
}

/// Download `url` to `dest` unless `dest` already exists.
///
/// Parent directories of `dest` are created as needed.
pub async fn fetch_to(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    timeout_secs: u64,
) -> Result<FetchOutcome, Pdf2CsvError> {
    if dest.exists() {
        debug!("Already downloaded: {}", dest.display());
        return Ok(FetchOutcome::Skipped);
    }

    info!("Downloading {} -> {}", url, dest.display());
    let bytes = get_bytes(client, url, timeout_secs).await?;
    write_atomically(dest, &bytes)?;
    Ok(FetchOutcome::Downloaded(bytes.len() as u64))
}

/// Write `bytes` to a temp file beside `dest`, then rename it to `dest`.
pub fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<(), Pdf2CsvError> {
    let write_err = |source: std::io::Error| Pdf2CsvError::WriteFailed {
        path: dest.to_path_buf(),
        source,
    };

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|source| Pdf2CsvError::CreateDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(dest).map_err(|e| write_err(e.error))?;
    Ok(())
}
