//! Downloading the documents listed on an index page.
//!
//! ```text
//! index URL ─▶ index HTML (cached) ─▶ row links ─▶ <pdf_dir>/<link path>
//! ```
//!
//! Everything runs one request at a time. Links with their own scheme are
//! reported and skipped: only links relative to the index have a place in
//! the `<pdf_dir>/<year>/<month>.pdf` layout the extractor groups output by.

pub mod download;
pub mod harvest;

pub use download::{fetch_to, FetchOutcome};
pub use harvest::{harvest_links, resolve_link, DocumentLink};

use crate::config::FetchConfig;
use crate::error::Pdf2CsvError;
use reqwest::Url;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of [`fetch_all`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchReport {
    pub downloaded: Vec<PathBuf>,
    pub already_present: Vec<PathBuf>,
    pub absolute_links: Vec<String>,
}

/// Index page HTML: read from `config.index_cache` when that file exists,
/// otherwise downloaded (and saved there when a cache path is set).
///
/// # Errors
/// Download and write errors, or [`Pdf2CsvError::EmptyIndex`].
pub async fn load_index(
    client: &reqwest::Client,
    config: &FetchConfig,
) -> Result<String, Pdf2CsvError> {
    let cached = config.index_cache.as_ref().filter(|p| p.exists());
    let (html, source_name) = match cached {
        Some(path) => {
            debug!("Reading cached index {}", path.display());
            let html = tokio::fs::read_to_string(path).await.map_err(|e| {
                Pdf2CsvError::OpenFailed {
                    path: path.clone(),
                    detail: e.to_string(),
                }
            })?;
            (html, path.display().to_string())
        }
        None => {
            info!("Downloading index {}", config.index_url);
            let bytes =
                download::get_bytes(client, &config.index_url, config.timeout_secs).await?;
            if let Some(path) = &config.index_cache {
                download::write_atomically(path, &bytes)?;
            }
            (
                String::from_utf8_lossy(&bytes).into_owned(),
                config.index_url.clone(),
            )
        }
    };

    if html.trim().is_empty() {
        return Err(Pdf2CsvError::EmptyIndex { source_name });
    }
    Ok(html)
}

/// Download every document linked from the index page into `config.pdf_dir`.
///
/// Stops at the first failed download.
pub async fn fetch_all(config: &FetchConfig) -> Result<FetchReport, Pdf2CsvError> {
    let base = Url::parse(&config.index_url).map_err(|e| Pdf2CsvError::InvalidUrl {
        url: config.index_url.clone(),
        reason: e.to_string(),
    })?;
    let client = download::build_client(config.timeout_secs)?;

    let html = load_index(&client, config).await?;
    let links = harvest_links(&html);
    info!("{} document links", links.len());

    let mut report = FetchReport::default();
    for href in links {
        match resolve_link(&base, &href, &config.pdf_dir)? {
            DocumentLink::Absolute(url) => {
                debug!("Skipping absolute link {}", url);
                report.absolute_links.push(url);
            }
            DocumentLink::Relative { url, local } => {
                match fetch_to(&client, url.as_str(), &local, config.timeout_secs).await? {
                    FetchOutcome::Downloaded(bytes) => {
                        debug!("{} bytes -> {}", bytes, local.display());
                        report.downloaded.push(local);
                    }
                    FetchOutcome::Skipped => report.already_present.push(local),
                }
            }
        }
    }
    info!(
        "{} downloaded, {} already present, {} absolute links skipped",
        report.downloaded.len(),
        report.already_present.len(),
        report.absolute_links.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cached_index_is_read_without_network() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("html/index.html");
        std::fs::create_dir_all(cache.parent().unwrap()).unwrap();
        std::fs::write(&cache, "<table><tr><td><a href=\"2024/May.pdf\">May</a></td></tr></table>")
            .unwrap();

        let config = FetchConfig::builder("http://127.0.0.1:9/kondate/")
            .index_cache(Some(cache))
            .pdf_dir(tmp.path().join("PDF"))
            .timeout_secs(1)
            .build()
            .unwrap();
        let client = download::build_client(1).unwrap();
        let html = load_index(&client, &config).await.unwrap();
        assert_eq!(harvest_links(&html), vec!["2024/May.pdf"]);
    }

    #[tokio::test]
    async fn present_documents_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("index.html");
        std::fs::write(
            &cache,
            "<table><tbody>\
             <tr><td><a href=\"2024/May.pdf\">May</a></td></tr>\
             <tr><td><a href=\"https://elsewhere.example/x.pdf\">x</a></td></tr>\
             </tbody></table>",
        )
        .unwrap();
        let pdf_dir = tmp.path().join("PDF");
        std::fs::create_dir_all(pdf_dir.join("2024")).unwrap();
        std::fs::write(pdf_dir.join("2024/May.pdf"), b"%PDF").unwrap();

        let config = FetchConfig::builder("http://127.0.0.1:9/kondate/")
            .index_cache(Some(cache))
            .pdf_dir(&pdf_dir)
            .timeout_secs(1)
            .build()
            .unwrap();
        let report = fetch_all(&config).await.unwrap();
        assert!(report.downloaded.is_empty());
        assert_eq!(report.already_present, vec![pdf_dir.join("2024/May.pdf")]);
        assert_eq!(report.absolute_links, vec!["https://elsewhere.example/x.pdf"]);
    }

    #[tokio::test]
    async fn empty_cached_index_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("index.html");
        std::fs::write(&cache, "  \n").unwrap();
        let config = FetchConfig::builder("http://127.0.0.1:9/")
            .index_cache(Some(cache))
            .build()
            .unwrap();
        let client = download::build_client(1).unwrap();
        let err = load_index(&client, &config).await.unwrap_err();
        assert!(matches!(err, Pdf2CsvError::EmptyIndex { .. }));
    }
}
