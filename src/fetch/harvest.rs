//! Document links on an index page.
//!
//! The index is an HTML table with one document per row. The first anchor of
//! every `tbody > tr` row is taken; rows without an anchor or with an empty
//! `href` are skipped. HTML parsers add the implicit `<tbody>`, so tables
//! written without one are found as well.

use crate::error::Pdf2CsvError;
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use std::path::{Component, Path, PathBuf};

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody > tr").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// `href` values of the first anchor in each table row, in document order.
pub fn harvest_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ROW)
        .filter_map(|row| row.select(&ANCHOR).next())
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// Where a harvested link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLink {
    /// A full URL (`scheme://...`). It has no place in the local layout.
    Absolute(String),
    /// A path relative to the index page, downloaded to `local`.
    Relative { url: Url, local: PathBuf },
}

/// Resolve `href` against the index page at `base`.
///
/// Relative links keep their path below `pdf_dir`, so `2024/April.pdf`
/// lands in `<pdf_dir>/2024/April.pdf`.
///
/// # Errors
/// [`Pdf2CsvError::InvalidUrl`] if the link cannot be joined onto `base` or
/// would leave `pdf_dir`.
pub fn resolve_link(base: &Url, href: &str, pdf_dir: &Path) -> Result<DocumentLink, Pdf2CsvError> {
    if href.contains("://") {
        return Ok(DocumentLink::Absolute(href.to_string()));
    }
    let url = base.join(href).map_err(|e| Pdf2CsvError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })?;

    let relative = Path::new(href.trim_start_matches('/'));
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || relative.as_os_str().is_empty() {
        return Err(Pdf2CsvError::InvalidUrl {
            url: href.to_string(),
            reason: format!("not a path below {}", pdf_dir.display()),
        });
    }
    Ok(DocumentLink::Relative {
        url,
        local: pdf_dir.join(relative),
    })
}
