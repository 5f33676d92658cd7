//! Batch table extraction: documents in, CSV files out.
//!
//! Work is strictly sequential. Documents are processed in sorted path order,
//! pages in ascending order, and every failure is single-attempt. A document
//! either has all of its retained tables written or none of them: CSV text is
//! rendered for the whole document before the first file is created.

use crate::config::{ExtractionConfig, PageRange};
use crate::error::Pdf2CsvError;
use crate::layout::{LayoutExtractor, PageSource};
use crate::pipeline::doc_tables::DocumentTableSet;
use crate::pipeline::input::{file_size_mb, patterns_to_paths};
use crate::pipeline::paths::{make_dir, table_file_path, OutputPlan};
use crate::pipeline::table::Table;
use crate::profile::{DocumentTiming, PageTiming, Profile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Outcome of one processed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub size_mb: f64,
    /// Pages extracted (after clamping), with or without tables.
    pub pages: usize,
    /// Tables kept by the size filter, one CSV file each.
    pub tables: usize,
    pub seconds: f64,
    pub csv_root: PathBuf,
}

/// A document skipped under `continue_on_error`.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub skipped: Vec<SkippedDocument>,
}

impl BatchReport {
    /// CSV files written over the whole batch.
    pub fn tables_written(&self) -> usize {
        self.documents.iter().map(|d| d.tables).sum()
    }
}

/// Extract the tables of every document matched by `patterns`.
///
/// Creates the CSV root, resolves the patterns, then for each document:
/// extract → filter → log one summary line → write CSV files. The first
/// failing document aborts the batch unless
/// [`ExtractionConfig::continue_on_error`] is set.
///
/// # Errors
/// Pattern, document, page, ragged-table and file-system errors; see
/// [`Pdf2CsvError`].
pub fn run(
    patterns: &[String],
    config: &ExtractionConfig,
    extractor: &dyn LayoutExtractor,
) -> Result<BatchReport, Pdf2CsvError> {
    let batch_start = Instant::now();
    make_dir("CSV directory", &config.csv_dir)?;

    let paths = patterns_to_paths(patterns, config.home_dir.as_deref())?;
    info!("{} PDF files", paths.len());

    let mut profile = config.profile_path.as_ref().map(|_| Profile::default());
    let mut report = BatchReport::default();
    let total = paths.len();

    for (i, path) in paths.iter().enumerate() {
        let timing = profile.as_mut().map(|p| &mut p.documents);
        match process_document(path, i + 1, total, config, extractor, timing) {
            Ok(doc) => report.documents.push(doc),
            Err(e) if config.continue_on_error => {
                error!("Skipping {}: {}", path.display(), e);
                report.skipped.push(SkippedDocument {
                    path: path.clone(),
                    error: e.to_string(),
                });
            }
            Err(e) => {
                finish_profile(profile, config, batch_start)?;
                return Err(e);
            }
        }
    }

    finish_profile(profile, config, batch_start)?;
    info!(
        "Done: {} documents, {} CSV files, {} skipped, {:.1} sec",
        report.documents.len(),
        report.tables_written(),
        report.skipped.len(),
        batch_start.elapsed().as_secs_f64()
    );
    Ok(report)
}

fn finish_profile(
    profile: Option<Profile>,
    config: &ExtractionConfig,
    batch_start: Instant,
) -> Result<(), Pdf2CsvError> {
    if let (Some(mut profile), Some(path)) = (profile, config.profile_path.as_ref()) {
        profile.total_ms = batch_start.elapsed().as_millis() as u64;
        profile.write_to(path)?;
        info!("Wrote profile {}", path.display());
    }
    Ok(())
}

/// Extract, filter, summarise and save one document.
fn process_document(
    path: &Path,
    index: usize,
    total: usize,
    config: &ExtractionConfig,
    extractor: &dyn LayoutExtractor,
    timings: Option<&mut Vec<DocumentTiming>>,
) -> Result<DocumentReport, Pdf2CsvError> {
    // ── Step 1: Extract ──────────────────────────────────────────────────
    let t0 = Instant::now();
    let mut page_timings = Vec::new();
    let tables = extract_with_timings(
        extractor,
        path,
        config.first_page,
        config.last_page,
        &mut page_timings,
    )?;
    let extract_duration = t0.elapsed();
    let num_pages = tables.page_count();

    // ── Step 2: Filter and summarise ─────────────────────────────────────
    let tables = tables.filter(config.min_width, config.min_height);
    let size_mb = file_size_mb(path)?;
    info!(
        "{:3} of {}: {:4.1} MB {:3} pages {:4.1} sec {:?} {}",
        index,
        total,
        size_mb,
        num_pages,
        extract_duration.as_secs_f64(),
        path,
        tables.describe(config.verbosity).trim_end()
    );

    // ── Step 3: Write CSV files ──────────────────────────────────────────
    let write_start = Instant::now();
    let plan = OutputPlan::for_document(&config.csv_dir, path)?;
    make_dir("CSV sub directory", &plan.sub_dir)?;
    let csv_root = plan.csv_root();
    debug!("CSV root {}", csv_root.display());
    let written = save_csv_files(&tables, path, &csv_root)?;

    if let Some(timings) = timings {
        timings.push(DocumentTiming {
            path: path.to_path_buf(),
            extract_ms: extract_duration.as_millis() as u64,
            write_ms: write_start.elapsed().as_millis() as u64,
            pages: page_timings,
        });
    }

    Ok(DocumentReport {
        path: path.to_path_buf(),
        size_mb,
        pages: num_pages,
        tables: written,
        seconds: t0.elapsed().as_secs_f64(),
        csv_root,
    })
}

/// Extract the tables on pages `first_page..=last_page` of the document at `path`.
///
/// The range is clamped to the document: pages below 1 start at 1, pages past
/// the end stop at the last page. A request lying entirely outside the
/// document yields an empty set and a warning.
///
/// # Errors
/// [`Pdf2CsvError::OpenFailed`] if the document cannot be opened,
/// [`Pdf2CsvError::PageExtraction`] naming the first page that failed. No
/// partial set is returned.
pub fn extract_tables(
    extractor: &dyn LayoutExtractor,
    path: &Path,
    first_page: usize,
    last_page: usize,
) -> Result<DocumentTableSet, Pdf2CsvError> {
    extract_with_timings(extractor, path, first_page, last_page, &mut Vec::new())
}

fn extract_with_timings(
    extractor: &dyn LayoutExtractor,
    path: &Path,
    first_page: usize,
    last_page: usize,
    timings: &mut Vec<PageTiming>,
) -> Result<DocumentTableSet, Pdf2CsvError> {
    let mut source = extractor.open(path)?;
    let total_pages = source.page_count();

    let mut result = DocumentTableSet::new();
    let Some(range) = PageRange::clamp(first_page, last_page, total_pages) else {
        warn!(
            "{}: pages {}-{} requested but document has {} pages",
            path.display(),
            first_page,
            last_page,
            total_pages
        );
        return Ok(result);
    };

    for page_num in range.pages() {
        let page_start = Instant::now();
        let tables = extract_page_tables(source.as_mut(), page_num).map_err(|detail| {
            Pdf2CsvError::PageExtraction {
                path: path.to_path_buf(),
                page: page_num,
                detail,
            }
        })?;
        debug!("{} page {}: {} tables", path.display(), page_num, tables.len());
        timings.push(PageTiming::new(page_num, tables.len(), page_start.elapsed()));
        result.set_page_tables(page_num, tables);
    }
    Ok(result)
}

fn extract_page_tables(
    source: &mut (dyn PageSource + '_),
    page_num: usize,
) -> Result<Vec<Table>, String> {
    let raw = source.page_tables(page_num)?;
    Ok(raw.iter().map(Table::from_raw).collect())
}

/// Write every table in `tables` to `<csv_root>.page<N>.table<M>.csv`.
///
/// All tables are rendered first; a ragged table fails the call before any
/// file is created, with an error naming `document`, the page and the table.
/// Returns the number of files written.
pub fn save_csv_files(
    tables: &DocumentTableSet,
    document: &Path,
    csv_root: &Path,
) -> Result<usize, Pdf2CsvError> {
    let mut rendered = Vec::with_capacity(tables.table_count());
    for (page_num, page_tables) in tables.iter() {
        for (i, table) in page_tables.iter().enumerate() {
            let contents = table.to_csv().map_err(|e| Pdf2CsvError::TableRender {
                path: document.to_path_buf(),
                page: page_num,
                table: i + 1,
                source: Box::new(e),
            })?;
            rendered.push((table_file_path(csv_root, page_num, i), contents));
        }
    }

    for (csv_path, contents) in &rendered {
        std::fs::write(csv_path, contents).map_err(|source| Pdf2CsvError::WriteFailed {
            path: csv_path.clone(),
            source,
        })?;
        debug!("Wrote {}", csv_path.display());
    }
    Ok(rendered.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{RawCell, RawTable};
    use std::collections::HashMap;

    /// Pages keyed by number; a page mapped to `Err` fails extraction.
    struct FakeDoc {
        pages: usize,
        tables: HashMap<usize, Result<Vec<RawTable>, String>>,
    }

    struct FakeSource<'a>(&'a FakeDoc);

    impl PageSource for FakeSource<'_> {
        fn page_count(&self) -> usize {
            self.0.pages
        }

        fn page_tables(&mut self, page_num: usize) -> Result<Vec<RawTable>, String> {
            self.0.tables.get(&page_num).cloned().unwrap_or(Ok(Vec::new()))
        }
    }

    impl LayoutExtractor for FakeDoc {
        fn open<'a>(&'a self, _path: &Path) -> Result<Box<dyn PageSource + 'a>, Pdf2CsvError> {
            Ok(Box::new(FakeSource(self)))
        }
    }

    fn raw(w: usize, h: usize) -> RawTable {
        RawTable {
            width: w,
            height: h,
            cells: (0..h)
                .map(|y| (0..w).map(|x| RawCell::new(format!(" {y}-{x} "))).collect())
                .collect(),
        }
    }

    #[test]
    fn clamps_page_range() {
        let doc = FakeDoc {
            pages: 3,
            tables: HashMap::from([(3, Ok(vec![raw(2, 2)]))]),
        };
        let set = extract_tables(&doc, Path::new("PDF/2024/x.pdf"), 0, 10_000).unwrap();
        assert_eq!(set.page_numbers(), vec![1, 2, 3]);
        assert_eq!(set.page_tables(3)[0].rows()[1], vec!["1-0", "1-1"]);
    }

    #[test]
    fn range_outside_document_is_empty() {
        let doc = FakeDoc {
            pages: 2,
            tables: HashMap::new(),
        };
        let set = extract_tables(&doc, Path::new("a/b/c.pdf"), 5, 9).unwrap();
        assert_eq!(set.page_count(), 0);
    }

    #[test]
    fn page_failure_names_document_and_page() {
        let doc = FakeDoc {
            pages: 4,
            tables: HashMap::from([(1, Ok(vec![raw(2, 2)])), (3, Err("broken xref".into()))]),
        };
        let err = extract_tables(&doc, Path::new("PDF/2024/x.pdf"), 1, 4).unwrap_err();
        match err {
            Pdf2CsvError::PageExtraction { path, page, detail } => {
                assert_eq!(path, PathBuf::from("PDF/2024/x.pdf"));
                assert_eq!(page, 3);
                assert_eq!(detail, "broken xref");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_table_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("doc");
        let mut set = DocumentTableSet::new();
        set.set_page_tables(1, vec![Table::from_rows([vec!["a", "b"], vec!["c", "d"]])]);
        set.set_page_tables(2, vec![Table::from_rows([vec!["a", "b", "c"], vec!["d", "e"]])]);

        let err = save_csv_files(&set, Path::new("PDF/2024/x.pdf"), &root).unwrap_err();
        match err {
            Pdf2CsvError::TableRender {
                path,
                page,
                table,
                source,
            } => {
                assert_eq!(path, PathBuf::from("PDF/2024/x.pdf"));
                assert_eq!((page, table), (2, 1));
                assert!(matches!(*source, Pdf2CsvError::RaggedTable { row: 1, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn save_names_files_by_page_and_table() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("report");
        let mut set = DocumentTableSet::new();
        set.set_page_tables(
            5,
            vec![
                Table::from_rows([vec!["a", "b"]]),
                Table::from_rows([vec!["c"]]),
            ],
        );
        assert_eq!(save_csv_files(&set, Path::new("PDF/2024/report.pdf"), &root).unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("report.page5.table1.csv")).unwrap(),
            "a,b\n"
        );
        assert!(tmp.path().join("report.page5.table2.csv").exists());
    }
}
