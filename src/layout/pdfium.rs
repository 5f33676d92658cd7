//! pdfium-backed table detection.
//!
//! pdfium reports a page's text as segments: runs of characters sharing a
//! baseline and style, each with a bounding box. Tables are recovered from
//! those boxes alone:
//!
//! 1. runs are grouped into lines by vertical overlap, top to bottom;
//! 2. consecutive lines with at least two separate runs form a block;
//! 3. in a block of two or more lines the horizontal extents of all runs are
//!    merged into disjoint column intervals;
//! 4. every run lands in the column containing it, runs sharing a cell are
//!    joined with a space.
//!
//! Ruling lines, spanning cells and rotated text are not looked at.

use super::{LayoutExtractor, PageSource, RawCell, RawTable};
use crate::error::Pdf2CsvError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Runs closer than this fraction of their height are one run.
const MERGE_GAP_RATIO: f32 = 0.25;

/// [`LayoutExtractor`] over a bound pdfium library.
pub struct PdfiumExtractor {
    pdfium: Pdfium,
}

impl PdfiumExtractor {
    /// Bind pdfium from `lib_path` (a library file or the directory holding
    /// it), falling back to the system library.
    pub fn new(lib_path: Option<&Path>) -> Result<Self, Pdf2CsvError> {
        let bindings = match lib_path {
            Some(p) if p.is_dir() => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(p))
            }
            Some(p) => Pdfium::bind_to_library(p),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| Pdf2CsvError::PdfiumBindingFailed(format!("{e:?}")))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl LayoutExtractor for PdfiumExtractor {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PageSource + 'a>, Pdf2CsvError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Pdf2CsvError::OpenFailed {
                path: path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;
        let page_count = document.pages().len() as usize;
        debug!("Opened {}: {} pages", path.display(), page_count);
        Ok(Box::new(PdfiumPages {
            document,
            page_count,
            path: path.to_path_buf(),
        }))
    }
}

struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
    page_count: usize,
    path: PathBuf,
}

impl PageSource for PdfiumPages<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_tables(&mut self, page_num: usize) -> Result<Vec<RawTable>, String> {
        if page_num == 0 || page_num > self.page_count {
            return Err(format!(
                "page {page_num} out of range (document has {} pages)",
                self.page_count
            ));
        }
        let page = self
            .document
            .pages()
            .get((page_num - 1) as u16)
            .map_err(|e| format!("{e:?}"))?;
        let text = page.text().map_err(|e| format!("{e:?}"))?;

        let runs: Vec<TextRun> = text
            .segments()
            .iter()
            .filter_map(|segment| {
                let bounds = segment.bounds();
                TextRun::new(
                    segment.text(),
                    bounds.left().value,
                    bounds.right().value,
                    bounds.top().value,
                    bounds.bottom().value,
                )
            })
            .collect();
        trace!(
            "{} page {}: {} text runs",
            self.path.display(),
            page_num,
            runs.len()
        );
        Ok(detect_tables(runs))
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────

/// A run of text with its box in PDF user space (y grows upwards).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextRun {
    text: String,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl TextRun {
    /// `None` for whitespace-only runs, which carry no cell content.
    pub(crate) fn new(text: String, left: f32, right: f32, top: f32, bottom: f32) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text,
            left: left.min(right),
            right: left.max(right),
            top: top.max(bottom),
            bottom: top.min(bottom),
        })
    }

    fn height(&self) -> f32 {
        self.top - self.bottom
    }

    fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// Group runs into tables; see the module docs for the rules.
pub(crate) fn detect_tables(runs: Vec<TextRun>) -> Vec<RawTable> {
    let lines = group_lines(runs);
    let mut tables = Vec::new();
    let mut block: Vec<Vec<TextRun>> = Vec::new();
    for line in lines {
        if line.len() >= 2 {
            block.push(line);
        } else {
            flush_block(&mut block, &mut tables);
        }
    }
    flush_block(&mut block, &mut tables);
    tables
}

fn flush_block(block: &mut Vec<Vec<TextRun>>, tables: &mut Vec<RawTable>) {
    if block.len() >= 2 {
        if let Some(table) = block_to_table(block) {
            tables.push(table);
        }
    }
    block.clear();
}

/// Lines top to bottom, each sorted left to right with touching runs merged.
fn group_lines(mut runs: Vec<TextRun>) -> Vec<Vec<TextRun>> {
    runs.sort_by(|a, b| b.top.total_cmp(&a.top).then(a.left.total_cmp(&b.left)));

    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    for run in runs {
        match lines.last_mut() {
            Some(line) if line.iter().any(|r| same_line(r, &run)) => line.push(run),
            _ => lines.push(vec![run]),
        }
    }
    lines.into_iter().map(merge_adjacent).collect()
}

/// Two runs share a line when each one's vertical centre lies inside the other.
fn same_line(a: &TextRun, b: &TextRun) -> bool {
    let inside = |c: f32, r: &TextRun| c >= r.bottom && c <= r.top;
    inside(a.center_y(), b) && inside(b.center_y(), a)
}

fn merge_adjacent(mut line: Vec<TextRun>) -> Vec<TextRun> {
    line.sort_by(|a, b| a.left.total_cmp(&b.left));
    let mut merged: Vec<TextRun> = Vec::with_capacity(line.len());
    for run in line {
        match merged.last_mut() {
            Some(prev) if run.left - prev.right <= prev.height().max(run.height()) * MERGE_GAP_RATIO => {
                prev.text.push_str(&run.text);
                prev.right = prev.right.max(run.right);
                prev.top = prev.top.max(run.top);
                prev.bottom = prev.bottom.min(run.bottom);
            }
            _ => merged.push(run),
        }
    }
    merged
}

fn block_to_table(block: &[Vec<TextRun>]) -> Option<RawTable> {
    let mut spans: Vec<(f32, f32)> = block
        .iter()
        .flatten()
        .map(|r| (r.left, r.right))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut columns: Vec<(f32, f32)> = Vec::new();
    for (left, right) in spans {
        match columns.last_mut() {
            Some(col) if left <= col.1 => col.1 = col.1.max(right),
            _ => columns.push((left, right)),
        }
    }
    if columns.len() < 2 {
        return None;
    }

    let width = columns.len();
    let cells: Vec<Vec<RawCell>> = block
        .iter()
        .map(|line| {
            let mut row = vec![RawCell::default(); width];
            for run in line {
                let x = columns
                    .iter()
                    .position(|&(l, r)| run.left >= l && run.left <= r)
                    .unwrap_or(width - 1);
                let cell = &mut row[x].text;
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(&run.text);
            }
            row
        })
        .collect();

    Some(RawTable {
        width,
        height: cells.len(),
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A run of `text` whose box is `[x, x + w]` wide on the line with top `y`.
    fn run(text: &str, x: f32, w: f32, y: f32) -> TextRun {
        TextRun::new(text.to_string(), x, x + w, y, y - 10.0).unwrap()
    }

    fn texts(table: &RawTable) -> Vec<Vec<&str>> {
        table
            .cells
            .iter()
            .map(|r| r.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn whitespace_runs_are_dropped() {
        assert!(TextRun::new("  ".into(), 0.0, 5.0, 10.0, 0.0).is_none());
    }

    #[test]
    fn aligned_lines_form_one_table() {
        let runs = vec![
            run("Day", 10.0, 20.0, 700.0),
            run("Menu", 100.0, 40.0, 700.0),
            run("Mon", 10.0, 20.0, 685.0),
            run("Curry", 100.0, 35.0, 685.0),
            run("Tue", 10.0, 20.0, 670.0),
            run("Udon", 100.0, 30.0, 670.0),
        ];
        let tables = detect_tables(runs);
        assert_eq!(tables.len(), 1);
        assert_eq!((tables[0].width, tables[0].height), (2, 3));
        assert_eq!(
            texts(&tables[0]),
            vec![vec!["Day", "Menu"], vec!["Mon", "Curry"], vec!["Tue", "Udon"]]
        );
    }

    #[test]
    fn single_run_lines_split_tables() {
        let runs = vec![
            run("a", 10.0, 10.0, 700.0),
            run("b", 100.0, 10.0, 700.0),
            run("c", 10.0, 10.0, 685.0),
            run("d", 100.0, 10.0, 685.0),
            run("A paragraph line", 10.0, 200.0, 650.0),
            run("e", 10.0, 10.0, 620.0),
            run("f", 100.0, 10.0, 620.0),
            run("g", 200.0, 10.0, 620.0),
            run("h", 10.0, 10.0, 605.0),
            run("i", 200.0, 10.0, 605.0),
        ];
        let tables = detect_tables(runs);
        assert_eq!(tables.len(), 2);
        assert_eq!((tables[1].width, tables[1].height), (3, 2));
        assert_eq!(texts(&tables[1])[1], vec!["h", "", "i"]);
    }

    #[test]
    fn touching_runs_merge_into_one_cell() {
        let runs = vec![
            run("Cur", 100.0, 15.0, 700.0),
            run("ry", 115.5, 10.0, 700.0),
            run("Mon", 10.0, 20.0, 700.0),
            run("x", 10.0, 10.0, 685.0),
            run("y", 100.0, 10.0, 685.0),
        ];
        let tables = detect_tables(runs);
        assert_eq!(texts(&tables[0])[0], vec!["Mon", "Curry"]);
    }

    #[test]
    fn lone_line_is_not_a_table() {
        let runs = vec![run("a", 10.0, 10.0, 700.0), run("b", 100.0, 10.0, 700.0)];
        assert!(detect_tables(runs).is_empty());
    }
}
