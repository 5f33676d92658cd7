//! All tables found across the pages of one document.

use crate::pipeline::table::Table;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

/// Tables of one document keyed by 1-indexed page number.
///
/// Built page by page during extraction and read-only afterwards;
/// [`DocumentTableSet::filter`] returns a new set. Keys are kept in a
/// `BTreeMap`, so every walk over pages is in ascending numeric order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTableSet {
    page_tables: BTreeMap<usize, Vec<Table>>,
}

impl DocumentTableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tables of `page_num`, replacing any earlier entry.
    ///
    /// An empty list is kept: the page was processed and had no tables.
    pub fn set_page_tables(&mut self, page_num: usize, tables: Vec<Table>) {
        self.page_tables.insert(page_num, tables);
    }

    /// Tables of `page_num`, empty if the page has none or was not processed.
    pub fn page_tables(&self, page_num: usize) -> &[Table] {
        self.page_tables
            .get(&page_num)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Page numbers with an entry, ascending.
    pub fn page_numbers(&self) -> Vec<usize> {
        self.page_tables.keys().copied().collect()
    }

    /// Number of pages with an entry, including pages without tables.
    pub fn page_count(&self) -> usize {
        self.page_tables.len()
    }

    /// Total tables over all pages.
    pub fn table_count(&self) -> usize {
        self.page_tables.values().map(Vec::len).sum()
    }

    /// `(page_num, tables)` in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Table])> {
        self.page_tables.iter().map(|(&p, t)| (p, t.as_slice()))
    }

    /// Tables at least `min_width` cells wide and `min_height` rows high.
    ///
    /// Relative order within a page is kept. Pages left without tables are
    /// not present in the result. `self` is not modified.
    pub fn filter(&self, min_width: usize, min_height: usize) -> DocumentTableSet {
        let page_tables = self
            .page_tables
            .iter()
            .filter_map(|(&page_num, tables)| {
                let kept: Vec<Table> = tables
                    .iter()
                    .filter(|t| t.meets(min_width, min_height))
                    .cloned()
                    .collect();
                (!kept.is_empty()).then_some((page_num, kept))
            })
            .collect();
        DocumentTableSet { page_tables }
    }

    /// Human-readable summary; each level adds to the one below.
    ///
    /// ```text
    ///                             (level 0)
    /// 3 pages 2 tables            (level 1)
    ///    page 2: 2 tables         (level 2)
    ///       table 1: 4 x 3        (level 3)
    ///         ["a", , "c"]        (level 4)
    /// ```
    ///
    /// Level 0, or a set without tables, gives a single newline.
    pub fn describe(&self, level: u8) -> String {
        let total = self.table_count();
        if level == 0 || total == 0 {
            return "\n".to_string();
        }
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_summary(&mut out, level, total);
        out
    }

    fn write_summary(&self, out: &mut String, level: u8, total: usize) -> fmt::Result {
        writeln!(out, "{} pages {} tables", self.page_count(), total)?;
        if level <= 1 {
            return Ok(());
        }
        for (page_num, tables) in self.iter().filter(|(_, t)| !t.is_empty()) {
            writeln!(out, "   page {}: {} tables", page_num, tables.len())?;
            if level <= 2 {
                continue;
            }
            for (i, table) in tables.iter().enumerate() {
                let (w, h) = table.dimensions();
                writeln!(out, "      table {}: {} x {}", i + 1, w, h)?;
                if level <= 3 || table.is_empty() {
                    continue;
                }
                for row in table.rows() {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|c| if c.is_empty() { String::new() } else { format!("{c:?}") })
                        .collect();
                    writeln!(out, "        [{}]", cells.join(", "))?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for DocumentTableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(1))
    }
}
