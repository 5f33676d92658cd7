//! One detected table as a grid of normalised strings.

use crate::error::Pdf2CsvError;
use crate::layout::RawTable;
use crate::pipeline::normalize::normalize;

/// A table's cells, row-major. Every row should have the width of row 0;
/// [`Table::to_csv`] refuses to emit a table where that does not hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from rows of raw text, normalising every cell.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| normalize(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// Build a table from a layout extractor grid, normalising every cell.
    ///
    /// The declared `width` x `height` sizes the grid: short rows are padded
    /// with empty cells and rows the extractor declared but never filled stay
    /// empty. Cells beyond the declared width are kept, so any disagreement
    /// between the declared and actual shape surfaces in [`Table::to_csv`].
    pub fn from_raw(raw: &RawTable) -> Self {
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); raw.height];
        for (y, raw_row) in raw.cells.iter().enumerate() {
            let mut row = vec![String::new(); raw.width];
            for (x, cell) in raw_row.iter().enumerate() {
                let text = normalize(&cell.text);
                match row.get_mut(x) {
                    Some(slot) => *slot = text,
                    None => row.push(text),
                }
            }
            match rows.get_mut(y) {
                Some(slot) => *slot = row,
                None => rows.push(row),
            }
        }
        Self { rows }
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of cells in row 0; 0 for a table without rows.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// `(width, height)`, `(0, 0)` for a table without rows.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Whether the table is at least `min_width` wide and `min_height` high.
    ///
    /// A table without rows only passes when both thresholds are 0.
    pub fn meets(&self, min_width: usize, min_height: usize) -> bool {
        let (w, h) = self.dimensions();
        w >= min_width && h >= min_height
    }

    /// Render as comma-separated text, one `\n`-terminated record per row.
    ///
    /// Fields containing a comma, quote or line break are quoted with inner
    /// quotes doubled. A record with no bytes is written as `""` so it is not
    /// a blank line; a zero-width table therefore reads back as rows holding
    /// one empty field each.
    ///
    /// # Errors
    /// [`Pdf2CsvError::RaggedTable`] if any row's length differs from row 0's.
    /// Nothing is rendered in that case.
    pub fn to_csv(&self) -> Result<String, Pdf2CsvError> {
        let (w, h) = self.dimensions();
        if let Some((row, cells)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != w) {
            return Err(Pdf2CsvError::RaggedTable {
                width: w,
                height: h,
                row,
                len: cells.len(),
            });
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::<u8>::new());
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| Pdf2CsvError::Internal(format!("csv: {e}")))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Pdf2CsvError::Internal(format!("csv: {}", e.error())))?;
        String::from_utf8(bytes).map_err(|e| Pdf2CsvError::Internal(format!("csv utf-8: {e}")))
    }
}
