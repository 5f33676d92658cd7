//! The seam to whatever finds tables on a page.
//!
//! The extraction driver only needs two things from a document: how many
//! pages it has, and for one page the grids of text it recognised as tables.
//! [`LayoutExtractor`] opens a document and hands back a [`PageSource`]
//! answering exactly that. [`PdfiumExtractor`] is the implementation the
//! binary uses; tests plug in in-memory sources.

pub mod pdfium;

pub use self::pdfium::PdfiumExtractor;

use crate::error::Pdf2CsvError;
use std::path::Path;

/// One cell as reported by the extractor, before normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
}

impl RawCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A table as reported by the extractor: declared size plus row-major cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<RawCell>>,
}

/// Opens documents for table extraction.
pub trait LayoutExtractor {
    /// Open the document at `path`.
    ///
    /// # Errors
    /// [`Pdf2CsvError::OpenFailed`] if the file cannot be opened or its page
    /// tree cannot be read.
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PageSource + 'a>, Pdf2CsvError>;
}

/// An opened document.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Tables detected on 1-indexed page `page_num`, in detection order.
    ///
    /// The error string is wrapped by the driver into
    /// [`Pdf2CsvError::PageExtraction`] together with the path and page.
    fn page_tables(&mut self, page_num: usize) -> Result<Vec<RawTable>, String>;
}
