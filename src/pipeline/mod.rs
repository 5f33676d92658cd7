//! Pipeline stages for PDF-table-to-CSV extraction.
//!
//! Each submodule implements one step; none of them touches pdfium or the
//! network, so all of them are tested without a PDF.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ (layout extractor) ──▶ table ──▶ doc_tables ──▶ paths
//! (globs)                          (cells)   (filter)       (CSV files)
//! ```
//!
//! 1. [`input`]     : expand and glob the user's file patterns
//! 2. [`normalize`] : canonical text for one cell
//! 3. [`table`]     : one rectangular grid of cells and its CSV rendering
//! 4. [`doc_tables`]: all tables of a document by page; size filter and summaries
//! 5. [`paths`]     : output directories and file names

pub mod doc_tables;
pub mod input;
pub mod normalize;
pub mod paths;
pub mod table;
