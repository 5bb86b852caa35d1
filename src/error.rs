//! Error types for the pdf2items library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the document cannot be parsed at all
//!   (bad input file, wrong password, pdfium could not read a page). Returned
//!   as `Err(ExtractError)` from the top-level `extract*` functions.
//!
//! * [`LineError`] — **Non-fatal**: one order-sheet row looked like an item
//!   but carried a number we could not use (a `7/0` fraction, a quantity
//!   too large for `u32`). The row is dropped, the error is stored in
//!   [`crate::output::ExtractionOutput::dropped`], and every other row is
//!   still parsed.
//!
//! A document in which no row matched at all is *not* an error: it yields an
//! empty record list, which callers can tell apart from a fatal failure.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2items library.
///
/// Row-level failures use [`LineError`] and never propagate here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The bytes were read, but they are not a PDF.
    #[error("Input is not a valid PDF: '{source_name}'\nFirst bytes: {magic:?}")]
    NotAPdf { source_name: String, magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{source_name}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { source_name: String, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{source_name}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { source_name: String },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{source_name}'")]
    WrongPassword { source_name: String },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not produce the text layer of a page.
    ///
    /// Aborts the whole document: rows already parsed from earlier pages are
    /// not returned.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailure { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or settings validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium for your platform and either:\n\
  • place it next to the executable / in the working directory, or\n\
  • set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single order-sheet row.
///
/// Only produced for rows that matched one of the row grammars; rows that
/// match nothing (headers, footers, page markers) are skipped silently.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum LineError {
    /// A width or height could not be turned into an exact value.
    #[error("Page {page}: malformed dimension '{value}' ({reason}) in row: {line}")]
    MalformedDimension {
        page: usize,
        line: String,
        value: String,
        reason: String,
    },

    /// The quantity column is not a usable non-negative integer.
    #[error("Page {page}: malformed quantity '{value}' in row: {line}")]
    MalformedQuantity {
        page: usize,
        line: String,
        value: String,
    },
}

impl LineError {
    /// 1-based page the dropped row came from.
    pub fn page(&self) -> usize {
        match self {
            LineError::MalformedDimension { page, .. } | LineError::MalformedQuantity { page, .. } => {
                *page
            }
        }
    }

    /// The dropped row's text, after line cleanup.
    pub fn line(&self) -> &str {
        match self {
            LineError::MalformedDimension { line, .. } | LineError::MalformedQuantity { line, .. } => {
                line
            }
        }
    }
}
