//! PDF text extraction: read the text layer of selected pages via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which is
//! CPU-bound and not async-aware. `tokio::task::spawn_blocking` moves the work
//! onto a dedicated blocking thread so Tokio worker threads never stall while
//! a long order sheet is read.
//!
//! ## Binding order
//!
//! 1. `PDFIUM_LIB_PATH` (file or directory)
//! 2. a platform library in the working directory
//! 3. the system library search path

use crate::config::PageSelection;
use crate::error::ExtractError;
use crate::output::{DocumentMetadata, PageText};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load the PDF once and read its metadata plus the text of the selected
/// pages.
///
/// The bytes are moved into the blocking task; nothing is copied.
pub async fn extract_document(
    bytes: Vec<u8>,
    source_name: String,
    password: Option<String>,
    selection: PageSelection,
) -> Result<(DocumentMetadata, Vec<PageText>), ExtractError> {
    tokio::task::spawn_blocking(move || {
        extract_document_blocking(&bytes, &source_name, password.as_deref(), &selection)
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of [`extract_document`].
///
/// An empty selection on a non-empty document is `PageOutOfRange`.
pub fn extract_document_blocking(
    bytes: &[u8],
    source_name: &str,
    password: Option<&str>,
    selection: &PageSelection,
) -> Result<(DocumentMetadata, Vec<PageText>), ExtractError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, bytes, source_name, password)?;

    let metadata = read_metadata(&document);
    let total_pages = metadata.page_count;
    info!("PDF loaded: {} pages", total_pages);

    let page_indices = selection.to_indices(total_pages);
    if page_indices.is_empty() && total_pages > 0 {
        return Err(ExtractError::PageOutOfRange {
            page: first_requested_page(selection),
            total: total_pages,
        });
    }
    debug!("Selected {} pages for extraction", page_indices.len());

    let pages = read_pages(&document, &page_indices)?;
    Ok((metadata, pages))
}

fn read_pages(
    document: &PdfDocument<'_>,
    page_indices: &[usize],
) -> Result<Vec<PageText>, ExtractError> {
    let pages = document.pages();
    let total_pages = pages.len() as usize;
    let mut results = Vec::with_capacity(page_indices.len());

    for &idx in page_indices {
        if idx >= total_pages {
            warn!(
                "Skipping page {} (out of range, total={})",
                idx + 1,
                total_pages
            );
            continue;
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| ExtractError::ExtractionFailure {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let text = page.text().map_err(|e| ExtractError::ExtractionFailure {
            page: idx + 1,
            detail: format!("{:?}", e),
        })?;

        let page_text = PageText::from_text(idx + 1, &text.all());
        debug!("Extracted page {} → {} lines", idx + 1, page_text.lines.len());
        results.push(page_text);
    }

    Ok(results)
}

/// First page the caller asked for, used in `PageOutOfRange` reports.
fn first_requested_page(selection: &PageSelection) -> usize {
    match selection {
        PageSelection::All => 0,
        PageSelection::Single(p) => *p,
        PageSelection::Range(start, _) => *start,
        PageSelection::Set(pages) => pages.first().copied().unwrap_or(0),
    }
}

/// Read document metadata without extracting any text.
pub async fn extract_metadata(
    bytes: Vec<u8>,
    source_name: String,
    password: Option<String>,
) -> Result<DocumentMetadata, ExtractError> {
    tokio::task::spawn_blocking(move || {
        extract_metadata_blocking(&bytes, &source_name, password.as_deref())
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Blocking implementation of metadata extraction.
pub fn extract_metadata_blocking(
    bytes: &[u8],
    source_name: &str,
    password: Option<&str>,
) -> Result<DocumentMetadata, ExtractError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, bytes, source_name, password)?;

    Ok(read_metadata(&document))
}

fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();
    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// Bind to a pdfium library, most specific location first.
fn bind_pdfium() -> Result<Pdfium, ExtractError> {
    if let Ok(path) = std::env::var("PDFIUM_LIB_PATH") {
        if !path.is_empty() {
            let path = Path::new(&path);
            let lib = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(path)
            } else {
                path.to_path_buf()
            };
            debug!("Binding pdfium from PDFIUM_LIB_PATH: {}", lib.display());
            return Pdfium::bind_to_library(&lib)
                .map(Pdfium::new)
                .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{}: {:?}", lib.display(), e)));
        }
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{:?}", e)))
}

fn load_document<'a>(
    pdfium: &'a Pdfium,
    bytes: &'a [u8],
    source_name: &str,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, ExtractError> {
    pdfium.load_pdf_from_byte_slice(bytes, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                ExtractError::WrongPassword {
                    source_name: source_name.to_string(),
                }
            } else {
                ExtractError::PasswordRequired {
                    source_name: source_name.to_string(),
                }
            }
        } else {
            ExtractError::CorruptPdf {
                source_name: source_name.to_string(),
                detail: err_str,
            }
        }
    })
}
