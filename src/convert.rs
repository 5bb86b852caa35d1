//! Eager (full-document) extraction entry points.
//!
//! These functions wait for every page, then return an
//! [`ExtractionOutput`] holding all records, the dropped rows and run
//! statistics. Use [`crate::stream::item_stream`] to consume records one at
//! a time, or [`crate::pipeline::lines::parse_pages`] when the page text is
//! already in memory.

use crate::config::ParseConfig;
use crate::error::ExtractError;
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats};
use crate::pipeline::{extract, input, lines};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Extract line items from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ExtractionOutput)` on success, even when no row was recognised
/// (`output.records` is then empty) or some rows were dropped (see
/// `output.dropped`).
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors:
/// - File not found / permission denied / download failed
/// - Not a valid PDF, wrong or missing password
/// - pdfium could not read a page's text
pub async fn extract_items(
    input_str: impl AsRef<str>,
    config: &ParseConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    extract_resolved(resolved, config).await
}

/// Extract line items from PDF bytes already in memory.
///
/// This is the API for uploads: the bytes come straight from the request.
pub async fn extract_items_from_bytes(
    bytes: &[u8],
    config: &ParseConfig,
) -> Result<ExtractionOutput, ExtractError> {
    input::check_pdf_magic("<bytes>", bytes)?;
    let resolved = input::ResolvedInput {
        source_name: "<bytes>".to_string(),
        bytes: bytes.to_vec(),
    };
    extract_resolved(resolved, config).await
}

/// Synchronous wrapper around [`extract_items`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_items_sync(
    input_str: impl AsRef<str>,
    config: &ParseConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract_items(input_str, config))
}

/// Extract line items and write them as JSON to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ParseConfig,
) -> Result<ExtractionStats, ExtractError> {
    let output = extract_items(input_str, config).await?;
    let path = output_path.as_ref();

    let json = serde_json::to_vec_pretty(&output)
        .map_err(|e| ExtractError::Internal(format!("Failed to serialise output: {}", e)))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExtractError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Read PDF metadata without parsing any rows.
///
/// Uses the config's download timeout and password; page selection and
/// parse settings are ignored.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ParseConfig,
) -> Result<DocumentMetadata, ExtractError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    extract::extract_metadata(resolved.bytes, resolved.source_name, config.password.clone()).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn extract_resolved(
    resolved: input::ResolvedInput,
    config: &ParseConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();

    let extract_start = Instant::now();
    let (metadata, pages) = extract::extract_document(
        resolved.bytes,
        resolved.source_name,
        config.password.clone(),
        config.pages.clone(),
    )
    .await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Extracted {} of {} pages in {}ms",
        pages.len(),
        metadata.page_count,
        extract_duration_ms
    );

    let (records, dropped, mut stats) = lines::parse_pages(pages, config).finish();
    stats.extract_duration_ms = extract_duration_ms;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Extraction complete: {} records from {} pages ({} rows dropped), {}ms total",
        stats.records, stats.pages, stats.dropped_lines, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        records,
        dropped,
        metadata,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_entry_rejects_non_pdf_before_pdfium() {
        let result = tokio_test::block_on(extract_items_from_bytes(
            b"Door Order\n2 12 x 24 Door",
            &ParseConfig::default(),
        ));
        assert!(matches!(result, Err(ExtractError::NotAPdf { .. })));
    }
}
