//! Streaming extraction API: yield records one at a time.
//!
//! pdfium extraction still happens up front (it is a single blocking call),
//! but row parsing is lazy: each record is parsed when the consumer polls
//! for it, so a caller persisting records can start writing before the whole
//! document has been classified. The stream is single-pass; collect it to
//! iterate twice.

use crate::config::ParseConfig;
use crate::error::ExtractError;
use crate::output::ParsedItemRecord;
use crate::pipeline::{extract, input, lines};
use futures::stream;
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of parsed records.
pub type ItemStream = Pin<Box<dyn Stream<Item = ParsedItemRecord> + Send>>;

/// Extract line items from a PDF file or URL as a stream.
///
/// Records arrive in document order. Dropped rows are logged and reported
/// through the progress callback, not yielded.
///
/// # Returns
/// - `Ok(ItemStream)` — records in page/line order (possibly none)
/// - `Err(ExtractError)` — fatal error (file not found, not a PDF, etc.)
pub async fn item_stream(
    input_str: impl AsRef<str>,
    config: &ParseConfig,
) -> Result<ItemStream, ExtractError> {
    let input_str = input_str.as_ref();
    info!("Starting streaming extraction: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let (_metadata, pages) = extract::extract_document(
        resolved.bytes,
        resolved.source_name,
        config.password.clone(),
        config.pages.clone(),
    )
    .await?;

    Ok(Box::pin(stream::iter(lines::parse_pages(pages, config))))
}

/// Wrap already-extracted pages in a stream.
pub fn page_stream(pages: Vec<crate::output::PageText>, config: &ParseConfig) -> ItemStream {
    Box::pin(stream::iter(lines::parse_pages(pages, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ItemType, PageText};
    use futures::StreamExt;

    #[test]
    fn page_stream_yields_records_in_order() {
        let pages = vec![
            PageText::new(1, ["1 12 x 24 Door (SFP)", "Page 1 of 2"]),
            PageText::new(2, ["2 6 x 30 Side Panel Right"]),
        ];
        let records: Vec<ParsedItemRecord> =
            tokio_test::block_on(page_stream(pages, &ParseConfig::default()).collect());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].item_type, ItemType::Door);
        assert_eq!(records[1].item_type, ItemType::Panel);
        assert_eq!(records[1].note, "Side Panel Right");
        assert_eq!(records[1].source_page, 2);
    }

    #[test]
    fn empty_document_is_an_empty_stream() {
        let records: Vec<ParsedItemRecord> = tokio_test::block_on(
            page_stream(vec![PageText::new(1, ["Header only"])], &ParseConfig::default())
                .collect(),
        );
        assert!(records.is_empty());
    }
}
