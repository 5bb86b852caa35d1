//! Progress-callback trait for per-page parsing events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ParseConfigBuilder::progress_callback`] to receive events
//! as the line parser walks the document.
//!
//! # Example
//!
//! ```rust
//! use pdf2items::{ExtractionProgressCallback, ParseConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     records: Arc<AtomicUsize>,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, records: usize) {
//!         self.records.fetch_add(records, Ordering::SeqCst);
//!         eprintln!("Page {}/{}: {} items", page_num, total_pages, records);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     records: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ParseConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::LineError;
use std::sync::Arc;

/// Called by the line parser as it processes each page.
///
/// Implementations must be `Send + Sync`: the same config (and callback) may
/// be shared by concurrent parses. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first line is parsed.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after the last line of a page has been parsed.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages in this parse
    /// * `records`     — records emitted from this page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, records: usize) {
        let _ = (page_num, total_pages, records);
    }

    /// Called when a matched row is dropped.
    fn on_line_dropped(&self, page_num: usize, error: &LineError) {
        let _ = (page_num, error);
    }

    /// Called once after every page has been parsed.
    fn on_extraction_complete(&self, total_pages: usize, records: usize) {
        let _ = (total_pages, records);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ParseConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        pages: AtomicUsize,
        records: AtomicUsize,
        dropped: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, records: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
            self.records.fetch_add(records, Ordering::SeqCst);
        }

        fn on_line_dropped(&self, _page_num: usize, _error: &LineError) {
            self.dropped.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(2);
        cb.on_page_complete(1, 2, 5);
        cb.on_extraction_complete(2, 5);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_page_complete(1, 2, 3);
        tracker.on_page_complete(2, 2, 4);
        tracker.on_line_dropped(
            2,
            &LineError::MalformedQuantity {
                page: 2,
                line: "row".into(),
                value: "q".into(),
            },
        );
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.records.load(Ordering::SeqCst), 7);
        assert_eq!(tracker.dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(10);
        cb.on_extraction_complete(10, 0);
    }
}
