//! # pdf2items
//!
//! Parse cabinet-door order sheets (PDF) into typed line items: doors, drawer
//! fronts and panels, with quantities, rounded-up dimensions, style labels
//! and hardware annotations.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Extract   read each page's text layer via pdfium (spawn_blocking)
//!  ├─ 3. Clean     split into whitespace-normalised lines
//!  ├─ 4. Classify  door/drawer grammar first, then panel grammar
//!  ├─ 5. Normalise exact fractions → decimal strings, rounded up
//!  └─ 6. Emit      one ParsedItemRecord per recognised row
//! ```
//!
//! A row such as `1)9 3 12 x 24 Drawer Front (FlatDR)` becomes a drawer front,
//! style `Flat`, quantity 3, `12.000` × `24.000`, note `Drawer Front | 1x#9`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2items::{extract_items, ParseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ParseConfig::default();
//!     let output = extract_items("order.pdf", &config).await?;
//!     for item in &output.records {
//!         println!("{} × {} {} x {}", item.quantity, item.item_type, item.width, item.height);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Text that is already in memory can be parsed without pdfium:
//!
//! ```rust
//! use pdf2items::{parse_pages, PageText, ParseConfig};
//!
//! let pages = vec![PageText::new(1, ["2 14 7/8 x 22 Door (SFP)"])];
//! let items: Vec<_> = parse_pages(pages, &ParseConfig::default()).collect();
//! assert_eq!(items[0].width, "14.875");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2items` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PageSelection, ParseConfig, ParseConfigBuilder, StyleLabels};
pub use convert::{extract_items, extract_items_from_bytes, extract_items_sync, extract_to_file, inspect};
pub use error::{ExtractError, LineError};
pub use output::{
    DocumentMetadata, ExtractionOutput, ExtractionStats, HingeSide, ItemType, PageText, PanelKind,
    ParsedItemRecord, RawLine, StyleLabel,
};
pub use pipeline::lines::{parse_line, parse_pages, ItemRecords};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{item_stream, page_stream, ItemStream};
