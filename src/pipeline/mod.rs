//! Pipeline stages for order-sheet parsing.
//!
//! Each submodule implements exactly one transformation step, and each is
//! testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ clean ──▶ classify ──▶ dimension/units ──▶ lines
//! (path/URL) (pdfium)   (lines)   (grammars)   (normalise)         (records)
//! ```
//!
//! 1. [`input`]    — canonicalise the user-supplied path or URL to PDF bytes
//! 2. [`extract`]  — read each selected page's text layer; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`clean`]    — split page text into trimmed, whitespace-collapsed lines
//! 4. [`classify`] — match a line against the door/drawer and panel grammars
//! 5. [`dimension`] and [`units`] — exact fraction arithmetic and
//!    `count)id` annotations
//! 6. [`lines`]    — drive 3–5 over every line and assemble records

pub mod classify;
pub mod clean;
pub mod dimension;
pub mod extract;
pub mod input;
pub mod lines;
pub mod units;
