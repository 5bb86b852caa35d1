//! Output types: parsed line items, per-page text and run statistics.

use crate::error::LineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Input-side types ─────────────────────────────────────────────────────

/// The ordered text lines of one PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Non-empty, cleaned lines in top-to-bottom reading order.
    pub lines: Vec<String>,
}

impl PageText {
    /// Build a page from already-split lines, running them through line cleanup.
    pub fn new<I, S>(page_num: usize, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            page_num,
            lines: lines
                .into_iter()
                .map(|l| crate::pipeline::clean::clean_line(l.as_ref()))
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }

    /// Build a page from the raw text block returned by the extractor.
    pub fn from_text(page_num: usize, text: &str) -> Self {
        Self {
            page_num,
            lines: crate::pipeline::clean::split_lines(text),
        }
    }
}

/// One line of page text with the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub page: usize,
    pub text: String,
}

// ── Record types ─────────────────────────────────────────────────────────

/// Kind of manufactured item a row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "Door")]
    Door,
    #[serde(rename = "Drawer Front")]
    DrawerFront,
    #[serde(rename = "Panel")]
    Panel,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Door => "Door",
            ItemType::DrawerFront => "Drawer Front",
            ItemType::Panel => "Panel",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical style token derived from the row's style hint.
///
/// Serialised as the canonical string (`"SFP"`, `"Flat"`, `"Panel"`, `""`).
/// Per-installation display codes live in [`crate::config::StyleLabels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StyleLabel {
    #[serde(rename = "SFP")]
    Sfp,
    #[serde(rename = "Flat")]
    Flat,
    #[serde(rename = "Panel")]
    Panel,
    /// No recognisable hint; left to downstream configuration.
    #[default]
    #[serde(rename = "")]
    Unresolved,
}

impl StyleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleLabel::Sfp => "SFP",
            StyleLabel::Flat => "Flat",
            StyleLabel::Panel => "Panel",
            StyleLabel::Unresolved => "",
        }
    }
}

impl fmt::Display for StyleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Panel sub-kind, carried in the note of panel records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelKind {
    SidePanelLeft,
    SidePanelRight,
    SidePanel,
    FlatPanel,
    Panel,
}

impl PanelKind {
    pub fn label(&self) -> &'static str {
        match self {
            PanelKind::SidePanelLeft => "Side Panel Left",
            PanelKind::SidePanelRight => "Side Panel Right",
            PanelKind::SidePanel => "Side Panel",
            PanelKind::FlatPanel => "Flat Panel",
            PanelKind::Panel => "Panel",
        }
    }
}

/// Hinge side of a door. Never set by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HingeSide {
    L,
    R,
}

impl FromStr for HingeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LEFT" => Ok(HingeSide::L),
            "R" | "RIGHT" => Ok(HingeSide::R),
            other => Err(format!("unknown hinge side '{other}' (expected L or R)")),
        }
    }
}

impl fmt::Display for HingeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HingeSide::L => f.write_str("L"),
            HingeSide::R => f.write_str("R"),
        }
    }
}

/// One manufactured line item parsed from an order-sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItemRecord {
    pub item_type: ItemType,
    pub style_label: StyleLabel,
    /// Identical units on this row. Zero is kept, not filtered.
    pub quantity: u32,
    /// Width in inches, rounded up to the configured precision.
    pub width: String,
    /// Height in inches, rounded up to the configured precision.
    pub height: String,
    pub note: String,
    /// 1-indexed page the row was read from.
    pub source_page: usize,
    pub hinge_side: Option<HingeSide>,
}

impl ParsedItemRecord {
    /// Return a copy with the hinge side set. Panels have no hinge and are
    /// returned unchanged.
    pub fn with_hinge_side(mut self, side: HingeSide) -> Self {
        if self.item_type != ItemType::Panel {
            self.hinge_side = Some(side);
        }
        self
    }
}

// ── Run-level output ─────────────────────────────────────────────────────

/// Document metadata read from the PDF info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Counters collected while parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages handed to the line parser.
    pub pages: usize,
    /// Non-empty lines inspected.
    pub lines_seen: usize,
    /// Lines skipped because they carry a pagination marker.
    pub skip_markers: usize,
    /// Lines that matched neither row grammar.
    pub unmatched_lines: usize,
    /// Matched rows dropped because of a [`LineError`].
    pub dropped_lines: usize,
    /// Records emitted.
    pub records: usize,
    /// Wall-clock time spent in pdfium text extraction.
    pub extract_duration_ms: u64,
    /// Wall-clock time for the whole run.
    pub total_duration_ms: u64,
}

/// Everything produced by one eager extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub records: Vec<ParsedItemRecord>,
    pub dropped: Vec<LineError>,
    pub metadata: DocumentMetadata,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// True when no row of the document was recognised.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door() -> ParsedItemRecord {
        ParsedItemRecord {
            item_type: ItemType::Door,
            style_label: StyleLabel::Sfp,
            quantity: 2,
            width: "14.875".into(),
            height: "22.000".into(),
            note: "Door".into(),
            source_page: 1,
            hinge_side: None,
        }
    }

    #[test]
    fn record_serialises_with_display_names() {
        let mut rec = door();
        rec.item_type = ItemType::DrawerFront;
        rec.style_label = StyleLabel::Unresolved;
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["item_type"], "Drawer Front");
        assert_eq!(json["style_label"], "");
        assert_eq!(json["hinge_side"], serde_json::Value::Null);
    }

    #[test]
    fn hinge_side_is_not_set_on_panels() {
        let mut panel = door();
        panel.item_type = ItemType::Panel;
        assert_eq!(panel.with_hinge_side(HingeSide::L).hinge_side, None);
        assert_eq!(door().with_hinge_side(HingeSide::R).hinge_side, Some(HingeSide::R));
    }

    #[test]
    fn hinge_side_parses() {
        assert_eq!("l".parse::<HingeSide>(), Ok(HingeSide::L));
        assert_eq!(" Right ".parse::<HingeSide>(), Ok(HingeSide::R));
        assert!("up".parse::<HingeSide>().is_err());
    }

    #[test]
    fn page_text_drops_blank_lines() {
        let page = PageText::new(4, ["  Door Order ", "", "   ", "2 12 x 24 Door"]);
        assert_eq!(page.page_num, 4);
        assert_eq!(page.lines, vec!["Door Order", "2 12 x 24 Door"]);
    }
}
