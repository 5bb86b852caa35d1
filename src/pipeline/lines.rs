//! Line parser: walk pages and lines, emit one record per recognised row.
//!
//! [`ItemRecords`] is a lazy, single-pass iterator. It holds only the page
//! being walked and its counters, so memory stays flat no matter how many
//! pages the order sheet has, and nothing is carried from one line to the
//! next. Rows that match a grammar but carry an unusable number are dropped
//! with a `warn!` and kept in [`ItemRecords::dropped`]; everything else keeps
//! going.

use crate::config::ParseConfig;
use crate::error::LineError;
use crate::output::{ExtractionStats, ItemType, PageText, ParsedItemRecord, RawLine, StyleLabel};
use crate::pipeline::classify::{self, RowKind};
use crate::pipeline::dimension::Dimension;
use crate::pipeline::units;
use tracing::{debug, warn};

/// Parse one line into at most one record.
///
/// * `Ok(None)` — skip-marked or unrecognised line (routine)
/// * `Ok(Some(_))` — a door, drawer front or panel
/// * `Err(_)` — the line matched a grammar but a number could not be used
pub fn parse_line(
    raw: &RawLine,
    config: &ParseConfig,
) -> Result<Option<ParsedItemRecord>, LineError> {
    let Some(row) = classify::classify(&raw.text) else {
        return Ok(None);
    };

    let quantity: u32 = row.qty.parse().map_err(|_| LineError::MalformedQuantity {
        page: raw.page,
        line: raw.text.clone(),
        value: row.qty.to_string(),
    })?;
    let width = render_dimension(raw, row.width, config.decimal_precision)?;
    let height = render_dimension(raw, row.height, config.decimal_precision)?;

    let joiner = config.note_joiner.as_str();
    let unit_note = units::unit_note(row.units, joiner);

    let (item_type, style_label, note) = match row.kind {
        RowKind::Structural {
            type_text,
            style_hint,
        } => {
            let item_type = classify::item_type(type_text);
            let note = join_note(item_type.as_str(), &unit_note, joiner);
            (item_type, classify::style_label(style_hint), note)
        }
        RowKind::Panel { text } => {
            let kind = classify::panel_kind(text);
            let mut note = join_note(kind.label(), &unit_note, joiner);
            if note.is_empty() {
                note = ItemType::Panel.as_str().to_string();
            }
            (ItemType::Panel, StyleLabel::Panel, note)
        }
    };

    Ok(Some(ParsedItemRecord {
        item_type,
        style_label,
        quantity,
        width,
        height,
        note,
        source_page: raw.page,
        hinge_side: None,
    }))
}

/// Parse already-extracted pages lazily.
///
/// This is the pure, synchronous core of the crate: no I/O and no shared
/// state, so it can run on any thread for any number of documents at once.
pub fn parse_pages<I>(pages: I, config: &ParseConfig) -> ItemRecords<I::IntoIter>
where
    I: IntoIterator<Item = PageText>,
    I::IntoIter: ExactSizeIterator,
{
    ItemRecords::new(pages.into_iter(), config.clone())
}

/// Lazy iterator of records over a sequence of pages.
///
/// Not `Clone`: materialise it (`collect`) to iterate twice.
pub struct ItemRecords<P> {
    pages: P,
    config: ParseConfig,
    total_pages: usize,
    current: Option<CurrentPage>,
    started: bool,
    finished: bool,
    stats: ExtractionStats,
    dropped: Vec<LineError>,
}

struct CurrentPage {
    page_num: usize,
    lines: std::vec::IntoIter<String>,
    records: usize,
}

impl<P> ItemRecords<P>
where
    P: Iterator<Item = PageText> + ExactSizeIterator,
{
    fn new(pages: P, config: ParseConfig) -> Self {
        let total_pages = pages.len();
        Self {
            pages,
            config,
            total_pages,
            current: None,
            started: false,
            finished: false,
            stats: ExtractionStats::default(),
            dropped: Vec::new(),
        }
    }

    /// Counters so far; complete once the iterator is exhausted.
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Rows dropped so far.
    pub fn dropped(&self) -> &[LineError] {
        &self.dropped
    }

    /// Drain the remaining records and return everything collected.
    pub fn finish(mut self) -> (Vec<ParsedItemRecord>, Vec<LineError>, ExtractionStats) {
        let records: Vec<ParsedItemRecord> = self.by_ref().collect();
        (records, self.dropped, self.stats)
    }

    /// Next line in document order, closing out pages as they run dry.
    fn next_line(&mut self) -> Option<RawLine> {
        loop {
            if let Some(page) = self.current.as_mut() {
                if let Some(text) = page.lines.next() {
                    return Some(RawLine {
                        page: page.page_num,
                        text,
                    });
                }
                self.close_page();
            }

            let page = self.pages.next()?;
            debug!("Parsing page {} ({} lines)", page.page_num, page.lines.len());
            self.stats.pages += 1;
            self.current = Some(CurrentPage {
                page_num: page.page_num,
                lines: page.lines.into_iter(),
                records: 0,
            });
        }
    }

    fn close_page(&mut self) {
        if let Some(page) = self.current.take() {
            debug!("Page {}: {} records", page.page_num, page.records);
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_page_complete(page.page_num, self.total_pages, page.records);
            }
        }
    }

    fn complete(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        debug!(
            "Parsed {} pages: {} records, {} dropped, {} unmatched",
            self.stats.pages, self.stats.records, self.stats.dropped_lines, self.stats.unmatched_lines
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_extraction_complete(self.total_pages, self.stats.records);
        }
    }
}

impl<P> Iterator for ItemRecords<P>
where
    P: Iterator<Item = PageText> + ExactSizeIterator,
{
    type Item = ParsedItemRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if !self.started {
            self.started = true;
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_extraction_start(self.total_pages);
            }
        }

        while let Some(raw) = self.next_line() {
            self.stats.lines_seen += 1;
            if classify::is_skip_line(&raw.text) {
                self.stats.skip_markers += 1;
                continue;
            }

            match parse_line(&raw, &self.config) {
                Ok(Some(record)) => {
                    self.stats.records += 1;
                    if let Some(page) = self.current.as_mut() {
                        page.records += 1;
                    }
                    return Some(record);
                }
                Ok(None) => self.stats.unmatched_lines += 1,
                Err(e) => {
                    warn!("Dropping row: {}", e);
                    self.stats.dropped_lines += 1;
                    if let Some(ref cb) = self.config.progress_callback {
                        cb.on_line_dropped(raw.page, &e);
                    }
                    self.dropped.push(e);
                }
            }
        }

        self.complete();
        None
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn render_dimension(raw: &RawLine, value: &str, places: u32) -> Result<String, LineError> {
    Dimension::parse(value)
        .and_then(|d| d.render(places))
        .map_err(|e| LineError::MalformedDimension {
            page: raw.page,
            line: raw.text.clone(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn join_note(base: &str, unit_note: &str, joiner: &str) -> String {
    match (base.is_empty(), unit_note.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => unit_note.to_string(),
        (false, false) => format!("{base}{joiner}{unit_note}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PanelKind;

    fn line(text: &str) -> RawLine {
        RawLine {
            page: 3,
            text: text.to_string(),
        }
    }

    fn parse(text: &str, config: &ParseConfig) -> Option<ParsedItemRecord> {
        parse_line(&line(text), config).unwrap()
    }

    #[test]
    fn test_door_record() {
        let rec = parse("2 14 7/8 x 22 Door (SFP)", &ParseConfig::default()).unwrap();
        assert_eq!(
            rec,
            ParsedItemRecord {
                item_type: ItemType::Door,
                style_label: StyleLabel::Sfp,
                quantity: 2,
                width: "14.875".into(),
                height: "22.000".into(),
                note: "Door".into(),
                source_page: 3,
                hinge_side: None,
            }
        );
    }

    #[test]
    fn test_flat_panel_rounds_up() {
        let config = ParseConfig::builder().decimal_precision(2).build().unwrap();
        let rec = parse("1 10 1/3 x 5 Flat Panel", &config).unwrap();
        assert_eq!(rec.item_type, ItemType::Panel);
        assert_eq!(rec.style_label, StyleLabel::Panel);
        assert_eq!(rec.width, "10.34");
        assert_eq!(rec.height, "5.00");
        assert_eq!(rec.note, "Flat Panel");
    }

    #[test]
    fn test_drawer_front_with_unit_blob() {
        let rec = parse("1)9 3 12 x 24 Drawer Front (FlatDR)", &ParseConfig::default()).unwrap();
        assert_eq!(rec.item_type, ItemType::DrawerFront);
        assert_eq!(rec.style_label, StyleLabel::Flat);
        assert_eq!(rec.quantity, 3);
        assert_eq!(rec.note, "Drawer Front | 1x#9");
    }

    #[test]
    fn test_panel_note_with_units_and_joiner() {
        let config = ParseConfig::builder().note_joiner(" / ").build().unwrap();
        let rec = parse("2)9 1)12 1 23 1/4 x 34 1/2 Side Panel Left", &config).unwrap();
        assert_eq!(rec.note, "Side Panel Left / 2x#9 / 1x#12");
        assert_eq!(rec.width, "23.250");
        assert_eq!(rec.height, "34.500");
    }

    #[test]
    fn test_panel_note_never_on_doors() {
        let rec = parse("1 12 x 24 Door Side Panel Left", &ParseConfig::default()).unwrap();
        assert_eq!(rec.item_type, ItemType::Door);
        assert_eq!(rec.note, "Door");
        assert!(!rec.note.contains(PanelKind::SidePanelLeft.label()));
    }

    #[test]
    fn test_zero_quantity_is_emitted() {
        let rec = parse("0 12 x 24 Door", &ParseConfig::default()).unwrap();
        assert_eq!(rec.quantity, 0);
        assert_eq!(rec.style_label, StyleLabel::Unresolved);
    }

    #[test]
    fn test_unmatched_and_skip_lines() {
        let config = ParseConfig::default();
        assert_eq!(parse("Job: Smith Kitchen", &config), None);
        assert_eq!(parse("2 12 x 24 Door Continued to Next Page", &config), None);
    }

    #[test]
    fn test_malformed_dimension() {
        let err = parse_line(&line("2 14 7/0 x 22 Door"), &ParseConfig::default()).unwrap_err();
        match err {
            LineError::MalformedDimension { page, value, .. } => {
                assert_eq!(page, 3);
                assert_eq!(value, "14 7/0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_quantity() {
        let err = parse_line(&line("99999999999 12 x 24 Door"), &ParseConfig::default())
            .unwrap_err();
        assert!(matches!(err, LineError::MalformedQuantity { .. }));
    }

    #[test]
    fn test_iterator_recovers_and_counts() {
        let pages = vec![
            PageText::new(
                1,
                [
                    "Door Order",
                    "2 14 7/8 x 22 Door (SFP)",
                    "1 14 7/0 x 22 Door",
                    "Continued to Next Page",
                ],
            ),
            PageText::new(
                2,
                [
                    "Continued from Last Page",
                    "1 10 x 5 Panel",
                    "Thank you for your order",
                ],
            ),
        ];
        let mut it = parse_pages(pages, &ParseConfig::default());
        let first = it.next().unwrap();
        assert_eq!(first.source_page, 1);
        let second = it.next().unwrap();
        assert_eq!(second.source_page, 2);
        assert_eq!(second.note, "Panel");
        assert!(it.next().is_none());
        assert!(it.next().is_none());

        assert_eq!(it.dropped().len(), 1);
        assert_eq!(
            it.stats(),
            &ExtractionStats {
                pages: 2,
                lines_seen: 7,
                skip_markers: 2,
                unmatched_lines: 2,
                dropped_lines: 1,
                records: 2,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_join_note() {
        assert_eq!(join_note("Door", "", " | "), "Door");
        assert_eq!(join_note("Door", "1x#9", " | "), "Door | 1x#9");
        assert_eq!(join_note("", "1x#9", " | "), "1x#9");
        assert_eq!(join_note("", "", " | "), "");
    }
}
