//! Row classification: decide which order-sheet grammar a line follows.
//!
//! Two grammars share the same leading shape:
//!
//! ```text
//! [unit blob] qty  width  x  height  <trailer>
//! 1)9         3    12        24      Drawer Front (FlatDR)
//!             2    14 7/8    22      Door (SFP)
//!             1    10 1/3    5       Flat Panel
//! ```
//!
//! The structural-item grammar (trailer `Door` / `Drawer Front` plus an
//! optional `(style)` hint) is always tried before the panel grammar
//! (trailer containing `panel` anywhere, as in `Side Panels`), so `1 12 x 24 Door Panel` is a
//! door. Lines carrying a pagination marker are rejected before either
//! grammar runs.

use crate::output::{ItemType, PanelKind, StyleLabel};
use once_cell::sync::Lazy;
use regex::Regex;

/// Pagination artefacts repeated at page breaks. Matched verbatim.
pub const SKIP_MARKERS: [&str; 2] = ["Continued to Next Page", "Continued from Last Page"];

/// `W F/D`, `F/D`, `W` or `W.DDD`; alternatives tried in that order.
const DIMENSION: &str = r"\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?";

fn row_prefix() -> String {
    format!(
        r"^\s*(?P<units>(?:\d+\)\d+\s+)*)(?P<qty>\d+)\s+(?P<width>{DIMENSION})\s*[x×]\s*(?P<height>{DIMENSION})\s+"
    )
}

static RE_STRUCTURAL_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i){}(?P<kind>door\w*|drawer\s+front\w*)(?:\s*\((?P<style>[^)]*)\))?",
        row_prefix()
    ))
    .unwrap()
});

static RE_PANEL_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i){}(?P<text>.*panel.*)$", row_prefix())).unwrap()
});

/// Trailer-specific captures of a classified row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// Door or drawer front.
    Structural {
        type_text: &'a str,
        style_hint: Option<&'a str>,
    },
    /// Any panel; `text` is the whole trailer.
    Panel { text: &'a str },
}

/// Captures of a line that matched one of the row grammars.
///
/// Fields borrow from the classified line; nothing is parsed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMatch<'a> {
    /// Leading `count)id` tokens, possibly empty.
    pub units: &'a str,
    pub qty: &'a str,
    pub width: &'a str,
    pub height: &'a str,
    pub kind: RowKind<'a>,
}

/// True for lines holding a pagination marker.
pub fn is_skip_line(line: &str) -> bool {
    SKIP_MARKERS.iter().any(|m| line.contains(m))
}

/// Match `line` against the row grammars in precedence order.
///
/// Returns `None` for skip-marked lines and for lines neither grammar
/// accepts; both are routine and not errors.
pub fn classify(line: &str) -> Option<RowMatch<'_>> {
    if is_skip_line(line) {
        return None;
    }

    if let Some(caps) = RE_STRUCTURAL_ROW.captures(line) {
        return Some(RowMatch {
            units: caps.name("units").map_or("", |m| m.as_str()),
            qty: caps.name("qty")?.as_str(),
            width: caps.name("width")?.as_str(),
            height: caps.name("height")?.as_str(),
            kind: RowKind::Structural {
                type_text: caps.name("kind")?.as_str(),
                style_hint: caps.name("style").map(|m| m.as_str()),
            },
        });
    }

    let caps = RE_PANEL_ROW.captures(line)?;
    Some(RowMatch {
        units: caps.name("units").map_or("", |m| m.as_str()),
        qty: caps.name("qty")?.as_str(),
        width: caps.name("width")?.as_str(),
        height: caps.name("height")?.as_str(),
        kind: RowKind::Panel {
            text: caps.name("text")?.as_str().trim(),
        },
    })
}

/// `Drawer Front` (any case or spacing) → [`ItemType::DrawerFront`], else Door.
pub fn item_type(type_text: &str) -> ItemType {
    let normalised = type_text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if normalised.starts_with("drawer front") {
        ItemType::DrawerFront
    } else {
        ItemType::Door
    }
}

/// Panel sub-kind from independent keyword checks, first match wins.
pub fn panel_kind(text: &str) -> PanelKind {
    let t = text.to_lowercase();
    if t.contains("side panel") {
        if t.contains("left") {
            PanelKind::SidePanelLeft
        } else if t.contains("right") {
            PanelKind::SidePanelRight
        } else {
            PanelKind::SidePanel
        }
    } else if t.contains("flat panel") {
        PanelKind::FlatPanel
    } else {
        PanelKind::Panel
    }
}

/// Canonical style for a door/drawer hint such as `SFP` or `FlatDR`.
pub fn style_label(hint: Option<&str>) -> StyleLabel {
    let Some(hint) = hint else {
        return StyleLabel::Unresolved;
    };
    let h = hint.to_lowercase();
    if h.contains("sfp") {
        StyleLabel::Sfp
    } else if h.contains("flatdr") || h.contains("flat") {
        StyleLabel::Flat
    } else {
        StyleLabel::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_row() {
        let m = classify("2 14 7/8 x 22 Door (SFP)").unwrap();
        assert_eq!(m.units, "");
        assert_eq!(m.qty, "2");
        assert_eq!(m.width, "14 7/8");
        assert_eq!(m.height, "22");
        assert_eq!(
            m.kind,
            RowKind::Structural {
                type_text: "Door",
                style_hint: Some("SFP")
            }
        );
    }

    #[test]
    fn test_unit_blob_is_segmented() {
        let m = classify("2)9 1)12 3 12 x 24 Drawer Front (FlatDR)").unwrap();
        assert_eq!(m.units, "2)9 1)12 ");
        assert_eq!(m.qty, "3");
        assert_eq!(m.width, "12");
        assert_eq!(m.height, "24");
        assert!(matches!(
            m.kind,
            RowKind::Structural {
                type_text: "Drawer Front",
                style_hint: Some("FlatDR")
            }
        ));
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let m = classify("1 12 X 24 DRAWER  FRONT").unwrap();
        assert!(matches!(
            m.kind,
            RowKind::Structural { style_hint: None, .. }
        ));
        assert!(classify("1 12 x 24 door").is_some());
    }

    #[test]
    fn test_panel_row() {
        let m = classify("1 10 1/3 x 5 Flat Panel").unwrap();
        assert_eq!(m.width, "10 1/3");
        assert_eq!(m.height, "5");
        assert_eq!(m.kind, RowKind::Panel { text: "Flat Panel" });
    }

    #[test]
    fn test_plural_and_suffixed_type_words() {
        let m = classify("2 12 x 24 Doors (SFP)").unwrap();
        assert_eq!(
            m.kind,
            RowKind::Structural {
                type_text: "Doors",
                style_hint: Some("SFP")
            }
        );
        let m = classify("2 12 x 24 Drawer Fronts (SFP)").unwrap();
        assert!(matches!(
            m.kind,
            RowKind::Structural {
                type_text: "Drawer Fronts",
                style_hint: Some("SFP")
            }
        ));
        assert_eq!(item_type("Drawer Fronts"), ItemType::DrawerFront);
        assert_eq!(item_type("Doors"), ItemType::Door);
    }

    #[test]
    fn test_panel_keyword_is_a_substring_match() {
        let m = classify("2 12 x 24 Side Panels").unwrap();
        assert_eq!(m.kind, RowKind::Panel { text: "Side Panels" });
        let m = classify("2 12 x 24 SidePanel Left").unwrap();
        assert_eq!(m.kind, RowKind::Panel { text: "SidePanel Left" });
    }

    #[test]
    fn test_structural_wins_over_panel() {
        let m = classify("1 12 x 24 Door Panel").unwrap();
        assert!(matches!(m.kind, RowKind::Structural { type_text: "Door", .. }));
    }

    #[test]
    fn test_bare_fraction_and_decimal_dimensions() {
        let m = classify("4 7/8 x 30.25 Door").unwrap();
        assert_eq!(m.qty, "4");
        assert_eq!(m.width, "7/8");
        assert_eq!(m.height, "30.25");
    }

    #[test]
    fn test_skip_markers() {
        assert!(classify("2 12 x 24 Door Continued to Next Page").is_none());
        assert!(classify("Continued from Last Page 1 12 x 24 Side Panel").is_none());
        assert!(is_skip_line("--- Continued to Next Page ---"));
        assert!(!is_skip_line("continued to next page"));
    }

    #[test]
    fn test_unmatched_lines() {
        assert!(classify("Door Order — Job 1234").is_none());
        assert!(classify("Qty Width Height Type").is_none());
        assert!(classify("2 14 x Door").is_none());
        assert!(classify("12 x 24 Door").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_item_type() {
        assert_eq!(item_type("Door"), ItemType::Door);
        assert_eq!(item_type("drawer   FRONT"), ItemType::DrawerFront);
    }

    #[test]
    fn test_panel_kind_precedence() {
        assert_eq!(panel_kind("Side Panel Left"), PanelKind::SidePanelLeft);
        assert_eq!(panel_kind("Side Panel Right"), PanelKind::SidePanelRight);
        assert_eq!(panel_kind("left side panel inset"), PanelKind::SidePanelLeft);
        assert_eq!(panel_kind("Side Panel"), PanelKind::SidePanel);
        assert_eq!(panel_kind("Flat Panel"), PanelKind::FlatPanel);
        assert_eq!(panel_kind("Side Panel flat panel right"), PanelKind::SidePanelRight);
        assert_eq!(panel_kind("Panel"), PanelKind::Panel);
        assert_eq!(panel_kind("Back panel left"), PanelKind::Panel);
    }

    #[test]
    fn test_style_label() {
        assert_eq!(style_label(Some("SFP")), StyleLabel::Sfp);
        assert_eq!(style_label(Some("sfp flat")), StyleLabel::Sfp);
        assert_eq!(style_label(Some("FlatDR")), StyleLabel::Flat);
        assert_eq!(style_label(Some("Flat")), StyleLabel::Flat);
        assert_eq!(style_label(Some("Shaker")), StyleLabel::Unresolved);
        assert_eq!(style_label(None), StyleLabel::Unresolved);
    }
}
