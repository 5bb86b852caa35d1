//! Unit-token extraction: `"2)9 1)12"` → `"2x#9 | 1x#12"`.
//!
//! Order sheets prefix some rows with hardware references written as
//! `count)id`. Only the leading unit blob segmented by the row classifier is
//! scanned; running this over a whole row would also match text such as
//! `14)7` that belongs to a dimension.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_UNIT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<qty>\d+)\)(?P<unit>\d+)").unwrap());

/// One `count)id` reference, digits kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitToken<'a> {
    pub qty: &'a str,
    pub unit: &'a str,
}

impl UnitToken<'_> {
    /// Render as `"<qty>x#<id>"`.
    pub fn render(&self) -> String {
        format!("{}x#{}", self.qty, self.unit)
    }
}

/// All tokens in `fragment`, left to right, non-overlapping.
pub fn unit_tokens(fragment: &str) -> Vec<UnitToken<'_>> {
    RE_UNIT_TOKEN
        .captures_iter(fragment)
        .filter_map(|caps| {
            Some(UnitToken {
                qty: caps.name("qty")?.as_str(),
                unit: caps.name("unit")?.as_str(),
            })
        })
        .collect()
}

/// Rendered tokens joined with `joiner`, or `""` when there are none.
pub fn unit_note(fragment: &str, joiner: &str) -> String {
    unit_tokens(fragment)
        .iter()
        .map(UnitToken::render)
        .collect::<Vec<_>>()
        .join(joiner)
}
