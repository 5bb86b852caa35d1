//! Line cleanup: turn a raw pdfium page string into classifier-ready lines.
//!
//! pdfium's text layer is close to what a person reads, but not quite:
//! lines end in `\r\n`, table cells are separated by runs of spaces or
//! non-breaking spaces, and some generators sprinkle zero-width characters
//! or soft hyphens between glyphs. The row grammars assume single ASCII
//! spaces, so every line passes through these rules first.
//!
//! Rules (applied in order):
//! 1. Normalise line endings (CRLF / CR → LF) and split
//! 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
//! 3. Map non-breaking and other Unicode spaces to ASCII space
//! 4. Collapse whitespace runs and trim
//! 5. Drop lines left empty

use once_cell::sync::Lazy;
use regex::Regex;

/// Split a page's text block into cleaned, non-empty lines, preserving order.
pub fn split_lines(page_text: &str) -> Vec<String> {
    normalise_line_endings(page_text)
        .split('\n')
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Apply rules 2–4 to a single line.
pub fn clean_line(line: &str) -> String {
    let s = remove_invisible_chars(line);
    let s = normalise_spaces(&s);
    collapse_whitespace(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip invisible characters ───────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
            )
        })
        .collect()
}

// ── Rule 3: Unicode spaces ───────────────────────────────────────────────────

fn normalise_spaces(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\t' => ' ',
            '\u{2000}'..='\u{200A}' => ' ',
            other => other,
        })
        .collect()
}

// ── Rule 4: Collapse whitespace ──────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input.trim(), " ").into_owned()
}
