//! Configuration types for order-sheet parsing.
//!
//! All parsing behaviour is controlled through [`ParseConfig`], built via its
//! [`ParseConfigBuilder`] or read from the settings table with
//! [`ParseConfig::from_settings`]. The config is passed explicitly into every
//! entry point; nothing is process-wide, so two uploads with different
//! precision settings can be parsed at the same time.

use crate::error::ExtractError;
use crate::output::{ItemType, StyleLabel};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Highest supported `decimal_precision`.
pub const MAX_DECIMAL_PRECISION: u32 = 9;

/// Configuration for one order-sheet parse.
///
/// # Example
/// ```rust
/// use pdf2items::ParseConfig;
///
/// let config = ParseConfig::builder()
///     .decimal_precision(2)
///     .note_joiner(" / ")
///     .build()
///     .unwrap();
/// assert_eq!(config.decimal_precision, 2);
/// ```
#[derive(Clone)]
pub struct ParseConfig {
    /// Digits after the decimal point for width/height, and the rounding
    /// granularity. Range: 0–9. Default: 3.
    pub decimal_precision: u32,

    /// Separator placed between note fragments. Default: `" | "`.
    pub note_joiner: String,

    /// Display codes substituted for canonical style labels downstream.
    pub style_labels: StyleLabels,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            decimal_precision: 3,
            note_joiner: " | ".to_string(),
            style_labels: StyleLabels::default(),
            pages: PageSelection::default(),
            password: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ParseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseConfig")
            .field("decimal_precision", &self.decimal_precision)
            .field("note_joiner", &self.note_joiner)
            .field("style_labels", &self.style_labels)
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ParseConfig {
    /// Create a new builder for `ParseConfig`.
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a config from the settings collaborator's key/value table.
    ///
    /// Recognised keys: `decimal_precision`, `note_joiner`, `style_door_sfp`,
    /// `style_door_flat`, `style_drawer_sfp`, `style_drawer_flat`,
    /// `style_panel_code`. Missing keys keep their defaults and unknown keys
    /// are ignored. Empty style codes are ignored too, so a blank settings
    /// field falls back to the canonical label.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self, ExtractError> {
        let mut builder = Self::builder();

        if let Some(raw) = settings.get("decimal_precision") {
            let places: u32 = raw.trim().parse().map_err(|_| {
                ExtractError::InvalidConfig(format!(
                    "decimal_precision must be an integer 0–{MAX_DECIMAL_PRECISION}, got '{raw}'"
                ))
            })?;
            builder.config.decimal_precision = places;
        }
        if let Some(joiner) = settings.get("note_joiner") {
            builder = builder.note_joiner(joiner.clone());
        }

        let mut labels = StyleLabels::default();
        for (key, slot) in [
            ("style_door_sfp", &mut labels.door_sfp),
            ("style_door_flat", &mut labels.door_flat),
            ("style_drawer_sfp", &mut labels.drawer_sfp),
            ("style_drawer_flat", &mut labels.drawer_flat),
            ("style_panel_code", &mut labels.panel),
        ] {
            if let Some(value) = settings.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                *slot = value.to_string();
            }
        }

        builder.style_labels(labels).build()
    }
}

/// Builder for [`ParseConfig`].
#[derive(Debug)]
pub struct ParseConfigBuilder {
    config: ParseConfig,
}

impl ParseConfigBuilder {
    pub fn decimal_precision(mut self, places: u32) -> Self {
        self.config.decimal_precision = places.min(MAX_DECIMAL_PRECISION);
        self
    }

    pub fn note_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.config.note_joiner = joiner.into();
        self
    }

    pub fn style_labels(mut self, labels: StyleLabels) -> Self {
        self.config.style_labels = labels;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ParseConfig, ExtractError> {
        let c = &self.config;
        if c.decimal_precision > MAX_DECIMAL_PRECISION {
            return Err(ExtractError::InvalidConfig(format!(
                "decimal_precision must be 0–{}, got {}",
                MAX_DECIMAL_PRECISION, c.decimal_precision
            )));
        }
        if c.download_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Style display codes ──────────────────────────────────────────────────

/// Per-installation display codes for canonical style labels.
///
/// The classifier only ever produces canonical [`StyleLabel`]s; this table is
/// consulted when records are shown or exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleLabels {
    pub door_sfp: String,
    pub door_flat: String,
    pub drawer_sfp: String,
    pub drawer_flat: String,
    /// One code for every panel.
    pub panel: String,
}

impl Default for StyleLabels {
    fn default() -> Self {
        Self {
            door_sfp: "SFP".to_string(),
            door_flat: "Flat".to_string(),
            drawer_sfp: "SFP".to_string(),
            drawer_flat: "Flat".to_string(),
            panel: "Panel".to_string(),
        }
    }
}

impl StyleLabels {
    /// Display string for a record's style. Unresolved labels stay empty.
    pub fn display(&self, item_type: ItemType, label: StyleLabel) -> &str {
        match (item_type, label) {
            (_, StyleLabel::Unresolved) => "",
            (ItemType::Panel, _) | (_, StyleLabel::Panel) => &self.panel,
            (ItemType::Door, StyleLabel::Sfp) => &self.door_sfp,
            (ItemType::Door, StyleLabel::Flat) => &self.door_flat,
            (ItemType::DrawerFront, StyleLabel::Sfp) => &self.drawer_sfp,
            (ItemType::DrawerFront, StyleLabel::Flat) => &self.drawer_flat,
        }
    }
}

// ── Page selection ───────────────────────────────────────────────────────

/// Specifies which pages of the PDF to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Parse all pages (default).
    #[default]
    All,
    /// Parse a single page (1-indexed).
    Single(usize),
    /// Parse a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Parse specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
