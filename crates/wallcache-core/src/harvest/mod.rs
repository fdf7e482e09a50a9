//! Ingest of raw pins handed over by the scraping collaborator.
//!
//! A raw pin is whatever the browser session pulled out of one pin element:
//! `src`/`srcset` of the image, the pin link, a title, and optionally the
//! image's natural dimensions. Ingest turns those into persisted-quality
//! [`Entry`] values: pick the largest candidate, normalize to `/originals/`,
//! drop anything that fails the validity filter or the landscape check, then
//! dedupe against the run's [`SeenUrls`].

mod landscape;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::dedupe::{dedupe, SeenUrls};
use crate::entry::Entry;
use crate::url_model::{highest_srcset_candidate, is_valid_image_url, normalize};

pub use landscape::{is_landscape_high_quality, MAX_ASPECT_RATIO, MIN_ASPECT_RATIO};

/// Origin that relative pin links (`/pin/123/`) are resolved against.
pub const SITE_ORIGIN: &str = "https://www.pinterest.com";

/// One pin as extracted from a search or board page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPin {
    #[serde(default)]
    pub title: Option<String>,
    /// Link to the pin page, absolute or site-relative.
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub srcset: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Minimum width of a pin that reports its dimensions.
pub const DEFAULT_MIN_WIDTH: u32 = 1920;

/// Minimum height of a pin that reports its dimensions.
pub const DEFAULT_MIN_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, Copy)]
pub struct HarvestOptions {
    /// Stop after this many new entries (None = unlimited).
    pub max_count: Option<usize>,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            max_count: None,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }
}

#[derive(Debug, Default)]
pub struct IngestReport {
    /// New unique entries, in discovery order.
    pub entries: Vec<Entry>,
    /// Pins with no usable or no valid media URL, or failing the landscape check.
    pub rejected: usize,
    /// Valid pins not emitted: duplicates, or beyond `max_count`.
    pub skipped: usize,
}

/// Reads a JSON array of raw pins.
pub fn read_pins(path: &Path) -> Result<Vec<RawPin>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read raw pins: {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse raw pins: {}", path.display()))
}

/// Converts one raw pin into an entry, or None when it is not cache-worthy.
pub fn entry_from_pin(pin: &RawPin, opts: &HarvestOptions) -> Option<Entry> {
    let src = pin
        .src
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| pin.srcset.as_deref().and_then(highest_srcset_candidate))?;

    let media_url = normalize(&src);
    if !is_valid_image_url(&media_url) {
        tracing::debug!(url = %media_url, "pin rejected by url filter");
        return None;
    }

    if let (Some(w), Some(h)) = (pin.width, pin.height) {
        if !is_landscape_high_quality(w, h, opts.min_width, opts.min_height) {
            tracing::debug!(url = %media_url, w, h, "pin rejected: not landscape HD");
            return None;
        }
    }

    let title = pin.title.as_deref().unwrap_or_default();
    let source = resolve_source_url(pin.source_url.as_deref().unwrap_or_default());
    Some(Entry::new(title, source, media_url))
}

/// Absolute pin page URL; site-relative links are joined onto [`SITE_ORIGIN`].
pub fn resolve_source_url(link: &str) -> String {
    let link = link.trim();
    if link.is_empty() || link.starts_with("http") {
        return link.to_string();
    }
    url::Url::parse(SITE_ORIGIN)
        .and_then(|base| base.join(link))
        .map(String::from)
        .unwrap_or_default()
}

/// Runs the whole ingest pipeline over a batch of raw pins.
pub fn ingest(
    pins: impl IntoIterator<Item = RawPin>,
    opts: &HarvestOptions,
    seen: SeenUrls,
) -> (IngestReport, SeenUrls) {
    let mut rejected = 0usize;
    let mut candidates = Vec::new();
    for pin in pins {
        match entry_from_pin(&pin, opts) {
            Some(entry) => candidates.push(entry),
            None => rejected += 1,
        }
    }
    let valid = candidates.len();
    let (entries, seen) = dedupe(candidates, opts.max_count, seen);
    tracing::info!(
        accepted = entries.len(),
        rejected,
        "ingested {} new pins",
        entries.len()
    );
    let report = IngestReport {
        skipped: valid - entries.len(),
        entries,
        rejected,
    };
    (report, seen)
}
