//! Entry data model: one candidate image record.
//!
//! Cache files come in two historical JSON shapes; both are mapped into the
//! single canonical [`Entry`] at the serde boundary (see `raw`), so nothing
//! downstream branches on shape.

mod raw;

use serde::{Deserialize, Serialize};

use crate::url_model::{classify, ResolutionTier};

pub use raw::{EntryFormat, RawEntry, StoredEntry};

/// Title used when a pin has no usable title.
pub const DEFAULT_TITLE: &str = "Aesthetic Pin";

/// One discovered image candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry", into = "StoredEntry")]
pub struct Entry {
    pub title: String,
    /// Pin page the image was found on; may be empty.
    pub source_url: String,
    /// Resolved image URL; the key for dedup and validation.
    pub media_url: String,
    /// Resolution tier of `media_url`.
    pub quality: ResolutionTier,
}

impl Entry {
    /// Builds an entry, defaulting a blank title and deriving `quality` from
    /// the media URL.
    pub fn new(
        title: impl AsRef<str>,
        source_url: impl Into<String>,
        media_url: impl Into<String>,
    ) -> Self {
        let media_url = media_url.into();
        let title = title.as_ref().trim();
        Self {
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
            source_url: source_url.into(),
            quality: classify(&media_url).tier,
            media_url,
        }
    }

    /// True when the entry carries a media URL at all.
    pub fn has_media(&self) -> bool {
        !self.media_url.is_empty()
    }

    /// Replaces the media URL and re-derives `quality`.
    pub fn set_media_url(&mut self, media_url: String) {
        self.quality = classify(&media_url).tier;
        self.media_url = media_url;
    }
}
