//! Wire shapes of cache records.
//!
//! Legacy: `{"media": <image>, "title": ..., "url": <pin page>}`.
//! Current: `{"url": <image>, "type": "image", "title": ..., "source": <pin page>}`.

use serde::{Deserialize, Serialize};

use super::Entry;

/// `type` value written for every stored record.
const STORED_KIND: &str = "image";

/// A cache record as found on disk, in either historical shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Which historical shape a record uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFormat {
    /// `media` + `title` fields.
    Legacy,
    /// `url` + `type` fields.
    Current,
    Unknown,
}

impl RawEntry {
    /// The image URL of this record: a non-empty `media` wins over `url`.
    pub fn media_url(&self) -> Option<&str> {
        non_empty(self.media.as_deref()).or_else(|| non_empty(self.url.as_deref()))
    }

    pub fn format(&self) -> EntryFormat {
        if self.media.is_some() && self.title.is_some() {
            EntryFormat::Legacy
        } else if self.url.is_some() && self.kind.is_some() {
            EntryFormat::Current
        } else {
            EntryFormat::Unknown
        }
    }

    fn is_legacy(&self) -> bool {
        non_empty(self.media.as_deref()).is_some()
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        let legacy = raw.is_legacy();
        let title = raw.title.unwrap_or_default();
        if legacy {
            let source = raw.url.unwrap_or_default();
            Entry::new(title, source, raw.media.unwrap_or_default())
        } else {
            let source = raw.source.unwrap_or_default();
            Entry::new(title, source, raw.url.unwrap_or_default())
        }
    }
}

/// A cache record as written to disk (current shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub source: String,
}

impl From<Entry> for StoredEntry {
    fn from(entry: Entry) -> Self {
        Self {
            url: entry.media_url,
            kind: STORED_KIND.to_string(),
            title: entry.title,
            source: entry.source_url,
        }
    }
}
