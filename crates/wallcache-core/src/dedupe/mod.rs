//! Deduplication of entries by normalized media URL.
//!
//! The set of already-emitted keys is an explicit [`SeenUrls`] value owned by
//! the caller for one run. Ingest threads it through successive batches; the
//! standalone maintenance pass starts from an empty set. Both go through the
//! same [`dedupe`], which is idempotent: running it on its own output changes
//! nothing.

use std::collections::HashSet;

use crate::entry::Entry;
use crate::url_model::normalize;

/// Run-scoped set of media URL keys that have already been emitted.
#[derive(Debug, Clone, Default)]
pub struct SeenUrls {
    keys: HashSet<String>,
}

impl SeenUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the set from entries that are already persisted.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut seen = Self::new();
        for entry in entries {
            if entry.has_media() {
                seen.keys.insert(dedupe_key(&entry.media_url));
            }
        }
        seen
    }

    pub fn contains(&self, media_url: &str) -> bool {
        self.keys.contains(&dedupe_key(media_url))
    }

    /// Records a media URL; returns false when it was already present.
    pub fn insert(&mut self, media_url: &str) -> bool {
        self.keys.insert(dedupe_key(media_url))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The dedup key of a media URL: its normalized (full-resolution) form.
pub fn dedupe_key(media_url: &str) -> String {
    normalize(media_url)
}

/// Keeps the first entry per normalized media URL, in input order.
///
/// Entries with an empty media URL are never emitted. Keys already in `seen`
/// count as duplicates. With `max_count`, scanning stops as soon as that many
/// entries have been emitted, so earlier entries win when the cap binds.
pub fn dedupe(
    entries: impl IntoIterator<Item = Entry>,
    max_count: Option<usize>,
    mut seen: SeenUrls,
) -> (Vec<Entry>, SeenUrls) {
    let mut unique = Vec::new();
    if max_count == Some(0) {
        return (unique, seen);
    }
    for entry in entries {
        if !entry.has_media() {
            continue;
        }
        if !seen.insert(&entry.media_url) {
            continue;
        }
        unique.push(entry);
        if max_count.is_some_and(|max| unique.len() >= max) {
            break;
        }
    }
    (unique, seen)
}

/// [`dedupe`] starting from an empty seen set.
pub fn dedupe_entries(entries: impl IntoIterator<Item = Entry>, max_count: Option<usize>) -> Vec<Entry> {
    dedupe(entries, max_count, SeenUrls::new()).0
}
