//! Cache statistics, structure check and thumbnail upgrade.

use std::collections::BTreeMap;

use crate::entry::{EntryFormat, Entry, RawEntry};
use crate::url_model::{classify, normalize, Domain, ResolutionTier, CDN_HOST};

/// Below this many entries the structure check warns.
pub const RECOMMENDED_MIN_ENTRIES: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    /// Records carrying the legacy `media` field.
    pub with_media_field: usize,
    /// Records without `media` but with a `url` field.
    pub with_url_field: usize,
    pub domains: BTreeMap<Domain, usize>,
    pub tiers: BTreeMap<ResolutionTier, usize>,
    pub blob_urls: usize,
    pub video_urls: usize,
    pub thumbnails: usize,
}

/// Counts record shapes, domains, tiers and likely-broken URLs.
/// Records with neither a `media` nor a `url` field only count toward `total`.
pub fn analyze(records: &[RawEntry]) -> CacheStats {
    let mut stats = CacheStats {
        total: records.len(),
        ..CacheStats::default()
    };
    for record in records {
        let url = if let Some(media) = record.media.as_deref() {
            stats.with_media_field += 1;
            media
        } else if let Some(url) = record.url.as_deref() {
            stats.with_url_field += 1;
            url
        } else {
            continue;
        };

        let c = classify(url);
        *stats.domains.entry(c.domain).or_default() += 1;
        *stats.tiers.entry(c.tier).or_default() += 1;
        if c.tier == ResolutionTier::Thumbnail {
            stats.thumbnails += 1;
        }
        if url.contains("blob:") {
            stats.blob_urls += 1;
        }
        if url.contains("video") {
            stats.video_urls += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureFinding {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureReport {
    pub entries: usize,
    /// Shape of the first record, when there is one.
    pub format: Option<EntryFormat>,
    pub findings: Vec<StructureFinding>,
}

impl StructureReport {
    pub fn passed(&self) -> bool {
        self.findings.iter().all(|f| f.severity != Severity::Failure)
    }
}

/// Checks that a cache is usable by the extension: a non-empty array whose
/// first record points at a CDN image that is not a blob.
pub fn check_structure(records: &[RawEntry]) -> StructureReport {
    let mut findings = Vec::new();
    let Some(first) = records.first() else {
        findings.push(StructureFinding {
            severity: Severity::Failure,
            message: "cache is empty".to_string(),
        });
        return StructureReport {
            entries: 0,
            format: None,
            findings,
        };
    };

    if records.len() < RECOMMENDED_MIN_ENTRIES {
        findings.push(StructureFinding {
            severity: Severity::Warning,
            message: format!("only {} entries (recommend 50+)", records.len()),
        });
    }

    if first.media.is_none() && first.url.is_none() {
        findings.push(StructureFinding {
            severity: Severity::Failure,
            message: "first record has neither 'media' nor 'url'".to_string(),
        });
    }

    let format = first.format();
    if format == EntryFormat::Unknown {
        findings.push(StructureFinding {
            severity: Severity::Warning,
            message: "first record has an unexpected format".to_string(),
        });
    }

    if let Some(url) = first.media_url() {
        if !url.contains(CDN_HOST) {
            findings.push(StructureFinding {
                severity: Severity::Warning,
                message: format!("url not from the image CDN: {url}"),
            });
        }
        if url.contains("blob:") {
            findings.push(StructureFinding {
                severity: Severity::Failure,
                message: "blob url detected".to_string(),
            });
        }
        if classify(url).tier != ResolutionTier::Original {
            findings.push(StructureFinding {
                severity: Severity::Warning,
                message: "thumbnail url; run `wallcache upgrade`".to_string(),
            });
        }
    }

    StructureReport {
        entries: records.len(),
        format: Some(format),
        findings,
    }
}

/// Rewrites every media URL to its full-resolution form. Returns how many
/// entries changed.
pub fn upgrade(entries: &mut [Entry]) -> usize {
    let mut changed = 0;
    for entry in entries.iter_mut() {
        let upgraded = normalize(&entry.media_url);
        if upgraded != entry.media_url {
            entry.set_media_url(upgraded);
            changed += 1;
        }
    }
    changed
}
