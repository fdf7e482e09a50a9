//! `wallcache import` – ingest scraped pins into a cache file.

use anyhow::{Context, Result};
use std::path::Path;
use wallcache_core::cache_store::{self, BackupStyle, CacheError};
use wallcache_core::config::WallcacheConfig;
use wallcache_core::dedupe::SeenUrls;
use wallcache_core::harvest;

pub fn run_import(
    cfg: &WallcacheConfig,
    raw: &Path,
    cache: &Path,
    max: Option<usize>,
) -> Result<()> {
    let pins = harvest::read_pins(raw)?;
    let (mut existing, created) = match cache_store::load_cache(cache) {
        Ok(entries) => (entries, false),
        Err(CacheError::NotFound(_)) => (Vec::new(), true),
        Err(e) => return Err(e.into()),
    };

    let mut opts = cfg.harvest_options();
    if max.is_some() {
        opts.max_count = max;
    }

    let seen = SeenUrls::from_entries(&existing);
    let (report, _seen) = harvest::ingest(pins, &opts, seen);
    let added = report.entries.len();

    // A missing cache is created even when nothing new was found.
    if added > 0 || created {
        existing.extend(report.entries);
        let backup = cache_store::replace_with_backup(cache, &existing, BackupStyle::Dotted)
            .with_context(|| format!("rewrite {}", cache.display()))?;
        if let Some(backup) = backup {
            println!("Backup: {}", backup.display());
        }
    }

    println!(
        "{}: {} added, {} rejected, {} skipped, {} total",
        cache.display(),
        added,
        report.rejected,
        report.skipped,
        existing.len()
    );
    Ok(())
}
