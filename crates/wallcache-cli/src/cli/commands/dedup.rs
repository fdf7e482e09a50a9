//! `wallcache dedup` – remove duplicate media URLs from a cache file.

use anyhow::{Context, Result};
use std::path::Path;
use wallcache_core::cache_store::{self, BackupStyle};
use wallcache_core::dedupe;

pub fn run_dedup(path: &Path) -> Result<()> {
    let entries = cache_store::load_cache(path)?;
    let before = entries.len();
    let unique = dedupe::dedupe_entries(entries, None);
    let removed = before - unique.len();

    let backup = cache_store::replace_with_backup(path, &unique, BackupStyle::Dotted)
        .with_context(|| format!("rewrite {}", path.display()))?;
    if let Some(backup) = backup {
        println!("Backup: {}", backup.display());
    }
    println!(
        "{}: {} entries, {} duplicates removed, {} kept",
        path.display(),
        before,
        removed,
        unique.len()
    );
    Ok(())
}
