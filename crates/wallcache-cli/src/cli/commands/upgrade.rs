//! `wallcache upgrade` – rewrite thumbnail URLs to originals.

use anyhow::{Context, Result};
use std::path::Path;
use wallcache_core::cache_store::{self, BackupStyle};

pub fn run_upgrade(path: &Path) -> Result<()> {
    let mut entries = cache_store::load_cache(path)?;
    let changed = cache_store::upgrade(&mut entries);
    if changed == 0 {
        println!("{}: all {} entries already point at originals", path.display(), entries.len());
        return Ok(());
    }

    let backup = cache_store::replace_with_backup(path, &entries, BackupStyle::Dotted)
        .with_context(|| format!("rewrite {}", path.display()))?;
    if let Some(backup) = backup {
        println!("Backup: {}", backup.display());
    }
    println!("{}: upgraded {} of {} entries", path.display(), changed, entries.len());
    Ok(())
}
