//! `wallcache sample` – print the first entries of a cache file.

use anyhow::Result;
use std::path::Path;
use wallcache_core::cache_store;

pub fn run_sample(path: &Path, count: usize) -> Result<()> {
    let entries = cache_store::load_cache(path)?;
    let shown = count.min(entries.len());
    println!("{}: first {} of {} entries", path.display(), shown, entries.len());
    let json = serde_json::to_string_pretty(&entries[..shown])?;
    println!("{json}");
    Ok(())
}
