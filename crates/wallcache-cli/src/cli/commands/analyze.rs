//! `wallcache analyze` – summarize a cache file.

use anyhow::Result;
use std::path::Path;
use wallcache_core::cache_store;

pub fn run_analyze(path: &Path) -> Result<()> {
    let records = cache_store::load_records(path)?;
    let stats = cache_store::analyze(&records);

    println!("{}: {} entries", path.display(), stats.total);
    println!("  'media' field: {}", stats.with_media_field);
    println!("  'url' field:   {}", stats.with_url_field);

    println!("Domains:");
    for (domain, count) in &stats.domains {
        println!("  {:<10} {}", domain, count);
    }
    println!("Resolution:");
    for (tier, count) in &stats.tiers {
        println!("  {:<10} {}", tier, count);
    }

    println!("Issues:");
    println!("  blob urls:  {}", stats.blob_urls);
    println!("  video urls: {}", stats.video_urls);
    println!("  thumbnails: {}", stats.thumbnails);
    if stats.thumbnails > 0 {
        println!("Run `wallcache upgrade` to switch thumbnails to originals.");
    }
    Ok(())
}
