//! `wallcache check` – verify a cache file's structure.

use anyhow::Result;
use std::path::Path;
use wallcache_core::cache_store::{self, Severity};

pub fn run_check(path: &Path) -> Result<()> {
    let records = cache_store::load_records(path)?;
    let report = cache_store::check_structure(&records);

    println!("{}: {} entries", path.display(), report.entries);
    if let Some(format) = report.format {
        println!("  format: {:?}", format);
    }
    for finding in &report.findings {
        let tag = match finding.severity {
            Severity::Warning => "warning",
            Severity::Failure => "FAIL",
        };
        println!("  {}: {}", tag, finding.message);
    }

    if !report.passed() {
        anyhow::bail!("structure check failed for {}", path.display());
    }
    println!("Structure OK.");
    Ok(())
}
