//! `wallcache validate` – probe cached image URLs and drop the dead ones.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use wallcache_core::cache_store::{self, BackupStyle};
use wallcache_core::config::WallcacheConfig;
use wallcache_core::probe::{CurlProber, ProbeBackend, ProbeOptions};
use wallcache_core::validate::{self, ValidationProgress, ValidationReport};

pub async fn run_validate(cfg: &WallcacheConfig, files: Vec<PathBuf>) -> Result<()> {
    let processed = validate_files(cfg, files, CurlProber::new).await?;
    if processed == 0 {
        println!("No cache files to validate.");
    }
    Ok(())
}

/// What happened to a cache file after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    /// No entry survived; the file was left as it was.
    Unchanged,
    /// The file now holds only the valid entries.
    Rewritten { backup: Option<PathBuf> },
}

/// Validates each existing file with a backend from `make_backend` and
/// returns how many files were processed. Missing files are skipped.
pub(crate) async fn validate_files<B, F>(
    cfg: &WallcacheConfig,
    files: Vec<PathBuf>,
    make_backend: F,
) -> Result<usize>
where
    B: ProbeBackend,
    F: Fn(ProbeOptions) -> B + Clone + Send + 'static,
{
    let files = if files.is_empty() {
        cfg.cache_files.clone()
    } else {
        files
    };

    let mut processed = 0usize;
    for path in files {
        if !path.exists() {
            println!("Skipping {} (not found)", path.display());
            continue;
        }
        validate_one(cfg, &path, make_backend.clone()).await?;
        processed += 1;
    }
    Ok(processed)
}

async fn validate_one<B, F>(cfg: &WallcacheConfig, path: &Path, make_backend: F) -> Result<()>
where
    B: ProbeBackend,
    F: FnOnce(ProbeOptions) -> B + Send + 'static,
{
    println!("Validating {}", path.display());

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ValidationProgress>(16);
    let progress_handle = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            println!(
                "  {}/{} checked ({:.0}%)  {} valid  {} removed",
                p.checked,
                p.total,
                p.fraction() * 100.0,
                p.valid,
                p.removed
            );
        }
    });

    let probe_opts = cfg.probe_options();
    let validate_opts = cfg.validate_options();
    let task_path = path.to_path_buf();
    // Curl multi is blocking; keep it off the async workers.
    let report = tokio::task::spawn_blocking(move || {
        let mut backend = make_backend(probe_opts);
        validate::validate_cache_file(&mut backend, &task_path, &validate_opts, Some(&progress_tx))
    })
    .await
    .context("validation task failed")?
    .with_context(|| format!("validate {}", path.display()))?;

    let _ = progress_handle.await;

    print_summary(&report);

    match persist_report(path, &report)? {
        Persisted::Unchanged => {
            println!("  No valid entries; {} left unchanged.", path.display());
        }
        Persisted::Rewritten { backup } => {
            if let Some(backup) = backup {
                println!("  Backup: {}", backup.display());
            }
            println!("  Saved {} entries to {}", report.valid.len(), path.display());
        }
    }
    Ok(())
}

/// Writes the surviving entries back over `path` with an `_backup.json` copy
/// of the old file. A report with no valid entry leaves the file untouched.
pub fn persist_report(path: &Path, report: &ValidationReport) -> Result<Persisted> {
    if report.valid.is_empty() {
        return Ok(Persisted::Unchanged);
    }
    let backup = cache_store::replace_with_backup(path, &report.valid, BackupStyle::Underscore)
        .with_context(|| format!("rewrite {}", path.display()))?;
    Ok(Persisted::Rewritten { backup })
}

fn print_summary(report: &ValidationReport) {
    println!(
        "  {} valid, {} removed (of {})",
        report.valid.len(),
        report.removed,
        report.total()
    );
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    for f in &report.failures {
        *by_category.entry(f.failure.category()).or_default() += 1;
    }
    for (category, count) in by_category {
        println!("    {:<16} {}", category, count);
    }
}
