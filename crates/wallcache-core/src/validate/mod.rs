//! Validation engine: re-check every cached entry and keep the live images.
//!
//! Probes go out in fixed-size batches. A batch runs to completion (every
//! probe, fallbacks included) before the next one starts, with a fixed pause
//! in between, so at most `batch_size` probes are ever in flight. Results are
//! merged only after each batch barrier and the surviving entries keep their
//! original input order.

mod progress;

use anyhow::Result;
use std::path::Path;
use std::time::Duration;

use crate::cache_store::load_cache;
use crate::entry::Entry;
use crate::probe::{ProbeBackend, ProbeFailure, ProbeOutcome};

pub use progress::ValidationProgress;

/// Default number of probes per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default pause between consecutive batches.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

/// Characters of a URL shown in per-URL diagnostics.
const DIAGNOSTIC_URL_CHARS: usize = 80;

#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

/// One dead URL and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeDiagnostic {
    pub url: String,
    pub failure: ProbeFailure,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Entries whose probe succeeded, in input order.
    pub valid: Vec<Entry>,
    /// Entries dropped: dead URLs plus entries without a media URL.
    pub removed: usize,
    pub failures: Vec<ProbeDiagnostic>,
    /// Size of every batch issued, in order.
    pub batches: Vec<usize>,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.valid.len() + self.removed
    }
}

/// Probes every entry through `backend` and returns the live subset.
///
/// Entries without a media URL are dropped without a probe. Individual URL
/// failures never make this fail; only a backend error does. Progress is
/// published after each batch with `try_send`, so a slow consumer only misses
/// updates.
pub fn validate_entries<B: ProbeBackend + ?Sized>(
    backend: &mut B,
    entries: Vec<Entry>,
    opts: &ValidateOptions,
    progress_tx: Option<&tokio::sync::mpsc::Sender<ValidationProgress>>,
) -> Result<ValidationReport> {
    let total = entries.len();
    let batch_size = opts.batch_size.max(1);
    let targets: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.has_media())
        .map(|(i, _)| i)
        .collect();
    let unprobed = total - targets.len();
    if unprobed > 0 {
        tracing::debug!(unprobed, "entries without media url dropped");
    }

    let mut live = vec![false; total];
    let mut report = ValidationReport {
        removed: unprobed,
        ..ValidationReport::default()
    };
    let mut valid_count = 0usize;
    let mut checked = unprobed;

    for (batch_no, batch) in targets.chunks(batch_size).enumerate() {
        if batch_no > 0 && !opts.batch_delay.is_zero() {
            std::thread::sleep(opts.batch_delay);
        }
        let urls: Vec<&str> = batch.iter().map(|&i| entries[i].media_url.as_str()).collect();
        let outcomes = backend.probe_batch(&urls)?;
        if outcomes.len() != urls.len() {
            anyhow::bail!(
                "probe backend returned {} outcomes for a batch of {}",
                outcomes.len(),
                urls.len()
            );
        }
        report.batches.push(batch.len());

        for (&index, outcome) in batch.iter().zip(outcomes) {
            match outcome {
                ProbeOutcome::Live { .. } => {
                    live[index] = true;
                    valid_count += 1;
                }
                ProbeOutcome::Dead(failure) => {
                    let url = &entries[index].media_url;
                    tracing::warn!(
                        url = %truncate_for_log(url, DIAGNOSTIC_URL_CHARS),
                        category = %failure.category(),
                        "probe failed: {}",
                        failure
                    );
                    report.removed += 1;
                    report.failures.push(ProbeDiagnostic {
                        url: url.clone(),
                        failure,
                    });
                }
            }
        }

        checked += batch.len();
        if let Some(tx) = progress_tx {
            let _ = tx.try_send(ValidationProgress {
                checked,
                total,
                valid: valid_count,
                removed: report.removed,
            });
        }
        tracing::debug!(batch = batch_no + 1, size = batch.len(), valid_count, "batch done");
    }

    report.valid = entries
        .into_iter()
        .zip(live)
        .filter_map(|(entry, ok)| ok.then_some(entry))
        .collect();

    tracing::info!(
        valid = report.valid.len(),
        removed = report.removed,
        batches = report.batches.len(),
        "validation complete"
    );
    Ok(report)
}

/// Loads a cache file and validates it. Fails only when the file cannot be
/// read or is not an array of entry records (or the backend itself fails).
pub fn validate_cache_file<B: ProbeBackend + ?Sized>(
    backend: &mut B,
    path: &Path,
    opts: &ValidateOptions,
    progress_tx: Option<&tokio::sync::mpsc::Sender<ValidationProgress>>,
) -> Result<ValidationReport> {
    let entries = load_cache(path)?;
    tracing::info!("loaded {} entries from {}", entries.len(), path.display());
    validate_entries(backend, entries, opts, progress_tx)
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
