//! Cache file I/O: load, save, and backup-then-overwrite.
//!
//! A cache file is a JSON array of entry records. Reading accepts both
//! historical record shapes; writing always emits the current shape,
//! pretty-printed UTF-8 with non-ASCII characters kept literally. Callers
//! must not run two writers against one file at the same time.

mod analyze;
mod error;

use std::fs;
use std::path::{Path, PathBuf};

use crate::entry::{Entry, RawEntry};

pub use analyze::{
    analyze, check_structure, upgrade, CacheStats, Severity, StructureFinding, StructureReport,
    RECOMMENDED_MIN_ENTRIES,
};
pub use error::CacheError;

/// How the pre-rewrite copy of a cache file is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStyle {
    /// `cache.json` → `cache_backup.json` (used by validation).
    Underscore,
    /// `cache.json` → `cache.backup.json` (used by maintenance passes).
    Dotted,
}

/// Sibling path the current file is moved to before a rewrite.
pub fn backup_path(path: &Path, style: BackupStyle) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match style {
        BackupStyle::Underscore => format!("{stem}_backup.json"),
        BackupStyle::Dotted => format!("{stem}.backup.json"),
    };
    path.with_file_name(name)
}

/// Reads the raw records of a cache file without mapping them to entries.
pub fn load_records(path: &Path) -> Result<Vec<RawEntry>, CacheError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CacheError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(CacheError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&bytes).map_err(|source| CacheError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a cache file into canonical entries, in file order.
pub fn load_cache(path: &Path) -> Result<Vec<Entry>, CacheError> {
    Ok(load_records(path)?.into_iter().map(Entry::from).collect())
}

/// Writes entries in the current record shape, creating parent directories.
pub fn save_cache(path: &Path, entries: &[Entry]) -> Result<(), CacheError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CacheError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(entries).map_err(CacheError::Serialize)?;
    fs::write(path, json).map_err(|source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("saved {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Moves the existing file to its backup path, then writes `entries`.
///
/// Returns the backup path when there was a file to back up. If the write
/// fails, the previous content survives at the backup path.
pub fn replace_with_backup(
    path: &Path,
    entries: &[Entry],
    style: BackupStyle,
) -> Result<Option<PathBuf>, CacheError> {
    let backup = if path.exists() {
        let backup = backup_path(path, style);
        fs::rename(path, &backup).map_err(|source| CacheError::Backup {
            path: backup.clone(),
            source,
        })?;
        tracing::info!("backed up {} to {}", path.display(), backup.display());
        Some(backup)
    } else {
        None
    };
    save_cache(path, entries)?;
    Ok(backup)
}
