//! Error type for cache file operations.

use std::path::PathBuf;

/// Failure to read, parse, or write a cache file. All of these are fatal for
/// the operation that hit them; nothing is written after a read/parse error.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("read cache file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not JSON, or not an array of entry objects.
    #[error("malformed cache file {}: expected a JSON array of entries", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialize cache entries")]
    Serialize(#[source] serde_json::Error),

    #[error("write cache file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("back up cache file to {}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
