use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::harvest::{HarvestOptions, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH};
use crate::probe::{ProbeOptions, DEFAULT_REFERER, DEFAULT_USER_AGENT};
use crate::validate::ValidateOptions;

/// Ingest parameters (optional `[harvest]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Maximum new entries per import (None = unlimited).
    #[serde(default)]
    pub max_per_run: Option<usize>,
    /// Minimum width when a pin reports its dimensions.
    pub min_width: u32,
    /// Minimum height when a pin reports its dimensions.
    pub min_height: u32,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_per_run: None,
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }
}

/// Global configuration loaded from `~/.config/wallcache/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallcacheConfig {
    /// Cache files validated when none are given on the command line.
    pub cache_files: Vec<PathBuf>,
    /// Per-request probe timeout in seconds.
    pub probe_timeout_secs: u64,
    /// Probes issued concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches in milliseconds.
    pub batch_delay_ms: u64,
    /// Override for the probe User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub harvest: Option<HarvestConfig>,
}

impl Default for WallcacheConfig {
    fn default() -> Self {
        Self {
            cache_files: vec![
                PathBuf::from("pinterest_cache.json"),
                PathBuf::from("extension/data/pinterest_cache.json"),
            ],
            probe_timeout_secs: 10,
            batch_size: 10,
            batch_delay_ms: 500,
            user_agent: None,
            harvest: None,
        }
    }
}

impl WallcacheConfig {
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            timeout: Duration::from_secs(self.probe_timeout_secs.max(1)),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            referer: DEFAULT_REFERER.to_string(),
        }
    }

    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            batch_size: self.batch_size.max(1),
            batch_delay: Duration::from_millis(self.batch_delay_ms),
        }
    }

    pub fn harvest_options(&self) -> HarvestOptions {
        let h = self.harvest.clone().unwrap_or_default();
        HarvestOptions {
            max_count: h.max_per_run,
            min_width: h.min_width,
            min_height: h.min_height,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wallcache")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WallcacheConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WallcacheConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: WallcacheConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
