//! CLI for the wallcache image cache pipeline.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wallcache_core::config;

use commands::{
    run_analyze, run_check, run_dedup, run_import, run_sample, run_upgrade, run_validate,
};

/// Cache file used by the single-file commands when none is given.
pub const DEFAULT_CACHE_FILE: &str = "extension/data/pinterest_cache.json";

/// Top-level CLI for wallcache.
#[derive(Debug, Parser)]
#[command(name = "wallcache")]
#[command(about = "wallcache: harvest, dedupe and validate cached wallpaper image URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe every cached image URL and drop the dead ones.
    Validate {
        /// Cache files to validate (default: `cache_files` from config).
        files: Vec<PathBuf>,
    },

    /// Remove duplicate media URLs from a cache file.
    Dedup {
        #[arg(default_value = DEFAULT_CACHE_FILE)]
        file: PathBuf,
    },

    /// Ingest a JSON array of scraped pins into a cache file.
    Import {
        /// Path to the raw pins JSON.
        raw: PathBuf,

        /// Cache file to append to.
        #[arg(long, default_value = DEFAULT_CACHE_FILE)]
        cache: PathBuf,

        /// Stop after N new entries (overrides `harvest.max_per_run`).
        #[arg(long, value_name = "N")]
        max: Option<usize>,
    },

    /// Show domain, tier and issue counts for a cache file.
    Analyze {
        #[arg(default_value = DEFAULT_CACHE_FILE)]
        file: PathBuf,
    },

    /// Print the first entries of a cache file.
    Sample {
        #[arg(default_value = DEFAULT_CACHE_FILE)]
        file: PathBuf,

        /// Number of entries to print.
        #[arg(long, default_value = "3", value_name = "N")]
        count: usize,
    },

    /// Check that a cache file has the structure the extension expects.
    Check {
        #[arg(default_value = DEFAULT_CACHE_FILE)]
        file: PathBuf,
    },

    /// Rewrite thumbnail URLs in a cache file to their originals.
    Upgrade {
        #[arg(default_value = DEFAULT_CACHE_FILE)]
        file: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Validate { files } => run_validate(&cfg, files).await?,
            CliCommand::Dedup { file } => run_dedup(&file)?,
            CliCommand::Import { raw, cache, max } => run_import(&cfg, &raw, &cache, max)?,
            CliCommand::Analyze { file } => run_analyze(&file)?,
            CliCommand::Sample { file, count } => run_sample(&file, count)?,
            CliCommand::Check { file } => run_check(&file)?,
            CliCommand::Upgrade { file } => run_upgrade(&file)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
