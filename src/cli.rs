//! Command-line interface parsing for launchboard
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated [`StartupConfig`].

use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::{CacheManager, SelectionPolicy};
use crate::store::{StoreConfig, DEFAULT_MAX_AGE_HOURS};

/// Most launches shown as tabs
pub const MAX_TABS: usize = 10;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified selection policy is not recognized
    #[error("Invalid selection policy: '{0}'. Valid policies: listing, newest, manifest")]
    InvalidSelection(String),

    /// The staleness window cannot be represented
    #[error("Invalid max age: {0} hours")]
    InvalidMaxAge(u64),

    /// Retention must keep at least one snapshot
    #[error("Invalid retention: --keep must be at least 1")]
    InvalidKeep,

    /// Tab count outside 1..=10
    #[error("Invalid tab count: {0}. Must be between 1 and 10")]
    InvalidTabs(usize),
}

/// launchboard - Browse upcoming rocket launches
#[derive(Parser, Debug)]
#[command(name = "launchboard")]
#[command(about = "Upcoming rocket launches from a cached Launch Library snapshot")]
#[command(version)]
pub struct Cli {
    /// Directory holding launch_data_<timestamp>.json snapshots
    ///
    /// Defaults to the user cache directory. Use `.` to keep snapshots in
    /// the working directory.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Hours after which a snapshot is replaced by a fresh download
    #[arg(long, value_name = "HOURS", default_value_t = DEFAULT_MAX_AGE_HOURS as u64)]
    pub max_age_hours: u64,

    /// How the current snapshot is chosen: listing, newest or manifest
    #[arg(long, value_name = "POLICY", default_value = "listing")]
    pub selection: String,

    /// Keep only the newest N snapshots after a download
    #[arg(long, value_name = "N")]
    pub keep: Option<usize>,

    /// Download a new snapshot even if the current one is fresh
    #[arg(long)]
    pub refresh: bool,

    /// Alternative upcoming-launches endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Print the launches as plain text instead of opening the interface
    #[arg(long)]
    pub list: bool,

    /// Number of launches to show
    #[arg(long, value_name = "N", default_value_t = MAX_TABS)]
    pub tabs: usize,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Snapshot directory
    pub cache_dir: PathBuf,
    /// Staleness window
    pub max_age: Duration,
    /// Snapshot selection policy
    pub selection: SelectionPolicy,
    /// Retention limit
    pub keep: Option<usize>,
    /// Whether to download regardless of age
    pub force_refresh: bool,
    /// Endpoint override
    pub endpoint: Option<String>,
    /// Plain-text mode
    pub list_only: bool,
    /// Number of launches shown
    pub tab_count: usize,
}

/// Parses a selection policy argument.
///
/// # Returns
/// * `Ok(SelectionPolicy)` if the string names a policy
/// * `Err(CliError::InvalidSelection)` otherwise
pub fn parse_selection_arg(s: &str) -> Result<SelectionPolicy, CliError> {
    SelectionPolicy::from_str(s).ok_or_else(|| CliError::InvalidSelection(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if any argument is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let selection = parse_selection_arg(&cli.selection)?;

        let max_age = i64::try_from(cli.max_age_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or(CliError::InvalidMaxAge(cli.max_age_hours))?;

        if cli.keep == Some(0) {
            return Err(CliError::InvalidKeep);
        }

        if cli.tabs == 0 || cli.tabs > MAX_TABS {
            return Err(CliError::InvalidTabs(cli.tabs));
        }

        let cache_dir = cli
            .cache_dir
            .clone()
            .or_else(|| CacheManager::new().map(|cache| cache.cache_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(StartupConfig {
            cache_dir,
            max_age,
            selection,
            keep: cli.keep,
            force_refresh: cli.refresh,
            endpoint: cli.endpoint.clone(),
            list_only: cli.list,
            tab_count: cli.tabs,
        })
    }

    /// Store settings for this startup
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            cache: CacheManager::with_dir(self.cache_dir.clone()).with_retention(self.keep),
            max_age: self.max_age,
            selection: self.selection,
            force_refresh: self.force_refresh,
        }
    }
}
