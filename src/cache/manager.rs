//! Cache manager for persisting launch snapshots to disk
//!
//! Provides a `CacheManager` that owns one directory of timestamped snapshot
//! files. Snapshots are written once through a scratch file and a rename,
//! and are only removed when a retention limit is configured.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::file_name::TEMP_FILE_NAME;
use super::CacheFileName;

/// Name of the sidecar that records the most recent fetch
pub const MANIFEST_FILE_NAME: &str = "launch_data.manifest";

/// Errors raised by the cache directory
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the cache directory failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A cache file name does not embed a parseable timestamp
    #[error("Cache file name has no timestamp: '{0}'")]
    InvalidName(String),

    /// The manifest sidecar could not be encoded or decoded
    #[error("Invalid cache manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Sidecar record pointing at the snapshot written by the latest fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// File name of the snapshot
    pub file: String,
    /// Embedded timestamp of that snapshot
    pub fetched_at: i64,
}

/// Manages the directory of launch snapshots
///
/// By default the directory is the XDG cache directory
/// (`~/.cache/launchboard/` on Linux). The directory listing is the index:
/// there is no database, only `launch_data_<unix_seconds>.json` files and an
/// optional manifest sidecar.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where snapshot files are stored
    cache_dir: PathBuf,
    /// Number of snapshots kept after a fetch (`None` keeps everything)
    retention: Option<usize>,
}

impl CacheManager {
    /// Creates a new CacheManager using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "launchboard")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            retention: None,
        }
    }

    /// Keeps only the newest `keep` snapshots after each fetch
    pub fn with_retention(mut self, keep: Option<usize>) -> Self {
        self.retention = keep;
        self
    }

    /// Directory where snapshots live
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Configured retention limit
    pub fn retention(&self) -> Option<usize> {
        self.retention
    }

    /// Full path of a snapshot file
    pub fn path_for(&self, file: &CacheFileName) -> PathBuf {
        self.cache_dir.join(file.as_str())
    }

    fn manifest_path(&self) -> PathBuf {
        self.cache_dir.join(MANIFEST_FILE_NAME)
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Lists snapshot files in directory-listing order
    ///
    /// Entries with the `.json` suffix whose names carry no timestamp are
    /// skipped with a warning. A missing directory lists as empty.
    pub fn list(&self) -> Result<Vec<CacheFileName>, CacheError> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !CacheFileName::is_candidate(name) {
                continue;
            }
            match CacheFileName::parse(name) {
                Ok(file) => files.push(file),
                Err(err) => warn!(%err, "skipping unrecognized cache file"),
            }
        }

        debug!(dir = %self.cache_dir.display(), count = files.len(), "listed cache files");
        Ok(files)
    }

    /// Reads the raw contents of a snapshot
    pub fn read_snapshot(&self, file: &CacheFileName) -> io::Result<String> {
        fs::read_to_string(self.path_for(file))
    }

    /// Stores a raw response body as the snapshot for `timestamp`
    ///
    /// The body goes to a scratch file first and is renamed into place, so a
    /// snapshot name never refers to a partially written file. The manifest
    /// is updated and the retention limit applied afterwards; failures of
    /// either are logged but do not undo the snapshot.
    pub fn write_snapshot(&self, body: &str, timestamp: i64) -> Result<CacheFileName, CacheError> {
        self.ensure_dir()?;

        let temp_path = self.cache_dir.join(TEMP_FILE_NAME);
        fs::write(&temp_path, body)?;

        let file = CacheFileName::for_timestamp(timestamp);
        fs::rename(&temp_path, self.path_for(&file))?;
        info!(file = %file, bytes = body.len(), "stored launch snapshot");

        if let Err(err) = self.write_manifest(&file) {
            warn!(%err, "failed to update cache manifest");
        }

        if let Some(keep) = self.retention {
            if let Err(err) = self.prune(keep, &file) {
                warn!(%err, "failed to apply cache retention");
            }
        }

        Ok(file)
    }

    /// Reads the manifest sidecar
    ///
    /// # Returns
    /// * `Ok(None)` if no manifest has been written yet
    /// * `Err` if it exists but cannot be read or decoded
    pub fn read_manifest(&self) -> Result<Option<Manifest>, CacheError> {
        let content = match fs::read_to_string(self.manifest_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write_manifest(&self, file: &CacheFileName) -> Result<(), CacheError> {
        let manifest = Manifest {
            file: file.as_str().to_string(),
            fetched_at: file.timestamp(),
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(self.manifest_path(), json)?;
        Ok(())
    }

    /// Deletes all but the newest `keep` snapshots, never touching `protect`
    ///
    /// Returns the snapshots that were removed.
    pub fn prune(
        &self,
        keep: usize,
        protect: &CacheFileName,
    ) -> Result<Vec<CacheFileName>, CacheError> {
        let mut files = self.list()?;
        files.sort_by_key(|file| std::cmp::Reverse(file.timestamp()));

        let mut removed = Vec::new();
        for file in files.into_iter().skip(keep) {
            if &file == protect {
                continue;
            }
            fs::remove_file(self.path_for(&file))?;
            info!(file = %file, "removed old launch snapshot");
            removed.push(file);
        }
        Ok(removed)
    }
}
