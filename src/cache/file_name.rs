//! Cache file naming
//!
//! Every snapshot of the upcoming-launches response is stored as
//! `launch_data_<unix_seconds>.json`. The embedded timestamp is the only
//! record of when the snapshot was fetched.

use chrono::{DateTime, Utc};

use super::CacheError;

/// Prefix shared by every snapshot file
pub const FILE_PREFIX: &str = "launch_data_";

/// Suffix that marks a directory entry as a cache candidate
pub const FILE_SUFFIX: &str = ".json";

/// Name of the scratch file a fetch writes before renaming it into place
pub const TEMP_FILE_NAME: &str = "tmp_launch_data.json";

/// A validated snapshot file name with its embedded fetch timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFileName {
    name: String,
    timestamp: i64,
}

impl CacheFileName {
    /// Builds the file name for a snapshot fetched at `timestamp`
    pub fn for_timestamp(timestamp: i64) -> Self {
        Self {
            name: format!("{}{}{}", FILE_PREFIX, timestamp, FILE_SUFFIX),
            timestamp,
        }
    }

    /// Parses a directory entry name back into a snapshot name
    ///
    /// # Returns
    /// * `Ok(CacheFileName)` if the name is `launch_data_<integer>.json`
    /// * `Err(CacheError::InvalidName)` otherwise
    pub fn parse(name: &str) -> Result<Self, CacheError> {
        let timestamp = name
            .strip_prefix(FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
            .and_then(|digits| digits.parse::<i64>().ok())
            .ok_or_else(|| CacheError::InvalidName(name.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            timestamp,
        })
    }

    /// Whether a directory entry should be considered at all
    ///
    /// Anything with the JSON suffix is a candidate; candidates that then
    /// fail [`CacheFileName::parse`] are skipped by the listing.
    pub fn is_candidate(name: &str) -> bool {
        name.ends_with(FILE_SUFFIX)
    }

    /// The file name as stored on disk
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Seconds since the Unix epoch at which the snapshot was fetched
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The embedded timestamp as a UTC date, if it is within chrono's range
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Seconds elapsed between the embedded timestamp and `now`
    ///
    /// Negative when the name carries a timestamp in the future.
    pub fn age_secs(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }
}

impl std::fmt::Display for CacheFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
