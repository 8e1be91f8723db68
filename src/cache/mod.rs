//! Cache module for storing launch snapshots on disk
//!
//! Snapshots are flat JSON files named after the moment they were fetched.
//! This module knows how to name, list, select, write and prune them; the
//! freshness decision itself lives in [`crate::store`].

mod file_name;
mod manager;
mod selection;

pub use file_name::{CacheFileName, FILE_PREFIX, FILE_SUFFIX, TEMP_FILE_NAME};
pub use manager::{CacheError, CacheManager, Manifest, MANIFEST_FILE_NAME};
pub use selection::{select, SelectionPolicy};
