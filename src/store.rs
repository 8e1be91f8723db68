//! Launch data store
//!
//! [`DataStore::initialize`] resolves the current snapshot once at startup,
//! fetching a new one when the chosen file is older than the staleness
//! window, and keeps the decoded launches for the rest of the process. A
//! `DataStore` value only exists once loading has succeeded, and it never
//! changes afterwards.

use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{self, CacheError, CacheFileName, CacheManager, SelectionPolicy};
use crate::data::{FetchError, LaunchRecord, LaunchSource, LaunchWindow, ResultSet};

/// Snapshots older than this are replaced at startup
pub const DEFAULT_MAX_AGE_HOURS: i64 = 12;

/// Errors that can occur while loading or querying launch data
#[derive(Debug, Error)]
pub enum StoreError {
    /// A fetch was needed to replace a stale snapshot and it failed
    #[error("Failed to refresh launch data: {0}")]
    Network(#[from] FetchError),

    /// There is no snapshot on disk and none could be fetched
    #[error("No launch data available in {}", .dir.display())]
    NoUsableCache {
        dir: PathBuf,
        #[source]
        source: Option<FetchError>,
    },

    /// The selected snapshot could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selected snapshot is not a valid upcoming-launches payload
    #[error("Invalid launch data in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cache directory could not be listed or written
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// An accessor was called with an index past the end of the results
    #[error("Launch index {index} out of range ({len} launches loaded)")]
    Index { index: usize, len: usize },
}

/// Everything the store needs to decide where its data comes from
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Snapshot directory
    pub cache: CacheManager,
    /// Staleness window
    pub max_age: Duration,
    /// How the current snapshot is picked from the directory
    pub selection: SelectionPolicy,
    /// Fetch even if the current snapshot is fresh
    pub force_refresh: bool,
}

impl StoreConfig {
    /// Default settings for the given cache directory
    pub fn new(cache: CacheManager) -> Self {
        Self {
            cache,
            max_age: Duration::hours(DEFAULT_MAX_AGE_HOURS),
            selection: SelectionPolicy::default(),
            force_refresh: false,
        }
    }
}

/// Current Unix time in whole seconds, rounded to the nearest second
pub fn unix_now() -> i64 {
    let millis = Utc::now().timestamp_millis();
    (millis + 500).div_euclid(1000)
}

/// Immutable snapshot of upcoming launches
#[derive(Debug, Clone)]
pub struct DataStore {
    results: ResultSet,
    source_file: PathBuf,
    snapshot: CacheFileName,
}

impl DataStore {
    /// Resolves, loads and decodes the current snapshot
    ///
    /// # Arguments
    /// * `config` - Cache location, staleness window and selection policy
    /// * `source` - Where a replacement snapshot is fetched from
    ///
    /// # Returns
    /// * `Ok(DataStore)` holding the decoded launches
    /// * `Err(StoreError)` if no snapshot could be resolved, read or decoded
    pub async fn initialize<S: LaunchSource>(
        config: &StoreConfig,
        source: &S,
    ) -> Result<Self, StoreError> {
        let file = select_current_file(config, source).await?;
        let path = config.cache.path_for(&file);

        let body = config
            .cache
            .read_snapshot(&file)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        let results = ResultSet::from_json(&body).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;

        info!(file = %file, launches = results.len(), "loaded launch snapshot");

        Ok(Self {
            results,
            source_file: path,
            snapshot: file,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_results(results: ResultSet) -> Self {
        Self {
            results,
            source_file: PathBuf::from(CacheFileName::for_timestamp(0).as_str()),
            snapshot: CacheFileName::for_timestamp(0),
        }
    }

    /// Snapshot file the launches were loaded from
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// When the loaded snapshot was fetched
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.fetched_at()
    }

    /// All launches, in payload order
    pub fn results(&self) -> &[LaunchRecord] {
        self.results.as_slice()
    }

    pub fn results_len(&self) -> usize {
        self.results.len()
    }

    /// The launch at `idx`
    pub fn record(&self, idx: usize) -> Result<&LaunchRecord, StoreError> {
        self.results.get(idx).ok_or(StoreError::Index {
            index: idx,
            len: self.results.len(),
        })
    }

    pub fn launch_service_provider(&self, idx: usize) -> Result<&str, StoreError> {
        Ok(&self.record(idx)?.provider)
    }

    pub fn launch_name(&self, idx: usize) -> Result<&str, StoreError> {
        Ok(&self.record(idx)?.name)
    }

    pub fn launch_status_abbrev(&self, idx: usize) -> Result<&str, StoreError> {
        Ok(&self.record(idx)?.status_abbrev)
    }

    pub fn launch_window(&self, idx: usize) -> Result<&LaunchWindow, StoreError> {
        Ok(&self.record(idx)?.window)
    }

    /// Mission description, `None` when the API listed no mission
    pub fn launch_description(&self, idx: usize) -> Result<Option<&str>, StoreError> {
        Ok(self.record(idx)?.mission_description.as_deref())
    }

    pub fn longitude(&self, idx: usize) -> Result<&str, StoreError> {
        Ok(&self.record(idx)?.pad_longitude)
    }

    pub fn latitude(&self, idx: usize) -> Result<&str, StoreError> {
        Ok(&self.record(idx)?.pad_latitude)
    }

    /// Pad position as `(longitude, latitude)`, `None` if it does not parse
    pub fn pad_coordinates(&self, idx: usize) -> Result<Option<(f64, f64)>, StoreError> {
        Ok(self.record(idx)?.coordinates())
    }
}

/// Picks the snapshot to load, fetching a new one if needed
///
/// The policy is applied to the directory listing. If nothing is found, or
/// the chosen snapshot is older than `config.max_age`, one fetch is made and
/// the same policy is applied to a fresh listing. The second pick is returned
/// as is, even when it is not the file that was just written.
pub async fn select_current_file<S: LaunchSource>(
    config: &StoreConfig,
    source: &S,
) -> Result<CacheFileName, StoreError> {
    select_current_file_at(config, source, unix_now()).await
}

async fn select_current_file_at<S: LaunchSource>(
    config: &StoreConfig,
    source: &S,
    now: i64,
) -> Result<CacheFileName, StoreError> {
    let chosen = pick(config)?;

    let current = match chosen {
        Some(file) if config.force_refresh => {
            info!(file = %file, "refresh requested");
            Some(file)
        }
        Some(file) => {
            let age = file.age_secs(now);
            if age > config.max_age.num_seconds() {
                info!(file = %file, age_secs = age, "launch snapshot is stale");
                Some(file)
            } else {
                debug!(file = %file, age_secs = age, "launch snapshot is fresh");
                return Ok(file);
            }
        }
        None => {
            info!(dir = %config.cache.cache_dir().display(), "no launch snapshot cached");
            None
        }
    };

    let written = match fetch_from_network_at(config, source, now).await {
        Ok(written) => written,
        Err(StoreError::Network(err)) if current.is_none() => {
            return Err(StoreError::NoUsableCache {
                dir: config.cache.cache_dir().to_path_buf(),
                source: Some(err),
            });
        }
        Err(err) => return Err(err),
    };

    let reselected = pick(config)?.ok_or_else(|| StoreError::NoUsableCache {
        dir: config.cache.cache_dir().to_path_buf(),
        source: None,
    })?;
    if reselected != written {
        warn!(
            written = %written,
            selected = %reselected,
            policy = config.selection.name(),
            "selection did not pick the snapshot just fetched"
        );
    }
    Ok(reselected)
}

/// Applies the selection policy to the current directory listing
fn pick(config: &StoreConfig) -> Result<Option<CacheFileName>, StoreError> {
    let listing = config.cache.list()?;

    let manifest = match config.selection {
        SelectionPolicy::Manifest => match config.cache.read_manifest() {
            Ok(manifest) => manifest.map(|m| m.file),
            Err(err) => {
                warn!(%err, "ignoring unreadable cache manifest");
                None
            }
        },
        _ => None,
    };

    let chosen = cache::select(&listing, config.selection, manifest.as_deref()).cloned();
    debug!(
        policy = config.selection.name(),
        candidates = listing.len(),
        chosen = chosen.as_ref().map(CacheFileName::as_str),
        "selected launch snapshot"
    );
    Ok(chosen)
}

/// Downloads the upcoming launches and stores them as a new snapshot
///
/// The body is stored verbatim under the current timestamp. Exactly one
/// request is made; a failure is returned immediately.
pub async fn fetch_from_network<S: LaunchSource>(
    config: &StoreConfig,
    source: &S,
) -> Result<CacheFileName, StoreError> {
    fetch_from_network_at(config, source, unix_now()).await
}

async fn fetch_from_network_at<S: LaunchSource>(
    config: &StoreConfig,
    source: &S,
    now: i64,
) -> Result<CacheFileName, StoreError> {
    let body = source.fetch_upcoming().await?;
    Ok(config.cache.write_snapshot(&body, now)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    const BODY: &str = r#"{"results": [{
        "name": "Falcon 9 Block 5 | Starlink Group 6-1",
        "status": {"abbrev": "Go"},
        "window_start": "2023-09-01T02:00:00Z",
        "window_end": "2023-09-01T06:00:00Z",
        "launch_service_provider": {"name": "SpaceX"},
        "mission": {"description": "Starlink batch."},
        "pad": {"latitude": "28.5618571", "longitude": "-80.577366"}
    }]}"#;

    /// Source that counts requests and can be told to fail
    struct FakeSource {
        body: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn ok(body: &'static str) -> Self {
            Self {
                body: Some(body),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                calls: Cell::new(0),
            }
        }
    }

    impl LaunchSource for FakeSource {
        async fn fetch_upcoming(&self) -> Result<String, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.body
                .map(str::to_string)
                .ok_or(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    fn config_in(dir: &TempDir, selection: SelectionPolicy) -> StoreConfig {
        StoreConfig {
            selection,
            ..StoreConfig::new(CacheManager::with_dir(dir.path().to_path_buf()))
        }
    }

    fn seed(dir: &TempDir, timestamp: i64, body: &str) {
        let name = CacheFileName::for_timestamp(timestamp);
        fs::write(dir.path().join(name.as_str()), body).expect("Failed to seed snapshot");
    }

    #[tokio::test]
    async fn test_fresh_snapshot_is_reused() {
        let dir = TempDir::new().unwrap();
        let now = 1_000_000;
        seed(&dir, now - 3600, BODY);
        let source = FakeSource::ok(BODY);

        let chosen = select_current_file_at(&config_in(&dir, SelectionPolicy::Listing), &source, now)
            .await
            .unwrap();

        assert_eq!(chosen.timestamp(), now - 3600);
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_exactly_twelve_hours_is_still_fresh() {
        let dir = TempDir::new().unwrap();
        let now = 1_000_000;
        seed(&dir, now - 43_200, BODY);
        let source = FakeSource::ok(BODY);

        select_current_file_at(&config_in(&dir, SelectionPolicy::Listing), &source, now)
            .await
            .unwrap();

        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_stale_snapshot_triggers_one_fetch() {
        let dir = TempDir::new().unwrap();
        let now = 1_000_000;
        seed(&dir, now - 50_000, BODY);
        let source = FakeSource::ok(BODY);
        let config = config_in(&dir, SelectionPolicy::Newest);

        let chosen = select_current_file_at(&config, &source, now).await.unwrap();

        assert_eq!(source.calls.get(), 1);
        assert_eq!(chosen.timestamp(), now);
        assert_eq!(config.cache.list().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_future_timestamp_counts_as_fresh() {
        let dir = TempDir::new().unwrap();
        let now = 1_000_000;
        seed(&dir, now + 10_000, BODY);
        let source = FakeSource::ok(BODY);

        select_current_file_at(&config_in(&dir, SelectionPolicy::Listing), &source, now)
            .await
            .unwrap();

        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_force_refresh_fetches_fresh_snapshot() {
        let dir = TempDir::new().unwrap();
        let now = 1_000_000;
        seed(&dir, now - 10, BODY);
        let source = FakeSource::ok(BODY);
        let config = StoreConfig {
            force_refresh: true,
            ..config_in(&dir, SelectionPolicy::Newest)
        };

        let chosen = select_current_file_at(&config, &source, now).await.unwrap();

        assert_eq!(source.calls.get(), 1);
        assert_eq!(chosen.timestamp(), now);
    }

    #[tokio::test]
    async fn test_stale_snapshot_and_failed_fetch_is_network_error() {
        let dir = TempDir::new().unwrap();
        let now = 1_000_000;
        seed(&dir, now - 50_000, BODY);
        let source = FakeSource::failing();

        let result =
            select_current_file_at(&config_in(&dir, SelectionPolicy::Listing), &source, now).await;

        assert!(matches!(result, Err(StoreError::Network(FetchError::Status(_)))));
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_empty_directory_and_failed_fetch_is_no_usable_cache() {
        let dir = TempDir::new().unwrap();
        let source = FakeSource::failing();

        let result =
            select_current_file_at(&config_in(&dir, SelectionPolicy::Listing), &source, 5).await;

        match result {
            Err(StoreError::NoUsableCache { dir: reported, source }) => {
                assert_eq!(reported, dir.path());
                assert!(source.is_some());
            }
            other => panic!("expected NoUsableCache, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_manifest_policy_follows_latest_fetch() {
        let dir = TempDir::new().unwrap();
        let now = 1_000_000;
        // A snapshot stamped in the future would win under Newest
        seed(&dir, now + 500_000, BODY);
        let source = FakeSource::ok(BODY);
        let config = StoreConfig {
            force_refresh: true,
            ..config_in(&dir, SelectionPolicy::Manifest)
        };

        let chosen = select_current_file_at(&config, &source, now).await.unwrap();

        assert_eq!(chosen.timestamp(), now);
    }

    #[tokio::test]
    async fn test_initialize_rejects_malformed_snapshot() {
        let dir = TempDir::new().unwrap();
        seed(&dir, unix_now(), "<html>not json</html>");
        let source = FakeSource::ok(BODY);

        let result = DataStore::initialize(&config_in(&dir, SelectionPolicy::Listing), &source).await;

        assert!(matches!(result, Err(StoreError::Parse { .. })));
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_initialize_skips_unparseable_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("launch_data_garbage.json"), BODY).unwrap();
        let source = FakeSource::ok(BODY);

        let store = DataStore::initialize(&config_in(&dir, SelectionPolicy::Listing), &source)
            .await
            .unwrap();

        assert_eq!(source.calls.get(), 1);
        assert_eq!(store.launch_name(0).unwrap(), "Falcon 9 Block 5 | Starlink Group 6-1");
    }

    #[test]
    fn test_accessors_read_fields() {
        let store = DataStore::from_results(ResultSet::from_json(BODY).unwrap());

        assert_eq!(store.results_len(), 1);
        assert_eq!(store.launch_service_provider(0).unwrap(), "SpaceX");
        assert_eq!(store.launch_status_abbrev(0).unwrap(), "Go");
        let window = store.launch_window(0).unwrap();
        assert_eq!(window.start, "2023-09-01T02:00:00Z");
        assert_eq!(window.end, "2023-09-01T06:00:00Z");
        assert_eq!(store.launch_description(0).unwrap(), Some("Starlink batch."));
        assert_eq!(store.longitude(0).unwrap(), "-80.577366");
        assert_eq!(store.latitude(0).unwrap(), "28.5618571");
    }

    #[test]
    fn test_accessors_out_of_range_is_index_error() {
        let store = DataStore::from_results(ResultSet::from_json(BODY).unwrap());

        match store.launch_name(1) {
            Err(StoreError::Index { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("expected Index error, got {other:?}"),
        }
        assert!(store.latitude(usize::MAX).is_err());
    }

    #[test]
    fn test_pad_coordinates_parse_through_store() {
        let store = DataStore::from_results(ResultSet::from_json(BODY).unwrap());

        let (lon, lat) = store.pad_coordinates(0).unwrap().expect("pad should parse");
        assert!((lon - (-80.577366)).abs() < 1e-9);
        assert!((lat - 28.5618571).abs() < 1e-9);
        assert!(matches!(store.pad_coordinates(1), Err(StoreError::Index { .. })));
    }

    #[test]
    fn test_fetched_at_follows_loaded_snapshot() {
        let store = DataStore::from_results(ResultSet::default());
        assert_eq!(store.fetched_at().unwrap().timestamp(), 0);
    }

    #[tokio::test]
    async fn test_fetch_from_network_writes_body_verbatim() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, SelectionPolicy::Listing);
        let source = FakeSource::ok(BODY);
        let before = unix_now();

        let written = fetch_from_network(&config, &source).await.unwrap();

        assert_eq!(source.calls.get(), 1);
        assert!(written.timestamp() >= before - 1 && written.timestamp() <= unix_now() + 1);

        let listing = config.cache.list().unwrap();
        assert_eq!(listing, vec![written.clone()]);
        let stored = fs::read(dir.path().join(written.as_str())).unwrap();
        assert_eq!(stored, BODY.as_bytes());
        assert!(!dir.path().join(crate::cache::TEMP_FILE_NAME).exists());

        let manifest = config.cache.read_manifest().unwrap().expect("manifest written");
        assert_eq!(manifest.file, written.as_str());
        assert_eq!(manifest.fetched_at, written.timestamp());
    }

    #[tokio::test]
    async fn test_fetch_from_network_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, SelectionPolicy::Listing);
        let source = FakeSource::failing();

        let result = fetch_from_network(&config, &source).await;

        assert!(matches!(result, Err(StoreError::Network(FetchError::Status(_)))));
        assert_eq!(source.calls.get(), 1);
        assert!(config.cache.list().unwrap().is_empty());
        assert!(config.cache.read_manifest().unwrap().is_none());
    }

    #[test]
    fn test_unix_now_is_close_to_system_time() {
        let diff = (unix_now() - Utc::now().timestamp()).abs();
        assert!(diff <= 1);
    }
}
