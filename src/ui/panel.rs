//! One launch as the views display it, read through the store accessors

use crate::data::LaunchWindow;
use crate::store::{DataStore, StoreError};

/// Borrowed view of the launch at one index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchPanel<'a> {
    pub provider: &'a str,
    pub name: &'a str,
    pub status: &'a str,
    pub window: &'a LaunchWindow,
    pub description: Option<&'a str>,
    pub longitude: &'a str,
    pub latitude: &'a str,
    /// Parsed pad position, `None` when the payload values do not parse
    pub coordinates: Option<(f64, f64)>,
}

impl<'a> LaunchPanel<'a> {
    /// Reads the launch at `idx`
    ///
    /// Fails with [`StoreError::Index`] when `idx` is past the loaded launches.
    pub fn load(store: &'a DataStore, idx: usize) -> Result<Self, StoreError> {
        Ok(Self {
            provider: store.launch_service_provider(idx)?,
            name: store.launch_name(idx)?,
            status: store.launch_status_abbrev(idx)?,
            window: store.launch_window(idx)?,
            description: store.launch_description(idx)?,
            longitude: store.longitude(idx)?,
            latitude: store.latitude(idx)?,
            coordinates: store.pad_coordinates(idx)?,
        })
    }
}
