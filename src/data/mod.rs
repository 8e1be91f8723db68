//! Core data models for upcoming launches
//!
//! A snapshot of the Launch Library "upcoming" endpoint decodes into a
//! [`ResultSet`]: the launches in the order the API returned them, reduced
//! to the fields the interface shows.

pub mod launches;

pub use launches::{FetchError, LaunchClient, LaunchSource, UPCOMING_LAUNCHES_URL};

use serde::{Deserialize, Serialize};

use launches::{ApiLaunch, UpcomingResponse};

/// Start and end of a launch window, kept exactly as the API formats them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchWindow {
    pub start: String,
    pub end: String,
}

/// One upcoming launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    /// Name of the launch service provider (e.g. "SpaceX")
    pub provider: String,
    /// Launch name, usually "<vehicle> | <payload>"
    pub name: String,
    /// Short status code such as "Go", "TBD" or "TBC"
    pub status_abbrev: String,
    /// Launch window
    pub window: LaunchWindow,
    /// Mission description; the API sends no mission for some launches
    pub mission_description: Option<String>,
    /// Pad longitude as sent by the API
    pub pad_longitude: String,
    /// Pad latitude as sent by the API
    pub pad_latitude: String,
}

impl LaunchRecord {
    /// Pad position as `(longitude, latitude)` in degrees
    ///
    /// Returns `None` if either value is not a finite number within range.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lon: f64 = self.pad_longitude.trim().parse().ok()?;
        let lat: f64 = self.pad_latitude.trim().parse().ok()?;
        let in_range = (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat);
        in_range.then_some((lon, lat))
    }
}

/// Decoded launches of one snapshot, in payload order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    launches: Vec<LaunchRecord>,
}

impl ResultSet {
    /// Decodes a raw upcoming-launches response body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let response: UpcomingResponse = serde_json::from_str(body)?;
        Ok(Self {
            launches: response.results.into_iter().map(ApiLaunch::into_record).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.launches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.launches.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&LaunchRecord> {
        self.launches.get(idx)
    }

    pub fn as_slice(&self) -> &[LaunchRecord] {
        &self.launches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LaunchRecord> {
        self.launches.iter()
    }
}

impl From<Vec<LaunchRecord>> for ResultSet {
    fn from(launches: Vec<LaunchRecord>) -> Self {
        Self { launches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lon: &str, lat: &str) -> LaunchRecord {
        LaunchRecord {
            provider: "Rocket Lab".to_string(),
            name: "Electron | Test".to_string(),
            status_abbrev: "Go".to_string(),
            window: LaunchWindow {
                start: "2024-07-15T05:30:00Z".to_string(),
                end: "2024-07-15T07:30:00Z".to_string(),
            },
            mission_description: None,
            pad_longitude: lon.to_string(),
            pad_latitude: lat.to_string(),
        }
    }

    #[test]
    fn test_coordinates_parse_payload_strings() {
        let launch = record("177.864", "-39.262");
        let (lon, lat) = launch.coordinates().expect("coordinates should parse");
        assert!((lon - 177.864).abs() < 1e-9);
        assert!((lat - (-39.262)).abs() < 1e-9);
    }

    #[test]
    fn test_coordinates_reject_garbage_and_out_of_range() {
        assert!(record("east", "10").coordinates().is_none());
        assert!(record("10", "").coordinates().is_none());
        assert!(record("200.0", "10").coordinates().is_none());
        assert!(record("10", "-91").coordinates().is_none());
        assert!(record("NaN", "10").coordinates().is_none());
    }

    #[test]
    fn test_result_set_from_empty_results() {
        let results = ResultSet::from_json(r#"{"count": 0, "results": []}"#).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.len(), 0);
        assert!(results.get(0).is_none());
    }

    #[test]
    fn test_result_set_requires_results_array() {
        assert!(ResultSet::from_json(r#"{"count": 0}"#).is_err());
        assert!(ResultSet::from_json("{ invalid json }").is_err());
    }

    #[test]
    fn test_result_set_from_vec_preserves_order() {
        let results = ResultSet::from(vec![record("1", "1"), record("2", "2")]);
        let longitudes: Vec<&str> = results.iter().map(|l| l.pad_longitude.as_str()).collect();
        assert_eq!(longitudes, vec!["1", "2"]);
    }
}
