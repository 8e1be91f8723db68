//! Launch Library 2 API client
//!
//! This module fetches the upcoming-launches listing from The Space Devs'
//! Launch Library 2 API and describes the subset of its payload we decode.

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, info};

use super::{LaunchRecord, LaunchWindow};

/// Upcoming launches, including suborbital flights, without related records
pub const UPCOMING_LAUNCHES_URL: &str = "https://ll.thespacedevs.com/2.2.0/launch/upcoming/?&include_suborbital=true&related=false&hide_recent_previous=True";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when fetching launch data
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Launch API returned HTTP {0}")]
    Status(StatusCode),
}

/// Anything that can produce a raw upcoming-launches response body
///
/// The store only needs the body text; it persists it verbatim and decodes
/// it later from disk.
#[allow(async_fn_in_trait)]
pub trait LaunchSource {
    /// Performs one request, without retrying
    async fn fetch_upcoming(&self) -> Result<String, FetchError>;
}

/// Client for the upcoming-launches endpoint
#[derive(Debug, Clone)]
pub struct LaunchClient {
    client: Client,
    endpoint: String,
}

impl Default for LaunchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchClient {
    /// Create a new LaunchClient pointed at the public API
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new LaunchClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            endpoint: UPCOMING_LAUNCHES_URL.to_string(),
        }
    }

    /// Use a different endpoint (a mirror or a local test server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LaunchSource for LaunchClient {
    async fn fetch_upcoming(&self) -> Result<String, FetchError> {
        info!(endpoint = %self.endpoint, "requesting upcoming launches");

        let response = self
            .client
            .get(&self.endpoint)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "received upcoming launches");
        Ok(body)
    }
}

/// Top level of the upcoming-launches response
#[derive(Debug, Deserialize)]
pub(crate) struct UpcomingResponse {
    pub(crate) results: Vec<ApiLaunch>,
}

/// A single launch entry from the API
#[derive(Debug, Deserialize)]
pub(crate) struct ApiLaunch {
    name: String,
    status: ApiStatus,
    window_start: String,
    window_end: String,
    launch_service_provider: ApiProvider,
    #[serde(default)]
    mission: Option<ApiMission>,
    pad: ApiPad,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    abbrev: String,
}

#[derive(Debug, Deserialize)]
struct ApiProvider {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiMission {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPad {
    #[serde(deserialize_with = "string_or_number")]
    latitude: String,
    #[serde(deserialize_with = "string_or_number")]
    longitude: String,
}

impl ApiLaunch {
    pub(crate) fn into_record(self) -> LaunchRecord {
        LaunchRecord {
            provider: self.launch_service_provider.name,
            name: self.name,
            status_abbrev: self.status.abbrev,
            window: LaunchWindow {
                start: self.window_start,
                end: self.window_end,
            },
            mission_description: self.mission.and_then(|m| m.description),
            pad_longitude: self.pad.longitude,
            pad_latitude: self.pad.latitude,
        }
    }
}

/// Pad coordinates arrive as strings, but some mirrors send plain numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a coordinate string or number, got {other}"
        ))),
    }
}
