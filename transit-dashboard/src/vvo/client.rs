//! VVO WebAPI HTTP client.
//!
//! Provides async methods for the point finder, departure monitor, trip
//! planner and line list endpoints, and converts their responses to domain
//! types.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Departure, Line, RouteResult, Stop};
use crate::provider::{ProviderError, TransitProvider};

use super::convert::{convert_departures, convert_lines, convert_points, convert_route};
use super::error::VvoError;
use super::types::{
    ApiStatus, LinesRequest, LinesResponse, MonitorRequest, MonitorResponse, PointFinderRequest,
    PointFinderResponse, StandardSettings, TripsRequest, TripsResponse,
};

/// Default base URL for the VVO WebAPI.
pub const DEFAULT_BASE_URL: &str = "https://webapi.vvo-online.de";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the VVO client.
#[derive(Debug, Clone)]
pub struct VvoConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Restrict the point finder to stops
    pub stops_only: bool,
}

impl VvoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Include addresses and points of interest in stop searches.
    pub fn with_all_points(mut self) -> Self {
        self.stops_only = false;
        self
    }
}

impl Default for VvoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            stops_only: true,
        }
    }
}

/// VVO WebAPI client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct VvoClient {
    http: reqwest::Client,
    base_url: String,
    stops_only: bool,
    semaphore: Arc<Semaphore>,
}

impl VvoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: VvoConfig) -> Result<Self, VvoError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stops_only: config.stops_only,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST `body` as JSON to `path` and decode the response.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, VvoError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| VvoError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.post(self.url(path)).json(body).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(VvoError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(VvoError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VvoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| VvoError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Search points (stops, and addresses/POIs unless `stops_only`).
    pub async fn find_stops(&self, query: &str) -> Result<Vec<Stop>, VvoError> {
        let request = PointFinderRequest {
            query,
            limit: 0,
            stops_only: self.stops_only,
            assigned_stops: true,
            dvb: true,
        };
        let response: PointFinderResponse = self.post("tr/pointfinder", &request).await?;
        check_status(response.status.as_ref())?;

        let stops = convert_points(&response);
        debug!(query, count = stops.len(), "point finder");
        Ok(stops)
    }

    /// Departure monitor for a stop, starting `offset_minutes` from now.
    pub async fn monitor(
        &self,
        stop_id: &str,
        count: u32,
        offset_minutes: i64,
    ) -> Result<Vec<Departure>, VvoError> {
        let now = Utc::now();
        let request = MonitorRequest {
            stopid: stop_id,
            time: (now + Duration::minutes(offset_minutes)).to_rfc3339(),
            isarrival: false,
            limit: count,
            shorttermchanges: true,
            mentzonly: false,
        };
        let response: MonitorResponse = self.post("dm", &request).await?;
        check_status(response.status.as_ref())?;

        Ok(convert_departures(&response.departures, now))
    }

    /// Plan trips between two stops.
    pub async fn trips(
        &self,
        origin_id: &str,
        destination_id: &str,
        time: Option<DateTime<Utc>>,
        arrival: bool,
    ) -> Result<RouteResult, VvoError> {
        let request = TripsRequest {
            origin: origin_id,
            destination: destination_id,
            time: time.unwrap_or_else(Utc::now).to_rfc3339(),
            is_arrival_time: arrival,
            short_term_changes: true,
            standard_settings: StandardSettings::default(),
        };
        let response: TripsResponse = self.post("tr/trips", &request).await?;
        check_status(response.status.as_ref())?;

        Ok(convert_route(&response))
    }

    /// Lines serving a stop.
    pub async fn stop_lines(&self, stop_id: &str) -> Result<Vec<Line>, VvoError> {
        let request = LinesRequest { stopid: stop_id };
        let response: LinesResponse = self.post("stt/lines", &request).await?;
        check_status(response.status.as_ref())?;

        Ok(convert_lines(&response))
    }
}

/// Reject responses whose `Status.Code` is not `Ok`. A missing status is
/// accepted.
fn check_status(status: Option<&ApiStatus>) -> Result<(), VvoError> {
    match status {
        Some(status) if !status.is_ok() => Err(VvoError::Service(match &status.message {
            Some(message) => format!("{}: {message}", status.code),
            None => status.code.clone(),
        })),
        _ => Ok(()),
    }
}

impl TransitProvider for VvoClient {
    async fn search_stops(&self, query: &str) -> Result<Vec<Stop>, ProviderError> {
        Ok(self.find_stops(query).await?)
    }

    async fn departures(
        &self,
        stop_id: &str,
        count: u32,
        offset_minutes: i64,
    ) -> Result<Vec<Departure>, ProviderError> {
        Ok(self.monitor(stop_id, count, offset_minutes).await?)
    }

    async fn route(
        &self,
        origin_id: &str,
        destination_id: &str,
        time: Option<DateTime<Utc>>,
        arrival: bool,
    ) -> Result<RouteResult, ProviderError> {
        Ok(self.trips(origin_id, destination_id, time, arrival).await?)
    }

    async fn lines(&self, stop_id: &str) -> Result<Vec<Line>, ProviderError> {
        Ok(self.stop_lines(stop_id).await?)
    }
}
