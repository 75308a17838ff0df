//! VVO WebAPI request and response DTOs.
//!
//! Responses use PascalCase keys and omit fields freely, so almost
//! everything is optional. Timestamps stay as the raw `/Date(ms+zone)/`
//! strings until conversion.

use serde::{Deserialize, Serialize};

/// `Status` block carried by every response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiStatus {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiStatus {
    pub fn is_ok(&self) -> bool {
        self.code.eq_ignore_ascii_case("ok")
    }
}

/// Body of `tr/pointfinder`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointFinderRequest<'a> {
    pub query: &'a str,
    pub limit: u32,
    pub stops_only: bool,
    pub assigned_stops: bool,
    pub dvb: bool,
}

/// Response of `tr/pointfinder`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointFinderResponse {
    #[serde(default)]
    pub status: Option<ApiStatus>,
    #[serde(default)]
    pub point_status: Option<String>,
    /// Pipe-separated point records, `id|type|city|name|high|right|…`.
    #[serde(default)]
    pub points: Vec<String>,
}

/// Body of `dm` (departure monitor).
#[derive(Debug, Clone, Serialize)]
pub struct MonitorRequest<'a> {
    pub stopid: &'a str,
    /// RFC 3339 start of the board.
    pub time: String,
    pub isarrival: bool,
    pub limit: u32,
    pub shorttermchanges: bool,
    pub mentzonly: bool,
}

/// Response of `dm`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonitorResponse {
    #[serde(default)]
    pub status: Option<ApiStatus>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub departures: Vec<DepartureDto>,
}

/// Platform or track.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlatformDto {
    pub name: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DivaDto {
    pub number: String,
    #[serde(default)]
    pub network: String,
}

/// One departure on the monitor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepartureDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub line_name: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub platform: Option<PlatformDto>,
    /// Mode of transport name (`Tram`, `CityBus`, …).
    #[serde(default)]
    pub mot: Option<String>,
    /// Live time; absent when no real-time data exists.
    #[serde(default)]
    pub real_time: Option<String>,
    pub scheduled_time: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub diva: Option<DivaDto>,
}

/// `standardSettings` of a trip request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardSettings {
    pub max_changes: &'static str,
    pub walking_speed: &'static str,
    pub footpath_to_stop: u32,
    pub include_alternative_stops: bool,
}

impl Default for StandardSettings {
    fn default() -> Self {
        Self {
            max_changes: "Unlimited",
            walking_speed: "normal",
            footpath_to_stop: 5,
            include_alternative_stops: true,
        }
    }
}

/// Body of `tr/trips`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripsRequest<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    /// RFC 3339 departure (or arrival) time.
    pub time: String,
    #[serde(rename = "isarrivaltime")]
    pub is_arrival_time: bool,
    #[serde(rename = "shorttermchanges")]
    pub short_term_changes: bool,
    pub standard_settings: StandardSettings,
}

/// Response of `tr/trips`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TripsResponse {
    #[serde(default)]
    pub status: Option<ApiStatus>,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

/// One connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteDto {
    /// Minutes.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub interchanges: u32,
    #[serde(default)]
    pub partial_routes: Vec<PartialRouteDto>,
}

/// Mode of transport of a partial route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MotDto {
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

/// One leg of a connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartialRouteDto {
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub mot: Option<MotDto>,
    #[serde(default)]
    pub regular_stops: Vec<RegularStopDto>,
}

/// A stop served by a leg. `Latitude`/`Longitude` are GK4 grid values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegularStopDto {
    #[serde(default)]
    pub data_id: String,
    pub name: String,
    #[serde(default)]
    pub place: String,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub platform: Option<PlatformDto>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
}

/// Body of `stt/lines`.
#[derive(Debug, Clone, Serialize)]
pub struct LinesRequest<'a> {
    pub stopid: &'a str,
}

/// Response of `stt/lines`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LinesResponse {
    #[serde(default)]
    pub status: Option<ApiStatus>,
    #[serde(default)]
    pub lines: Vec<LineDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineDto {
    pub name: String,
    #[serde(default)]
    pub mot: Option<String>,
    #[serde(default)]
    pub directions: Vec<DirectionDto>,
    #[serde(default)]
    pub diva: Option<DivaDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectionDto {
    pub name: String,
}
