//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::dashboard::FavoriteToggle;
use crate::domain::{Departure, Line, LineHistory, LineStop, RouteHistoryEntry, Stop};

/// Stop search query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Departure board query.
#[derive(Debug, Deserialize)]
pub struct DeparturesQuery {
    /// Number of departures (defaults to the dashboard's default count)
    pub count: Option<u32>,

    /// Start time in HH:MM, Dresden time (defaults to now)
    pub time: Option<String>,
}

/// Route planning query.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Origin stop id
    pub origin: String,

    /// Destination stop id
    pub destination: String,

    /// Time in HH:MM, Dresden time (defaults to now)
    pub time: Option<String>,

    /// Treat `time` as the latest arrival
    #[serde(default)]
    pub arrival: bool,
}

/// Line history request: the departure as shown on a board.
#[derive(Debug, Deserialize)]
pub struct LineHistoryRequest {
    pub stop: Stop,
    pub departure: Departure,
}

/// Line history response.
#[derive(Debug, Serialize)]
pub struct LineHistoryResponse {
    /// True when the stops are the three-entry stand-in
    pub placeholder: bool,
    pub stops: Vec<LineStop>,
}

impl From<LineHistory> for LineHistoryResponse {
    fn from(history: LineHistory) -> Self {
        Self {
            placeholder: history.is_placeholder(),
            stops: history.into_stops(),
        }
    }
}

/// A list of stops.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<Stop>,
}

/// Lines serving a stop.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<Line>,
}

/// Result of toggling a favorite.
#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub result: FavoriteToggle,
    pub favorites: Vec<Stop>,
}

/// Route history, most recent first.
#[derive(Debug, Serialize)]
pub struct RouteHistoryResponse {
    pub routes: Vec<RouteHistoryEntry>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
