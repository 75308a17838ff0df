//! Route-planning types: trips, their legs (nodes) and intermediate stops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::departure::Platform;
use super::mode::Mode;
use super::stop::Coords;

/// Start or end point of a whole trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripEndpoint {
    pub id: String,
    pub name: String,
    pub city: String,
    pub coords: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Boarding or alighting point of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEndpoint {
    pub name: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

/// A stop served by a node, in travel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStop {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub coords: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<DateTime<Utc>>,
}

/// One leg of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub line: String,
    pub direction: String,
    /// Minutes.
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<NodeEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<NodeEndpoint>,
    #[serde(default)]
    pub stops: Vec<NodeStop>,
}

/// A candidate connection between two stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<TripEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<TripEndpoint>,
    /// Minutes.
    pub duration: i64,
    pub interchanges: u32,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Trip {
    /// Departure timestamp of the trip, if known.
    pub fn departure_time(&self) -> Option<DateTime<Utc>> {
        self.departure.as_ref().map(|d| d.time)
    }

    /// Whether any leg of this trip runs on `line`.
    pub fn serves_line(&self, line: &str) -> bool {
        self.nodes.iter().any(|n| n.line == line)
    }
}

/// Resolved origin or destination of a route query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub city: String,
    pub coords: Coords,
}

/// Result of a route query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Location>,
    pub trips: Vec<Trip>,
}
