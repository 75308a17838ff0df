//! Persisted route-history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stop::Stop;

/// A previously searched origin → destination pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHistoryEntry {
    /// `"{origin.id}-{destination.id}"`. Direction matters.
    pub id: String,
    pub origin: Stop,
    pub destination: Stop,
    pub searched_at: DateTime<Utc>,
}

impl RouteHistoryEntry {
    pub fn new(origin: Stop, destination: Stop, searched_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::key(&origin.id, &destination.id),
            origin,
            destination,
            searched_at,
        }
    }

    /// History key for an ordered pair of stop ids.
    pub fn key(origin_id: &str, destination_id: &str) -> String {
        format!("{origin_id}-{destination_id}")
    }
}
