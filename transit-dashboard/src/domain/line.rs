//! Lines serving a stop, and the line-progress view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::departure::Diva;
use super::mode::Mode;

/// A line calling at a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diva: Option<Diva>,
}

/// One entry of a line-progress view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStop {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub is_current: bool,
}

impl LineStop {
    /// Departure time if present, else arrival time.
    pub fn sort_time(&self) -> Option<DateTime<Utc>> {
        self.departure.or(self.arrival)
    }
}

/// Line-progress view for an expanded departure.
///
/// `Placeholder` is a synthetic approximation used when the upcoming stops
/// could not be reconstructed from provider data.
#[derive(Debug, Clone, PartialEq)]
pub enum LineHistory {
    Reconstructed(Vec<LineStop>),
    Placeholder(Vec<LineStop>),
}

impl LineHistory {
    /// Whether this is the synthetic fallback.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// The stops, regardless of origin.
    pub fn stops(&self) -> &[LineStop] {
        match self {
            Self::Reconstructed(stops) | Self::Placeholder(stops) => stops,
        }
    }

    pub fn into_stops(self) -> Vec<LineStop> {
        match self {
            Self::Reconstructed(stops) | Self::Placeholder(stops) => stops,
        }
    }
}
