//! Departure monitor types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::stop::Stop;

/// Platform or track a vehicle calls at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Real-time state of a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepartureState {
    InTime,
    Delayed,
    Early,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DepartureState {
    /// Parse a provider state tag. Missing or unknown tags map to `Unknown`.
    pub fn parse(tag: Option<&str>) -> Self {
        match tag.map(str::to_ascii_lowercase).as_deref() {
            Some("intime") => Self::InTime,
            Some("delayed") => Self::Delayed,
            Some("early") => Self::Early,
            Some("cancelled") => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

/// Network line identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diva {
    pub number: String,
    pub network: String,
}

/// An upcoming departure at a stop, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub line: String,
    pub direction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Live (delay-adjusted) time.
    pub arrival_time: DateTime<Utc>,
    pub scheduled_time: DateTime<Utc>,
    /// Minutes from now until `arrival_time`.
    #[serde(default)]
    pub arrival_time_relative: Option<i64>,
    /// Minutes from now until `scheduled_time`.
    #[serde(default)]
    pub scheduled_time_relative: Option<i64>,
    /// Signed delay in minutes.
    pub delay_time: i64,
    #[serde(default)]
    pub state: DepartureState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diva: Option<Diva>,
}

impl Departure {
    /// Relative arrival offset with a missing value treated as zero.
    pub fn effective_offset(&self) -> i64 {
        self.arrival_time_relative.unwrap_or(0)
    }
}

/// A departure after ranking, carrying its display identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDeparture {
    pub id: String,
    #[serde(flatten)]
    pub departure: Departure,
}

/// Ranked departures for one stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureBoard {
    pub stop: Stop,
    pub departures: Vec<RankedDeparture>,
    pub updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn departure() -> Departure {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        Departure {
            line: "3".into(),
            direction: "Wilder Mann".into(),
            platform: None,
            arrival_time: t,
            scheduled_time: t,
            arrival_time_relative: None,
            scheduled_time_relative: Some(4),
            delay_time: 0,
            state: DepartureState::InTime,
            mode: None,
            diva: None,
        }
    }

    #[test]
    fn missing_offset_is_zero() {
        let mut dep = departure();
        assert_eq!(dep.effective_offset(), 0);
        dep.arrival_time_relative = Some(7);
        assert_eq!(dep.effective_offset(), 7);
    }

    #[test]
    fn state_parse() {
        assert_eq!(DepartureState::parse(Some("InTime")), DepartureState::InTime);
        assert_eq!(DepartureState::parse(Some("delayed")), DepartureState::Delayed);
        assert_eq!(DepartureState::parse(Some("Whatever")), DepartureState::Unknown);
        assert_eq!(DepartureState::parse(None), DepartureState::Unknown);
    }

    #[test]
    fn ranked_departure_flattens() {
        let ranked = RankedDeparture {
            id: "departure-1-0-3-Wilder_Mann-0".into(),
            departure: departure(),
        };
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["id"], "departure-1-0-3-Wilder_Mann-0");
        assert_eq!(json["line"], "3");
        assert_eq!(json["scheduledTimeRelative"], 4);
        assert_eq!(json["state"], "InTime");
    }
}
