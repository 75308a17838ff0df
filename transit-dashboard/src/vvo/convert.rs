//! Conversion from VVO DTOs to domain types.
//!
//! Handles the pipe-separated point format, `/Date(…)/` timestamps and GK4
//! coordinates. Records that fail to convert are logged and skipped rather
//! than failing the whole response.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{
    Departure, DepartureState, Diva, Line, Location, Node, NodeEndpoint, NodeStop, Platform,
    RouteResult, Stop, StopCategory, Trip, TripEndpoint, mode_from_name,
};

use super::coords::gk4_to_wgs84;
use super::types::{
    DepartureDto, DivaDto, LinesResponse, PartialRouteDto, PlatformDto, PointFinderResponse,
    RegularStopDto, RouteDto, TripsResponse,
};

/// City VVO means when a record leaves it empty.
pub const DEFAULT_CITY: &str = "Dresden";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Point record with too few fields or no id
    #[error("invalid point: {0}")]
    InvalidPoint(String),

    /// Timestamp not in `/Date(ms±zone)/` form
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Parse a `/Date(1487377200000+0100)/` timestamp. The milliseconds are
/// already UTC; the zone suffix is informational.
pub fn parse_vvo_date(raw: &str) -> Result<DateTime<Utc>, ConversionError> {
    let invalid = || ConversionError::InvalidDate(raw.to_string());
    let inner = raw
        .strip_prefix("/Date(")
        .and_then(|s| s.strip_suffix(")/"))
        .ok_or_else(invalid)?;

    // Skip the first char so a negative timestamp keeps its sign.
    let end = inner
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '+' || c == '-')
        .map_or(inner.len(), |(i, _)| i);
    let millis: i64 = inner[..end].parse().map_err(|_| invalid())?;

    DateTime::from_timestamp_millis(millis).ok_or_else(invalid)
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ConversionError> {
    raw.map(parse_vvo_date).transpose()
}

/// Whole minutes from `from` to `to`, rounded to nearest.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    ((to - from).num_milliseconds() as f64 / 60_000.0).round() as i64
}

/// Category implied by the shape of a point id.
fn category_from_id(id: &str) -> Option<StopCategory> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(StopCategory::Stop)
    } else if id.starts_with("streetID:") {
        Some(StopCategory::Address)
    } else if id.starts_with("poiID:") {
        Some(StopCategory::Poi)
    } else if id.starts_with("coord:") {
        Some(StopCategory::Coords)
    } else {
        None
    }
}

/// Parse a point record `id|type|city|name|high|right|…`.
pub fn parse_point(raw: &str) -> Result<Stop, ConversionError> {
    let fields: Vec<&str> = raw.split('|').collect();
    if fields.len() < 6 || fields[0].is_empty() {
        return Err(ConversionError::InvalidPoint(raw.to_string()));
    }

    let id = fields[0];
    let city = if fields[2].is_empty() {
        DEFAULT_CITY
    } else {
        fields[2]
    };
    let high = fields[4].parse().unwrap_or(0.0);
    let right = fields[5].parse().unwrap_or(0.0);

    let stop = Stop::new(id, fields[3], city, gk4_to_wgs84(high, right));
    match category_from_id(id).or_else(|| StopCategory::parse(fields[1])) {
        Some(category) => Ok(stop.with_category(category)),
        None => Ok(stop),
    }
}

/// Convert a point finder response.
pub fn convert_points(response: &PointFinderResponse) -> Vec<Stop> {
    response
        .points
        .iter()
        .filter_map(|raw| match parse_point(raw) {
            Ok(stop) => Some(stop),
            Err(e) => {
                warn!(error = %e, "skipping point");
                None
            }
        })
        .collect()
}

fn platform(dto: &PlatformDto) -> Platform {
    Platform {
        name: dto.name.clone(),
        kind: dto.kind.clone(),
    }
}

fn diva(dto: &DivaDto) -> Diva {
    Diva {
        number: dto.number.clone(),
        network: dto.network.clone(),
    }
}

/// Convert one monitor entry. Relative offsets are measured from `now`.
pub fn convert_departure(
    dto: &DepartureDto,
    now: DateTime<Utc>,
) -> Result<Departure, ConversionError> {
    let scheduled = parse_vvo_date(&dto.scheduled_time)?;
    let live = parse_optional_date(dto.real_time.as_deref())?.unwrap_or(scheduled);

    Ok(Departure {
        line: dto.line_name.clone(),
        direction: dto.direction.clone(),
        platform: dto.platform.as_ref().map(platform),
        arrival_time: live,
        scheduled_time: scheduled,
        arrival_time_relative: Some(minutes_between(now, live)),
        scheduled_time_relative: Some(minutes_between(now, scheduled)),
        delay_time: minutes_between(scheduled, live),
        state: DepartureState::parse(dto.state.as_deref()),
        mode: dto.mot.as_deref().and_then(mode_from_name),
        diva: dto.diva.as_ref().map(diva),
    })
}

/// Convert a monitor response, skipping entries that fail to convert.
pub fn convert_departures(departures: &[DepartureDto], now: DateTime<Utc>) -> Vec<Departure> {
    departures
        .iter()
        .filter_map(|dto| match convert_departure(dto, now) {
            Ok(departure) => Some(departure),
            Err(e) => {
                warn!(line = %dto.line_name, error = %e, "skipping departure");
                None
            }
        })
        .collect()
}

fn city_or_default(place: &str) -> String {
    if place.is_empty() {
        DEFAULT_CITY.to_string()
    } else {
        place.to_string()
    }
}

fn node_stop(dto: &RegularStopDto) -> Result<NodeStop, ConversionError> {
    Ok(NodeStop {
        id: dto.data_id.clone(),
        name: dto.name.clone(),
        city: dto.place.clone(),
        coords: gk4_to_wgs84(dto.latitude, dto.longitude),
        platform: dto.platform.as_ref().map(platform),
        arrival: parse_optional_date(dto.arrival_time.as_deref())?,
        departure: parse_optional_date(dto.departure_time.as_deref())?,
    })
}

fn trip_endpoint(dto: &RegularStopDto, time: Option<DateTime<Utc>>) -> Option<TripEndpoint> {
    Some(TripEndpoint {
        id: dto.data_id.clone(),
        name: dto.name.clone(),
        city: city_or_default(&dto.place),
        coords: gk4_to_wgs84(dto.latitude, dto.longitude),
        platform: dto.platform.as_ref().map(platform),
        time: time?,
        kind: dto.kind.clone().unwrap_or_else(|| "Stop".to_string()),
    })
}

fn node(dto: &PartialRouteDto) -> Result<Node, ConversionError> {
    let stops = dto
        .regular_stops
        .iter()
        .map(node_stop)
        .collect::<Result<Vec<_>, _>>()?;

    let departure = stops.first().and_then(|s| {
        Some(NodeEndpoint {
            name: s.name.clone(),
            time: s.departure.or(s.arrival)?,
            platform: s.platform.clone(),
        })
    });
    let arrival = stops.last().and_then(|s| {
        Some(NodeEndpoint {
            name: s.name.clone(),
            time: s.arrival.or(s.departure)?,
            platform: s.platform.clone(),
        })
    });

    let mot = dto.mot.as_ref();
    Ok(Node {
        line: mot.and_then(|m| m.name.clone()).unwrap_or_default(),
        direction: mot.and_then(|m| m.direction.clone()).unwrap_or_default(),
        duration: dto.duration.unwrap_or(0),
        mode: mot.and_then(|m| mode_from_name(&m.kind)),
        departure,
        arrival,
        stops,
    })
}

/// Convert one connection. Trip endpoints come from the first and last
/// stop of the whole connection.
pub fn convert_trip(dto: &RouteDto) -> Result<Trip, ConversionError> {
    let nodes = dto
        .partial_routes
        .iter()
        .map(node)
        .collect::<Result<Vec<_>, _>>()?;

    let all_stops = || dto.partial_routes.iter().flat_map(|p| &p.regular_stops);
    let departure = all_stops().next().and_then(|s| {
        let time = parse_optional_date(s.departure_time.as_deref())
            .ok()
            .flatten()
            .or_else(|| parse_optional_date(s.arrival_time.as_deref()).ok().flatten());
        trip_endpoint(s, time)
    });
    let arrival = all_stops().last().and_then(|s| {
        let time = parse_optional_date(s.arrival_time.as_deref())
            .ok()
            .flatten()
            .or_else(|| parse_optional_date(s.departure_time.as_deref()).ok().flatten());
        trip_endpoint(s, time)
    });

    Ok(Trip {
        departure,
        arrival,
        duration: dto.duration,
        interchanges: dto.interchanges,
        nodes,
    })
}

fn location(endpoint: &TripEndpoint) -> Location {
    Location {
        id: endpoint.id.clone(),
        name: endpoint.name.clone(),
        city: endpoint.city.clone(),
        coords: endpoint.coords,
    }
}

/// Convert a trips response. Origin and destination are taken from the
/// first trip.
pub fn convert_route(response: &TripsResponse) -> RouteResult {
    let trips: Vec<Trip> = response
        .routes
        .iter()
        .filter_map(|dto| match convert_trip(dto) {
            Ok(trip) => Some(trip),
            Err(e) => {
                warn!(error = %e, "skipping trip");
                None
            }
        })
        .collect();

    let first = trips.first();
    RouteResult {
        origin: first.and_then(|t| t.departure.as_ref()).map(location),
        destination: first.and_then(|t| t.arrival.as_ref()).map(location),
        trips,
    }
}

/// Convert a lines response.
pub fn convert_lines(response: &LinesResponse) -> Vec<Line> {
    response
        .lines
        .iter()
        .map(|dto| Line {
            name: dto.name.clone(),
            mode: dto.mot.as_deref().and_then(mode_from_name),
            directions: dto.directions.iter().map(|d| d.name.clone()).collect(),
            diva: dto.diva.as_ref().map(diva),
        })
        .collect()
}
