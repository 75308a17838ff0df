//! Line-history reconstruction.
//!
//! The provider has no "stops along this line from here" query. The
//! upcoming stops of a departure are recovered by planning a route from the
//! current stop towards the departure's direction label and reading the
//! intermediate stops of the legs that run on the departure's line.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Departure, LineHistory, LineStop, Stop, Trip};
use crate::provider::{ProviderError, TransitProvider};

use super::config::RankConfig;

/// Name of the synthetic middle entry of a placeholder history.
pub const NEXT_STOP_PLACEHOLDER: &str = "Nächste Haltestelle";

/// Which departure to reconstruct.
#[derive(Debug, Clone, Copy)]
pub struct LineQuery<'a> {
    /// Provider id of the stop the departure leaves from.
    pub stop_id: &'a str,
    pub line: &'a str,
    /// Direction label, used as a stop-search query for the terminus.
    pub direction: &'a str,
    /// Time to plan the route at; now when absent.
    pub time: Option<DateTime<Utc>>,
}

impl<'a> LineQuery<'a> {
    /// Query for `departure` leaving `stop`, at the departure's live time.
    pub fn for_departure(stop: &'a Stop, departure: &'a Departure) -> Self {
        Self {
            stop_id: &stop.id,
            line: &departure.line,
            direction: &departure.direction,
            time: Some(departure.arrival_time),
        }
    }
}

/// Why a line history could not be reconstructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionFailure {
    #[error("no stop found for direction {0:?}")]
    NoDestination(String),

    #[error("no route from {origin} to {destination}")]
    NoRoute { origin: String, destination: String },

    #[error("no trip runs on line {0}")]
    NoMatchingTrip(String),

    #[error("line {0} has no stops on the matched trip")]
    NoStops(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Pick the destination stop for a direction label.
///
/// Prefers an exact case-insensitive name match in `preferred_city`,
/// otherwise the first candidate.
pub fn resolve_destination<'a>(
    direction: &str,
    candidates: &'a [Stop],
    preferred_city: &str,
) -> Option<&'a Stop> {
    let wanted = direction.to_lowercase();
    candidates
        .iter()
        .find(|s| s.name.to_lowercase() == wanted && s.city == preferred_city)
        .or_else(|| candidates.first())
}

/// Flatten the stops of every leg of `trip` on `line`, first occurrence of
/// each name wins, ordered by departure (else arrival) time. Stops with
/// neither time go last.
pub fn collect_line_stops(
    trip: &Trip,
    line: &str,
    current_stop_id: &str,
    default_city: &str,
) -> Vec<LineStop> {
    let mut seen = HashSet::new();
    let mut stops = Vec::new();

    for node in trip.nodes.iter().filter(|n| n.line == line) {
        for stop in &node.stops {
            if !seen.insert(stop.name.as_str()) {
                continue;
            }
            let city = if stop.city.is_empty() {
                default_city
            } else {
                stop.city.as_str()
            };
            stops.push(LineStop {
                name: stop.name.clone(),
                city: Some(city.to_string()),
                arrival: stop.arrival,
                departure: stop.departure,
                platform: stop.platform.as_ref().map(|p| p.name.clone()),
                is_current: stop.id == current_stop_id,
            });
        }
    }

    // Option orders None first; flip so untimed stops go last.
    stops.sort_by_key(|s| (s.sort_time().is_none(), s.sort_time()));
    stops
}

/// Drop the stops before the current one. Unchanged when the current stop
/// is first or missing.
pub fn from_current_stop(mut stops: Vec<LineStop>) -> Vec<LineStop> {
    if let Some(index) = stops.iter().position(|s| s.is_current)
        && index > 0
    {
        stops.drain(..index);
    }
    stops
}

/// Reconstruct the upcoming stops of a departure.
pub async fn reconstruct_line_history<P: TransitProvider>(
    provider: &P,
    query: &LineQuery<'_>,
    config: &RankConfig,
) -> Result<Vec<LineStop>, ResolutionFailure> {
    let candidates = provider.search_stops(query.direction).await?;
    let destination = resolve_destination(query.direction, &candidates, &config.preferred_city)
        .ok_or_else(|| ResolutionFailure::NoDestination(query.direction.to_string()))?;
    debug!(
        direction = query.direction,
        destination = %destination.id,
        "resolved line direction"
    );

    let route = provider
        .route(query.stop_id, &destination.id, query.time, false)
        .await?;
    if route.trips.is_empty() {
        return Err(ResolutionFailure::NoRoute {
            origin: query.stop_id.to_string(),
            destination: destination.id.clone(),
        });
    }

    let trip = route
        .trips
        .iter()
        .find(|t| t.serves_line(query.line))
        .ok_or_else(|| ResolutionFailure::NoMatchingTrip(query.line.to_string()))?;

    let stops = collect_line_stops(trip, query.line, query.stop_id, &config.preferred_city);
    if stops.is_empty() {
        return Err(ResolutionFailure::NoStops(query.line.to_string()));
    }

    Ok(from_current_stop(stops))
}

/// Synthetic three-entry history: the current stop, a generic next stop and
/// the direction label as terminus. Carries no platform or arrival data.
pub fn placeholder_line_history(
    stop: &Stop,
    departure: &Departure,
    preferred_city: &str,
) -> Vec<LineStop> {
    let city = if stop.city.is_empty() {
        preferred_city
    } else {
        stop.city.as_str()
    };
    let synthetic = |name: &str| LineStop {
        name: name.to_string(),
        city: Some(preferred_city.to_string()),
        arrival: None,
        departure: None,
        platform: None,
        is_current: false,
    };

    vec![
        LineStop {
            name: stop.name.clone(),
            city: Some(city.to_string()),
            arrival: None,
            departure: Some(departure.arrival_time),
            platform: None,
            is_current: true,
        },
        synthetic(NEXT_STOP_PLACEHOLDER),
        synthetic(&departure.direction),
    ]
}

/// Line history for `departure` at `stop`, falling back to the placeholder
/// when reconstruction fails.
pub async fn line_history<P: TransitProvider>(
    provider: &P,
    stop: &Stop,
    departure: &Departure,
    config: &RankConfig,
) -> LineHistory {
    let query = LineQuery::for_departure(stop, departure);
    match reconstruct_line_history(provider, &query, config).await {
        Ok(stops) => LineHistory::Reconstructed(stops),
        Err(reason) => {
            info!(
                line = %departure.line,
                direction = %departure.direction,
                %reason,
                "using placeholder line history"
            );
            LineHistory::Placeholder(placeholder_line_history(
                stop,
                departure,
                &config.preferred_city,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coords, DepartureState, Node, NodeStop, Platform, RouteResult};
    use crate::provider::{MockCall, MockMethod, MockProvider};
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    fn stop(id: &str, name: &str, city: &str) -> Stop {
        Stop::new(id, name, city, Coords::default())
    }

    fn node_stop(id: &str, name: &str, departure: Option<u32>) -> NodeStop {
        NodeStop {
            id: id.into(),
            name: name.into(),
            city: String::new(),
            coords: Coords::default(),
            platform: Some(Platform {
                name: "1".into(),
                kind: "Platform".into(),
            }),
            arrival: None,
            departure: departure.map(at),
        }
    }

    fn node(line: &str, stops: Vec<NodeStop>) -> Node {
        Node {
            line: line.into(),
            direction: "Coschütz".into(),
            duration: 10,
            mode: None,
            departure: None,
            arrival: None,
            stops,
        }
    }

    fn trip(nodes: Vec<Node>) -> Trip {
        Trip {
            departure: None,
            arrival: None,
            duration: 20,
            interchanges: 0,
            nodes,
        }
    }

    fn route(trips: Vec<Trip>) -> RouteResult {
        RouteResult {
            origin: None,
            destination: None,
            trips,
        }
    }

    fn departure(line: &str, direction: &str) -> Departure {
        Departure {
            line: line.into(),
            direction: direction.into(),
            platform: Some(Platform {
                name: "2".into(),
                kind: "Platform".into(),
            }),
            arrival_time: at(1),
            scheduled_time: at(1),
            arrival_time_relative: Some(1),
            scheduled_time_relative: Some(1),
            delay_time: 0,
            state: DepartureState::InTime,
            mode: None,
            diva: None,
        }
    }

    fn names(stops: &[LineStop]) -> Vec<&str> {
        stops.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn destination_prefers_exact_match_in_city() {
        let candidates = vec![
            stop("1", "Coschütz Nord", "Dresden"),
            stop("2", "Coschütz", "Freital"),
            stop("3", "coschütz", "Dresden"),
        ];
        let found = resolve_destination("Coschütz", &candidates, "Dresden").unwrap();
        assert_eq!(found.id, "3");
    }

    #[test]
    fn destination_falls_back_to_first() {
        let candidates = vec![stop("1", "Coschütz Nord", "Dresden"), stop("2", "x", "y")];
        let found = resolve_destination("Coschütz", &candidates, "Dresden").unwrap();
        assert_eq!(found.id, "1");
        assert!(resolve_destination("Coschütz", &[], "Dresden").is_none());
    }

    #[test]
    fn collect_dedups_and_sorts() {
        let t = trip(vec![
            node(
                "3",
                vec![
                    node_stop("b", "Postplatz", Some(5)),
                    node_stop("c", "Pirnaischer Platz", Some(8)),
                ],
            ),
            node("8", vec![node_stop("x", "Elsewhere", Some(1))]),
            node(
                "3",
                vec![
                    node_stop("c", "Pirnaischer Platz", Some(9)),
                    node_stop("u", "Untimed", None),
                    node_stop("a", "Hauptbahnhof", Some(2)),
                ],
            ),
        ]);
        let stops = collect_line_stops(&t, "3", "b", "Dresden");
        assert_eq!(
            names(&stops),
            vec!["Hauptbahnhof", "Postplatz", "Pirnaischer Platz", "Untimed"]
        );
        // First occurrence wins.
        assert_eq!(stops[2].departure, Some(at(8)));
        assert!(stops[1].is_current);
        assert_eq!(stops[0].city.as_deref(), Some("Dresden"));
        assert_eq!(stops[0].platform.as_deref(), Some("1"));
    }

    #[test]
    fn truncates_at_current_stop() {
        let t = trip(vec![node(
            "3",
            vec![
                node_stop("a", "Hauptbahnhof", Some(1)),
                node_stop("b", "Postplatz", Some(5)),
                node_stop("c", "Albertplatz", Some(9)),
            ],
        )]);
        let stops = from_current_stop(collect_line_stops(&t, "3", "b", "Dresden"));
        assert_eq!(names(&stops), vec!["Postplatz", "Albertplatz"]);
    }

    #[test]
    fn current_stop_missing_keeps_everything() {
        let t = trip(vec![node(
            "3",
            vec![
                node_stop("a", "Hauptbahnhof", Some(1)),
                node_stop("b", "Postplatz", Some(5)),
            ],
        )]);
        let stops = from_current_stop(collect_line_stops(&t, "3", "zzz", "Dresden"));
        assert_eq!(names(&stops), vec!["Hauptbahnhof", "Postplatz"]);
    }

    #[tokio::test]
    async fn reconstructs_from_first_matching_trip() {
        let provider = MockProvider::new()
            .with_stops("Coschütz", vec![stop("99", "Coschütz", "Dresden")])
            .with_route(
                "b",
                "99",
                route(vec![
                    trip(vec![node("8", vec![node_stop("x", "Other", Some(1))])]),
                    trip(vec![node(
                        "3",
                        vec![
                            node_stop("a", "Hauptbahnhof", Some(1)),
                            node_stop("b", "Postplatz", Some(5)),
                            node_stop("99", "Coschütz", Some(20)),
                        ],
                    )]),
                ]),
            );

        let query = LineQuery {
            stop_id: "b",
            line: "3",
            direction: "Coschütz",
            time: Some(at(5)),
        };
        let stops = reconstruct_line_history(&provider, &query, &RankConfig::default())
            .await
            .unwrap();
        assert_eq!(names(&stops), vec!["Postplatz", "Coschütz"]);
        assert!(provider.calls().contains(&MockCall::Route {
            origin_id: "b".into(),
            destination_id: "99".into(),
            time: Some(at(5)),
            arrival: false,
        }));
    }

    #[tokio::test]
    async fn failures_are_classified() {
        let config = RankConfig::default();
        let query = LineQuery {
            stop_id: "b",
            line: "3",
            direction: "Coschütz",
            time: None,
        };

        let provider = MockProvider::new();
        assert_eq!(
            reconstruct_line_history(&provider, &query, &config).await,
            Err(ResolutionFailure::NoDestination("Coschütz".into()))
        );

        let provider =
            MockProvider::new().with_stops("Coschütz", vec![stop("99", "Coschütz", "Dresden")]);
        assert!(matches!(
            reconstruct_line_history(&provider, &query, &config).await,
            Err(ResolutionFailure::NoRoute { .. })
        ));

        let provider = MockProvider::new()
            .with_stops("Coschütz", vec![stop("99", "Coschütz", "Dresden")])
            .with_route("b", "99", route(vec![trip(vec![node("8", Vec::new())])]));
        assert_eq!(
            reconstruct_line_history(&provider, &query, &config).await,
            Err(ResolutionFailure::NoMatchingTrip("3".into()))
        );

        let provider = MockProvider::new()
            .with_stops("Coschütz", vec![stop("99", "Coschütz", "Dresden")])
            .with_route("b", "99", route(vec![trip(vec![node("3", Vec::new())])]));
        assert_eq!(
            reconstruct_line_history(&provider, &query, &config).await,
            Err(ResolutionFailure::NoStops("3".into()))
        );

        let provider = MockProvider::new().failing(MockMethod::SearchStops);
        assert!(matches!(
            reconstruct_line_history(&provider, &query, &config).await,
            Err(ResolutionFailure::Provider(_))
        ));
    }

    #[tokio::test]
    async fn falls_back_to_placeholder() {
        let provider = MockProvider::new().failing_all();
        let here = stop("b", "Postplatz", "Dresden");
        let dep = departure("3", "Coschütz");

        let history = line_history(&provider, &here, &dep, &RankConfig::default()).await;
        assert!(history.is_placeholder());

        let stops = history.stops();
        assert_eq!(
            names(stops),
            vec!["Postplatz", NEXT_STOP_PLACEHOLDER, "Coschütz"]
        );
        assert!(stops[0].is_current);
        assert_eq!(stops[0].departure, Some(at(1)));
        assert!(stops.iter().all(|s| s.platform.is_none() && s.arrival.is_none()));
    }
}
