//! Route result ranking.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::{RouteResult, Trip};
use crate::provider::{Outcome, TransitProvider};

use super::order::stable_sort_by;

/// Compare two trips.
///
/// When both trips have a departure time, only the departure time counts.
/// Otherwise trips are ranked by:
/// 1. Duration (shorter is better)
/// 2. Number of interchanges (fewer is better)
///
/// Not transitive over mixed inputs; sort with [`stable_sort_by`].
pub fn compare_trips(a: &Trip, b: &Trip) -> Ordering {
    if let (Some(x), Some(y)) = (a.departure_time(), b.departure_time()) {
        return x.cmp(&y);
    }

    a.duration
        .cmp(&b.duration)
        .then_with(|| a.interchanges.cmp(&b.interchanges))
}

/// Rank trips best-first.
pub fn rank_trips(mut trips: Vec<Trip>) -> Vec<Trip> {
    stable_sort_by(&mut trips, compare_trips);
    trips
}

/// Plan a route and rank its trips.
///
/// A result with no trips is `Empty`.
pub async fn plan_route<P: TransitProvider>(
    provider: &P,
    origin_id: &str,
    destination_id: &str,
    time: Option<DateTime<Utc>>,
    arrival: bool,
) -> Outcome<RouteResult> {
    match provider
        .route(origin_id, destination_id, time, arrival)
        .await
    {
        Ok(route) if route.trips.is_empty() => {
            debug!(origin_id, destination_id, "no trips found");
            Outcome::Empty
        }
        Ok(route) => {
            debug!(
                origin_id,
                destination_id,
                trips = route.trips.len(),
                "route planned"
            );
            Outcome::Found(RouteResult {
                trips: rank_trips(route.trips),
                ..route
            })
        }
        Err(e) => {
            warn!(origin_id, destination_id, error = %e, "route planning failed");
            Outcome::Failed(e)
        }
    }
}
