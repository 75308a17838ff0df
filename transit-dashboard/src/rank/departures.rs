//! Departure board ranking.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::domain::{Departure, RankedDeparture};
use crate::provider::{Outcome, TransitProvider};

use super::order::{leading_int, locale_cmp, stable_sort_by};

/// Compare line labels: numerically when both start with a number,
/// otherwise by name.
///
/// `"3" < "12"` but `"12" < "E8"`. Mixed pairs are not transitive, so sort
/// with [`stable_sort_by`].
pub fn compare_lines(a: &str, b: &str) -> Ordering {
    match (leading_int(a), leading_int(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => locale_cmp(a, b),
    }
}

/// Soonest departure first; same minute ordered by line.
pub fn compare_departures(a: &Departure, b: &Departure) -> Ordering {
    a.effective_offset()
        .cmp(&b.effective_offset())
        .then_with(|| compare_lines(&a.line, &b.line))
}

fn sanitize(direction: &str) -> String {
    direction
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Display identifier for the departure at `index` in the ranked board.
///
/// Unique within one board since `index` is its position.
pub fn display_id(stop_id: &str, index: usize, departure: &Departure) -> String {
    let line = if departure.line.is_empty() {
        "unknown"
    } else {
        departure.line.as_str()
    };
    let direction = if departure.direction.is_empty() {
        "unknown".to_string()
    } else {
        sanitize(&departure.direction)
    };
    format!(
        "departure-{stop_id}-{index}-{line}-{direction}-{}",
        departure.effective_offset()
    )
}

/// Sort departures for display and assign their identifiers.
pub fn rank_departures(stop_id: &str, mut departures: Vec<Departure>) -> Vec<RankedDeparture> {
    stable_sort_by(&mut departures, compare_departures);
    departures
        .into_iter()
        .enumerate()
        .map(|(index, departure)| RankedDeparture {
            id: display_id(stop_id, index, &departure),
            departure,
        })
        .collect()
}

/// Fetch up to `count` departures starting `offset_minutes` from now and
/// rank them.
pub async fn fetch_departures<P: TransitProvider>(
    provider: &P,
    stop_id: &str,
    count: u32,
    offset_minutes: i64,
) -> Outcome<Vec<RankedDeparture>> {
    match provider.departures(stop_id, count, offset_minutes).await {
        Ok(departures) => {
            debug!(stop_id, count = departures.len(), "departures loaded");
            Outcome::from_list(rank_departures(stop_id, departures))
        }
        Err(e) => {
            warn!(stop_id, error = %e, "failed to load departures");
            Outcome::Failed(e)
        }
    }
}
