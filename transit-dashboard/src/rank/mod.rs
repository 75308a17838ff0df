//! Ranking and reconstruction of provider results.
//!
//! Each ranker has a pure function over already-fetched records and an
//! async wrapper that fetches through a [`TransitProvider`] and reports the
//! result as an [`Outcome`].
//!
//! [`TransitProvider`]: crate::provider::TransitProvider
//! [`Outcome`]: crate::provider::Outcome

mod config;
mod departures;
mod line_history;
mod order;
mod stops;
mod trips;

pub use config::{DEFAULT_PREFERRED_CITY, RankConfig};
pub use departures::{
    compare_departures, compare_lines, display_id, fetch_departures, rank_departures,
};
pub use line_history::{
    LineQuery, NEXT_STOP_PLACEHOLDER, ResolutionFailure, collect_line_stops, from_current_stop,
    line_history, placeholder_line_history, reconstruct_line_history, resolve_destination,
};
pub use order::{leading_int, locale_cmp, stable_sort_by};
pub use stops::{compare_stops, rank_stops, search_stops};
pub use trips::{compare_trips, plan_route, rank_trips};
