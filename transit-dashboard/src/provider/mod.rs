//! Transit data provider abstraction.
//!
//! The dashboard never talks to a concrete API directly. Every ranker and
//! the dashboard service take a [`TransitProvider`], so the VVO client, the
//! caching wrapper and test fakes are interchangeable.

mod error;
mod mock;
mod outcome;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{Departure, Line, RouteResult, Stop};

pub use error::ProviderError;
pub use mock::{MockCall, MockMethod, MockProvider};
pub use outcome::Outcome;

/// Source of stops, departures, routes and lines.
///
/// Every call may fail; callers map failures to empty or absent results.
pub trait TransitProvider: Send + Sync {
    /// Free-text stop search, unranked.
    fn search_stops(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Stop>, ProviderError>> + Send;

    /// Upcoming departures at a stop, starting `offset_minutes` from now.
    fn departures(
        &self,
        stop_id: &str,
        count: u32,
        offset_minutes: i64,
    ) -> impl Future<Output = Result<Vec<Departure>, ProviderError>> + Send;

    /// Connections between two stops. `time` defaults to now; `arrival`
    /// makes it the latest arrival instead of the earliest departure.
    fn route(
        &self,
        origin_id: &str,
        destination_id: &str,
        time: Option<DateTime<Utc>>,
        arrival: bool,
    ) -> impl Future<Output = Result<RouteResult, ProviderError>> + Send;

    /// Lines serving a stop.
    fn lines(&self, stop_id: &str) -> impl Future<Output = Result<Vec<Line>, ProviderError>> + Send;
}
