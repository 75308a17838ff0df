//! The dashboard service.
//!
//! Each method is one user action: it calls the rankers through the
//! provider, collapses "no data" and failures into empty or absent results,
//! and keeps the stored lists up to date.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::Berlin;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::DashboardConfig;
use crate::domain::{
    Coords, Departure, DepartureBoard, Line, LineHistory, RouteResult, Stop, StopCategory,
};
use crate::persist::{AddFavorite, Lists, PersistError};
use crate::provider::TransitProvider;
use crate::rank;
use crate::session::StopSearchSession;

/// Queries whose first hits make up the popular stops.
pub const POPULAR_QUERIES: [&str; 5] = [
    "Hauptbahnhof",
    "Postplatz",
    "Pirnaischer Platz",
    "Albertplatz",
    "Technische Universität",
];

/// Popular stops used when none of [`POPULAR_QUERIES`] resolve.
pub fn fallback_stops() -> Vec<Stop> {
    [
        ("33000113", "Dresden Hauptbahnhof", 13.732235, 51.040563),
        ("33000037", "Postplatz", 13.738746, 51.050407),
        ("33000028", "Pirnaischer Platz", 13.747314, 51.049542),
        ("33000742", "Technische Universität", 13.720829, 51.025755),
        ("33000109", "Albertplatz", 13.741579, 51.064463),
    ]
    .into_iter()
    .map(|(id, name, lon, lat)| {
        Stop::new(id, name, "Dresden", Coords::new(lon, lat)).with_category(StopCategory::Stop)
    })
    .collect()
}

/// Result of toggling a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FavoriteToggle {
    Added,
    Removed,
    /// The favorites are full; nothing changed.
    Full,
}

/// The next `at` on the Dresden wall clock, counting `now` itself.
///
/// A time earlier than `now` today means tomorrow.
pub fn next_occurrence(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.with_timezone(&Berlin).date_naive();
    let target = berlin_to_utc(today, at);
    if target < now
        && let Some(tomorrow) = today.succ_opt()
    {
        return berlin_to_utc(tomorrow, at);
    }
    target
}

/// Whole minutes from `now` until [`next_occurrence`] of `at`.
pub fn offset_until(now: DateTime<Utc>, at: NaiveTime) -> i64 {
    (next_occurrence(now, at) - now).num_minutes()
}

fn berlin_to_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    Berlin
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // Skipped by the spring-forward gap; read it as standard time.
        .unwrap_or_else(|| Utc.from_utc_datetime(&(naive - Duration::hours(1))))
}

/// User actions over a provider and the stored lists.
pub struct Dashboard<P> {
    provider: Arc<P>,
    lists: Lists,
    config: DashboardConfig,
    /// Popular stops as first resolved through the provider.
    popular: OnceCell<Vec<Stop>>,
}

impl<P: TransitProvider> Dashboard<P> {
    pub fn new(provider: Arc<P>, lists: Lists, config: DashboardConfig) -> Self {
        Self {
            provider,
            lists,
            config,
            popular: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn lists(&self) -> &Lists {
        &self.lists
    }

    /// Start a debounced search session over this dashboard's provider.
    pub fn search_session(&self) -> StopSearchSession
    where
        P: 'static,
    {
        StopSearchSession::spawn(
            self.provider.clone(),
            self.config.rank.clone(),
            self.config.search_debounce,
        )
    }

    /// Ranked stops for `query`. Failures give an empty list.
    pub async fn search_stops(&self, query: &str) -> Vec<Stop> {
        rank::search_stops(self.provider.as_ref(), query, &self.config.rank)
            .await
            .into_vec()
    }

    /// Record `stop` as picked from search results.
    pub fn select_stop(&self, stop: &Stop) -> Result<(), PersistError> {
        self.lists.add_to_search_history(stop)
    }

    /// First hit of each popular query, or the built-in list when none
    /// resolve.
    ///
    /// Resolved lists are kept for the life of the dashboard; the built-in
    /// list is not, so the next call asks the provider again.
    pub async fn popular_stops(&self) -> Vec<Stop> {
        if let Some(stops) = self.popular.get() {
            return stops.clone();
        }

        let searches = POPULAR_QUERIES
            .iter()
            .map(|query| rank::search_stops(self.provider.as_ref(), query, &self.config.rank));

        let stops: Vec<Stop> = join_all(searches)
            .await
            .into_iter()
            .filter_map(|outcome| outcome.into_vec().into_iter().next())
            .collect();

        if stops.is_empty() {
            debug!("no popular stops resolved, using built-in list");
            return fallback_stops();
        }
        if self.popular.set(stops.clone()).is_err() {
            debug!("popular stops already resolved");
        }
        stops
    }

    /// Up to `count` ranked departures at `stop`, from `at` (Dresden time)
    /// or from now.
    ///
    /// `None` when there are no departures or the provider fails. Either
    /// way `stop` moves to the front of the search history.
    pub async fn departure_board(
        &self,
        stop: &Stop,
        count: u32,
        at: Option<NaiveTime>,
        now: DateTime<Utc>,
    ) -> Option<DepartureBoard> {
        let offset = at.map_or(0, |at| offset_until(now, at));
        let outcome =
            rank::fetch_departures(self.provider.as_ref(), &stop.id, count, offset).await;

        if let Err(e) = self.lists.add_to_search_history(stop) {
            warn!(stop_id = %stop.id, error = %e, "failed to record search history");
        }

        outcome.into_option().map(|departures| DepartureBoard {
            stop: stop.clone(),
            departures,
            updated: now,
        })
    }

    /// [`Self::departure_board`] for a stop known only by id.
    pub async fn departure_board_by_id(
        &self,
        stop_id: &str,
        count: u32,
        at: Option<NaiveTime>,
        now: DateTime<Utc>,
    ) -> Option<DepartureBoard> {
        let stop = self.resolve_stop(stop_id).await;
        self.departure_board(&stop, count, at, now).await
    }

    /// Departure count after one "load more".
    pub fn more_departures(&self, count: u32) -> u32 {
        count.saturating_add(self.config.load_more_step)
    }

    /// A stop the user has seen: favorites, search history, route history,
    /// then popular stops.
    pub async fn known_stop(&self, stop_id: &str) -> Option<Stop> {
        let stored = self
            .lists
            .favorites()
            .into_iter()
            .chain(self.lists.search_history())
            .chain(
                self.lists
                    .route_history()
                    .into_iter()
                    .flat_map(|r| [r.origin, r.destination]),
            )
            .find(|s| s.id == stop_id);
        if stored.is_some() {
            return stored;
        }

        self.popular_stops()
            .await
            .into_iter()
            .find(|s| s.id == stop_id)
    }

    /// The stop with `stop_id`, or a stand-in named after the id.
    pub async fn resolve_stop(&self, stop_id: &str) -> Stop {
        match self.known_stop(stop_id).await {
            Some(stop) => stop,
            None => {
                debug!(stop_id, "unknown stop id, using stand-in");
                Stop::new(
                    stop_id,
                    stop_id,
                    self.config.rank.preferred_city.clone(),
                    Coords::default(),
                )
            }
        }
    }

    /// Ranked connections, or `None` when there are none or the provider
    /// fails.
    ///
    /// Every lookup is recorded in the route history when both stops are
    /// known, whatever it returned.
    pub async fn plan_route(
        &self,
        origin_id: &str,
        destination_id: &str,
        time: Option<DateTime<Utc>>,
        arrival: bool,
    ) -> Option<RouteResult> {
        let outcome = rank::plan_route(
            self.provider.as_ref(),
            origin_id,
            destination_id,
            time,
            arrival,
        )
        .await;

        if let (Some(origin), Some(destination)) = (
                self.known_stop(origin_id).await,
                self.known_stop(destination_id).await,
            )
            && let Err(e) = self
                .lists
                .add_to_route_history(&origin, &destination, Utc::now())
        {
            warn!(origin_id, destination_id, error = %e, "failed to record route history");
        }

        outcome.into_option()
    }

    /// Stops of `departure`'s line, or the placeholder.
    pub async fn line_history(&self, stop: &Stop, departure: &Departure) -> LineHistory {
        rank::line_history(self.provider.as_ref(), stop, departure, &self.config.rank).await
    }

    /// Lines serving a stop. Failures give an empty list.
    pub async fn lines(&self, stop_id: &str) -> Vec<Line> {
        match self.provider.lines(stop_id).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(stop_id, error = %e, "failed to load lines");
                Vec::new()
            }
        }
    }

    /// Remove `stop` from the favorites if present, add it otherwise.
    pub fn toggle_favorite(&self, stop: &Stop) -> Result<FavoriteToggle, PersistError> {
        if self.lists.is_favorite(&stop.id) {
            self.lists.remove_favorite(&stop.id)?;
            return Ok(FavoriteToggle::Removed);
        }
        Ok(match self.lists.add_favorite(stop)? {
            AddFavorite::Added | AddFavorite::AlreadyFavorite => FavoriteToggle::Added,
            AddFavorite::Full => FavoriteToggle::Full,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListLimits;
    use crate::domain::Trip;
    use crate::persist::MemoryStore;
    use crate::provider::{MockCall, MockMethod, MockProvider};
    use chrono::Timelike;

    fn now() -> DateTime<Utc> {
        // 12:00 in Dresden (CEST)
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dashboard(provider: MockProvider) -> (Arc<MockProvider>, Dashboard<MockProvider>) {
        let provider = Arc::new(provider);
        let lists = Lists::new(Arc::new(MemoryStore::new()), ListLimits::default());
        let dashboard = Dashboard::new(provider.clone(), lists, DashboardConfig::default());
        (provider, dashboard)
    }

    fn postplatz() -> Stop {
        Stop::new(
            "33000037",
            "Postplatz",
            "Dresden",
            Coords::new(13.738746, 51.050407),
        )
        .with_category(StopCategory::Stop)
    }

    #[test]
    fn offset_later_today() {
        assert_eq!(offset_until(now(), hm(12, 30)), 30);
        assert_eq!(offset_until(now(), hm(12, 0)), 0);
    }

    #[test]
    fn offset_rolls_to_tomorrow() {
        assert_eq!(offset_until(now(), hm(11, 0)), 23 * 60);
    }

    #[test]
    fn offset_drops_partial_minutes() {
        let now = now().with_second(30).unwrap();
        assert_eq!(offset_until(now, hm(12, 0)), 24 * 60 - 1);
    }

    #[test]
    fn offset_in_winter_and_across_dst() {
        // 12:00 CET
        let winter = Utc.with_ymd_and_hms(2025, 1, 15, 11, 0, 0).unwrap();
        assert_eq!(offset_until(winter, hm(13, 15)), 75);

        // 13:00 CET on the day before clocks go forward; noon tomorrow is
        // 22 hours away.
        let before_dst = Utc.with_ymd_and_hms(2025, 3, 29, 12, 0, 0).unwrap();
        assert_eq!(offset_until(before_dst, hm(12, 0)), 22 * 60);
    }

    #[test]
    fn next_occurrence_is_exact() {
        let now = now().with_second(30).unwrap();
        assert_eq!(
            next_occurrence(now, hm(12, 5)),
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 5, 0).unwrap()
        );
        assert_eq!(
            next_occurrence(now, hm(9, 0)),
            Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn fallback_has_five_stops() {
        let stops = fallback_stops();
        let ids: Vec<_> = stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["33000113", "33000037", "33000028", "33000742", "33000109"]
        );
        assert!(stops.iter().all(|s| s.city == "Dresden"));
    }

    #[tokio::test]
    async fn popular_stops_take_first_hits() {
        let (provider, dashboard) = dashboard(MockProvider::demo(now()));
        let stops = dashboard.popular_stops().await;

        let names: Vec<_> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Dresden Hauptbahnhof", "Postplatz"]);
        assert_eq!(provider.call_count(), POPULAR_QUERIES.len());
    }

    #[tokio::test]
    async fn popular_stops_are_resolved_once() {
        let (provider, dashboard) = dashboard(MockProvider::demo(now()));
        let first = dashboard.popular_stops().await;
        assert_eq!(dashboard.popular_stops().await, first);

        // Both ends are only known as popular stops.
        dashboard
            .plan_route("33000037", "33000113", None, false)
            .await;
        assert_eq!(dashboard.lists().route_history().len(), 1);

        let searches = provider
            .calls()
            .into_iter()
            .filter(|call| matches!(call, MockCall::SearchStops(_)))
            .count();
        assert_eq!(searches, POPULAR_QUERIES.len());
    }

    #[tokio::test]
    async fn fallback_popular_stops_are_not_kept() {
        let (provider, dashboard) = dashboard(MockProvider::new().failing_all());
        dashboard.popular_stops().await;
        dashboard.popular_stops().await;
        assert_eq!(provider.call_count(), 2 * POPULAR_QUERIES.len());
    }

    #[tokio::test]
    async fn popular_stops_fall_back() {
        let (_, dashboard) = dashboard(MockProvider::new().failing_all());
        assert_eq!(dashboard.popular_stops().await, fallback_stops());
    }

    #[tokio::test]
    async fn search_failure_is_empty() {
        let (_, dashboard) = dashboard(MockProvider::new().failing(MockMethod::SearchStops));
        assert!(dashboard.search_stops("Postplatz").await.is_empty());
    }

    #[tokio::test]
    async fn departure_board_ranks_and_records_history() {
        let (_, dashboard) = dashboard(MockProvider::demo(now()));
        let board = dashboard
            .departure_board(&postplatz(), 10, None, now())
            .await
            .unwrap();

        let lines: Vec<_> = board
            .departures
            .iter()
            .map(|d| d.departure.line.as_str())
            .collect();
        assert_eq!(lines, vec!["2", "4", "12"]);
        assert_eq!(board.updated, now());
        assert_eq!(dashboard.lists().search_history(), vec![postplatz()]);
    }

    #[tokio::test]
    async fn departure_board_passes_offset() {
        let (provider, dashboard) = dashboard(MockProvider::demo(now()));
        dashboard
            .departure_board(&postplatz(), 20, Some(hm(12, 45)), now())
            .await
            .unwrap();

        assert_eq!(
            provider.calls(),
            vec![MockCall::Departures {
                stop_id: "33000037".into(),
                count: 20,
                offset_minutes: 45,
            }]
        );
    }

    #[tokio::test]
    async fn empty_board_is_none_but_recorded() {
        let (_, dashboard) = dashboard(MockProvider::new());
        assert!(
            dashboard
                .departure_board(&postplatz(), 10, None, now())
                .await
                .is_none()
        );
        assert_eq!(dashboard.lists().search_history(), vec![postplatz()]);
    }

    #[tokio::test]
    async fn failed_board_is_none_but_recorded() {
        let (_, dashboard) = dashboard(MockProvider::new().failing(MockMethod::Departures));
        assert!(
            dashboard
                .departure_board(&postplatz(), 10, None, now())
                .await
                .is_none()
        );
        assert_eq!(dashboard.lists().search_history(), vec![postplatz()]);
    }

    #[tokio::test]
    async fn board_by_id_resolves_popular_stop() {
        let (_, dashboard) = dashboard(MockProvider::demo(now()));
        let board = dashboard
            .departure_board_by_id("33000037", 10, None, now())
            .await
            .unwrap();
        assert_eq!(board.stop, postplatz());
        assert_eq!(board.departures.len(), 3);
    }

    #[tokio::test]
    async fn board_by_unknown_id_uses_stand_in() {
        let (provider, dashboard) = dashboard(MockProvider::new());
        let stop = dashboard.resolve_stop("4711").await;
        assert_eq!(stop.name, "4711");
        assert_eq!(stop.city, "Dresden");
        assert_eq!(stop.coords, Coords(0.0, 0.0));

        // No departures: no board, but the stand-in is still searched for.
        assert!(
            dashboard
                .departure_board_by_id("4711", 10, None, now())
                .await
                .is_none()
        );
        assert!(provider.calls().contains(&MockCall::Departures {
            stop_id: "4711".into(),
            count: 10,
            offset_minutes: 0,
        }));
        assert_eq!(dashboard.lists().search_history(), vec![stop]);
    }

    #[tokio::test]
    async fn load_more_adds_ten() {
        let (_, dashboard) = dashboard(MockProvider::new());
        assert_eq!(dashboard.more_departures(10), 20);
        assert_eq!(dashboard.more_departures(20), 30);
    }

    #[tokio::test]
    async fn route_between_known_stops_is_recorded() {
        let (_, dashboard) = dashboard(MockProvider::demo(now()));
        let route = dashboard
            .plan_route("33000037", "33000113", None, false)
            .await;

        // The demo data has no trips.
        assert!(route.is_none());
        let history = dashboard.lists().route_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "33000037-33000113");
    }

    #[tokio::test]
    async fn route_with_unknown_stop_is_not_recorded() {
        let (_, dashboard) = dashboard(MockProvider::demo(now()));
        dashboard.plan_route("33000037", "4711", None, false).await;
        assert!(dashboard.lists().route_history().is_empty());
    }

    #[tokio::test]
    async fn failed_route_is_still_recorded() {
        let provider = MockProvider::demo(now()).failing(MockMethod::Route);
        let (_, dashboard) = dashboard(provider);
        assert!(
            dashboard
                .plan_route("33000037", "33000113", None, false)
                .await
                .is_none()
        );
        let history = dashboard.lists().route_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "33000037-33000113");
    }

    #[tokio::test]
    async fn route_returns_ranked_trips() {
        let trip = |duration: i64| Trip {
            departure: None,
            arrival: None,
            duration,
            interchanges: 0,
            nodes: Vec::new(),
        };
        let route = RouteResult {
            origin: None,
            destination: None,
            trips: vec![trip(30), trip(10)],
        };
        let (_, dashboard) =
            dashboard(MockProvider::new().with_route("33000037", "33000113", route));

        let found = dashboard
            .plan_route("33000037", "33000113", None, false)
            .await
            .unwrap();
        let durations: Vec<_> = found.trips.iter().map(|t| t.duration).collect();
        assert_eq!(durations, vec![10, 30]);
    }

    #[tokio::test]
    async fn lines_failure_is_empty() {
        let (_, dashboard) = dashboard(MockProvider::new().failing(MockMethod::Lines));
        assert!(dashboard.lines("33000037").await.is_empty());
    }

    #[tokio::test]
    async fn line_history_falls_back_to_placeholder() {
        let (_, dashboard) = dashboard(MockProvider::demo(now()));
        let board = dashboard
            .departure_board(&postplatz(), 10, None, now())
            .await
            .unwrap();
        let departure = &board.departures[0].departure;

        let history = dashboard.line_history(&postplatz(), departure).await;
        assert!(history.is_placeholder());
        assert_eq!(history.stops().len(), 3);
    }

    #[tokio::test]
    async fn toggle_favorite_cycles() {
        let (_, dashboard) = dashboard(MockProvider::new());
        let stop = postplatz();

        assert_eq!(dashboard.toggle_favorite(&stop).unwrap(), FavoriteToggle::Added);
        assert!(dashboard.lists().is_favorite(&stop.id));
        assert_eq!(dashboard.toggle_favorite(&stop).unwrap(), FavoriteToggle::Removed);
        assert!(!dashboard.lists().is_favorite(&stop.id));
    }

    #[tokio::test]
    async fn toggle_favorite_when_full() {
        let (_, dashboard) = dashboard(MockProvider::new());
        for stop in fallback_stops() {
            assert_eq!(dashboard.toggle_favorite(&stop).unwrap(), FavoriteToggle::Added);
        }
        assert_eq!(
            dashboard.toggle_favorite(&Stop::new("1", "Elsewhere", "Dresden", Coords::default())).unwrap(),
            FavoriteToggle::Full
        );
    }
}
