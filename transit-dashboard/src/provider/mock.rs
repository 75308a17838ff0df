//! In-memory provider for tests and offline development.
//!
//! Serves canned responses keyed by the request arguments and records every
//! call it receives.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    Coords, Departure, DepartureState, Line, RouteResult, Stop, StopCategory, TransportMode,
};

use super::TransitProvider;
use super::error::ProviderError;

/// Provider operations, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockMethod {
    SearchStops,
    Departures,
    Route,
    Lines,
}

/// A recorded provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    SearchStops(String),
    Departures {
        stop_id: String,
        count: u32,
        offset_minutes: i64,
    },
    Route {
        origin_id: String,
        destination_id: String,
        time: Option<DateTime<Utc>>,
        arrival: bool,
    },
    Lines(String),
}

/// Canned-response provider.
#[derive(Debug, Default)]
pub struct MockProvider {
    stops: HashMap<String, Vec<Stop>>,
    departures: HashMap<String, Vec<Departure>>,
    routes: HashMap<(String, String), RouteResult>,
    lines: HashMap<String, Vec<Line>>,
    failing: HashSet<MockMethod>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `search_stops(query)` with `stops`.
    pub fn with_stops(mut self, query: impl Into<String>, stops: Vec<Stop>) -> Self {
        self.stops.insert(query.into(), stops);
        self
    }

    /// Answer `departures(stop_id, ..)` with `departures`.
    pub fn with_departures(mut self, stop_id: impl Into<String>, departures: Vec<Departure>) -> Self {
        self.departures.insert(stop_id.into(), departures);
        self
    }

    /// Answer `route(origin, destination, ..)` with `route`.
    pub fn with_route(
        mut self,
        origin_id: impl Into<String>,
        destination_id: impl Into<String>,
        route: RouteResult,
    ) -> Self {
        self.routes
            .insert((origin_id.into(), destination_id.into()), route);
        self
    }

    /// Answer `lines(stop_id)` with `lines`.
    pub fn with_lines(mut self, stop_id: impl Into<String>, lines: Vec<Line>) -> Self {
        self.lines.insert(stop_id.into(), lines);
        self
    }

    /// Make `method` fail with a transport error.
    pub fn failing(mut self, method: MockMethod) -> Self {
        self.failing.insert(method);
        self
    }

    /// Make every method fail.
    pub fn failing_all(self) -> Self {
        self.failing(MockMethod::SearchStops)
            .failing(MockMethod::Departures)
            .failing(MockMethod::Route)
            .failing(MockMethod::Lines)
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock_calls().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<MockCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, method: MockMethod, call: MockCall) -> Result<(), ProviderError> {
        self.lock_calls().push(call);
        if self.failing.contains(&method) {
            return Err(ProviderError::Transport(format!(
                "mock failure for {method:?}"
            )));
        }
        Ok(())
    }

    /// A small Dresden dataset with departures relative to `now`.
    pub fn demo(now: DateTime<Utc>) -> Self {
        let postplatz = Stop::new(
            "33000037",
            "Postplatz",
            "Dresden",
            Coords::new(13.738746, 51.050407),
        )
        .with_category(StopCategory::Stop);
        let hbf = Stop::new(
            "33000113",
            "Dresden Hauptbahnhof",
            "Dresden",
            Coords::new(13.732235, 51.040563),
        )
        .with_category(StopCategory::Stop);

        let tram = |line: &str, direction: &str, minutes: i64, delay: i64| Departure {
            line: line.to_string(),
            direction: direction.to_string(),
            platform: None,
            arrival_time: now + Duration::minutes(minutes),
            scheduled_time: now + Duration::minutes(minutes - delay),
            arrival_time_relative: Some(minutes),
            scheduled_time_relative: Some(minutes - delay),
            delay_time: delay,
            state: if delay > 0 {
                DepartureState::Delayed
            } else {
                DepartureState::InTime
            },
            mode: Some(TransportMode::Tram.descriptor()),
            diva: None,
        };

        Self::new()
            .with_stops("Postplatz", vec![postplatz.clone()])
            .with_stops("Hauptbahnhof", vec![hbf.clone()])
            .with_departures(
                postplatz.id.clone(),
                vec![
                    tram("12", "Striesen", 6, 0),
                    tram("2", "Kleinzschachwitz", 3, 1),
                    tram("4", "Laubegast", 6, 0),
                ],
            )
            .with_departures(hbf.id.clone(), vec![tram("3", "Wilder Mann", 2, 0)])
    }
}

impl TransitProvider for MockProvider {
    async fn search_stops(&self, query: &str) -> Result<Vec<Stop>, ProviderError> {
        self.record(MockMethod::SearchStops, MockCall::SearchStops(query.to_string()))?;
        Ok(self.stops.get(query).cloned().unwrap_or_default())
    }

    async fn departures(
        &self,
        stop_id: &str,
        count: u32,
        offset_minutes: i64,
    ) -> Result<Vec<Departure>, ProviderError> {
        self.record(
            MockMethod::Departures,
            MockCall::Departures {
                stop_id: stop_id.to_string(),
                count,
                offset_minutes,
            },
        )?;
        Ok(self.departures.get(stop_id).cloned().unwrap_or_default())
    }

    async fn route(
        &self,
        origin_id: &str,
        destination_id: &str,
        time: Option<DateTime<Utc>>,
        arrival: bool,
    ) -> Result<RouteResult, ProviderError> {
        self.record(
            MockMethod::Route,
            MockCall::Route {
                origin_id: origin_id.to_string(),
                destination_id: destination_id.to_string(),
                time,
                arrival,
            },
        )?;
        Ok(self
            .routes
            .get(&(origin_id.to_string(), destination_id.to_string()))
            .cloned()
            .unwrap_or(RouteResult {
                origin: None,
                destination: None,
                trips: Vec::new(),
            }))
    }

    async fn lines(&self, stop_id: &str) -> Result<Vec<Line>, ProviderError> {
        self.record(MockMethod::Lines, MockCall::Lines(stop_id.to_string()))?;
        Ok(self.lines.get(stop_id).cloned().unwrap_or_default())
    }
}
