//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{NaiveTime, Utc};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::dashboard::{FavoriteToggle, next_occurrence};
use crate::domain::{DepartureBoard, RouteResult, Stop};
use crate::persist::PersistError;
use crate::provider::TransitProvider;

use super::dto::*;
use super::state::AppState;

/// Upper bound on departures per request.
const MAX_DEPARTURES: u32 = 100;

/// Create the application router.
pub fn create_router<P: TransitProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/search", get(search_stops::<P>))
        .route("/api/stops/popular", get(popular_stops::<P>))
        .route("/api/stops/:id/departures", get(departures::<P>))
        .route("/api/stops/:id/lines", get(lines::<P>))
        .route("/api/route", get(plan_route::<P>))
        .route("/api/line-history", post(line_history::<P>))
        .route(
            "/api/favorites",
            get(favorites::<P>).post(toggle_favorite::<P>),
        )
        .route("/api/favorites/:id", delete(remove_favorite::<P>))
        .route(
            "/api/history/searches",
            get(search_history::<P>)
                .post(add_search_history::<P>)
                .delete(clear_search_history::<P>),
        )
        .route(
            "/api/history/routes",
            get(route_history::<P>).delete(clear_route_history::<P>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse an optional HH:MM time. Blank counts as absent.
fn parse_time(raw: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
            .map(Some)
            .map_err(|_| AppError::BadRequest {
                message: format!("Invalid time (expected HH:MM): {s}"),
            }),
    }
}

/// Ranked stop search.
async fn search_stops<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Query(req): Query<SearchQuery>,
) -> Json<StopsResponse> {
    let stops = state.dashboard.search_stops(&req.q).await;
    Json(StopsResponse { stops })
}

async fn popular_stops<P: TransitProvider>(
    State(state): State<AppState<P>>,
) -> Json<StopsResponse> {
    let stops = state.dashboard.popular_stops().await;
    Json(StopsResponse { stops })
}

/// Departure board for a stop. `null` when there are no departures or the
/// provider fails.
async fn departures<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Path(stop_id): Path<String>,
    Query(req): Query<DeparturesQuery>,
) -> Result<Json<Option<DepartureBoard>>, AppError> {
    let at = parse_time(req.time.as_deref())?;
    let count = req
        .count
        .unwrap_or(state.dashboard.config().default_departure_count)
        .clamp(1, MAX_DEPARTURES);

    let board = state
        .dashboard
        .departure_board_by_id(&stop_id, count, at, Utc::now())
        .await;
    Ok(Json(board))
}

async fn lines<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Path(stop_id): Path<String>,
) -> Json<LinesResponse> {
    let lines = state.dashboard.lines(&stop_id).await;
    Json(LinesResponse { lines })
}

/// Ranked connections. `null` when there are none or the provider fails.
async fn plan_route<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Query(req): Query<RouteQuery>,
) -> Result<Json<Option<RouteResult>>, AppError> {
    if req.origin.trim().is_empty() || req.destination.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "Origin and destination are required".to_string(),
        });
    }
    let time = parse_time(req.time.as_deref())?.map(|at| next_occurrence(Utc::now(), at));

    let route = state
        .dashboard
        .plan_route(&req.origin, &req.destination, time, req.arrival)
        .await;
    Ok(Json(route))
}

/// Stops of a departure's line, or the placeholder.
async fn line_history<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Json(req): Json<LineHistoryRequest>,
) -> Json<LineHistoryResponse> {
    let history = state
        .dashboard
        .line_history(&req.stop, &req.departure)
        .await;
    Json(history.into())
}

async fn favorites<P: TransitProvider>(State(state): State<AppState<P>>) -> Json<StopsResponse> {
    Json(StopsResponse {
        stops: state.dashboard.lists().favorites(),
    })
}

/// Add the stop to the favorites, or remove it if already there.
async fn toggle_favorite<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Json(stop): Json<Stop>,
) -> Result<Json<FavoriteResponse>, AppError> {
    let result = state.dashboard.toggle_favorite(&stop)?;
    if result == FavoriteToggle::Full {
        warn!(stop_id = %stop.id, "favorites full");
    }
    Ok(Json(FavoriteResponse {
        result,
        favorites: state.dashboard.lists().favorites(),
    }))
}

async fn remove_favorite<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Path(stop_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.dashboard.lists().remove_favorite(&stop_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_history<P: TransitProvider>(
    State(state): State<AppState<P>>,
) -> Json<StopsResponse> {
    Json(StopsResponse {
        stops: state.dashboard.lists().search_history(),
    })
}

/// Record a stop picked from search results.
async fn add_search_history<P: TransitProvider>(
    State(state): State<AppState<P>>,
    Json(stop): Json<Stop>,
) -> Result<Json<StopsResponse>, AppError> {
    state.dashboard.select_stop(&stop)?;
    Ok(Json(StopsResponse {
        stops: state.dashboard.lists().search_history(),
    }))
}

async fn clear_search_history<P: TransitProvider>(
    State(state): State<AppState<P>>,
) -> Result<StatusCode, AppError> {
    state.dashboard.lists().clear_search_history()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn route_history<P: TransitProvider>(
    State(state): State<AppState<P>>,
) -> Json<RouteHistoryResponse> {
    Json(RouteHistoryResponse {
        routes: state.dashboard.lists().route_history(),
    })
}

async fn clear_route_history<P: TransitProvider>(
    State(state): State<AppState<P>>,
) -> Result<StatusCode, AppError> {
    state.dashboard.lists().clear_route_history()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<PersistError> for AppError {
    fn from(e: PersistError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
