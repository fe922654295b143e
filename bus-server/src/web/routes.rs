//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;

use crate::domain::ServiceTime;
use crate::locator;
use crate::planner::{PlanRequest, QueryError, plan_trip};

use super::dto::*;
use super::state::AppState;
use super::templates::PlannerTemplate;

/// Default map center when the dataset has no stops.
const FALLBACK_CENTER: (f64, f64) = (17.385, 78.4867);

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(planner_page))
        .route("/health", get(health))
        .route("/api/info", get(info))
        .route("/api/stops/nearby", get(nearby_stops))
        .route("/api/plan", post(plan))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Planner page with the map.
async fn planner_page(State(state): State<AppState>) -> impl IntoResponse {
    let (center_lat, center_lon) = map_center(&state);
    let template = PlannerTemplate {
        stop_count: state.index.stop_count(),
        route_count: state.index.route_count(),
        trip_count: state.index.trip_count(),
        center_lat,
        center_lon,
    };
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Mean stop position, so the map opens over the network.
fn map_center(state: &AppState) -> (f64, f64) {
    let near_everything = locator::find_nearby(
        &state.index,
        FALLBACK_CENTER.0,
        FALLBACK_CENTER.1,
        f64::MAX,
        usize::MAX,
    );
    if near_everything.is_empty() {
        return FALLBACK_CENTER;
    }
    let n = near_everything.len() as f64;
    let (lat_sum, lon_sum) = near_everything
        .iter()
        .fold((0.0, 0.0), |(la, lo), s| (la + s.stop.lat, lo + s.stop.lon));
    (lat_sum / n, lon_sum / n)
}

/// Dataset summary.
async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        stops: state.index.stop_count(),
        routes: state.index.route_count(),
        trips: state.index.trip_count(),
    })
}

/// Stops near a point, with the routes serving them.
async fn nearby_stops(
    State(state): State<AppState>,
    Query(req): Query<NearbyStopsRequest>,
) -> Result<Json<NearbyStopsResponse>, AppError> {
    let radius = req.radius.unwrap_or(state.config.origin_radius_meters);
    if !radius.is_finite() || radius < 0.0 {
        return Err(AppError::BadRequest {
            message: format!("Invalid radius: {radius}"),
        });
    }
    let limit = req.limit.unwrap_or(20).min(100);

    let stops = locator::find_nearby(&state.index, req.lat, req.lon, radius, limit)
        .into_iter()
        .map(|near| NearbyStopResult {
            id: near.stop.id.to_string(),
            name: near.stop.name.clone(),
            lat: near.stop.lat,
            lon: near.stop.lon,
            distance_meters: near.distance_meters,
            routes: state
                .index
                .routes_through(&near.stop.id)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    Ok(Json(NearbyStopsResponse { stops }))
}

/// Plan a trip between two coordinates.
async fn plan(
    State(state): State<AppState>,
    Json(req): Json<PlanTripRequest>,
) -> Result<Json<PlanTripResponse>, AppError> {
    let service_date =
        NaiveDate::parse_from_str(&req.date, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("Invalid date: {}", req.date),
        })?;
    let earliest_departure =
        ServiceTime::parse(&req.departure).map_err(|_| AppError::BadRequest {
            message: format!("Invalid departure time: {}", req.departure),
        })?;

    let request = PlanRequest {
        origin_lat: req.origin_lat,
        origin_lon: req.origin_lon,
        destination_lat: req.destination_lat,
        destination_lon: req.destination_lon,
        service_date,
        earliest_departure,
    };

    let result = plan_trip(&state.index, &request, &state.config).map_err(AppError::from)?;

    let itineraries = result
        .itineraries
        .iter()
        .map(|it| ItineraryResult::from_itinerary(it, &state.index, earliest_departure))
        .collect();

    Ok(Json(PlanTripResponse {
        status: status_name(result.status).to_string(),
        itineraries,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        // Every query error is a caller problem
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
