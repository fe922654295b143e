//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, Leg, ServiceTime};
use crate::index::TransitIndex;
use crate::planner::{Endpoint, PlanStatus};

/// Request for stops near a point.
#[derive(Debug, Deserialize)]
pub struct NearbyStopsRequest {
    pub lat: f64,
    pub lon: f64,

    /// Search radius in meters (defaults to the configured origin radius)
    pub radius: Option<f64>,

    /// Maximum number of stops to return
    pub limit: Option<usize>,
}

/// A stop near the queried point.
#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyStopResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_meters: f64,

    /// Display names of the routes serving this stop
    pub routes: Vec<String>,
}

/// Response for the nearby-stops endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyStopsResponse {
    pub stops: Vec<NearbyStopResult>,
}

/// Request to plan a trip.
#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub destination_lat: f64,
    pub destination_lon: f64,

    /// Service date as `YYYY-MM-DD`
    pub date: String,

    /// Earliest departure as `HH:MM:SS`
    pub departure: String,
}

/// A stop visited by a leg, with enough detail to draw it on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopPoint {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,

    /// Board or alight time as `HH:MM:SS`
    pub time: String,
}

/// One ride within an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegResult {
    pub trip_id: String,
    pub route_name: String,
    pub board: StopPoint,
    pub alight: StopPoint,
}

/// A ranked journey proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryResult {
    pub legs: Vec<LegResult>,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_mins: i64,
    pub transfers: usize,
    pub origin_walk_meters: f64,
    pub transfer_walk_meters: f64,
    pub destination_walk_meters: f64,
}

/// Response for trip planning.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanTripResponse {
    /// One of `found`, `no_stops_near_origin`, `no_stops_near_destination`,
    /// `no_itinerary_found`
    pub status: String,

    /// Found itineraries, best first
    pub itineraries: Vec<ItineraryResult>,
}

/// Dataset summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub stops: usize,
    pub routes: usize,
    pub trips: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Conversion implementations

/// Wire name of a plan status.
pub fn status_name(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::Found => "found",
        PlanStatus::NoStopsNearby {
            endpoint: Endpoint::Origin,
        } => "no_stops_near_origin",
        PlanStatus::NoStopsNearby {
            endpoint: Endpoint::Destination,
        } => "no_stops_near_destination",
        PlanStatus::NoItineraryFound => "no_itinerary_found",
    }
}

impl ItineraryResult {
    /// Flatten a domain itinerary for the wire, resolving stop and route
    /// names from the index.
    pub fn from_itinerary(
        itinerary: &Itinerary,
        index: &TransitIndex,
        query_departure: ServiceTime,
    ) -> Self {
        let legs = itinerary
            .legs()
            .iter()
            .map(|leg| LegResult::from_leg(leg, index))
            .collect();

        Self {
            legs,
            departure_time: itinerary.departure_time().to_string(),
            arrival_time: itinerary.arrival_time().to_string(),
            duration_mins: itinerary.elapsed_seconds_since(query_departure) / 60,
            transfers: itinerary.transfers(),
            origin_walk_meters: itinerary.origin_walk_meters(),
            transfer_walk_meters: itinerary.transfer_walk_meters(),
            destination_walk_meters: itinerary.destination_walk_meters(),
        }
    }
}

impl LegResult {
    /// Flatten a domain leg for the wire.
    pub fn from_leg(leg: &Leg, index: &TransitIndex) -> Self {
        let route_name = index
            .route(leg.route_id())
            .map(|r| r.display_name().to_string())
            .unwrap_or_else(|| leg.route_id().to_string());

        Self {
            trip_id: leg.trip_id().to_string(),
            route_name,
            board: stop_point(index, leg.board_stop().as_str(), leg.board_time()),
            alight: stop_point(index, leg.alight_stop().as_str(), leg.alight_time()),
        }
    }
}

fn stop_point(index: &TransitIndex, stop_id: &str, time: ServiceTime) -> StopPoint {
    let stop = index.stop(&stop_id.into());
    StopPoint {
        id: stop_id.to_string(),
        name: stop.map(|s| s.name.clone()).unwrap_or_default(),
        lat: stop.map(|s| s.lat).unwrap_or_default(),
        lon: stop.map(|s| s.lon).unwrap_or_default(),
        time: time.to_string(),
    }
}
