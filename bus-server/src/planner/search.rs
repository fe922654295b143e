//! Query entry point.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Itinerary, ServiceTime};
use crate::index::TransitIndex;
use crate::locator;

use super::config::PlanConfig;
use super::direct::{Candidate, find_direct};
use super::rank::rank;
use super::transfer::find_with_transfer;

/// Times later than this are beyond any overnight service day.
const MAX_DEPARTURE_SECONDS: u32 = 48 * 3600;

/// A trip-planning query: where from, where to, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub destination_lat: f64,
    pub destination_lon: f64,
    pub service_date: NaiveDate,
    pub earliest_departure: ServiceTime,
}

/// A request or configuration problem detected before any search runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("{0} coordinate out of range")]
    CoordinateOutOfRange(&'static str),

    #[error("origin and destination are the same point")]
    SameEndpoints,

    #[error("{0} must be positive")]
    NonPositiveRadius(&'static str),

    #[error("departure time is outside the service day")]
    DepartureOutOfRange,

    #[error("max_results must be positive")]
    NoResultsRequested,

    #[error("walking speed must be positive")]
    NonPositiveWalkingSpeed,
}

/// Which end of the journey a status refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Outcome of a valid query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// At least one itinerary was found.
    Found,
    /// No stops within the configured radius of one endpoint; the caller may
    /// suggest widening the radius.
    NoStopsNearby { endpoint: Endpoint },
    /// Stops exist at both ends but the schedule does not connect them at
    /// the requested date and time.
    NoItineraryFound,
}

/// A ranked query result.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub status: PlanStatus,
    pub itineraries: Vec<Itinerary>,
}

impl TripPlan {
    fn empty(status: PlanStatus) -> Self {
        Self {
            status,
            itineraries: Vec::new(),
        }
    }
}

/// Plan a journey between two coordinates.
///
/// Validates the request, locates candidate stops around both endpoints,
/// runs the direct and one-transfer searches over trips active on the
/// service date, and returns the ranked results. Pure with respect to the
/// index; concurrent calls never interfere.
pub fn plan_trip(
    index: &TransitIndex,
    request: &PlanRequest,
    config: &PlanConfig,
) -> Result<TripPlan, QueryError> {
    validate(request, config)?;

    let origins = candidates_near(
        index,
        request.origin_lat,
        request.origin_lon,
        config.origin_radius_meters,
    );
    if origins.is_empty() {
        return Ok(TripPlan::empty(PlanStatus::NoStopsNearby {
            endpoint: Endpoint::Origin,
        }));
    }

    let destinations = candidates_near(
        index,
        request.destination_lat,
        request.destination_lon,
        config.destination_radius_meters,
    );
    if destinations.is_empty() {
        return Ok(TripPlan::empty(PlanStatus::NoStopsNearby {
            endpoint: Endpoint::Destination,
        }));
    }

    let active = index.active_trips(request.service_date);

    let mut found = find_direct(
        index,
        &active,
        &origins,
        &destinations,
        request.earliest_departure,
    );
    found.extend(find_with_transfer(
        index,
        &active,
        &origins,
        &destinations,
        request.earliest_departure,
        config,
    ));

    debug!(
        origins = origins.len(),
        destinations = destinations.len(),
        candidates = found.len(),
        "search complete"
    );

    let itineraries = rank(found, request.earliest_departure, config.max_results);
    let status = if itineraries.is_empty() {
        PlanStatus::NoItineraryFound
    } else {
        PlanStatus::Found
    };
    Ok(TripPlan { status, itineraries })
}

fn candidates_near(index: &TransitIndex, lat: f64, lon: f64, radius: f64) -> Vec<Candidate> {
    locator::find_nearby(index, lat, lon, radius, usize::MAX)
        .into_iter()
        .map(|near| Candidate {
            stop_id: near.stop.id.clone(),
            walk_meters: near.distance_meters,
        })
        .collect()
}

fn validate(request: &PlanRequest, config: &PlanConfig) -> Result<(), QueryError> {
    check_coordinate(request.origin_lat, request.origin_lon, "origin")?;
    check_coordinate(request.destination_lat, request.destination_lon, "destination")?;
    if request.origin_lat == request.destination_lat
        && request.origin_lon == request.destination_lon
    {
        return Err(QueryError::SameEndpoints);
    }
    if request.earliest_departure.seconds() >= MAX_DEPARTURE_SECONDS {
        return Err(QueryError::DepartureOutOfRange);
    }
    check_radius(config.origin_radius_meters, "origin_radius_meters")?;
    check_radius(config.destination_radius_meters, "destination_radius_meters")?;
    check_radius(config.transfer_radius_meters, "transfer_radius_meters")?;
    if config.max_results == 0 {
        return Err(QueryError::NoResultsRequested);
    }
    if !(config.walking_speed_mps.is_finite() && config.walking_speed_mps > 0.0) {
        return Err(QueryError::NonPositiveWalkingSpeed);
    }
    Ok(())
}

fn check_coordinate(lat: f64, lon: f64, which: &'static str) -> Result<(), QueryError> {
    let ok = lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);
    if ok {
        Ok(())
    } else {
        Err(QueryError::CoordinateOutOfRange(which))
    }
}

fn check_radius(radius: f64, which: &'static str) -> Result<(), QueryError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(QueryError::NonPositiveRadius(which))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::testutil::{monday, time};

    fn request() -> PlanRequest {
        PlanRequest {
            origin_lat: 17.40,
            origin_lon: 78.40,
            destination_lat: 17.43,
            destination_lon: 78.43,
            service_date: monday(),
            earliest_departure: time("07:00:00"),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate(&request(), &PlanConfig::default()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut bad = request();
        bad.origin_lat = 91.0;
        assert_eq!(
            validate(&bad, &PlanConfig::default()),
            Err(QueryError::CoordinateOutOfRange("origin"))
        );

        let mut bad = request();
        bad.destination_lon = f64::NAN;
        assert_eq!(
            validate(&bad, &PlanConfig::default()),
            Err(QueryError::CoordinateOutOfRange("destination"))
        );
    }

    #[test]
    fn rejects_identical_endpoints() {
        let mut bad = request();
        bad.destination_lat = bad.origin_lat;
        bad.destination_lon = bad.origin_lon;
        assert_eq!(
            validate(&bad, &PlanConfig::default()),
            Err(QueryError::SameEndpoints)
        );
    }

    #[test]
    fn rejects_departure_beyond_service_day() {
        let mut bad = request();
        bad.earliest_departure = ServiceTime::from_seconds(48 * 3600);
        assert_eq!(
            validate(&bad, &PlanConfig::default()),
            Err(QueryError::DepartureOutOfRange)
        );
    }

    #[test]
    fn rejects_non_positive_radii() {
        let config = PlanConfig {
            origin_radius_meters: 0.0,
            ..PlanConfig::default()
        };
        assert_eq!(
            validate(&request(), &config),
            Err(QueryError::NonPositiveRadius("origin_radius_meters"))
        );

        let config = PlanConfig {
            transfer_radius_meters: -5.0,
            ..PlanConfig::default()
        };
        assert_eq!(
            validate(&request(), &config),
            Err(QueryError::NonPositiveRadius("transfer_radius_meters"))
        );
    }

    #[test]
    fn rejects_zero_max_results() {
        let config = PlanConfig {
            max_results: 0,
            ..PlanConfig::default()
        };
        assert_eq!(
            validate(&request(), &config),
            Err(QueryError::NoResultsRequested)
        );
    }
}
