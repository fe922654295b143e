//! Bus leg type.
//!
//! A `Leg` is one continuous ride on a single trip, from a board stop to an
//! alight stop. Times are validated at construction so downstream code never
//! sees a leg that travels backwards.

use super::{DomainError, RouteId, ServiceTime, StopId, TripId};

/// One ride on a single trip.
///
/// # Invariants
///
/// - board and alight stops differ
/// - `alight_time >= board_time`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    trip_id: TripId,
    route_id: RouteId,
    board_stop: StopId,
    board_time: ServiceTime,
    alight_stop: StopId,
    alight_time: ServiceTime,
}

impl Leg {
    /// Construct a leg, validating its invariants.
    ///
    /// `board_time` is the departure at the board stop; `alight_time` is the
    /// arrival at the alight stop.
    pub fn new(
        trip_id: TripId,
        route_id: RouteId,
        board_stop: StopId,
        board_time: ServiceTime,
        alight_stop: StopId,
        alight_time: ServiceTime,
    ) -> Result<Self, DomainError> {
        if board_stop == alight_stop {
            return Err(DomainError::InvalidLeg(
                "board and alight stop are the same",
            ));
        }
        if alight_time < board_time {
            return Err(DomainError::InvalidLeg("alight time before board time"));
        }
        Ok(Self {
            trip_id,
            route_id,
            board_stop,
            board_time,
            alight_stop,
            alight_time,
        })
    }

    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    pub fn route_id(&self) -> &RouteId {
        &self.route_id
    }

    pub fn board_stop(&self) -> &StopId {
        &self.board_stop
    }

    pub fn board_time(&self) -> ServiceTime {
        self.board_time
    }

    pub fn alight_stop(&self) -> &StopId {
        &self.alight_stop
    }

    pub fn alight_time(&self) -> ServiceTime {
        self.alight_time
    }

    /// Ride duration in seconds.
    pub fn duration_seconds(&self) -> i64 {
        self.alight_time.seconds_since(self.board_time)
    }
}
