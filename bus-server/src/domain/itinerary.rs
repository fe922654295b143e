//! Itinerary type.
//!
//! An `Itinerary` is one complete journey proposal: one or two legs plus the
//! walking segments at the origin, between legs, and at the destination.
//! Itineraries are value objects created per query and never persisted.

use super::{DomainError, Leg, ServiceTime, StopId, TripId};

/// A complete journey proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<Leg>,
    origin_walk_meters: f64,
    transfer_walk_meters: f64,
    destination_walk_meters: f64,
}

/// Deduplication key for an itinerary: the trips ridden and the stops where
/// the rider boards and alights, in order. Two itineraries with equal keys
/// describe the same journey.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItineraryKey {
    pub trips: Vec<TripId>,
    pub stops: Vec<StopId>,
}

impl Itinerary {
    /// A single-leg itinerary.
    pub fn direct(leg: Leg, origin_walk_meters: f64, destination_walk_meters: f64) -> Self {
        Self {
            legs: vec![leg],
            origin_walk_meters,
            transfer_walk_meters: 0.0,
            destination_walk_meters,
        }
    }

    /// A two-leg itinerary with one transfer.
    ///
    /// # Errors
    ///
    /// - `ContinuationNotTransfer` if both legs ride the same trip
    /// - `TransferBeforeArrival` if the second leg boards before the first
    ///   leg arrives
    pub fn with_transfer(
        first: Leg,
        second: Leg,
        origin_walk_meters: f64,
        transfer_walk_meters: f64,
        destination_walk_meters: f64,
    ) -> Result<Self, DomainError> {
        if first.trip_id() == second.trip_id() {
            return Err(DomainError::ContinuationNotTransfer);
        }
        if second.board_time() < first.alight_time() {
            return Err(DomainError::TransferBeforeArrival);
        }
        Ok(Self {
            legs: vec![first, second],
            origin_walk_meters,
            transfer_walk_meters,
            destination_walk_meters,
        })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    fn first_leg(&self) -> &Leg {
        // Constructors guarantee at least one leg
        &self.legs[0]
    }

    fn last_leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    /// Departure time from the first board stop.
    pub fn departure_time(&self) -> ServiceTime {
        self.first_leg().board_time()
    }

    /// Arrival time at the final alight stop.
    pub fn arrival_time(&self) -> ServiceTime {
        self.last_leg().alight_time()
    }

    /// Number of transfers (legs minus one).
    pub fn transfers(&self) -> usize {
        self.legs.len() - 1
    }

    pub fn origin_walk_meters(&self) -> f64 {
        self.origin_walk_meters
    }

    pub fn transfer_walk_meters(&self) -> f64 {
        self.transfer_walk_meters
    }

    pub fn destination_walk_meters(&self) -> f64 {
        self.destination_walk_meters
    }

    /// Total walking distance over the whole journey.
    pub fn total_walk_meters(&self) -> f64 {
        self.origin_walk_meters + self.transfer_walk_meters + self.destination_walk_meters
    }

    /// Elapsed seconds from the query's departure time to final arrival.
    pub fn elapsed_seconds_since(&self, query_departure: ServiceTime) -> i64 {
        self.arrival_time().seconds_since(query_departure)
    }

    /// Waiting time between the legs, if this itinerary has a transfer.
    pub fn transfer_wait_seconds(&self) -> Option<i64> {
        match self.legs.as_slice() {
            [first, second] => Some(second.board_time().seconds_since(first.alight_time())),
            _ => None,
        }
    }

    /// Deduplication key (trip-id sequence, board/alight stop sequence).
    pub fn key(&self) -> ItineraryKey {
        let trips = self.legs.iter().map(|l| l.trip_id().clone()).collect();
        let stops = self
            .legs
            .iter()
            .flat_map(|l| [l.board_stop().clone(), l.alight_stop().clone()])
            .collect();
        ItineraryKey { trips, stops }
    }
}
