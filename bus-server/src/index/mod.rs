//! The transit index.
//!
//! Built once from a loaded GTFS feed, the index holds every lookup structure
//! the query engine needs: stop-to-trips, trip-to-stop-times, service
//! activity by date, and a spatial grid over stop coordinates. It is
//! immutable after construction and safe to share read-only across any
//! number of concurrent queries.
//!
//! Referential and ordering problems in the feed surface here: in strict
//! mode the build aborts on the first offending record, in lenient mode (the
//! default) the offending trip is dropped with a warning and the rest of the
//! feed survives.

mod spatial;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{
    CalendarEntry, Route, RouteId, ServiceId, ServiceTime, Stop, StopId, StopTime, Trip, TripId,
};
use crate::gtfs::{Feed, StopTimeRow};

pub use spatial::BucketGrid;

/// A referential or ordering problem in the feed, identifying the offending
/// record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataIntegrityError {
    /// Stop-time row references a trip that `trips.txt` does not define
    #[error("stop_time references unknown trip {trip}")]
    UnknownTrip { trip: TripId },

    /// Stop-time row references a stop that `stops.txt` does not define
    #[error("trip {trip} references unknown stop {stop}")]
    UnknownStop { trip: TripId, stop: StopId },

    /// A trip's stop_sequence values are not strictly increasing
    #[error("trip {trip} has non-increasing stop_sequence at {stop_sequence}")]
    NonIncreasingSequence { trip: TripId, stop_sequence: u32 },

    /// A stop-time clock string failed to parse
    #[error("trip {trip} stop_sequence {stop_sequence}: unparsable time {value:?}")]
    UnparsableTime {
        trip: TripId,
        stop_sequence: u32,
        value: String,
    },

    /// Time goes backwards within a trip (departure before arrival, or a
    /// later call earlier than the previous one)
    #[error("trip {trip} travels backwards in time at stop_sequence {stop_sequence}")]
    TimeRegression { trip: TripId, stop_sequence: u32 },
}

/// How the build reacts to offending records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Abort the build on the first offending record.
    Strict,
    /// Drop the offending trip, log a warning, keep the rest of the feed.
    #[default]
    Lenient,
}

/// Configuration for index construction.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub mode: ValidationMode,
    /// Cell size of the spatial grid, in degrees. Roughly 550 m at the
    /// equator per 0.005 degrees.
    pub cell_size_degrees: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Lenient,
            cell_size_degrees: 0.005,
        }
    }
}

/// Read-only lookup structures over a GTFS snapshot.
#[derive(Debug)]
pub struct TransitIndex {
    stops: HashMap<StopId, Stop>,
    routes: HashMap<RouteId, Route>,
    trips: HashMap<TripId, Trip>,
    /// Validated stop times per trip, ordered by stop_sequence.
    trip_stop_times: HashMap<TripId, Vec<StopTime>>,
    /// For each stop, the trips calling there with the call's position in
    /// the trip's stop-time sequence.
    stop_trips: HashMap<StopId, Vec<(TripId, usize)>>,
    calendar: HashMap<ServiceId, CalendarEntry>,
    grid: BucketGrid,
}

impl TransitIndex {
    /// Build the index from a loaded feed.
    ///
    /// In strict mode, returns the first [`DataIntegrityError`] encountered.
    /// In lenient mode, offending trips are dropped with a warning and the
    /// build always succeeds.
    pub fn build(feed: Feed, config: &IndexConfig) -> Result<Self, DataIntegrityError> {
        let stops: HashMap<StopId, Stop> =
            feed.stops.into_iter().map(|s| (s.id.clone(), s)).collect();
        let routes: HashMap<RouteId, Route> =
            feed.routes.into_iter().map(|r| (r.id.clone(), r)).collect();
        let mut trips: HashMap<TripId, Trip> =
            feed.trips.into_iter().map(|t| (t.id.clone(), t)).collect();
        let calendar: HashMap<ServiceId, CalendarEntry> = feed
            .calendar
            .into_iter()
            .map(|c| (c.service_id.clone(), c))
            .collect();

        // Group stop-time rows by trip; stop_sequence defines the order.
        let mut rows_by_trip: HashMap<TripId, Vec<StopTimeRow>> = HashMap::new();
        for row in feed.stop_times {
            rows_by_trip.entry(row.trip_id.clone()).or_default().push(row);
        }

        let mut trip_stop_times: HashMap<TripId, Vec<StopTime>> = HashMap::new();
        let mut dropped = 0usize;

        for (trip_id, mut rows) in rows_by_trip {
            rows.sort_by_key(|r| r.stop_sequence);
            match validate_trip(&trip_id, rows, &trips, &stops) {
                Ok(stop_times) => {
                    if stop_times.len() >= 2 {
                        trip_stop_times.insert(trip_id, stop_times);
                    }
                    // A trip calling at fewer than two stops can never form
                    // a leg; it is simply unreachable by any query.
                }
                Err(err) => match config.mode {
                    ValidationMode::Strict => return Err(err),
                    ValidationMode::Lenient => {
                        warn!(%err, "dropping trip with integrity problem");
                        trips.remove(&trip_id);
                        dropped += 1;
                    }
                },
            }
        }

        if dropped > 0 {
            warn!(dropped, "dropped trips during index build");
        }

        // Trips without any usable stop times can never be ridden; drop them
        // so active_trips() only ever reports plannable trips.
        trips.retain(|id, _| trip_stop_times.contains_key(id));

        let mut stop_trips: HashMap<StopId, Vec<(TripId, usize)>> = HashMap::new();
        for (trip_id, stop_times) in &trip_stop_times {
            for (pos, st) in stop_times.iter().enumerate() {
                stop_trips
                    .entry(st.stop_id.clone())
                    .or_default()
                    .push((trip_id.clone(), pos));
            }
        }
        // Deterministic iteration order for search
        for entries in stop_trips.values_mut() {
            entries.sort();
        }

        let grid = BucketGrid::build(
            config.cell_size_degrees,
            stops.values().map(|s| (s.id.clone(), s.lat, s.lon)),
        );

        Ok(Self {
            stops,
            routes,
            trips,
            trip_stop_times,
            stop_trips,
            calendar,
            grid,
        })
    }

    /// Trips calling at `stop_id`, each with the call's position in the
    /// trip's stop-time sequence.
    pub fn trips_through(&self, stop_id: &StopId) -> &[(TripId, usize)] {
        self.stop_trips
            .get(stop_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The ordered stop-time sequence of a trip.
    pub fn stop_times_of(&self, trip_id: &TripId) -> &[StopTime] {
        self.trip_stop_times
            .get(trip_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The set of trips active on `date` according to the service calendar.
    pub fn active_trips(&self, date: NaiveDate) -> HashSet<TripId> {
        // Evaluate each service once, then fan out to its trips.
        let active_services: HashSet<&ServiceId> = self
            .calendar
            .values()
            .filter(|entry| entry.is_active_on(date))
            .map(|entry| &entry.service_id)
            .collect();

        self.trips
            .values()
            .filter(|trip| active_services.contains(&trip.service_id))
            .map(|trip| trip.id.clone())
            .collect()
    }

    pub fn stop(&self, stop_id: &StopId) -> Option<&Stop> {
        self.stops.get(stop_id)
    }

    pub fn route(&self, route_id: &RouteId) -> Option<&Route> {
        self.routes.get(route_id)
    }

    pub fn trip(&self, trip_id: &TripId) -> Option<&Trip> {
        self.trips.get(trip_id)
    }

    /// Display names of the routes serving a stop, sorted and deduplicated.
    pub fn routes_through(&self, stop_id: &StopId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .trips_through(stop_id)
            .iter()
            .filter_map(|(trip_id, _)| self.trips.get(trip_id))
            .filter_map(|trip| self.routes.get(&trip.route_id))
            .map(|route| route.display_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// The spatial grid over stop coordinates.
    pub fn grid(&self) -> &BucketGrid {
        &self.grid
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}

/// Validate one trip's stop-time rows into domain records.
fn validate_trip(
    trip_id: &TripId,
    rows: Vec<StopTimeRow>,
    trips: &HashMap<TripId, Trip>,
    stops: &HashMap<StopId, Stop>,
) -> Result<Vec<StopTime>, DataIntegrityError> {
    if !trips.contains_key(trip_id) {
        return Err(DataIntegrityError::UnknownTrip {
            trip: trip_id.clone(),
        });
    }

    let mut stop_times: Vec<StopTime> = Vec::with_capacity(rows.len());
    let mut prev_sequence: Option<u32> = None;
    let mut prev_departure: Option<ServiceTime> = None;

    for row in rows {
        if !stops.contains_key(&row.stop_id) {
            return Err(DataIntegrityError::UnknownStop {
                trip: trip_id.clone(),
                stop: row.stop_id,
            });
        }
        if prev_sequence.is_some_and(|prev| row.stop_sequence <= prev) {
            return Err(DataIntegrityError::NonIncreasingSequence {
                trip: trip_id.clone(),
                stop_sequence: row.stop_sequence,
            });
        }

        let arrival = parse_stop_time(trip_id, row.stop_sequence, &row.arrival_time)?;
        let departure = parse_stop_time(trip_id, row.stop_sequence, &row.departure_time)?;

        if departure < arrival || prev_departure.is_some_and(|prev| arrival < prev) {
            return Err(DataIntegrityError::TimeRegression {
                trip: trip_id.clone(),
                stop_sequence: row.stop_sequence,
            });
        }

        prev_sequence = Some(row.stop_sequence);
        prev_departure = Some(departure);
        stop_times.push(StopTime {
            stop_id: row.stop_id,
            stop_sequence: row.stop_sequence,
            arrival,
            departure,
        });
    }

    Ok(stop_times)
}

fn parse_stop_time(
    trip_id: &TripId,
    stop_sequence: u32,
    value: &str,
) -> Result<ServiceTime, DataIntegrityError> {
    ServiceTime::parse(value).map_err(|_| DataIntegrityError::UnparsableTime {
        trip: trip_id.clone(),
        stop_sequence,
        value: value.to_string(),
    })
}
