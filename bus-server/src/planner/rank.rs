//! Itinerary ranking.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{Itinerary, ServiceTime, TripId};

/// Order itineraries best-first, collapse duplicates, and truncate to
/// `max_results`.
///
/// Sort key, ascending: total elapsed time from `query_departure` to final
/// arrival, then number of transfers, then total walking distance. Ties are
/// broken by earliest departure, then by trip-identifier sequence, so equal
/// inputs always rank identically. Itineraries riding the same trips between
/// the same stops collapse to the best-ranked copy.
///
/// Ranking an already-ranked list is a no-op.
pub fn rank(
    mut itineraries: Vec<Itinerary>,
    query_departure: ServiceTime,
    max_results: usize,
) -> Vec<Itinerary> {
    itineraries.sort_by(|a, b| compare(a, b, query_departure));

    let mut seen = HashSet::new();
    itineraries.retain(|it| seen.insert(it.key()));
    itineraries.truncate(max_results);
    itineraries
}

fn compare(a: &Itinerary, b: &Itinerary, query_departure: ServiceTime) -> Ordering {
    a.elapsed_seconds_since(query_departure)
        .cmp(&b.elapsed_seconds_since(query_departure))
        .then_with(|| a.transfers().cmp(&b.transfers()))
        .then_with(|| a.total_walk_meters().total_cmp(&b.total_walk_meters()))
        .then_with(|| a.departure_time().cmp(&b.departure_time()))
        .then_with(|| trip_sequence(a).cmp(&trip_sequence(b)))
}

fn trip_sequence(it: &Itinerary) -> Vec<&TripId> {
    it.legs().iter().map(|l| l.trip_id()).collect()
}
