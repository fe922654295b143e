//! Stop locator.
//!
//! Radius queries over the index's spatial grid, with a deterministic
//! ordering: ascending by distance, ties broken by stop identifier. A pure
//! function of the index and its inputs; no cursor, no internal state.

use crate::domain::Stop;
use crate::index::TransitIndex;

/// A stop found near a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyStop<'a> {
    pub stop: &'a Stop,
    pub distance_meters: f64,
}

/// Stops within `radius_meters` of `(lat, lon)`, ascending by distance with
/// ties broken by stop id, truncated to `max_results`.
///
/// A zero (or negative) radius yields nothing; a radius covering the whole
/// network yields every stop, sorted by distance.
pub fn find_nearby(
    index: &TransitIndex,
    lat: f64,
    lon: f64,
    radius_meters: f64,
    max_results: usize,
) -> Vec<NearbyStop<'_>> {
    let mut found: Vec<NearbyStop<'_>> = index
        .grid()
        .within_radius(lat, lon, radius_meters)
        .into_iter()
        .filter_map(|(stop_id, distance_meters)| {
            index.stop(stop_id).map(|stop| NearbyStop {
                stop,
                distance_meters,
            })
        })
        .collect();

    found.sort_by(|a, b| {
        a.distance_meters
            .total_cmp(&b.distance_meters)
            .then_with(|| a.stop.id.cmp(&b.stop.id))
    });
    found.truncate(max_results);
    found
}
