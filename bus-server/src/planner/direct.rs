//! Direct (single-leg) route search.

use std::collections::{HashMap, HashSet};

use crate::domain::{Itinerary, Leg, ServiceTime, StopId, TripId};
use crate::index::TransitIndex;

/// A stop usable as a journey endpoint, with the walk to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub stop_id: StopId,
    pub walk_meters: f64,
}

/// Single-leg itineraries from any origin candidate to any destination
/// candidate, departing at or after `earliest_departure` on a trip in
/// `active`.
///
/// For every origin stop and every active trip calling there, the trip's
/// stop sequence is scanned forward from the boarding call; the first
/// destination-candidate stop reached yields a leg. A trip contributes at
/// most one leg per origin/destination pair, the earliest qualifying
/// departure. Results are unordered; ranking is a separate stage.
pub fn find_direct(
    index: &TransitIndex,
    active: &HashSet<TripId>,
    origins: &[Candidate],
    destinations: &[Candidate],
    earliest_departure: ServiceTime,
) -> Vec<Itinerary> {
    let dest_walk: HashMap<&StopId, f64> = destinations
        .iter()
        .map(|c| (&c.stop_id, c.walk_meters))
        .collect();

    let mut best: HashMap<(TripId, StopId, StopId), Itinerary> = HashMap::new();

    for origin in origins {
        for (trip_id, pos) in index.trips_through(&origin.stop_id) {
            if !active.contains(trip_id) {
                continue;
            }
            let stop_times = index.stop_times_of(trip_id);
            let boarding = &stop_times[*pos];
            if boarding.departure < earliest_departure {
                continue;
            }

            let Some(trip) = index.trip(trip_id) else {
                continue;
            };

            // First destination candidate reached after the boarding call
            let Some(alight) = stop_times[pos + 1..]
                .iter()
                .find(|st| dest_walk.contains_key(&st.stop_id))
            else {
                continue;
            };

            // Loop trips can revisit the board stop; such a hit is not a leg
            let Ok(leg) = Leg::new(
                trip_id.clone(),
                trip.route_id.clone(),
                origin.stop_id.clone(),
                boarding.departure,
                alight.stop_id.clone(),
                alight.arrival,
            ) else {
                continue;
            };

            let itinerary =
                Itinerary::direct(leg, origin.walk_meters, dest_walk[&alight.stop_id]);
            let key = (
                trip_id.clone(),
                origin.stop_id.clone(),
                alight.stop_id.clone(),
            );
            match best.get(&key) {
                Some(existing) if existing.departure_time() <= itinerary.departure_time() => {}
                _ => {
                    best.insert(key, itinerary);
                }
            }
        }
    }

    best.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::testutil::{candidate, fixture_index, time};
    use crate::domain::TripId;

    #[test]
    fn finds_single_leg() {
        let index = fixture_index();
        let active = index.active_trips(crate::planner::testutil::monday());

        let found = find_direct(
            &index,
            &active,
            &[candidate("A", 100.0)],
            &[candidate("B", 50.0)],
            time("07:00:00"),
        );

        // One leg per R1 trip
        assert_eq!(found.len(), 3);
        let it = found
            .iter()
            .min_by_key(|it| it.departure_time())
            .unwrap();
        assert_eq!(it.legs()[0].trip_id(), &TripId::new("T1"));
        assert_eq!(it.departure_time(), time("08:00:00"));
        assert_eq!(it.arrival_time(), time("08:30:00"));
        assert_eq!(it.origin_walk_meters(), 100.0);
        assert_eq!(it.destination_walk_meters(), 50.0);
    }

    #[test]
    fn respects_earliest_departure() {
        let index = fixture_index();
        let active = index.active_trips(crate::planner::testutil::monday());

        let found = find_direct(
            &index,
            &active,
            &[candidate("A", 0.0)],
            &[candidate("B", 0.0)],
            time("08:00:01"),
        );
        // T1 departs A at 08:00:00 and is excluded; T1B and T1C remain
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|it| it.departure_time() >= time("08:00:01")));
        let earliest = found.iter().map(|it| it.departure_time()).min().unwrap();
        assert_eq!(earliest, time("09:00:00"));
    }

    #[test]
    fn inactive_trips_excluded() {
        let index = fixture_index();
        let active = index.active_trips(crate::planner::testutil::saturday());

        let found = find_direct(
            &index,
            &active,
            &[candidate("A", 0.0)],
            &[candidate("B", 0.0)],
            time("07:00:00"),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn direction_sensitive() {
        let index = fixture_index();
        let active = index.active_trips(crate::planner::testutil::monday());

        // No trip runs B -> A in the fixture
        let found = find_direct(
            &index,
            &active,
            &[candidate("B", 0.0)],
            &[candidate("A", 0.0)],
            time("07:00:00"),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn one_leg_per_trip_and_pair() {
        let index = fixture_index();
        let active = index.active_trips(crate::planner::testutil::monday());

        let found = find_direct(
            &index,
            &active,
            &[candidate("A", 0.0)],
            &[candidate("C", 0.0)],
            time("07:00:00"),
        );
        // T1 runs A -> B -> C; exactly one A -> C leg from it
        let from_t1: Vec<_> = found
            .iter()
            .filter(|it| it.legs()[0].trip_id() == &TripId::new("T1"))
            .collect();
        assert_eq!(from_t1.len(), 1);
    }

    #[test]
    fn stops_at_first_destination_hit() {
        let index = fixture_index();
        let active = index.active_trips(crate::planner::testutil::monday());

        // Both B and C are destination candidates; every trip reaches B first
        let found = find_direct(
            &index,
            &active,
            &[candidate("A", 0.0)],
            &[candidate("B", 0.0), candidate("C", 0.0)],
            time("07:55:00"),
        );
        assert!(!found.is_empty());
        assert!(
            found
                .iter()
                .all(|it| it.legs()[0].alight_stop().as_str() == "B")
        );
    }
}
