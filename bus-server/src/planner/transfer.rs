//! One-transfer route search.

use std::collections::{HashMap, HashSet};

use crate::domain::{Itinerary, Leg, RouteId, ServiceTime, StopId, TripId};
use crate::geo::walk_seconds;
use crate::index::TransitIndex;
use crate::locator;

use super::config::PlanConfig;
use super::direct::{Candidate, find_direct};

/// Two-leg itineraries from origin candidates to destination candidates with
/// exactly one transfer.
///
/// First legs fan out from each origin to every directly reachable stop,
/// limited to the earliest `max_departures_per_direction` departures per
/// route-direction. Around each first-leg alight stop, every stop within
/// `transfer_radius_meters` is tried as a transfer point; the second leg must
/// depart at least `min_transfer_seconds` plus the transfer walking time
/// after the first leg arrives.
///
/// Degenerate journeys are excluded: transfer stops that are themselves
/// origin or destination candidates, second legs riding the first leg's trip
/// (a continuation, not a transfer), and second legs alighting back at the
/// boarding stop.
pub fn find_with_transfer(
    index: &TransitIndex,
    active: &HashSet<TripId>,
    origins: &[Candidate],
    destinations: &[Candidate],
    earliest_departure: ServiceTime,
    config: &PlanConfig,
) -> Vec<Itinerary> {
    let origin_stops: HashSet<&StopId> = origins.iter().map(|c| &c.stop_id).collect();
    let destination_stops: HashSet<&StopId> = destinations.iter().map(|c| &c.stop_id).collect();

    let mut itineraries = Vec::new();

    for origin in origins {
        for first in first_legs(index, active, origin, earliest_departure, config) {
            let Some(alight) = index.stop(first.alight_stop()) else {
                continue;
            };

            for near in locator::find_nearby(
                index,
                alight.lat,
                alight.lon,
                config.transfer_radius_meters,
                usize::MAX,
            ) {
                let transfer_stop = &near.stop.id;
                if origin_stops.contains(transfer_stop)
                    || destination_stops.contains(transfer_stop)
                {
                    continue;
                }

                let walk = walk_seconds(near.distance_meters, config.walking_speed_mps);
                let connection = first
                    .alight_time()
                    .plus_seconds(config.min_transfer_seconds + walk);

                let second_legs = find_direct(
                    index,
                    active,
                    &[Candidate {
                        stop_id: transfer_stop.clone(),
                        walk_meters: near.distance_meters,
                    }],
                    destinations,
                    connection,
                );

                for second in second_legs {
                    let leg = &second.legs()[0];
                    if leg.alight_stop() == first.board_stop() {
                        continue;
                    }
                    // Same-trip continuations are rejected by the constructor
                    if let Ok(itinerary) = Itinerary::with_transfer(
                        first.clone(),
                        leg.clone(),
                        origin.walk_meters,
                        near.distance_meters,
                        second.destination_walk_meters(),
                    ) {
                        itineraries.push(itinerary);
                    }
                }
            }
        }
    }

    itineraries
}

/// First legs from one origin to every directly reachable stop, keeping the
/// earliest K departures per route-direction.
fn first_legs(
    index: &TransitIndex,
    active: &HashSet<TripId>,
    origin: &Candidate,
    earliest_departure: ServiceTime,
    config: &PlanConfig,
) -> Vec<Leg> {
    // Qualifying boardings grouped by (route, direction)
    let mut groups: HashMap<(RouteId, Option<u8>), Vec<(ServiceTime, TripId, usize)>> =
        HashMap::new();

    for (trip_id, pos) in index.trips_through(&origin.stop_id) {
        if !active.contains(trip_id) {
            continue;
        }
        let Some(trip) = index.trip(trip_id) else {
            continue;
        };
        let departure = index.stop_times_of(trip_id)[*pos].departure;
        if departure < earliest_departure {
            continue;
        }
        groups
            .entry((trip.route_id.clone(), trip.direction_id))
            .or_default()
            .push((departure, trip_id.clone(), *pos));
    }

    let mut legs = Vec::new();
    for boardings in groups.values_mut() {
        boardings.sort();
        boardings.truncate(config.max_departures_per_direction);

        for (departure, trip_id, pos) in boardings.iter() {
            let Some(trip) = index.trip(trip_id) else {
                continue;
            };
            let stop_times = index.stop_times_of(trip_id);
            for alight in &stop_times[pos + 1..] {
                // Loop trips can revisit the board stop
                if let Ok(leg) = Leg::new(
                    trip_id.clone(),
                    trip.route_id.clone(),
                    origin.stop_id.clone(),
                    *departure,
                    alight.stop_id.clone(),
                    alight.arrival,
                ) {
                    legs.push(leg);
                }
            }
        }
    }
    legs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripId;
    use crate::planner::testutil::{candidate, fixture_index, monday, saturday, time};

    fn run(
        origins: &[Candidate],
        destinations: &[Candidate],
        earliest: &str,
        config: &PlanConfig,
    ) -> Vec<Itinerary> {
        let index = fixture_index();
        let active = index.active_trips(monday());
        find_with_transfer(
            &index,
            &active,
            origins,
            destinations,
            time(earliest),
            config,
        )
    }

    fn trips_of(it: &Itinerary) -> Vec<&str> {
        it.legs().iter().map(|l| l.trip_id().as_str()).collect()
    }

    #[test]
    fn finds_transfers_at_stop_and_within_walking_range() {
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("D", 0.0)],
            "07:00:00",
            &PlanConfig::default(),
        );

        // T1 connects at C to T2 and T2B, and on foot at X to T3;
        // T1B connects at C to T2B only.
        assert_eq!(found.len(), 4);
        assert!(found.iter().any(|it| trips_of(it) == vec!["T1", "T2"]));
        assert!(found.iter().any(|it| trips_of(it) == vec!["T1", "T3"]));
        assert!(found.iter().any(|it| trips_of(it) == vec!["T1B", "T2B"]));

        let on_foot = found
            .iter()
            .find(|it| trips_of(it) == vec!["T1", "T3"])
            .unwrap();
        assert!(on_foot.transfer_walk_meters() > 0.0);
        assert!(on_foot.transfer_walk_meters() < 100.0);
    }

    #[test]
    fn honors_minimum_connection_time() {
        let config = PlanConfig::default();
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("D", 0.0)],
            "07:00:00",
            &config,
        );

        assert!(!found.is_empty());
        for it in &found {
            let wait = it.transfer_wait_seconds().unwrap();
            assert!(wait >= i64::from(config.min_transfer_seconds));
        }
    }

    #[test]
    fn walking_time_delays_the_connection() {
        // T1 reaches C at 09:00:00 and T3 leaves X at 09:20:00. A
        // 1195-second minimum leaves the connection ready at 09:19:55
        // before walking, so only the walk to X can push it past the
        // departure.
        let config = PlanConfig {
            min_transfer_seconds: 1195,
            ..PlanConfig::default()
        };
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("D", 0.0)],
            "07:00:00",
            &config,
        );
        assert!(
            found.iter().all(|it| trips_of(it) != vec!["T1", "T3"]),
            "walking time was not charged against the connection"
        );

        // An implausibly quick walker makes the same connection
        let config = PlanConfig {
            walking_speed_mps: 50.0,
            ..config
        };
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("D", 0.0)],
            "07:00:00",
            &config,
        );
        assert!(found.iter().any(|it| trips_of(it) == vec!["T1", "T3"]));
    }

    #[test]
    fn never_transfers_to_the_same_trip() {
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("C", 0.0), candidate("D", 0.0)],
            "07:00:00",
            &PlanConfig::default(),
        );
        for it in &found {
            assert_ne!(it.legs()[0].trip_id(), it.legs()[1].trip_id());
        }
    }

    #[test]
    fn excludes_transfer_stops_that_are_endpoints() {
        // C is a destination candidate, so it cannot serve as a transfer
        // point; only the walk to X remains.
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("C", 0.0), candidate("D", 0.0)],
            "07:00:00",
            &PlanConfig::default(),
        );

        assert!(!found.is_empty());
        for it in &found {
            assert_ne!(it.legs()[1].board_stop().as_str(), "C");
        }
    }

    #[test]
    fn rejects_second_leg_returning_to_origin() {
        // T4 runs C -> A; with A also a destination candidate the loop back
        // to the boarding stop must not appear.
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("A", 0.0), candidate("D", 0.0)],
            "07:00:00",
            &PlanConfig::default(),
        );
        for it in &found {
            assert_ne!(it.legs()[1].alight_stop().as_str(), "A");
        }
    }

    #[test]
    fn fan_out_limit_caps_first_leg_departures() {
        let config = PlanConfig {
            max_departures_per_direction: 1,
            ..PlanConfig::default()
        };
        let found = run(
            &[candidate("A", 0.0)],
            &[candidate("D", 0.0)],
            "07:00:00",
            &config,
        );

        // Only T1 (the earliest R1 departure) may start an itinerary
        assert!(!found.is_empty());
        for it in &found {
            assert_eq!(it.legs()[0].trip_id(), &TripId::new("T1"));
        }
    }

    #[test]
    fn no_service_means_no_transfers() {
        let index = fixture_index();
        let active = index.active_trips(saturday());
        let found = find_with_transfer(
            &index,
            &active,
            &[candidate("A", 0.0)],
            &[candidate("D", 0.0)],
            time("07:00:00"),
            &PlanConfig::default(),
        );
        assert!(found.is_empty());
    }
}
