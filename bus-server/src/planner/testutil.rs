//! Shared fixtures for planner tests.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{
    CalendarEntry, Route, RouteId, ServiceId, ServiceTime, Stop, StopId, Trip, TripId,
};
use crate::gtfs::{Feed, StopTimeRow};
use crate::index::{IndexConfig, TransitIndex};

use super::Candidate;

pub(crate) fn time(s: &str) -> ServiceTime {
    ServiceTime::parse(s).unwrap()
}

pub(crate) fn candidate(id: &str, walk_meters: f64) -> Candidate {
    Candidate {
        stop_id: StopId::new(id),
        walk_meters,
    }
}

/// 2024-06-10, a Monday inside the fixture service window.
pub(crate) fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// 2024-06-15, a Saturday the fixture weekday service does not run.
pub(crate) fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub(crate) fn stop(id: &str, lat: f64, lon: f64) -> Stop {
    Stop {
        id: StopId::new(id),
        name: format!("Stop {id}"),
        lat,
        lon,
    }
}

pub(crate) fn route(id: &str) -> Route {
    Route {
        id: RouteId::new(id),
        short_name: id.to_string(),
        long_name: String::new(),
        route_type: 3,
    }
}

pub(crate) fn trip(id: &str, route_id: &str, service_id: &str) -> Trip {
    Trip {
        id: TripId::new(id),
        route_id: RouteId::new(route_id),
        service_id: ServiceId::new(service_id),
        direction_id: Some(0),
    }
}

pub(crate) fn call(trip: &str, stop: &str, seq: u32, arr: &str, dep: &str) -> StopTimeRow {
    StopTimeRow {
        trip_id: TripId::new(trip),
        stop_id: StopId::new(stop),
        stop_sequence: seq,
        arrival_time: arr.to_string(),
        departure_time: dep.to_string(),
    }
}

/// Weekday service covering June 2024.
pub(crate) fn weekday_service(id: &str) -> CalendarEntry {
    CalendarEntry {
        service_id: ServiceId::new(id),
        weekdays: [true, true, true, true, true, false, false],
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        added: BTreeSet::new(),
        removed: BTreeSet::new(),
    }
}

pub(crate) fn build_index(feed: Feed) -> TransitIndex {
    TransitIndex::build(feed, &IndexConfig::default()).unwrap()
}

/// A small network for planner tests.
///
/// Stops A, B, C, D lie on a diagonal roughly 1.5 km apart; X sits about
/// thirty meters from C, within easy walking range.
///
/// Weekday trips:
/// - Route R1: T1, T1B, T1C run A -> B -> C at 08:00, 09:00, 10:00
/// - Route R2: T2, T2B run C -> D at 09:10 and 10:10
/// - Route R3: T3 runs X -> D at 09:20
/// - Route R4: T4 runs C -> A at 09:10
pub(crate) fn fixture_index() -> TransitIndex {
    let feed = Feed {
        stops: vec![
            stop("A", 17.400, 78.400),
            stop("B", 17.410, 78.410),
            stop("C", 17.420, 78.420),
            stop("D", 17.430, 78.430),
            stop("X", 17.4202, 78.4202),
        ],
        routes: vec![route("R1"), route("R2"), route("R3"), route("R4")],
        trips: vec![
            trip("T1", "R1", "WK"),
            trip("T1B", "R1", "WK"),
            trip("T1C", "R1", "WK"),
            trip("T2", "R2", "WK"),
            trip("T2B", "R2", "WK"),
            trip("T3", "R3", "WK"),
            trip("T4", "R4", "WK"),
        ],
        stop_times: vec![
            call("T1", "A", 1, "08:00:00", "08:00:00"),
            call("T1", "B", 2, "08:30:00", "08:31:00"),
            call("T1", "C", 3, "09:00:00", "09:00:00"),
            call("T1B", "A", 1, "09:00:00", "09:00:00"),
            call("T1B", "B", 2, "09:30:00", "09:31:00"),
            call("T1B", "C", 3, "10:00:00", "10:00:00"),
            call("T1C", "A", 1, "10:00:00", "10:00:00"),
            call("T1C", "B", 2, "10:30:00", "10:31:00"),
            call("T1C", "C", 3, "11:00:00", "11:00:00"),
            call("T2", "C", 1, "09:10:00", "09:10:00"),
            call("T2", "D", 2, "09:40:00", "09:40:00"),
            call("T2B", "C", 1, "10:10:00", "10:10:00"),
            call("T2B", "D", 2, "10:40:00", "10:40:00"),
            call("T3", "X", 1, "09:20:00", "09:20:00"),
            call("T3", "D", 2, "09:50:00", "09:50:00"),
            call("T4", "C", 1, "09:10:00", "09:10:00"),
            call("T4", "A", 2, "09:35:00", "09:35:00"),
        ],
        calendar: vec![weekday_service("WK")],
    };
    build_index(feed)
}
