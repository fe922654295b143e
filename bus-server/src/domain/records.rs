//! Validated GTFS records.
//!
//! These are the structured transit records the rest of the system works
//! with. They are produced once (by the loader and the index build) and are
//! immutable afterwards; anything holding one of these can trust its fields.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

use super::{RouteId, ServiceId, ServiceTime, StopId, TripId};

/// A bus stop with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A route (a named line; owns trips).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    pub short_name: String,
    pub long_name: String,
    /// GTFS `route_type`; 3 is bus.
    pub route_type: u16,
}

impl Route {
    /// The name to display for this route: the short name when present,
    /// otherwise the long name, otherwise the id.
    pub fn display_name(&self) -> &str {
        if !self.short_name.is_empty() {
            &self.short_name
        } else if !self.long_name.is_empty() {
            &self.long_name
        } else {
            self.id.as_str()
        }
    }
}

/// One scheduled run of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    /// GTFS `direction_id` where the feed provides one; trips of the same
    /// route with different values run in opposite directions.
    pub direction_id: Option<u8>,
}

/// A timed call of a trip at a stop.
///
/// Invariants (enforced at index build): within a trip, `stop_sequence` is
/// strictly increasing, `arrival <= departure`, and the departure at one call
/// is `<=` the arrival at the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub arrival: ServiceTime,
    pub departure: ServiceTime,
}

/// The set of dates a service identifier is active on: a weekly pattern over
/// a date range, plus explicit added and removed dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub service_id: ServiceId,
    /// Active weekdays, Monday first.
    pub weekdays: [bool; 7],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Dates added outside the weekly pattern (`calendar_dates.txt` type 1).
    pub added: BTreeSet<NaiveDate>,
    /// Dates removed from the weekly pattern (`calendar_dates.txt` type 2).
    pub removed: BTreeSet<NaiveDate>,
}

impl CalendarEntry {
    /// Whether this service runs on `date`.
    ///
    /// Explicit exceptions win over the weekly pattern: a removed date is
    /// never active, an added date is always active.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if self.removed.contains(&date) {
            return false;
        }
        if self.added.contains(&date) {
            return true;
        }
        if date < self.start_date || date > self.end_date {
            return false;
        }
        self.weekdays[date.weekday().num_days_from_monday() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weekday_entry(weekdays: [bool; 7]) -> CalendarEntry {
        CalendarEntry {
            service_id: ServiceId::new("WK"),
            weekdays,
            start_date: date("2024-06-01"),
            end_date: date("2024-06-30"),
            added: BTreeSet::new(),
            removed: BTreeSet::new(),
        }
    }

    #[test]
    fn weekly_pattern() {
        // Monday-Friday service
        let entry = weekday_entry([true, true, true, true, true, false, false]);

        assert!(entry.is_active_on(date("2024-06-10"))); // Monday
        assert!(entry.is_active_on(date("2024-06-14"))); // Friday
        assert!(!entry.is_active_on(date("2024-06-15"))); // Saturday
        assert!(!entry.is_active_on(date("2024-06-16"))); // Sunday
    }

    #[test]
    fn date_range_bounds() {
        let entry = weekday_entry([true; 7]);

        assert!(!entry.is_active_on(date("2024-05-31")));
        assert!(entry.is_active_on(date("2024-06-01")));
        assert!(entry.is_active_on(date("2024-06-30")));
        assert!(!entry.is_active_on(date("2024-07-01")));
    }

    #[test]
    fn exceptions_override_pattern() {
        let mut entry = weekday_entry([true, true, true, true, true, false, false]);
        entry.removed.insert(date("2024-06-10")); // a Monday, removed
        entry.added.insert(date("2024-06-15")); // a Saturday, added

        assert!(!entry.is_active_on(date("2024-06-10")));
        assert!(entry.is_active_on(date("2024-06-15")));
    }

    #[test]
    fn added_date_outside_range_is_active() {
        let mut entry = weekday_entry([true; 7]);
        entry.added.insert(date("2024-07-15"));

        assert!(entry.is_active_on(date("2024-07-15")));
    }

    #[test]
    fn removal_beats_addition() {
        let mut entry = weekday_entry([true; 7]);
        entry.added.insert(date("2024-06-10"));
        entry.removed.insert(date("2024-06-10"));

        assert!(!entry.is_active_on(date("2024-06-10")));
    }

    #[test]
    fn route_display_name_fallback() {
        let mut route = Route {
            id: RouteId::new("R1"),
            short_name: "290U".into(),
            long_name: "Secunderabad - Patancheru".into(),
            route_type: 3,
        };
        assert_eq!(route.display_name(), "290U");

        route.short_name.clear();
        assert_eq!(route.display_name(), "Secunderabad - Patancheru");

        route.long_name.clear();
        assert_eq!(route.display_name(), "R1");
    }
}
