//! GTFS table loading.
//!
//! Reads the standard GTFS text tables from a data directory into structured
//! records. Structural problems (missing files, malformed CSV) fail the
//! load; rows with unusable values that real-world feeds commonly contain
//! (stops without coordinates) are skipped with a warning. Stop-time clock
//! strings are kept raw here — parsing and referential validation is the
//! index's job, where strict/lenient handling applies.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{CalendarEntry, Route, RouteId, ServiceId, Stop, StopId, Trip, TripId};

use super::GtfsError;

/// GTFS date format (YYYYMMDD).
const DATE_FORMAT: &str = "%Y%m%d";

/// A raw `stop_times.txt` row. Times stay as the feed's "HH:MM:SS" strings;
/// the index parses and validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTimeRow {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub arrival_time: String,
    pub departure_time: String,
}

/// A loaded GTFS feed: structured records ready for index construction.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTimeRow>,
    pub calendar: Vec<CalendarEntry>,
}

#[derive(Debug, Deserialize)]
struct RawStop {
    stop_id: String,
    stop_name: String,
    stop_lat: String,
    stop_lon: String,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    route_id: String,
    #[serde(default)]
    route_short_name: String,
    #[serde(default)]
    route_long_name: String,
    #[serde(default)]
    route_type: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    trip_id: String,
    route_id: String,
    service_id: String,
    #[serde(default)]
    direction_id: String,
}

#[derive(Debug, Deserialize)]
struct RawStopTime {
    trip_id: String,
    stop_id: String,
    stop_sequence: u32,
    arrival_time: String,
    departure_time: String,
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    service_id: String,
    monday: u8,
    tuesday: u8,
    wednesday: u8,
    thursday: u8,
    friday: u8,
    saturday: u8,
    sunday: u8,
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct RawCalendarDate {
    service_id: String,
    date: String,
    exception_type: u8,
}

/// Load a GTFS feed from `data_dir`.
///
/// Requires `stops.txt`, `routes.txt`, `trips.txt` and `stop_times.txt`.
/// `calendar.txt` and `calendar_dates.txt` are optional; a feed may define
/// its services entirely through either.
pub fn load_feed(data_dir: &Path) -> Result<Feed, GtfsError> {
    if !data_dir.is_dir() {
        return Err(GtfsError::DataDirNotFound(data_dir.to_path_buf()));
    }

    for required in ["stops.txt", "routes.txt", "trips.txt", "stop_times.txt"] {
        let path = data_dir.join(required);
        if !path.exists() {
            return Err(GtfsError::MissingFile(path));
        }
    }

    let stops = load_stops(data_dir)?;
    let routes = load_routes(data_dir)?;
    let trips = load_trips(data_dir)?;
    let stop_times = load_stop_times(data_dir)?;
    let calendar = load_calendar(data_dir)?;

    info!(
        stops = stops.len(),
        routes = routes.len(),
        trips = trips.len(),
        stop_times = stop_times.len(),
        services = calendar.len(),
        "loaded GTFS feed"
    );

    Ok(Feed {
        stops,
        routes,
        trips,
        stop_times,
        calendar,
    })
}

fn reader(data_dir: &Path, file: &str) -> Result<csv::Reader<std::fs::File>, GtfsError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(data_dir.join(file))
        .map_err(|source| GtfsError::Csv {
            file: file.to_string(),
            source,
        })
}

fn read_rows<T: serde::de::DeserializeOwned>(
    data_dir: &Path,
    file: &str,
) -> Result<Vec<T>, GtfsError> {
    let mut rows = Vec::new();
    for row in reader(data_dir, file)?.deserialize() {
        rows.push(row.map_err(|source| GtfsError::Csv {
            file: file.to_string(),
            source,
        })?);
    }
    Ok(rows)
}

fn load_stops(data_dir: &Path) -> Result<Vec<Stop>, GtfsError> {
    let raw: Vec<RawStop> = read_rows(data_dir, "stops.txt")?;
    let mut stops = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for row in raw {
        // Stops without usable coordinates can't participate in any radius
        // query; skip them like the rest of the row-quality handling.
        let (lat, lon) = match (row.stop_lat.parse::<f64>(), row.stop_lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
            _ => {
                skipped += 1;
                continue;
            }
        };
        stops.push(Stop {
            id: StopId::new(row.stop_id),
            name: row.stop_name,
            lat,
            lon,
        });
    }

    if skipped > 0 {
        warn!(skipped, "skipped stops without usable coordinates");
    }
    Ok(stops)
}

fn load_routes(data_dir: &Path) -> Result<Vec<Route>, GtfsError> {
    let raw: Vec<RawRoute> = read_rows(data_dir, "routes.txt")?;
    Ok(raw
        .into_iter()
        .map(|row| Route {
            id: RouteId::new(row.route_id),
            short_name: row.route_short_name,
            long_name: row.route_long_name,
            route_type: row.route_type.unwrap_or(3),
        })
        .collect())
}

fn load_trips(data_dir: &Path) -> Result<Vec<Trip>, GtfsError> {
    let raw: Vec<RawTrip> = read_rows(data_dir, "trips.txt")?;
    Ok(raw
        .into_iter()
        .map(|row| Trip {
            id: TripId::new(row.trip_id),
            route_id: RouteId::new(row.route_id),
            service_id: ServiceId::new(row.service_id),
            direction_id: row.direction_id.parse().ok(),
        })
        .collect())
}

fn load_stop_times(data_dir: &Path) -> Result<Vec<StopTimeRow>, GtfsError> {
    let raw: Vec<RawStopTime> = read_rows(data_dir, "stop_times.txt")?;
    Ok(raw
        .into_iter()
        .map(|row| StopTimeRow {
            trip_id: TripId::new(row.trip_id),
            stop_id: StopId::new(row.stop_id),
            stop_sequence: row.stop_sequence,
            arrival_time: row.arrival_time,
            departure_time: row.departure_time,
        })
        .collect())
}

fn parse_date(file: &str, row: u64, value: &str) -> Result<NaiveDate, GtfsError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| GtfsError::BadRow {
        file: file.to_string(),
        row,
        message: format!("invalid date {value:?}, expected YYYYMMDD"),
    })
}

fn load_calendar(data_dir: &Path) -> Result<Vec<CalendarEntry>, GtfsError> {
    let mut entries: HashMap<ServiceId, CalendarEntry> = HashMap::new();

    if data_dir.join("calendar.txt").exists() {
        let raw: Vec<RawCalendar> = read_rows(data_dir, "calendar.txt")?;
        for (i, row) in raw.into_iter().enumerate() {
            let row_no = (i + 2) as u64; // 1-based, after header
            let service_id = ServiceId::new(row.service_id);
            let entry = CalendarEntry {
                service_id: service_id.clone(),
                weekdays: [
                    row.monday == 1,
                    row.tuesday == 1,
                    row.wednesday == 1,
                    row.thursday == 1,
                    row.friday == 1,
                    row.saturday == 1,
                    row.sunday == 1,
                ],
                start_date: parse_date("calendar.txt", row_no, &row.start_date)?,
                end_date: parse_date("calendar.txt", row_no, &row.end_date)?,
                added: BTreeSet::new(),
                removed: BTreeSet::new(),
            };
            entries.insert(service_id, entry);
        }
    } else {
        warn!("calendar.txt not present; relying on calendar_dates.txt");
    }

    if data_dir.join("calendar_dates.txt").exists() {
        let raw: Vec<RawCalendarDate> = read_rows(data_dir, "calendar_dates.txt")?;
        for (i, row) in raw.into_iter().enumerate() {
            let row_no = (i + 2) as u64;
            let date = parse_date("calendar_dates.txt", row_no, &row.date)?;
            let service_id = ServiceId::new(row.service_id);
            let entry = entries.entry(service_id.clone()).or_insert_with(|| {
                // Service defined only through explicit dates: an empty
                // weekly pattern that the exceptions extend.
                CalendarEntry {
                    service_id,
                    weekdays: [false; 7],
                    start_date: date,
                    end_date: date,
                    added: BTreeSet::new(),
                    removed: BTreeSet::new(),
                }
            });
            match row.exception_type {
                1 => {
                    entry.added.insert(date);
                }
                2 => {
                    entry.removed.insert(date);
                }
                other => {
                    return Err(GtfsError::BadRow {
                        file: "calendar_dates.txt".to_string(),
                        row: row_no,
                        message: format!("invalid exception_type {other}, expected 1 or 2"),
                    });
                }
            }
        }
    }

    let mut calendar: Vec<CalendarEntry> = entries.into_values().collect();
    calendar.sort_by(|a, b| a.service_id.cmp(&b.service_id));
    Ok(calendar)
}
