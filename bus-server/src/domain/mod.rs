//! Domain types for the bus trip planner.
//!
//! This module contains the core domain model: validated GTFS records and
//! the value objects queries produce. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod error;
mod ids;
mod itinerary;
mod leg;
mod records;
mod time;

pub use error::DomainError;
pub use ids::{RouteId, ServiceId, StopId, TripId};
pub use itinerary::{Itinerary, ItineraryKey};
pub use leg::Leg;
pub use records::{CalendarEntry, Route, Stop, StopTime, Trip};
pub use time::{ServiceTime, TimeError};
