//! GTFS feed loading.
//!
//! Turns the static GTFS text tables on disk into structured records for
//! index construction. This is the input boundary of the system: everything
//! downstream works on the records produced here.

mod error;
mod loader;

pub use error::GtfsError;
pub use loader::{Feed, StopTimeRow, load_feed};
