//! Bus trip planner over static GTFS schedules.
//!
//! The crate loads a GTFS feed into an immutable [`index::TransitIndex`],
//! then answers trip-planning queries against it: direct rides, one-transfer
//! journeys with walking between nearby stops, and deterministic ranking of
//! the results. A small axum web layer exposes the planner on a map.

pub mod domain;
pub mod geo;
pub mod gtfs;
pub mod index;
pub mod locator;
pub mod planner;
pub mod web;
