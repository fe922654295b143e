//! Askama templates for the web frontend.

use askama::Template;

/// Planner page with the map and search form.
#[derive(Template)]
#[template(path = "planner.html")]
pub struct PlannerTemplate {
    pub stop_count: usize,
    pub route_count: usize,
    pub trip_count: usize,
    pub center_lat: f64,
    pub center_lon: f64,
}
