//! Planner configuration.

/// Tunable parameters for a trip-planning query.
///
/// Passed explicitly into every query; there is no process-wide
/// configuration state.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// How far from the origin point to look for boarding stops.
    pub origin_radius_meters: f64,
    /// How far from the destination point to look for alighting stops.
    pub destination_radius_meters: f64,
    /// How far a rider will walk between stops at a transfer.
    pub transfer_radius_meters: f64,
    /// Minimum connection time at a transfer, before walking time.
    pub min_transfer_seconds: u32,
    /// Fan-out limit K: earliest departures considered per route-direction
    /// when expanding first legs of a transfer search.
    pub max_departures_per_direction: usize,
    /// Number of itineraries to return.
    pub max_results: usize,
    /// Walking speed used to convert walk distances to time.
    pub walking_speed_mps: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            origin_radius_meters: 750.0,
            destination_radius_meters: 750.0,
            transfer_radius_meters: 300.0,
            min_transfer_seconds: 300,
            max_departures_per_direction: 3,
            max_results: 5,
            walking_speed_mps: 1.4,
        }
    }
}
