//! Great-circle distance primitives.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Time to walk `meters` at `speed_mps`, rounded up to whole seconds.
///
/// A non-positive speed yields zero walking time rather than a nonsense
/// negative duration.
pub fn walk_seconds(meters: f64, speed_mps: f64) -> u32 {
    if speed_mps <= 0.0 || meters <= 0.0 {
        return 0;
    }
    (meters / speed_mps).ceil() as u32
}
