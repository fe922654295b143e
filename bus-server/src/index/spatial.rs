//! Spatial bucket grid over stop coordinates.
//!
//! Stops are bucketed into fixed-size cells keyed by truncated lat/lon, so a
//! radius query only has to examine the cells the radius can reach instead of
//! every stop in the network. Candidates from those cells are then filtered
//! by exact haversine distance.

use std::collections::HashMap;

use crate::domain::StopId;
use crate::geo::haversine_meters;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone)]
struct GridEntry {
    stop: StopId,
    lat: f64,
    lon: f64,
}

/// A bucket grid of stop positions supporting radius queries.
#[derive(Debug, Clone)]
pub struct BucketGrid {
    cell_size_deg: f64,
    entries: Vec<GridEntry>,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl BucketGrid {
    /// Build a grid with the given cell size from `(stop, lat, lon)` triples.
    pub fn build(cell_size_deg: f64, stops: impl IntoIterator<Item = (StopId, f64, f64)>) -> Self {
        let mut grid = Self {
            cell_size_deg,
            entries: Vec::new(),
            cells: HashMap::new(),
        };
        for (stop, lat, lon) in stops {
            let key = grid.cell_key(lat, lon);
            let idx = grid.entries.len();
            grid.entries.push(GridEntry { stop, lat, lon });
            grid.cells.entry(key).or_default().push(idx);
        }
        grid
    }

    fn cell_key(&self, lat: f64, lon: f64) -> (i32, i32) {
        (
            (lat / self.cell_size_deg).floor() as i32,
            (lon / self.cell_size_deg).floor() as i32,
        )
    }

    /// All stops within `radius_meters` of `(lat, lon)`, with their exact
    /// distances. Unordered; callers sort as they see fit.
    pub fn within_radius(&self, lat: f64, lon: f64, radius_meters: f64) -> Vec<(&StopId, f64)> {
        if radius_meters <= 0.0 || self.entries.is_empty() {
            return Vec::new();
        }

        // Cell span the radius can reach. Longitude degrees shrink with
        // latitude; clamp the cosine so near-polar queries stay finite.
        let lat_span_deg = radius_meters / METERS_PER_DEGREE;
        let cos_lat = lat.to_radians().cos().abs().max(0.01);
        let lon_span_deg = radius_meters / (METERS_PER_DEGREE * cos_lat);

        let (min_row, min_col) = self.cell_key(lat - lat_span_deg, lon - lon_span_deg);
        let (max_row, max_col) = self.cell_key(lat + lat_span_deg, lon + lon_span_deg);

        let mut results = Vec::new();
        let rows = i64::from(max_row) - i64::from(min_row) + 1;
        let cols = i64::from(max_col) - i64::from(min_col) + 1;
        if rows.saturating_mul(cols) > self.cells.len() as i64 {
            // The radius covers more cells than exist; scan the occupied ones
            for indices in self.cells.values() {
                self.push_matching(indices, lat, lon, radius_meters, &mut results);
            }
        } else {
            for row in min_row..=max_row {
                for col in min_col..=max_col {
                    if let Some(indices) = self.cells.get(&(row, col)) {
                        self.push_matching(indices, lat, lon, radius_meters, &mut results);
                    }
                }
            }
        }
        results
    }

    fn push_matching<'a>(
        &'a self,
        indices: &[usize],
        lat: f64,
        lon: f64,
        radius_meters: f64,
        results: &mut Vec<(&'a StopId, f64)>,
    ) {
        for &idx in indices {
            let entry = &self.entries[idx];
            let dist = haversine_meters(lat, lon, entry.lat, entry.lon);
            if dist <= radius_meters {
                results.push((&entry.stop, dist));
            }
        }
    }

    /// Number of stops in the grid.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
