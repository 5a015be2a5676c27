//! Point generators for creating synthetic observation streams.
//!
//! All generators are seeded so a failing test reproduces exactly.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tile_common::GeoBounds;

/// A (lat, lng) pair in degrees.
pub type LatLng = (f64, f64);

/// Uniformly distributed points strictly inside `bounds`.
///
/// # Example
///
/// ```
/// use test_utils::random_points_in;
/// use tile_common::GeoBounds;
///
/// let bounds = GeoBounds::from_corners(40.0, -75.0, 41.0, -74.0);
/// let points = random_points_in(&bounds, 100, 1);
/// assert_eq!(points.len(), 100);
/// assert!(points.iter().all(|&(lat, lng)| bounds.contains(lat, lng)));
/// ```
pub fn random_points_in(bounds: &GeoBounds, count: usize, seed: u64) -> Vec<LatLng> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (
                rng.gen_range(bounds.lat0..bounds.lat1),
                rng.gen_range(bounds.lng0..bounds.lng1),
            )
        })
        .collect()
}

/// Points scattered around `center` within `spread` degrees on each axis.
///
/// Approximates a dense hotspot, the typical shape of real observation data.
pub fn clustered_points(center: LatLng, spread: f64, count: usize, seed: u64) -> Vec<LatLng> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            // Sum of two uniforms gives a triangular falloff from the center
            let dlat = (rng.gen::<f64>() + rng.gen::<f64>() - 1.0) * spread;
            let dlng = (rng.gen::<f64>() + rng.gen::<f64>() - 1.0) * spread;
            (center.0 + dlat, center.1 + dlng)
        })
        .collect()
}

/// Points spread over the whole valid Web Mercator area.
pub fn world_points(count: usize, seed: u64) -> Vec<LatLng> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.gen_range(-85.0..85.0), rng.gen_range(-180.0..180.0)))
        .collect()
}
