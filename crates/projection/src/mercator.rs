//! Spherical Web Mercator slippy-tile projection.
//!
//! Forward: (zoom, lat, lng) -> fractional tile coordinates.
//! Inverse: (zoom, x, y) -> geographic coordinate of the tile's top-left corner.
//!
//! Latitude must lie within ±[`MAX_LATITUDE`]. Outside that range the
//! forward formula takes the logarithm of a non-positive value and the result
//! is NaN; none of the projection functions check this. Use
//! [`validate_point`] at the ingestion boundary when a strict contract is
//! wanted.

use std::f64::consts::PI;
use tile_common::{DensityError, DensityResult, GeoBounds, TileKey};

/// Latitude limit of the square Web Mercator world, `atan(sinh(π))` in degrees.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Number of tiles along one axis at `zoom`, as a float.
#[inline]
fn tiles_per_axis(zoom: u32) -> f64 {
    (zoom as f64).exp2()
}

/// Project a point to fractional tile coordinates at `zoom`.
///
/// The integer part is the tile index, the fractional part the position
/// inside the tile (x grows east, y grows south).
pub fn fractional_tile_coords(zoom: u32, lat: f64, lng: f64) -> (f64, f64) {
    let n = tiles_per_axis(zoom);
    let lat_rad = lat * PI / 180.0;

    let fx = (lng + 180.0) / 360.0 * n;
    let fy = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    (fx, fy)
}

/// Integer tile indices containing the point at `zoom`.
///
/// NaN coordinates (latitude outside the valid range) saturate to 0 when
/// cast, so the result is a real but meaningless tile.
pub fn tile_coords(zoom: u32, lat: f64, lng: f64) -> (i32, i32) {
    let (fx, fy) = fractional_tile_coords(zoom, lat, lng);
    (fx.floor() as i32, fy.floor() as i32)
}

/// Geographic coordinate (lat, lng) of the top-left corner of tile (x, y).
pub fn tile_corner(zoom: u32, x: i32, y: i32) -> (f64, f64) {
    let n = tiles_per_axis(zoom);
    let m = PI - 2.0 * PI * y as f64 / n;

    let lat = 180.0 / PI * m.sinh().atan();
    let lng = x as f64 / n * 360.0 - 180.0;

    (lat, lng)
}

/// Geographic footprint of a tile.
///
/// Evaluates [`tile_corner`] at (x, y) and (x+1, y+1) and orders the result
/// so that `lat0` is the southern edge.
pub fn tile_bounds(key: &TileKey) -> GeoBounds {
    let (lat_north, lng_west) = tile_corner(key.zoom, key.x, key.y);
    let (lat_south, lng_east) = tile_corner(key.zoom, key.x + 1, key.y + 1);
    GeoBounds::from_corners(lat_north, lng_west, lat_south, lng_east)
}

/// Whether `lat` can be projected without producing NaN.
pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && lat.abs() <= MAX_LATITUDE
}

/// Reject points the projection cannot represent.
pub fn validate_point(lat: f64, lng: f64) -> DensityResult<()> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(DensityError::NonFiniteCoordinate { lat, lng });
    }
    if lat.abs() > MAX_LATITUDE {
        return Err(DensityError::LatitudeOutOfRange(lat));
    }
    Ok(())
}
