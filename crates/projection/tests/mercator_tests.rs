//! Tests for the Web Mercator tile projection.

use projection::{fractional_tile_coords, tile_bounds, tile_coords, tile_corner};
use rand::{rngs::StdRng, Rng, SeedableRng};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};
use tile_common::TileKey;

// ============================================================================
// Round-trip tests
// ============================================================================

#[test]
fn test_corner_projects_back_to_tile_origin() {
    let mut rng = StdRng::seed_from_u64(42);

    for zoom in 0..=18u32 {
        let n = 1i32 << zoom;
        for _ in 0..20 {
            let x = rng.gen_range(0..n);
            let y = rng.gen_range(0..n);

            let (lat, lng) = tile_corner(zoom, x, y);
            let (fx, fy) = fractional_tile_coords(zoom, lat, lng);

            assert_coords_approx_eq!((fx, fy), (x as f64, y as f64), 1e-6);
        }
    }
}

#[test]
fn test_tile_center_recovers_indices() {
    let mut rng = StdRng::seed_from_u64(7);

    for zoom in 0..=20u32 {
        let n = 1i32 << zoom;
        for _ in 0..20 {
            let key = TileKey::new(zoom, rng.gen_range(0..n), rng.gen_range(0..n));
            let (lat, lng) = tile_bounds(&key).center();
            assert_eq!(tile_coords(zoom, lat, lng), (key.x, key.y), "tile {}", key);
        }
    }
}

// ============================================================================
// Bounds tests
// ============================================================================

#[test]
fn test_bounds_are_ordered() {
    for key in [
        TileKey::new(0, 0, 0),
        TileKey::new(1, 0, 0),
        TileKey::new(1, 1, 1),
        TileKey::new(12, 1205, 1539),
    ] {
        let b = tile_bounds(&key);
        assert!(b.lat0 < b.lat1, "{}: {:?}", key, b);
        assert!(b.lng0 < b.lng1, "{}: {:?}", key, b);
    }
}

#[test]
fn test_zoom_one_quadrants() {
    // Tile 1/0/0 is the north-west quadrant.
    let b = tile_bounds(&TileKey::new(1, 0, 0));
    assert_approx_eq!(b.lng0, -180.0, 1e-9);
    assert_approx_eq!(b.lng1, 0.0, 1e-9);
    assert_approx_eq!(b.lat0, 0.0, 1e-9);
    assert_approx_eq!(b.lat1, 85.0511, 1e-3);

    // Tile 1/1/1 is the south-east quadrant.
    let b = tile_bounds(&TileKey::new(1, 1, 1));
    assert_approx_eq!(b.lng0, 0.0, 1e-9);
    assert_approx_eq!(b.lng1, 180.0, 1e-9);
    assert_approx_eq!(b.lat0, -85.0511, 1e-3);
    assert_approx_eq!(b.lat1, 0.0, 1e-9);
}

#[test]
fn test_adjacent_tiles_share_edges() {
    let a = tile_bounds(&TileKey::new(6, 20, 30));
    let east = tile_bounds(&TileKey::new(6, 21, 30));
    let south = tile_bounds(&TileKey::new(6, 20, 31));

    assert_eq!(a.lng1, east.lng0);
    assert_eq!(a.lat0, south.lat1);
}

// ============================================================================
// Forward projection tests
// ============================================================================

#[test]
fn test_longitude_is_linear() {
    let (fx, _) = fractional_tile_coords(2, 0.0, -180.0);
    assert_eq!(fx, 0.0);
    let (fx, _) = fractional_tile_coords(2, 0.0, 90.0);
    assert_eq!(fx, 3.0);
}

#[test]
fn test_northern_points_have_smaller_y() {
    let (_, fy_north) = fractional_tile_coords(5, 60.0, 0.0);
    let (_, fy_south) = fractional_tile_coords(5, -60.0, 0.0);
    assert!(fy_north < 16.0);
    assert!(fy_south > 16.0);
    assert_approx_eq!(fy_north + fy_south, 32.0, 1e-9);
}
