//! Per-tile density accumulation.

use projection::{tile_bounds, validate_point};
use tile_common::{DensityResult, GeoBounds, TileKey, TILE_SIZE};

use crate::grid::{DensityGrid, GridPoint};

/// Cell offsets matching the order of [`splat_weights`].
const SPLAT_OFFSETS: [(i64, i64); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

/// Bilinear splat weights for fractional offsets `fu`, `fv` in `[0, 1)`.
///
/// Returned in the order (0,0), (0,1), (1,0), (1,1). The four weights sum
/// to 1, so every point contributes exactly unit mass.
#[inline]
pub fn splat_weights(fu: f64, fv: f64) -> [f64; 4] {
    [
        (1.0 - fu) * (1.0 - fv),
        (1.0 - fu) * fv,
        fu * (1.0 - fv),
        fu * fv,
    ]
}

/// Density accumulated for one (zoom, x, y) tile.
///
/// Local grid coordinates run east along x and north along y, with the
/// south-west corner of the tile at (0, 0).
#[derive(Debug, Clone)]
pub struct DensityTile {
    key: TileKey,
    bounds: GeoBounds,
    grid: DensityGrid,
    points: u64,
}

impl DensityTile {
    pub fn new(zoom: u32, x: i32, y: i32) -> Self {
        Self::from_key(TileKey::new(zoom, x, y))
    }

    pub fn from_key(key: TileKey) -> Self {
        Self {
            key,
            bounds: tile_bounds(&key),
            grid: DensityGrid::new(),
            points: 0,
        }
    }

    pub fn key(&self) -> TileKey {
        self.key
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn grid(&self) -> &DensityGrid {
        &self.grid
    }

    /// Number of points added so far.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Continuous local pixel coordinates (u, v) of a point.
    ///
    /// Linear in degrees across the tile. Points outside the tile map
    /// outside `[0, TILE_SIZE)`.
    pub fn local_coords(&self, lat: f64, lng: f64) -> (f64, f64) {
        let size = TILE_SIZE as f64;
        let u = (lng - self.bounds.lng0) / (self.bounds.lng1 - self.bounds.lng0) * size;
        let v = (lat - self.bounds.lat0) / (self.bounds.lat1 - self.bounds.lat0) * size;
        (u, v)
    }

    /// Splat one point of unit mass into the grid.
    ///
    /// No bounds checking: a point outside the tile still lands in cells
    /// outside the visible area. A NaN coordinate poisons the cells it
    /// reaches; use [`DensityTile::try_add`] to reject such input.
    pub fn add(&mut self, lat: f64, lng: f64) {
        let (u, v) = self.local_coords(lat, lng);
        let (ix, iy) = (u.floor(), v.floor());
        let weights = splat_weights(u - ix, v - iy);

        // Saturates only far beyond any usable zoom
        let (x, y) = (ix as i64, iy as i64);
        for (&(dx, dy), weight) in SPLAT_OFFSETS.iter().zip(weights) {
            let cell = GridPoint::new(x.saturating_add(dx), y.saturating_add(dy));
            self.grid.accumulate(cell, weight);
        }
        self.points += 1;
    }

    /// Validate the point, then [`add`](DensityTile::add) it.
    pub fn try_add(&mut self, lat: f64, lng: f64) -> DensityResult<()> {
        validate_point(lat, lng)?;
        self.add(lat, lng);
        Ok(())
    }

    /// Whether any mass landed inside the visible area.
    pub fn has_visible_mass(&self) -> bool {
        self.grid
            .iter()
            .any(|(p, w)| w > 0.0 && p.is_visible(TILE_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_common::DensityError;

    #[test]
    fn test_splat_weights_sum_to_one() {
        for &(fu, fv) in &[(0.0, 0.0), (0.5, 0.5), (0.25, 0.75), (0.999, 0.001)] {
            let w = splat_weights(fu, fv);
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "fu={} fv={} sum={}", fu, fv, sum);
            assert!(w.iter().all(|&x| x >= 0.0));
        }
    }

    #[test]
    fn test_new_tile_is_empty() {
        let tile = DensityTile::new(0, 0, 0);
        assert_eq!(tile.points(), 0);
        assert!(tile.grid().is_empty());
        assert_eq!(tile.key(), TileKey::new(0, 0, 0));
    }

    #[test]
    fn test_origin_lands_in_center() {
        let mut tile = DensityTile::new(0, 0, 0);
        let (u, v) = tile.local_coords(0.0, 0.0);
        assert!((u - 128.0).abs() < 1e-9);
        assert!((v - 128.0).abs() < 1e-9);

        tile.add(0.0, 0.0);
        assert_eq!(tile.points(), 1);
        assert!((tile.grid().total() - 1.0).abs() < 1e-12);
        assert!(tile.has_visible_mass());
    }

    #[test]
    fn test_exact_cell_gets_all_mass() {
        let mut tile = DensityTile::new(0, 0, 0);
        // lng = -180 + 10 * 360/256 puts u exactly on cell 10
        let lng = -180.0 + 10.0 * 360.0 / 256.0;
        tile.add(0.0, lng);

        let (u, _) = tile.local_coords(0.0, lng);
        assert!((u - 10.0).abs() < 1e-9);
        let total_col: f64 = tile
            .grid()
            .iter()
            .filter(|(p, _)| p.x == 10)
            .map(|(_, w)| w)
            .sum();
        assert!(total_col > 0.999);
    }

    #[test]
    fn test_point_outside_tile_is_kept() {
        let mut tile = DensityTile::new(1, 0, 0);
        // South-east quadrant point added to the north-west tile
        tile.add(-40.0, 100.0);

        assert_eq!(tile.points(), 1);
        assert!((tile.grid().total() - 1.0).abs() < 1e-12);
        assert!(!tile.has_visible_mass());
    }

    #[test]
    fn test_far_point_at_deep_zoom() {
        // Opposite side of the world from a zoom-24 tile: u is about 2^32
        let mut tile = DensityTile::new(24, 0, 0);
        tile.add(0.0, 179.0);

        assert_eq!(tile.points(), 1);
        assert!((tile.grid().total() - 1.0).abs() < 1e-9);
        assert!(!tile.has_visible_mass());
        let min_x = tile.grid().iter().map(|(p, _)| p.x).min().unwrap();
        assert!(min_x > i32::MAX as i64, "mass landed at x = {}", min_x);
    }

    #[test]
    fn test_try_add_rejects_invalid_latitude() {
        let mut tile = DensityTile::new(2, 1, 1);
        let err = tile.try_add(88.0, 0.0).unwrap_err();
        assert!(matches!(err, DensityError::LatitudeOutOfRange(_)));
        assert_eq!(tile.points(), 0);
        assert!(tile.grid().is_empty());

        tile.try_add(10.0, 10.0).unwrap();
        assert_eq!(tile.points(), 1);
    }
}
