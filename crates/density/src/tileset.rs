//! Routing a point stream to the tiles it affects across zoom levels.

use std::collections::HashMap;

use projection::{fractional_tile_coords, validate_point};
use tile_common::{DensityError, DensityResult, TileKey, TILE_SIZE};
use tracing::{debug, trace};

use crate::tile::DensityTile;

/// Deepest zoom whose tile indices still fit in `i32`.
pub const MAX_ZOOM: u32 = 30;

/// Density tiles for every zoom in `min_zoom..=max_zoom`.
///
/// Each accepted point is added to its owning tile at every zoom. With an
/// edge margin, it is also added to neighbouring tiles when it lies within
/// that many pixels of their visible area, so a smoothing kernel of the same
/// radius renders seamlessly across tile seams. Those neighbours receive the
/// point outside their visible range, which the sparse grid keeps.
#[derive(Debug)]
pub struct TileSet {
    min_zoom: u32,
    max_zoom: u32,
    edge_margin: u32,
    tiles: HashMap<TileKey, DensityTile>,
    accepted: u64,
    rejected: u64,
}

impl TileSet {
    pub fn new(min_zoom: u32, max_zoom: u32) -> DensityResult<Self> {
        if min_zoom > max_zoom || max_zoom > MAX_ZOOM {
            return Err(DensityError::InvalidZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }
        Ok(Self {
            min_zoom,
            max_zoom,
            edge_margin: 0,
            tiles: HashMap::new(),
            accepted: 0,
            rejected: 0,
        })
    }

    /// Also feed points within `pixels` of a tile's edge into that tile.
    ///
    /// Clamped to one tile width.
    pub fn with_edge_margin(mut self, pixels: u32) -> Self {
        self.edge_margin = pixels.min(TILE_SIZE);
        self
    }

    /// Route one point. Returns `false` if the point was rejected.
    ///
    /// Points with a non-finite coordinate or a latitude outside the Web
    /// Mercator range are counted and dropped instead of poisoning tiles.
    pub fn add_point(&mut self, lat: f64, lng: f64) -> bool {
        if let Err(e) = validate_point(lat, lng) {
            trace!(lat, lng, error = %e, "Rejected point");
            self.rejected += 1;
            return false;
        }

        for zoom in self.min_zoom..=self.max_zoom {
            for key in self.affected_tiles(zoom, lat, lng) {
                self.tiles
                    .entry(key)
                    .or_insert_with(|| {
                        debug!(tile = %key, "Created tile");
                        DensityTile::from_key(key)
                    })
                    .add(lat, lng);
            }
        }
        self.accepted += 1;
        true
    }

    /// Route every point of `points`, returning how many were accepted.
    pub fn extend<I>(&mut self, points: I) -> u64
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let before = self.accepted;
        for (lat, lng) in points {
            self.add_point(lat, lng);
        }
        self.accepted - before
    }

    /// The owning tile at `zoom` plus any neighbours within the edge margin.
    fn affected_tiles(&self, zoom: u32, lat: f64, lng: f64) -> Vec<TileKey> {
        let (fx, fy) = fractional_tile_coords(zoom, lat, lng);
        let owner = TileKey::new(zoom, fx.floor() as i32, fy.floor() as i32);

        if self.edge_margin == 0 {
            return vec![owner];
        }

        let size = TILE_SIZE as f64;
        let margin = self.edge_margin as f64;
        let px = (fx - fx.floor()) * size;
        let py = (fy - fy.floor()) * size;

        let neighbours = |p: f64| -> Vec<i32> {
            let mut d = vec![0];
            if p < margin {
                d.push(-1);
            }
            if p >= size - margin {
                d.push(1);
            }
            d
        };

        let mut keys = Vec::with_capacity(4);
        for dx in neighbours(px) {
            for dy in neighbours(py) {
                let key = owner.offset(dx, dy);
                // No wraparound across the antimeridian or poles
                if key.is_valid() {
                    keys.push(key);
                }
            }
        }
        keys
    }

    pub fn min_zoom(&self) -> u32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u32 {
        self.max_zoom
    }

    pub fn edge_margin(&self) -> u32 {
        self.edge_margin
    }

    pub fn get(&self, key: &TileKey) -> Option<&DensityTile> {
        self.tiles.get(key)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &DensityTile> {
        self.tiles.values()
    }

    pub fn into_tiles(self) -> Vec<DensityTile> {
        self.tiles.into_values().collect()
    }

    /// Number of tiles touched so far.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
