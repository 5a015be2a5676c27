//! Slippy-map tile addressing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge length of a rendered tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// A tile coordinate (z/x/y).
///
/// Valid indices lie in `[0, 2^zoom)` on both axes. This is not enforced:
/// neighbour lookups near the grid edge may legitimately produce keys outside
/// that range, and callers decide whether to keep them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKey {
    /// Zoom level
    pub zoom: u32,
    /// Column (x)
    pub x: i32,
    /// Row (y), 0 at the north edge
    pub y: i32,
}

impl TileKey {
    pub fn new(zoom: u32, x: i32, y: i32) -> Self {
        Self { zoom, x, y }
    }

    /// Relative output path without extension, e.g. `"3/4/2"`.
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.zoom, self.x, self.y)
    }

    /// Number of tiles along one axis at this zoom.
    pub fn tiles_per_axis(&self) -> i64 {
        1i64 << self.zoom.min(62)
    }

    /// Whether x and y fall inside `[0, 2^zoom)`.
    pub fn is_valid(&self) -> bool {
        let n = self.tiles_per_axis();
        (0..n).contains(&(self.x as i64)) && (0..n).contains(&(self.y as i64))
    }

    /// The tile offset by (dx, dy) at the same zoom.
    pub fn offset(&self, dx: i32, dy: i32) -> TileKey {
        TileKey {
            zoom: self.zoom,
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
