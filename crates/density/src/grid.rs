//! Sparse accumulation grid in a tile's local pixel space.

use std::collections::HashMap;

/// A cell address in local pixel space.
///
/// Addresses may fall outside `[0, TILE_SIZE)`: splatting a point near the
/// tile edge writes one cell past the boundary, and points routed from a
/// neighbouring tile land further out still. A point on the far side of the
/// world from a deep-zoom tile lands around `2^(zoom + 8)` cells away, so
/// coordinates are 64-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Whether the cell lies inside a `size` × `size` visible area.
    pub fn is_visible(&self, size: u32) -> bool {
        let size = size as i64;
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

/// Accumulated non-negative weight per cell.
///
/// Absent cells read as zero. Weights only ever grow; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct DensityGrid {
    cells: HashMap<GridPoint, f64>,
}

impl DensityGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight at `point`, zero when nothing was accumulated there.
    #[inline]
    pub fn get(&self, point: GridPoint) -> f64 {
        self.cells.get(&point).copied().unwrap_or(0.0)
    }

    /// Add `weight` to the cell at `point`.
    #[inline]
    pub fn accumulate(&mut self, point: GridPoint, weight: f64) {
        *self.cells.entry(point).or_insert(0.0) += weight;
    }

    /// Sum of all cell weights, including cells outside the visible area.
    pub fn total(&self) -> f64 {
        self.cells.values().sum()
    }

    /// Number of cells that have been written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, f64)> + '_ {
        self.cells.iter().map(|(p, w)| (*p, *w))
    }
}
