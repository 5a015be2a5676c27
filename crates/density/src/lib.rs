//! Point density accumulation for slippy-map tiles.
//!
//! A [`DensityTile`] owns a sparse grid of accumulated mass for one tile.
//! Each added point is splatted bilinearly across the four nearest cells, so
//! the grid total always equals the number of points added. [`TileSet`] routes
//! a point stream to the tiles it touches across a range of zoom levels.

pub mod grid;
pub mod tile;
pub mod tileset;

pub use grid::{DensityGrid, GridPoint};
pub use tile::{splat_weights, DensityTile};
pub use tileset::{TileSet, MAX_ZOOM};
