//! Common types shared across the density tile crates.

pub mod bounds;
pub mod error;
pub mod tile;

pub use bounds::GeoBounds;
pub use error::{DensityError, DensityResult};
pub use tile::{TileKey, TILE_SIZE};
