//! Coordinate transformations between geographic points and slippy-map tiles.
//!
//! Implements the spherical Web Mercator tile formulas from scratch without
//! external dependencies.

pub mod mercator;

pub use mercator::{
    fractional_tile_coords, is_valid_latitude, tile_bounds, tile_coords, tile_corner,
    validate_point, MAX_LATITUDE,
};
