//! Density tiler
//!
//! Reads a stream of `lat,lng` points, accumulates them into density tiles
//! over a range of zoom levels and writes every tile with visible output as
//! a PNG in a `{z}/{x}/{y}.png` tree.

pub mod config;
pub mod pipeline;
pub mod points;

pub use config::TilerConfig;
pub use pipeline::{run, RunSummary, TileRecord};
pub use points::PointReader;
