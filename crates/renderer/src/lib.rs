//! Heatmap rendering for density tiles.
//!
//! Implements:
//! - Convolution kernels (radial, Gaussian, explicit)
//! - Kernel-smoothed, tone-mapped, colour-mapped tile rendering
//! - PNG encoding (indexed and RGBA)

pub mod color;
pub mod heatmap;
pub mod image;
pub mod kernel;
pub mod png;

pub use heatmap::render;
pub use image::TileImage;
pub use kernel::{Kernel, KernelEntry, KernelSpec};
