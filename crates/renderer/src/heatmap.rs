//! Heatmap rendering of an accumulated density tile.

use density::{DensityGrid, DensityTile, GridPoint};
use rayon::prelude::*;
use tile_common::TILE_SIZE;
use tracing::debug;

use crate::color::{density_color, tone_map};
use crate::image::TileImage;
use crate::kernel::Kernel;

/// Render `tile` into a `TILE_SIZE` × `TILE_SIZE` RGBA image.
///
/// Each pixel is the kernel-weighted sum of the grid around it, scaled by
/// `scale / total_weight`, passed through the saturating tone curve and
/// coloured by [`density_color`]. Pixels whose sum is exactly zero stay
/// transparent.
///
/// Returns the image and whether any pixel received colour, so callers can
/// skip persisting empty tiles. Rendering never fails: absent grid cells read
/// as zero, and an empty kernel yields a transparent image.
pub fn render(tile: &DensityTile, kernel: &Kernel, scale: f64) -> (TileImage, bool) {
    let size = TILE_SIZE as usize;
    let total_weight = kernel.total_weight();
    let grid = tile.grid();

    let mut image = TileImage::tile();
    let visible = image
        .pixels_mut()
        .par_chunks_mut(size * 4)
        .enumerate()
        .map(|(row, pixels)| {
            // Grid y grows northwards, image rows grow southwards
            let y = (size - 1 - row) as i64;
            render_row(grid, kernel, y, scale, total_weight, pixels)
        })
        .reduce(|| false, |a, b| a || b);

    debug!(
        tile = %tile.key(),
        points = tile.points(),
        kernel_entries = kernel.len(),
        visible,
        "Rendered tile"
    );

    (image, visible)
}

/// Fill one image row from grid row `y`. Returns whether anything was drawn.
fn render_row(
    grid: &DensityGrid,
    kernel: &Kernel,
    y: i64,
    scale: f64,
    total_weight: f64,
    pixels: &mut [u8],
) -> bool {
    let mut visible = false;

    for (x, px) in pixels.chunks_exact_mut(4).enumerate() {
        let x = x as i64;
        let t: f64 = kernel
            .entries()
            .iter()
            .map(|e| grid.get(GridPoint::new(x + e.dx as i64, y + e.dy as i64)) * e.weight)
            .sum();

        if t == 0.0 {
            continue;
        }
        visible = true;

        let t = tone_map(t * scale / total_weight);
        px.copy_from_slice(&density_color(t));
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelEntry;

    #[test]
    fn test_empty_tile_is_transparent() {
        let tile = DensityTile::new(3, 4, 2);
        let (img, visible) = render(&tile, &Kernel::radial(4), 1.0);
        assert!(!visible);
        assert!(img.is_fully_transparent());
    }

    #[test]
    fn test_empty_kernel_is_transparent() {
        let mut tile = DensityTile::new(0, 0, 0);
        tile.add(0.0, 0.0);
        let (img, visible) = render(&tile, &Kernel::default(), 1.0);
        assert!(!visible);
        assert!(img.is_fully_transparent());
    }

    #[test]
    fn test_vertical_flip() {
        // lng/lat chosen so the whole unit lands in grid cell (0, 0)
        let mut tile = DensityTile::new(0, 0, 0);
        let b = *tile.bounds();
        tile.add(b.lat0, b.lng0);

        let (img, visible) = render(&tile, &Kernel::identity(), 1.0);
        assert!(visible);
        assert_eq!(img.visible_pixel_count(), 1);
        // South-west cell is the bottom-left pixel
        assert_eq!(img.pixel(0, TILE_SIZE - 1), density_color(0.5));
    }

    #[test]
    fn test_offset_kernel_shifts_output() {
        let mut tile = DensityTile::new(0, 0, 0);
        let b = *tile.bounds();
        tile.add(b.lat0, b.lng0);

        // Pixel (x, y) samples grid (x + 1, y): only x = -1 would see the mass
        let kernel = Kernel::new(vec![KernelEntry::new(1, 0, 1.0)]);
        let (img, visible) = render(&tile, &kernel, 1.0);
        assert!(!visible);
        assert!(img.is_fully_transparent());
    }
}
