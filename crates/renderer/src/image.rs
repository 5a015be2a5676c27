//! RGBA pixel buffer for a rendered tile.

use tile_common::{DensityResult, TILE_SIZE};

/// Straight-alpha RGBA8 image, row-major, 4 bytes per pixel.
///
/// Row 0 is the top (north) of the tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TileImage {
    /// Fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Fully transparent `TILE_SIZE` × `TILE_SIZE` image.
    pub fn tile() -> Self {
        Self::new(TILE_SIZE, TILE_SIZE)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// RGBA at (x, y). Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Number of pixels with non-zero alpha.
    pub fn visible_pixel_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.chunks_exact(4).all(|p| p[3] == 0)
    }

    /// Encode as PNG, indexed when the palette allows it.
    pub fn to_png(&self) -> DensityResult<Vec<u8>> {
        crate::png::encode_png(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let img = TileImage::tile();
        assert_eq!(img.width(), 256);
        assert_eq!(img.height(), 256);
        assert_eq!(img.as_bytes().len(), 256 * 256 * 4);
        assert!(img.is_fully_transparent());
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut img = TileImage::new(4, 3);
        img.set_pixel(3, 2, [1, 2, 3, 4]);
        assert_eq!(img.pixel(3, 2), [1, 2, 3, 4]);
        assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(img.visible_pixel_count(), 1);
        assert_eq!(&img.as_bytes()[44..48], &[1, 2, 3, 4]);
    }
}
