//! Geographic footprint of a tile.

use serde::{Deserialize, Serialize};

/// A tile's geographic extent in degrees.
///
/// Always ordered so that `lat0 < lat1` and `lng0 < lng1`; `lat0` is the
/// southern edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat0: f64,
    pub lng0: f64,
    pub lat1: f64,
    pub lng1: f64,
}

impl GeoBounds {
    /// Create bounds from two arbitrary corners, reordering as needed.
    pub fn from_corners(lat_a: f64, lng_a: f64, lat_b: f64, lng_b: f64) -> Self {
        Self {
            lat0: lat_a.min(lat_b),
            lng0: lng_a.min(lng_b),
            lat1: lat_a.max(lat_b),
            lng1: lng_a.max(lng_b),
        }
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.lng1 - self.lng0
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.lat1 - self.lat0
    }

    /// Half-open containment: south/west edges inclusive.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.lat0 && lat < self.lat1 && lng >= self.lng0 && lng < self.lng1
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat0 + self.lat1) / 2.0,
            (self.lng0 + self.lng1) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_reorders() {
        let b = GeoBounds::from_corners(40.0, -73.0, 41.0, -74.0);
        assert_eq!(b.lat0, 40.0);
        assert_eq!(b.lat1, 41.0);
        assert_eq!(b.lng0, -74.0);
        assert_eq!(b.lng1, -73.0);
        assert_eq!(b.width(), 1.0);
        assert_eq!(b.height(), 1.0);
    }

    #[test]
    fn test_contains_half_open() {
        let b = GeoBounds::from_corners(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(5.0, 5.0));
        assert!(!b.contains(10.0, 5.0));
        assert!(!b.contains(5.0, 10.0));
        assert_eq!(b.center(), (5.0, 5.0));
    }
}
