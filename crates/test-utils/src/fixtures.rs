//! Common test fixtures for density tile tests.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::generators::LatLng;

/// Well-known locations used across tests.
pub mod places {
    use crate::generators::LatLng;

    pub const NULL_ISLAND: LatLng = (0.0, 0.0);
    pub const NEW_YORK: LatLng = (40.7128, -74.0060);
    pub const LONDON: LatLng = (51.5074, -0.1278);
    pub const SYDNEY: LatLng = (-33.8688, 151.2093);
}

/// A small point file with a header, a comment and a blank line.
pub const SAMPLE_POINTS_CSV: &str = "\
lat,lng
# downtown cluster
40.7128,-74.0060
40.7130,-74.0055

40.7125,-74.0062
51.5074,-0.1278
";

/// Render points as `lat,lng` CSV with a header line.
pub fn points_csv(points: &[LatLng]) -> String {
    let mut out = String::from("lat,lng\n");
    for (lat, lng) in points {
        out.push_str(&format!("{},{}\n", lat, lng));
    }
    out
}

/// Write `contents` to a fresh temporary file.
pub fn temp_points_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes())
        .expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_csv() {
        let csv = points_csv(&[(1.5, -2.25), places::NULL_ISLAND]);
        assert_eq!(csv, "lat,lng\n1.5,-2.25\n0,0\n");
    }

    #[test]
    fn test_temp_points_file() {
        let file = temp_points_file(SAMPLE_POINTS_CSV);
        let read = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(read, SAMPLE_POINTS_CSV);
    }
}
