//! Error types for density tile ingestion, rendering and output.

use thiserror::Error;

/// Result type alias using DensityError.
pub type DensityResult<T> = Result<T, DensityError>;

/// Primary error type for the fallible edges of the pipeline.
///
/// The numeric core (projection, accumulation, rendering) never returns
/// errors; these variants cover validation, parsing and encoding.
#[derive(Debug, Error)]
pub enum DensityError {
    // === Input Errors ===
    #[error("Latitude {0} is outside the Web Mercator range (±85.0511°)")]
    LatitudeOutOfRange(f64),

    #[error("Non-finite coordinate: lat={lat}, lng={lng}")]
    NonFiniteCoordinate { lat: f64, lng: f64 },

    #[error("Invalid zoom range: {min}..={max}")]
    InvalidZoomRange { min: u32, max: u32 },

    #[error("Failed to parse line {line}: {message}")]
    Parse { line: usize, message: String },

    // === Rendering Errors ===
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DensityError {
    /// Whether the error concerns a single input record and can be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DensityError::LatitudeOutOfRange(_)
                | DensityError::NonFiniteCoordinate { .. }
                | DensityError::Parse { .. }
        )
    }
}
