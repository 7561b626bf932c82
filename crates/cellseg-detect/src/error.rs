//! Error types for cellseg-detect

use thiserror::Error;

/// Errors that can occur during cell detection
#[derive(Debug, Error)]
pub enum DetectError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] cellseg_core::Error),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] cellseg_morph::MorphError),

    /// Region analysis error
    #[error("region error: {0}")]
    Region(#[from] cellseg_region::RegionError),

    /// Filtering error
    #[error("filter error: {0}")]
    Filter(#[from] cellseg_filter::FilterError),

    /// Measurement error
    #[error("measurement error: {0}")]
    Measure(#[from] cellseg_measure::MeasureError),

    /// No region of interest was supplied
    #[error("a region of interest is required for detection")]
    MissingRoi,

    /// Input rasters or channels are inconsistent
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Parameter validation failed
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Parameters could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for detection operations
pub type DetectResult<T> = Result<T, DetectError>;
