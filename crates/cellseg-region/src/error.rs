//! Error types for cellseg-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] cellseg_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Segmentation error
    #[error("segmentation error: {0}")]
    SegmentationError(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
