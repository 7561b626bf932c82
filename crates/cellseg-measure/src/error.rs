//! Error types for cellseg-measure

use thiserror::Error;

/// Errors that can occur while measuring objects
#[derive(Debug, Error)]
pub enum MeasureError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] cellseg_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for measurement operations
pub type MeasureResult<T> = Result<T, MeasureError>;
