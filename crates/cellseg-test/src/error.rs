//! Error types for the test helpers

use thiserror::Error;

/// Errors that can occur while building test fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Invalid fixture description
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    /// Core raster error
    #[error("core error: {0}")]
    Core(#[from] cellseg_core::Error),
}

/// Result type for test helper operations
pub type TestResult<T> = Result<T, TestError>;
