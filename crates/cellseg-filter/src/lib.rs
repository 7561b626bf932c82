//! cellseg-filter - Filtering operations for segmentation
//!
//! This crate provides filtering operations including:
//!
//! - Convolution with arbitrary kernels and separable Gaussian blur
//! - Rank filtering (median, min, max) over circular windows
//! - Laplacian-of-Gaussian blob enhancement
//! - Background estimation by opening-by-reconstruction, with optional
//!   exclusion of very bright areas

pub mod background;
pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;
pub mod rank;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use background::{BackgroundEstimate, estimate_background, estimate_from_opening};
pub use convolve::{convolve, convolve_sep, gaussian_blur};
pub use edge::laplacian_of_gaussian;
pub use rank::{max_filter, median_filter, min_filter};
