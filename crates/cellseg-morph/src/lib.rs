//! cellseg-morph - Morphological operations for segmentation
//!
//! This crate provides:
//!
//! - Binary morphology with circular structuring elements: erosion,
//!   dilation, opening, closing
//! - Grayscale reconstruction-by-dilation on float rasters
//! - Regional maxima extraction with a height tolerance

pub mod binary;
mod error;
pub mod maxima;
pub mod reconstruct;

pub use error::{MorphError, MorphResult};

pub use binary::{close, dilate, erode, open};
pub use maxima::regional_maxima;
pub use reconstruct::reconstruct_by_dilation;
