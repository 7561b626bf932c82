//! cellseg - Watershed nucleus and cell segmentation
//!
//! Detects nuclei in a single-channel microscopy raster, optionally
//! expands them into cells, and measures shape and intensity features
//! per compartment.
//!
//! # Overview
//!
//! - Rasters, channels and polygons (re-exported at the crate root)
//! - Grayscale and binary morphology, reconstruction and regional maxima
//! - Labelling, watershed, distance transforms and contour tracing
//! - Gaussian, Laplacian-of-Gaussian, rank filters and background estimation
//! - Shape and intensity measurements
//! - The cached, interruptible detection pipeline
//!
//! # Example
//!
//! ```
//! use cellseg::detect::{CellDetector, DetectionInput, DetectionParams, RegionId};
//! use cellseg::FloatRaster;
//!
//! let raster = FloatRaster::new(64, 64).unwrap();
//! let input = DetectionInput::new(RegionId(0), raster).with_full_roi();
//! let mut detector = CellDetector::new();
//! let result = detector.detect(&input, &DetectionParams::default()).unwrap();
//! assert!(result.is_empty());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use cellseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use cellseg_detect as detect;
pub use cellseg_filter as filter;
pub use cellseg_measure as measure;
pub use cellseg_morph as morph;
pub use cellseg_region as region;
