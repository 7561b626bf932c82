//! cellseg-detect - Watershed nucleus and cell detection
//!
//! Detects nuclei in a single-channel detection raster and optionally
//! grows them into cells:
//!
//! - Seeds from a Laplacian-of-Gaussian with marker-controlled watershed
//!   over background-corrected intensities
//! - Intensity thresholding, merging and split-by-shape of the seeds
//! - Boundary refinement and area pruning
//! - Distance-limited cell expansion ([`ExpansionPolicy`])
//! - Per-compartment channel statistics and shape measurements
//! - Optional positive-cell classification
//!
//! A [`CellDetector`] keeps two tiers of cached state so that changing
//! parameters of the later stages does not rerun seed detection.
//!
//! # Example
//!
//! ```
//! use cellseg_core::FloatRaster;
//! use cellseg_detect::{CellDetector, DetectionInput, DetectionParams, RegionId};
//!
//! let raster = FloatRaster::new(32, 32).unwrap();
//! let input = DetectionInput::new(RegionId(7), raster).with_full_roi();
//! let mut detector = CellDetector::new();
//! let result = detector.detect(&input, &DetectionParams::default()).unwrap();
//! assert!(result.is_empty());
//! assert_eq!(result.summary, "0 cells detected");
//! ```

mod assembly;
pub mod cancel;
pub mod classify;
mod compartments;
mod detector;
mod error;
pub mod expansion;
pub mod input;
mod nuclei;
pub mod object;
pub mod params;
mod seeds;
pub mod state;

pub use cancel::{CancelToken, Interruption, NoInterruption, Stage};
pub use classify::{CellClass, ClassificationSummary, PositivityParams};
pub use detector::{CellDetector, DetectionResult};
pub use error::{DetectError, DetectResult};
pub use expansion::{ExpansionPolicy, SizeLimited, Unconstrained};
pub use input::{DetectionInput, Plane, RegionId};
pub use object::{CellObject, NucleusObject, ObjectKind};
pub use params::{DetectionParams, ExpansionMode, MembraneMeasurement};
