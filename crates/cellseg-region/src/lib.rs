//! cellseg-region - Region processing for segmentation
//!
//! This crate provides region processing functionality including:
//!
//! - **Connected component analysis** - Labeling and label housekeeping
//! - **Watershed segmentation** - Marker-controlled priority flooding
//! - **Distance transforms** - Exact Euclidean distances
//! - **Seed fill operations** - Hole filling
//! - **Boundary tracing** - Crack-following polygon extraction
//!
//! # Examples
//!
//! ## Labeling and tracing
//!
//! ```
//! use cellseg_core::{ByteRaster, Connectivity};
//! use cellseg_region::{label_connected_components, trace_labels};
//!
//! let mut mask = ByteRaster::new(10, 10).unwrap();
//! mask.set_pixel(1, 1, 1).unwrap();
//! mask.set_pixel(2, 1, 1).unwrap();
//! mask.set_pixel(7, 7, 1).unwrap();
//!
//! let (labels, count) = label_connected_components(&mask, Connectivity::FourWay).unwrap();
//! assert_eq!(count, 2);
//!
//! let polygons = trace_labels(&labels).unwrap();
//! assert_eq!(polygons[0].1.area(), 2.0);
//! ```
//!
//! ## Watershed segmentation
//!
//! ```
//! use cellseg_core::{FloatRaster, LabelRaster};
//! use cellseg_region::{WatershedOptions, watershed};
//!
//! let priority = FloatRaster::new_with_value(10, 10, 1.0).unwrap();
//! let mut markers = LabelRaster::new(10, 10).unwrap();
//! markers.set_pixel(0, 0, 1).unwrap();
//! let labels = watershed(&priority, &markers, None, &WatershedOptions::default()).unwrap();
//! assert_eq!(labels.max_label(), 1);
//! ```

pub mod distance;
pub mod error;
pub mod label;
pub mod seedfill;
pub mod trace;
pub mod watershed;

// Re-export error types
pub use error::{RegionError, RegionResult};

pub use distance::{BoundaryCondition, euclidean_distance, outward_distance};
pub use label::{
    component_sizes, label_connected_components, relabel_dense, retain_labels, separate_touching,
};
pub use seedfill::fill_holes;
pub use trace::{trace_label, trace_labels};
pub use watershed::{WatershedOptions, watershed, watershed_with_admit};
