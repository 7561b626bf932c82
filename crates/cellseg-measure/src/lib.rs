//! cellseg-measure - Object measurements
//!
//! This crate provides:
//!
//! - [`RunningStats`]: single-pass mean, spread and extremes
//! - Per-label and per-boundary statistics over label rasters
//! - [`ShapeMeasurements`]: area, perimeter, circularity, calipers and
//!   eccentricity of polygon boundaries
//! - [`MeasurementList`]: ordered named measurements attached to objects
//!
//! # Example
//!
//! ```
//! use cellseg_core::Polygon;
//! use cellseg_measure::{Compartment, MeasurementList, ShapeMeasurements};
//!
//! let shape = ShapeMeasurements::from_polygon(&Polygon::rectangle(0.0, 0.0, 3.0, 3.0));
//! let mut builder = MeasurementList::builder();
//! builder.add_shape(Compartment::Nucleus, &shape);
//! let list = builder.build();
//! assert_eq!(list.get("Nucleus: Area"), Some(9.0));
//! ```

mod error;
pub mod label_stats;
pub mod measurement;
pub mod shape;
pub mod stats;

pub use error::{MeasureError, MeasureResult};
pub use label_stats::{BoundaryAssignment, boundary_statistics, label_statistics};
pub use measurement::{
    Compartment, MeasurementList, MeasurementListBuilder, NUCLEUS_CELL_AREA_RATIO,
};
pub use shape::ShapeMeasurements;
pub use stats::RunningStats;
