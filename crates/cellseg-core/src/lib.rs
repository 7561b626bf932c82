//! Cellseg Core - Basic data structures for cell segmentation
//!
//! This crate provides the fundamental data structures used throughout
//! the segmentation library:
//!
//! - [`Raster`] - Row-major 2D grid, instantiated as [`FloatRaster`],
//!   [`ByteRaster`] (binary masks) and [`LabelRaster`] (region labels)
//! - [`ChannelSet`] - Ordered set of named intensity channels
//! - [`Polygon`] / [`Point`] - Closed boundaries in raster coordinates
//! - [`Connectivity`] - 4-way / 8-way pixel neighbourhoods
//! - [`window`] - Circular windows and sliding extrema shared by rank
//!   filters and binary morphology

pub mod channel;
pub mod connectivity;
pub mod error;
pub mod polygon;
pub mod raster;
pub mod window;

pub use channel::ChannelSet;
pub use connectivity::Connectivity;
pub use error::{Error, Result};
pub use polygon::hull::convex_hull;
pub use polygon::smooth::{interpolate, simplify, smooth, smooth_boundary};
pub use polygon::{Bounds, Point, Polygon};
pub use raster::{ByteRaster, FloatRaster, LabelRaster, Raster};
