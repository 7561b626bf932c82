//! cellseg-test - Regression test helpers for cellseg
//!
//! This crate provides a small regression harness and synthetic raster
//! generators shared by the `tests/*_reg.rs` files of every crate:
//!
//! - [`RegParams`] - Accumulates value/raster comparisons and reports all
//!   failures at the end of a test instead of stopping at the first one
//! - [`gaussian_blobs`] / [`disk_mask`] - Deterministic synthetic inputs
//!
//! # Usage
//!
//! ```ignore
//! use cellseg_test::RegParams;
//!
//! let mut rp = RegParams::new("label");
//! rp.compare_values(2.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;
mod synthetic;

pub use error::{TestError, TestResult};
pub use params::RegParams;
pub use synthetic::{Blob, disk_mask, gaussian_blobs, two_blob_raster};
