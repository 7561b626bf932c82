//! Background estimation by opening-by-reconstruction
//!
//! The background surface is a grayscale opening: a circular minimum
//! filter of radius `r` removes every bright structure narrower than the
//! window, and reconstruction-by-dilation under the original raster
//! restores the smooth parts of the surface the minimum filter lowered.
//!
//! Very bright areas (above a maximum background level) would otherwise
//! lift the estimate around them. Such areas are found on the opened
//! surface, grown by `2r`, and their marker values forced to negative
//! infinity before a second reconstruction, so they inherit the
//! background of their surroundings instead.
//!
//! # Example
//!
//! ```
//! use cellseg_core::FloatRaster;
//! use cellseg_filter::background::estimate_background;
//!
//! let raster = FloatRaster::new_with_value(32, 32, 0.2).unwrap();
//! let estimate = estimate_background(&raster, 4, None).unwrap();
//! assert!(estimate.exclusion.is_none());
//! let corrected = estimate.subtract_from(&raster).unwrap();
//! assert!(corrected.data().iter().all(|v| v.abs() < 1e-6));
//! ```

use crate::rank::min_filter;
use crate::{FilterError, FilterResult};
use cellseg_core::{ByteRaster, Connectivity, FloatRaster};
use cellseg_morph::{dilate, reconstruct_by_dilation};

/// Estimated background surface
#[derive(Debug, Clone)]
pub struct BackgroundEstimate {
    /// Background level per pixel (always finite)
    pub background: FloatRaster,
    /// Pixels excluded from estimation because they were too bright;
    /// `None` when no maximum background level was applied
    pub exclusion: Option<ByteRaster>,
}

impl BackgroundEstimate {
    /// Subtract the background from `raster`
    pub fn subtract_from(&self, raster: &FloatRaster) -> FilterResult<FloatRaster> {
        Ok(raster.sub(&self.background)?)
    }
}

/// Minimum-filter marker for the opening
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` for a zero radius.
pub fn opening_marker(raster: &FloatRaster, radius: u32) -> FilterResult<FloatRaster> {
    if radius == 0 {
        return Err(FilterError::InvalidParameters(
            "background radius must be positive".to_string(),
        ));
    }
    Ok(min_filter(raster, radius))
}

/// Opening-by-reconstruction from a precomputed marker
pub fn open_by_reconstruction(
    marker: &FloatRaster,
    raster: &FloatRaster,
) -> FilterResult<FloatRaster> {
    Ok(reconstruct_by_dilation(marker, raster, Connectivity::EightWay)?)
}

/// Mask of pixels whose opened value exceeds `max_background`, dilated
/// by `2 * radius`
pub fn exclusion_mask(opened: &FloatRaster, max_background: f32, radius: u32) -> ByteRaster {
    dilate(&opened.mask_above(max_background), 2 * radius)
}

/// Reconstruct the background with the excluded pixels removed from the
/// marker
///
/// Excluded pixels that no finite marker can reach fall back to their own
/// raster value, i.e. contribute nothing after subtraction.
pub fn reconstruct_excluding(
    marker: &FloatRaster,
    raster: &FloatRaster,
    exclusion: &ByteRaster,
) -> FilterResult<FloatRaster> {
    let masked = marker.zip_map(exclusion, |v, e| if e != 0 { f32::NEG_INFINITY } else { v })?;
    let background = reconstruct_by_dilation(&masked, raster, Connectivity::EightWay)?;
    Ok(background.replace_non_finite(raster)?)
}

/// Estimate the background of a raster
///
/// # Arguments
///
/// * `raster` - Input intensities
/// * `radius` - Opening radius (must be > 0)
/// * `max_background` - Optional maximum background level; ignored unless
///   finite and positive
pub fn estimate_background(
    raster: &FloatRaster,
    radius: u32,
    max_background: Option<f32>,
) -> FilterResult<BackgroundEstimate> {
    let marker = opening_marker(raster, radius)?;
    let opened = open_by_reconstruction(&marker, raster)?;
    estimate_from_opening(&marker, &opened, raster, radius, max_background)
}

/// Finish a background estimate from an opening computed earlier
///
/// `marker` and `opened` must come from [`opening_marker`] and
/// [`open_by_reconstruction`] of `raster` with the same `radius`. Lets a
/// caller keep the opening and only redo the bright-area exclusion when
/// `max_background` changes.
pub fn estimate_from_opening(
    marker: &FloatRaster,
    opened: &FloatRaster,
    raster: &FloatRaster,
    radius: u32,
    max_background: Option<f32>,
) -> FilterResult<BackgroundEstimate> {
    let plain = || BackgroundEstimate {
        background: opened.clone(),
        exclusion: None,
    };
    let Some(max_bg) = max_background.filter(|m| m.is_finite() && *m > 0.0) else {
        return Ok(plain());
    };
    let exclusion = exclusion_mask(opened, max_bg, radius);
    if exclusion.is_all_background() {
        return Ok(plain());
    }
    let background = reconstruct_excluding(marker, raster, &exclusion)?;
    Ok(BackgroundEstimate {
        background,
        exclusion: Some(exclusion),
    })
}
