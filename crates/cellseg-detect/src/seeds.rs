//! Seed detection
//!
//! Finds an intentionally over-segmented set of nucleus candidates: the
//! (optionally median filtered and background corrected) raster is
//! enhanced with a Laplacian-of-Gaussian, its regional maxima become
//! markers, and a watershed on the LoG response grows them over the
//! positive LoG area.

use crate::DetectResult;
use crate::input::DetectionInput;
use crate::params::DetectionParams;
use crate::state::{BackgroundLayers, SeedState};
use cellseg_core::{Connectivity, FloatRaster, Polygon};
use cellseg_filter::background::{open_by_reconstruction, opening_marker};
use cellseg_filter::{laplacian_of_gaussian, median_filter};
use cellseg_morph::{close, regional_maxima};
use cellseg_region::{WatershedOptions, label_connected_components, trace_labels, watershed};
use log::{debug, warn};

/// Regional maxima of the LoG closer than this to their surroundings are
/// merged with them
const LOG_MAXIMA_TOLERANCE: f32 = 0.001;

/// Run seed detection for one region
pub(crate) fn detect_seeds(
    input: &DetectionInput,
    roi: &Polygon,
    params: &DetectionParams,
) -> DetectResult<SeedState> {
    let (w, h) = input.detection.dimensions();
    let roi_mask = roi.rasterize(w, h)?;

    let mut working = if params.median_radius > 0 {
        median_filter(&input.detection, params.median_radius)?
    } else {
        input.detection.clone()
    };
    if params.exclude_dab {
        working = exclude_membrane_stain(working, input, params)?;
    }

    let background = if params.background_radius > 0 {
        let marker = opening_marker(&working, params.background_radius)?;
        let opened = open_by_reconstruction(&marker, &working)?;
        Some(BackgroundLayers { marker, opened })
    } else {
        None
    };
    let corrected = match &background {
        Some(bg) => working.sub(&bg.opened)?,
        None => working.clone(),
    };

    let log = laplacian_of_gaussian(&corrected, params.sigma)?;
    let log_mask = log.mask_above(0.0).and(&roi_mask)?;

    let maxima = regional_maxima(&log, LOG_MAXIMA_TOLERANCE, Connectivity::EightWay)?.and(&log_mask)?;
    let (markers, count) = label_connected_components(&maxima, Connectivity::FourWay)?;
    let labels = watershed(&log, &markers, Some(&log_mask), &WatershedOptions::new())?;
    let regions = trace_labels(&labels)?;
    debug!(
        "seed detection: {count} seeds, {} LoG pixels, background {}",
        log_mask.count_foreground(),
        if background.is_some() { "subtracted" } else { "off" }
    );

    Ok(SeedState {
        working,
        background,
        roi_mask,
        log,
        log_mask,
        labels,
        count,
        regions,
    })
}

/// Zero pixels where the membrane stain is at least as strong as the
/// nuclear stain
///
/// The comparison mask is closed with radius 1 to bridge single-pixel
/// gaps. Without both stain channels the raster is returned unchanged.
fn exclude_membrane_stain(
    raster: FloatRaster,
    input: &DetectionInput,
    params: &DetectionParams,
) -> DetectResult<FloatRaster> {
    let (Some(nuclear), Some(membrane)) = (
        input.channel(&params.nuclear_channel),
        input.channel(&params.membrane_channel),
    ) else {
        warn!(
            "stain exclusion requested but channels '{}' and '{}' are not both present",
            params.nuclear_channel, params.membrane_channel
        );
        return Ok(raster);
    };
    let dominated = membrane.zip_map(nuclear, |m, n| u8::from(m >= n))?;
    let dominated = close(&dominated, 1);
    debug!("stain exclusion removes {} pixels", dominated.count_foreground());
    Ok(raster.zip_map(&dominated, |v, d| if d != 0 { 0.0 } else { v })?)
}
