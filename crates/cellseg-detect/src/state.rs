//! Two-tier cached detector state
//!
//! [`SeedState`] holds everything derived from the seed-tier inputs and is
//! reused while its [`SeedKey`] stays equal. The refined tier caches the
//! last complete result under a [`RefinedKey`] covering every input.

use crate::DetectionResult;
use crate::input::{DetectionInput, Plane, RegionId};
use crate::params::DetectionParams;
use cellseg_core::{ByteRaster, FloatRaster, LabelRaster, Polygon};
use std::sync::Arc;

/// Inputs that determine seed detection
#[derive(Debug, Clone, PartialEq)]
pub struct SeedKey {
    /// Region identity
    pub region: RegionId,
    /// Plane of the rasters
    pub plane: Plane,
    /// Region of interest
    pub roi: Polygon,
    /// Median filter radius
    pub median_radius: u32,
    /// Background opening radius
    pub background_radius: u32,
    /// LoG sigma
    pub sigma: f32,
    /// Stain exclusion, with the nuclear and membrane channel names when on
    pub exclude_dab: Option<(String, String)>,
}

impl SeedKey {
    /// Key of a detection call
    pub fn new(input: &DetectionInput, roi: &Polygon, params: &DetectionParams) -> Self {
        Self {
            region: input.region,
            plane: input.plane,
            roi: roi.clone(),
            median_radius: params.median_radius,
            background_radius: params.background_radius,
            sigma: params.sigma,
            exclude_dab: params
                .exclude_dab
                .then(|| (params.nuclear_channel.clone(), params.membrane_channel.clone())),
        }
    }
}

/// Inputs that determine the complete result
#[derive(Debug, Clone, PartialEq)]
pub struct RefinedKey {
    /// Seed-tier inputs
    pub seed: SeedKey,
    /// Every parameter
    pub params: DetectionParams,
}

/// Background of the working raster, kept so the refined tier can redo
/// the estimate with bright-area exclusion without reopening
#[derive(Debug, Clone)]
pub struct BackgroundLayers {
    /// Minimum-filter marker of the opening
    pub marker: FloatRaster,
    /// Opened surface without exclusion
    pub opened: FloatRaster,
}

/// Output of seed detection
#[derive(Debug, Clone)]
pub struct SeedState {
    /// Median filtered, stain-excluded raster before background subtraction
    pub working: FloatRaster,
    /// Background layers; `None` when subtraction is disabled
    pub background: Option<BackgroundLayers>,
    /// Rasterized region of interest
    pub roi_mask: ByteRaster,
    /// LoG response
    pub log: FloatRaster,
    /// Coarse nucleus mask: positive LoG inside the region of interest
    pub log_mask: ByteRaster,
    /// Over-segmented seed labels
    pub labels: LabelRaster,
    /// Number of seed labels
    pub count: u32,
    /// Traced seed regions, in label order
    pub regions: Vec<(u32, Polygon)>,
}

/// Cached state of one detector
#[derive(Debug, Default)]
pub(crate) struct PipelineState {
    pub seed: Option<(SeedKey, Arc<SeedState>)>,
    pub refined: Option<(RefinedKey, DetectionResult)>,
}

impl PipelineState {
    /// Cached seeds for `key`, if still valid
    pub fn seeds_for(&self, key: &SeedKey) -> Option<Arc<SeedState>> {
        match &self.seed {
            Some((k, s)) if k == key => Some(Arc::clone(s)),
            _ => None,
        }
    }

    /// Cached result for `key`, if still valid
    pub fn result_for(&self, key: &RefinedKey) -> Option<&DetectionResult> {
        match &self.refined {
            Some((k, r)) if k == key => Some(r),
            _ => None,
        }
    }

    /// Store a completed run
    pub fn commit(&mut self, key: RefinedKey, seeds: Arc<SeedState>, result: DetectionResult) {
        self.seed = Some((key.seed.clone(), seeds));
        self.refined = Some((key, result));
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.seed = None;
        self.refined = None;
    }
}
