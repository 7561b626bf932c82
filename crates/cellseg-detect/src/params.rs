//! Parameter types configuring the detection stages.
//!
//! All radii, areas and distances are in pixel units of the detection
//! raster; converting from physical units is the caller's job.
//!
//! Parameters fall into two tiers. The seed tier (median radius,
//! background radius, sigma, stain exclusion) drives the expensive
//! LoG + watershed seed detection; everything else only affects the
//! stages after it, so changing it reuses cached seeds.
//!
//! # Example
//!
//! ```
//! use cellseg_detect::DetectionParams;
//!
//! let params = DetectionParams::from_json_str(r#"{ "threshold": 0.3, "cell_expansion": 0 }"#)
//!     .unwrap();
//! assert_eq!(params.threshold, 0.3);
//! assert_eq!(params.sigma, 1.5);
//! ```

use crate::classify::PositivityParams;
use crate::{DetectError, DetectResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How nuclei grow into cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionMode {
    /// Every nucleus may expand by the full cell expansion distance
    #[default]
    Unconstrained,
    /// Expansion is capped by each nucleus's own radius
    SizeLimited,
}

/// Whether and how membrane intensities are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembraneMeasurement {
    /// No membrane measurements
    #[default]
    Disabled,
    /// Boundary pixels between two cells count for both
    Shared,
    /// Each boundary pixel counts only for the cell containing it
    Partitioned,
}

/// Detector-wide parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Median filter radius applied before anything else (0 = off)
    pub median_radius: u32,
    /// Opening radius for background estimation (0 = no subtraction)
    pub background_radius: u32,
    /// Opened background above this level is excluded from the estimate
    pub max_background: f32,
    /// Gaussian sigma of the LoG seed filter
    pub sigma: f32,
    /// Zero pixels where the membrane stain dominates the nuclear stain
    pub exclude_dab: bool,
    /// Channel holding the nuclear stain, used by `exclude_dab`
    pub nuclear_channel: String,
    /// Channel holding the membrane stain, used by `exclude_dab`
    pub membrane_channel: String,
    /// Minimum mean background-corrected intensity of a seed region
    pub threshold: f32,
    /// Smallest nucleus area in pixels (0 = no limit)
    pub min_area: f64,
    /// Largest nucleus area in pixels (0 = no limit)
    pub max_area: f64,
    /// Fuse touching seed regions of the same LoG blob
    pub merge_all: bool,
    /// Split merged nuclei by a distance-transform watershed
    pub watershed_post_process: bool,
    /// Sharpen boundaries with a small-sigma LoG when `sigma > 1.5`
    pub refine_boundary: bool,
    /// Distance in pixels that nuclei grow into cells (0 = nuclei only)
    pub cell_expansion: f32,
    /// How the expansion distance is applied
    pub expansion_mode: ExpansionMode,
    /// Attach nuclei to their cells
    pub include_nuclei: bool,
    /// Smooth object boundaries
    pub smooth_boundaries: bool,
    /// Attach measurement lists
    pub make_measurements: bool,
    /// Membrane measurement mode
    pub membrane: MembraneMeasurement,
    /// Downsample factor of the detection raster; scales simplification
    pub downsample: f64,
    /// Optional positive-cell classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positivity: Option<PositivityParams>,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            median_radius: 0,
            background_radius: 8,
            max_background: 2.0,
            sigma: 1.5,
            exclude_dab: false,
            nuclear_channel: "Hematoxylin OD".to_string(),
            membrane_channel: "DAB OD".to_string(),
            threshold: 0.1,
            min_area: 10.0,
            max_area: 400.0,
            merge_all: true,
            watershed_post_process: true,
            refine_boundary: true,
            cell_expansion: 5.0,
            expansion_mode: ExpansionMode::Unconstrained,
            include_nuclei: true,
            smooth_boundaries: true,
            make_measurements: true,
            membrane: MembraneMeasurement::Disabled,
            downsample: 1.0,
            positivity: None,
        }
    }
}

impl DetectionParams {
    /// Default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the median filter radius
    pub fn with_median_radius(mut self, radius: u32) -> Self {
        self.median_radius = radius;
        self
    }

    /// Set the background opening radius
    pub fn with_background_radius(mut self, radius: u32) -> Self {
        self.background_radius = radius;
        self
    }

    /// Set the maximum background level
    pub fn with_max_background(mut self, level: f32) -> Self {
        self.max_background = level;
        self
    }

    /// Set the LoG sigma
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Enable or disable membrane stain exclusion
    pub fn with_exclude_dab(mut self, exclude: bool) -> Self {
        self.exclude_dab = exclude;
        self
    }

    /// Set the nuclear and membrane stain channel names
    pub fn with_stain_channels(mut self, nuclear: impl Into<String>, membrane: impl Into<String>) -> Self {
        self.nuclear_channel = nuclear.into();
        self.membrane_channel = membrane.into();
        self
    }

    /// Set the intensity threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the nucleus area limits
    pub fn with_area_range(mut self, min_area: f64, max_area: f64) -> Self {
        self.min_area = min_area;
        self.max_area = max_area;
        self
    }

    /// Enable or disable merging of touching seeds
    pub fn with_merge_all(mut self, merge: bool) -> Self {
        self.merge_all = merge;
        self
    }

    /// Enable or disable the split-by-shape watershed
    pub fn with_watershed_post_process(mut self, split: bool) -> Self {
        self.watershed_post_process = split;
        self
    }

    /// Enable or disable boundary refinement
    pub fn with_refine_boundary(mut self, refine: bool) -> Self {
        self.refine_boundary = refine;
        self
    }

    /// Set the cell expansion distance and mode
    pub fn with_cell_expansion(mut self, distance: f32, mode: ExpansionMode) -> Self {
        self.cell_expansion = distance;
        self.expansion_mode = mode;
        self
    }

    /// Attach nuclei to cells or not
    pub fn with_include_nuclei(mut self, include: bool) -> Self {
        self.include_nuclei = include;
        self
    }

    /// Enable or disable boundary smoothing
    pub fn with_smooth_boundaries(mut self, smooth: bool) -> Self {
        self.smooth_boundaries = smooth;
        self
    }

    /// Enable or disable measurements
    pub fn with_make_measurements(mut self, measure: bool) -> Self {
        self.make_measurements = measure;
        self
    }

    /// Set the membrane measurement mode
    pub fn with_membrane(mut self, membrane: MembraneMeasurement) -> Self {
        self.membrane = membrane;
        self
    }

    /// Set the downsample factor
    pub fn with_downsample(mut self, downsample: f64) -> Self {
        self.downsample = downsample;
        self
    }

    /// Set the positivity classification
    pub fn with_positivity(mut self, positivity: Option<PositivityParams>) -> Self {
        self.positivity = positivity;
        self
    }

    /// True if cells are grown around nuclei
    pub fn expands_cells(&self) -> bool {
        self.cell_expansion > 0.0
    }

    /// True if the boundary refinement stage runs
    pub fn refines_boundary(&self) -> bool {
        self.refine_boundary && self.sigma > 1.5
    }

    /// Check the parameters for consistency
    ///
    /// # Errors
    ///
    /// Returns `DetectError::InvalidParameters` describing the first
    /// offending field.
    pub fn validate(&self) -> DetectResult<()> {
        fn invalid(msg: String) -> DetectResult<()> {
            Err(DetectError::InvalidParameters(msg))
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return invalid(format!("sigma must be positive, got {}", self.sigma));
        }
        if self.threshold.is_nan() {
            return invalid("threshold must not be NaN".to_string());
        }
        if self.max_background.is_nan() {
            return invalid("max_background must not be NaN".to_string());
        }
        for (name, v) in [("min_area", self.min_area), ("max_area", self.max_area)] {
            if !v.is_finite() || v < 0.0 {
                return invalid(format!("{name} must be finite and non-negative, got {v}"));
            }
        }
        if self.min_area > 0.0 && self.max_area > 0.0 && self.min_area > self.max_area {
            return invalid(format!(
                "min_area {} exceeds max_area {}",
                self.min_area, self.max_area
            ));
        }
        if !self.cell_expansion.is_finite() || self.cell_expansion < 0.0 {
            return invalid(format!(
                "cell_expansion must be finite and non-negative, got {}",
                self.cell_expansion
            ));
        }
        if !self.downsample.is_finite() || self.downsample <= 0.0 {
            return invalid(format!("downsample must be positive, got {}", self.downsample));
        }
        if self.exclude_dab && self.nuclear_channel == self.membrane_channel {
            return invalid("nuclear and membrane channels must differ".to_string());
        }
        if let Some(p) = &self.positivity {
            p.validate()?;
        }
        Ok(())
    }

    /// Parse and validate parameters from JSON text
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(text: &str) -> DetectResult<Self> {
        let params: Self = serde_json::from_str(text)
            .map_err(|e| DetectError::Config(format!("failed to parse parameters: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate parameters from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> DetectResult<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| DetectError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&data)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> DetectResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DetectError::Config(format!("failed to serialize parameters: {e}")))
    }
}
