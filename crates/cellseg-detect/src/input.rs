//! Detection inputs

use crate::{DetectError, DetectResult};
use cellseg_core::{ChannelSet, FloatRaster, Polygon};

/// Identity of the image region being processed
///
/// Detection state cached for one region is never reused for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegionId(pub u64);

/// Z-slice and time point of the detection raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Plane {
    /// Z-slice index
    pub z: u32,
    /// Time point index
    pub t: u32,
}

impl Plane {
    /// Create a plane index
    pub const fn new(z: u32, t: u32) -> Self {
        Self { z, t }
    }
}

/// Everything one detection call operates on
#[derive(Debug, Clone)]
pub struct DetectionInput {
    /// Region identity
    pub region: RegionId,
    /// Plane of the rasters
    pub plane: Plane,
    /// Raster the nuclei are detected in
    pub detection: FloatRaster,
    /// Channels measured over nuclei
    pub nucleus_channels: ChannelSet,
    /// Channels measured over cells, cytoplasm and membranes
    pub cell_channels: ChannelSet,
    /// Region of interest in raster coordinates
    pub roi: Option<Polygon>,
}

impl DetectionInput {
    /// Input with no channels and no region of interest
    pub fn new(region: RegionId, detection: FloatRaster) -> Self {
        Self {
            region,
            plane: Plane::default(),
            detection,
            nucleus_channels: ChannelSet::new(),
            cell_channels: ChannelSet::new(),
            roi: None,
        }
    }

    /// Set the plane
    pub fn with_plane(mut self, plane: Plane) -> Self {
        self.plane = plane;
        self
    }

    /// Set the nucleus channels
    pub fn with_nucleus_channels(mut self, channels: ChannelSet) -> Self {
        self.nucleus_channels = channels;
        self
    }

    /// Set the cell channels
    pub fn with_cell_channels(mut self, channels: ChannelSet) -> Self {
        self.cell_channels = channels;
        self
    }

    /// Set the region of interest
    pub fn with_roi(mut self, roi: Polygon) -> Self {
        self.roi = Some(roi);
        self
    }

    /// Region of interest covering the whole raster
    pub fn with_full_roi(self) -> Self {
        let (w, h) = self.detection.dimensions();
        self.with_roi(Polygon::rectangle(0.0, 0.0, w as f64, h as f64))
    }

    /// Look up a stain channel, nucleus channels first
    pub fn channel(&self, name: &str) -> Option<&FloatRaster> {
        self.nucleus_channels
            .get(name)
            .or_else(|| self.cell_channels.get(name))
    }

    /// The region of interest
    ///
    /// # Errors
    ///
    /// Returns `DetectError::MissingRoi` when none was supplied.
    pub fn require_roi(&self) -> DetectResult<&Polygon> {
        self.roi.as_ref().ok_or(DetectError::MissingRoi)
    }

    /// Check that every channel matches the detection raster
    pub fn validate(&self) -> DetectResult<()> {
        let dims = self.detection.dimensions();
        let sets = [
            ("nucleus", &self.nucleus_channels),
            ("cell", &self.cell_channels),
        ];
        for (kind, set) in sets {
            for (name, raster) in set.iter() {
                if raster.dimensions() != dims {
                    return Err(DetectError::InvalidInput(format!(
                        "{kind} channel '{name}' is {}x{}, detection raster is {}x{}",
                        raster.width(),
                        raster.height(),
                        dims.0,
                        dims.1
                    )));
                }
            }
        }
        Ok(())
    }
}
