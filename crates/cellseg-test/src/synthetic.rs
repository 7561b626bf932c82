//! Deterministic synthetic inputs
//!
//! Nuclei in stained tissue look, to a first approximation, like isotropic
//! Gaussian blobs on a flat background. These generators build such rasters
//! without any randomness so that regression tests are reproducible.

use crate::error::{TestError, TestResult};
use cellseg_core::{ByteRaster, FloatRaster};

/// An isotropic Gaussian blob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    /// Centre x (pixel coordinates)
    pub cx: f32,
    /// Centre y (pixel coordinates)
    pub cy: f32,
    /// Standard deviation in pixels
    pub sigma: f32,
    /// Peak height above background
    pub peak: f32,
}

impl Blob {
    /// Create a blob
    pub fn new(cx: f32, cy: f32, sigma: f32, peak: f32) -> Self {
        Self {
            cx,
            cy,
            sigma,
            peak,
        }
    }
}

/// Render a flat background plus a sum of Gaussian blobs
///
/// # Arguments
///
/// * `width`, `height` - Raster size
/// * `background` - Constant background level
/// * `blobs` - Blobs to add
pub fn gaussian_blobs(
    width: u32,
    height: u32,
    background: f32,
    blobs: &[Blob],
) -> TestResult<FloatRaster> {
    if let Some(b) = blobs.iter().find(|b| b.sigma <= 0.0) {
        return Err(TestError::InvalidFixture(format!(
            "blob sigma must be positive, got {}",
            b.sigma
        )));
    }
    let mut raster = FloatRaster::new_with_value(width, height, background)?;
    for y in 0..height {
        let row = raster.row_mut(y);
        for (x, v) in row.iter_mut().enumerate() {
            for b in blobs {
                let dx = x as f32 - b.cx;
                let dy = y as f32 - b.cy;
                *v += b.peak * (-(dx * dx + dy * dy) / (2.0 * b.sigma * b.sigma)).exp();
            }
        }
    }
    Ok(raster)
}

/// Binary disk of pixels with `(x - cx)^2 + (y - cy)^2 <= radius^2`
pub fn disk_mask(width: u32, height: u32, cx: f32, cy: f32, radius: f32) -> TestResult<ByteRaster> {
    let mut mask = ByteRaster::new(width, height)?;
    let r2 = radius * radius;
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                mask.set_unchecked(x, y, 1);
            }
        }
    }
    Ok(mask)
}

/// 100x100 raster with two well-separated blobs (sigma 4, peak 1.0) on a
/// zero background, centred at (30, 50) and (70, 50)
pub fn two_blob_raster() -> TestResult<FloatRaster> {
    gaussian_blobs(
        100,
        100,
        0.0,
        &[Blob::new(30.0, 50.0, 4.0, 1.0), Blob::new(70.0, 50.0, 4.0, 1.0)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_peak() {
        let r = two_blob_raster().unwrap();
        assert!((r.get_pixel(30, 50).unwrap() - 1.0).abs() < 1e-4);
        assert!(r.get_pixel(0, 0).unwrap() < 1e-6);
    }

    #[test]
    fn test_disk_area() {
        let d = disk_mask(21, 21, 10.0, 10.0, 3.0).unwrap();
        // Lattice points within radius 3
        assert_eq!(d.count_foreground(), 29);
    }

    #[test]
    fn test_invalid_sigma() {
        assert!(gaussian_blobs(4, 4, 0.0, &[Blob::new(1.0, 1.0, 0.0, 1.0)]).is_err());
    }
}
