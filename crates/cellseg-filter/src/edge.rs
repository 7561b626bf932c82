//! Blob-enhancing second-derivative filters

use crate::FilterResult;
use crate::convolve::{convolve, gaussian_blur};
use crate::kernel::Kernel;
use cellseg_core::FloatRaster;

/// Approximate (negated) Laplacian-of-Gaussian
///
/// Gaussian blur with `sigma` followed by the 3x3 Laplacian of
/// [`Kernel::laplacian`]. Bright blobs of a size matching `sigma` give
/// positive responses at their centres and negative rings around them.
pub fn laplacian_of_gaussian(raster: &FloatRaster, sigma: f32) -> FilterResult<FloatRaster> {
    let blurred = gaussian_blur(raster, sigma)?;
    convolve(&blurred, &Kernel::laplacian(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_has_zero_response() {
        let r = FloatRaster::new_with_value(10, 10, 2.0).unwrap();
        let log = laplacian_of_gaussian(&r, 1.5).unwrap();
        assert!(log.data().iter().all(|v| v.abs() < 1e-5));
    }

    #[test]
    fn test_blob_centre_positive() {
        let mut r = FloatRaster::new(21, 21).unwrap();
        for y in 8..13 {
            for x in 8..13 {
                r.set_pixel(x, y, 1.0).unwrap();
            }
        }
        let log = laplacian_of_gaussian(&r, 1.5).unwrap();
        assert!(log.get_pixel(10, 10).unwrap() > 0.0);
        assert!(log.get_pixel(10, 14).unwrap() < 0.0);
    }
}
