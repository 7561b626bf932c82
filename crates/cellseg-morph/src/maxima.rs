//! Regional maxima
//!
//! A pixel is reported when it lies on a plateau that cannot be left
//! towards a higher pixel without first descending by more than
//! `tolerance`. This is computed exactly with one reconstruction:
//! `recon = reconstruct(image - tolerance, image)`, and the maxima are the
//! pixels where the reconstruction did not rise above the lowered image.

use cellseg_core::{ByteRaster, Connectivity, FloatRaster};

use crate::error::{MorphError, MorphResult};
use crate::reconstruct::reconstruct_by_dilation;

/// Find regional maxima with a height tolerance
///
/// # Arguments
///
/// * `image` - Input raster; non-finite pixels are never maxima
/// * `tolerance` - Minimum depth separating two maxima (must be > 0)
/// * `connectivity` - Neighbourhood defining plateaus
///
/// # Returns
///
/// Binary mask of maxima pixels.
pub fn regional_maxima(
    image: &FloatRaster,
    tolerance: f32,
    connectivity: Connectivity,
) -> MorphResult<ByteRaster> {
    if tolerance.is_nan() || tolerance <= 0.0 {
        return Err(MorphError::InvalidParameters(format!(
            "tolerance must be positive, got {tolerance}"
        )));
    }
    let marker = image.map(|v| v - tolerance);
    let recon = reconstruct_by_dilation(&marker, image, connectivity)?;
    let maxima = recon.zip_map(&marker, |r, m| u8::from(m.is_finite() && r <= m))?;
    Ok(maxima)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_peaks() {
        let img = FloatRaster::from_data(7, 1, vec![0.0, 2.0, 1.0, 0.0, 1.0, 3.0, 0.0]).unwrap();
        let m = regional_maxima(&img, 0.5, Connectivity::FourWay).unwrap();
        assert_eq!(m.data(), &[0, 1, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_shallow_peak_suppressed() {
        // The dip between 2.0 and 2.2 is only 0.2 deep
        let img = FloatRaster::from_data(5, 1, vec![0.0, 2.0, 1.8, 2.2, 0.0]).unwrap();
        let m = regional_maxima(&img, 0.5, Connectivity::FourWay).unwrap();
        assert_eq!(m.data(), &[0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_plateau() {
        let img = FloatRaster::from_data(5, 1, vec![0.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
        let m = regional_maxima(&img, 0.001, Connectivity::FourWay).unwrap();
        assert_eq!(m.data(), &[0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_non_finite_excluded() {
        let img = FloatRaster::from_data(3, 1, vec![f32::NEG_INFINITY, 1.0, 0.0]).unwrap();
        let m = regional_maxima(&img, 0.1, Connectivity::FourWay).unwrap();
        assert_eq!(m.data(), &[0, 1, 0]);
    }

    #[test]
    fn test_invalid_tolerance() {
        let img = FloatRaster::new(2, 2).unwrap();
        assert!(regional_maxima(&img, 0.0, Connectivity::FourWay).is_err());
    }
}
