//! Convolution and Gaussian smoothing
//!
//! All convolutions use replicate (clamp) border handling: samples
//! outside the raster take the value of the nearest edge pixel.

use crate::FilterResult;
use crate::kernel::Kernel;
use cellseg_core::FloatRaster;

/// Convolve a float raster with a kernel
///
/// Each output pixel is the weighted sum of the kernel applied to the
/// corresponding neighborhood in the input.
///
/// If `normalize` is true, the kernel values are scaled so that they sum
/// to 1.0 before convolution; kernels summing to (nearly) zero are used
/// unscaled.
pub fn convolve(raster: &FloatRaster, kernel: &Kernel, normalize: bool) -> FilterResult<FloatRaster> {
    let w = raster.width() as i32;
    let h = raster.height() as i32;
    let kw = kernel.width() as i32;
    let kh = kernel.height() as i32;
    let cx = kernel.center_x() as i32;
    let cy = kernel.center_y() as i32;

    let ksum = kernel.sum();
    let scale = if normalize && ksum.abs() >= 1e-6 {
        1.0 / ksum
    } else {
        1.0
    };

    let mut out = FloatRaster::new(w as u32, h as u32)?;
    let kdata = kernel.data();
    let src = raster.data();

    for y in 0..h {
        let row = out.row_mut(y as u32);
        for (x, o) in row.iter_mut().enumerate() {
            let x = x as i32;
            let mut sum = 0.0f32;
            for ky in 0..kh {
                let sy = (y + ky - cy).clamp(0, h - 1);
                for kx in 0..kw {
                    let k = kdata[(ky * kw + kx) as usize];
                    if k == 0.0 {
                        continue;
                    }
                    let sx = (x + kx - cx).clamp(0, w - 1);
                    sum += src[(sy * w + sx) as usize] * k;
                }
            }
            *o = sum * scale;
        }
    }

    Ok(out)
}

/// Convolve with a pair of separable 1-D kernels
///
/// Applies `kernel_x` in the horizontal direction, then `kernel_y` in the
/// vertical direction.
pub fn convolve_sep(
    raster: &FloatRaster,
    kernel_x: &Kernel,
    kernel_y: &Kernel,
    normalize: bool,
) -> FilterResult<FloatRaster> {
    let tmp = convolve(raster, kernel_x, normalize)?;
    convolve(&tmp, kernel_y, normalize)
}

/// Gaussian blur with standard deviation `sigma`
///
/// A non-positive sigma returns a copy of the input.
pub fn gaussian_blur(raster: &FloatRaster, sigma: f32) -> FilterResult<FloatRaster> {
    if sigma <= 0.0 {
        return Ok(raster.clone());
    }
    let kx = Kernel::gaussian_1d(sigma)?;
    let ky = kx.transposed();
    convolve_sep(raster, &kx, &ky, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_preserves_constant() {
        let r = FloatRaster::new_with_value(8, 6, 3.0).unwrap();
        let b = gaussian_blur(&r, 2.0).unwrap();
        assert!(b.data().iter().all(|&v| (v - 3.0).abs() < 1e-5));
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut r = FloatRaster::new(21, 21).unwrap();
        r.set_pixel(10, 10, 1.0).unwrap();
        let b = gaussian_blur(&r, 1.5).unwrap();
        assert!((b.sum() - 1.0).abs() < 1e-4);
        let centre = b.get_pixel(10, 10).unwrap();
        assert!(centre < 1.0 && centre > b.get_pixel(11, 10).unwrap());
        assert!((b.get_pixel(9, 10).unwrap() - b.get_pixel(11, 10).unwrap()).abs() < 1e-7);
    }

    #[test]
    fn test_convolve_replicate_border() {
        let r = FloatRaster::from_data(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let k = Kernel::from_slice(3, 1, &[1.0, 1.0, 1.0]).unwrap();
        let c = convolve(&r, &k, true).unwrap();
        assert!((c.get_pixel(0, 0).unwrap() - 4.0 / 3.0).abs() < 1e-6);
        assert!((c.get_pixel(2, 0).unwrap() - 8.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let r = FloatRaster::from_data(2, 1, vec![1.0, 5.0]).unwrap();
        assert_eq!(gaussian_blur(&r, 0.0).unwrap(), r);
    }
}
