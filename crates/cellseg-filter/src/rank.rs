//! Rank filtering operations
//!
//! Rank (order-statistic) filters over circular windows: minimum, maximum
//! and median. Pixels outside the raster are ignored rather than padded.
//! Minimum and maximum use the row-decomposed sliding extreme; the median
//! sorts each window.

use crate::{FilterError, FilterResult};
use cellseg_core::FloatRaster;
use cellseg_core::window::{circle_extents, circular_extreme};

/// Circular minimum filter
pub fn min_filter(raster: &FloatRaster, radius: u32) -> FloatRaster {
    circular_extreme(raster, radius, |a, b| a <= b)
}

/// Circular maximum filter
pub fn max_filter(raster: &FloatRaster, radius: u32) -> FloatRaster {
    circular_extreme(raster, radius, |a, b| a >= b)
}

/// Circular median filter
///
/// For windows with an even number of pixels (at the border) the upper
/// of the two middle values is taken.
pub fn median_filter(raster: &FloatRaster, radius: u32) -> FilterResult<FloatRaster> {
    if radius == 0 {
        return Ok(raster.clone());
    }
    if raster.data().iter().any(|v| v.is_nan()) {
        return Err(FilterError::InvalidParameters(
            "median filter input contains NaN".to_string(),
        ));
    }
    let (w, h) = raster.dimensions();
    let extents = circle_extents(radius);
    let r = radius as i64;
    let mut window: Vec<f32> = Vec::with_capacity(extents.iter().map(|&e| 2 * e as usize + 1).sum());
    let mut out = raster.create_template();

    for y in 0..h as i64 {
        for x in 0..w as i64 {
            window.clear();
            for (i, &half) in extents.iter().enumerate() {
                let sy = y + i as i64 - r;
                if sy < 0 || sy >= h as i64 {
                    continue;
                }
                let lo = (x - half as i64).max(0) as u32;
                let hi = (x + half as i64).min(w as i64 - 1) as u32;
                window.extend_from_slice(&raster.row(sy as u32)[lo as usize..=hi as usize]);
            }
            let mid = window.len() / 2;
            let (_, m, _) = window.select_nth_unstable_by(mid, f32::total_cmp);
            out.set_unchecked(x as u32, y as u32, *m);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_removes_spike() {
        let mut r = FloatRaster::new_with_value(7, 7, 1.0).unwrap();
        r.set_pixel(3, 3, 100.0).unwrap();
        let m = median_filter(&r, 1).unwrap();
        assert_eq!(m.get_pixel(3, 3).unwrap(), 1.0);
    }

    #[test]
    fn test_min_max() {
        let r = FloatRaster::from_data(5, 1, vec![3.0, 1.0, 4.0, 1.0, 5.0]).unwrap();
        assert_eq!(min_filter(&r, 1).data(), &[1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(max_filter(&r, 1).data(), &[3.0, 4.0, 4.0, 5.0, 5.0]);
    }
}
