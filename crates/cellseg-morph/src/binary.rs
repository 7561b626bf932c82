//! Binary morphology with circular structuring elements
//!
//! The structuring element of radius `r` covers every offset with
//! `dx*dx + dy*dy <= r*r + 1`. Pixels beyond the image border are ignored,
//! so erosion does not eat into regions touching the border.

use cellseg_core::ByteRaster;
use cellseg_core::window::circular_extreme;

/// Dilate a binary mask
///
/// Dilation expands foreground regions by `radius` pixels. A radius of 0
/// returns a copy of the input.
pub fn dilate(mask: &ByteRaster, radius: u32) -> ByteRaster {
    circular_extreme(mask, radius, |a, b| a >= b)
}

/// Erode a binary mask
///
/// Erosion shrinks foreground regions by `radius` pixels.
pub fn erode(mask: &ByteRaster, radius: u32) -> ByteRaster {
    circular_extreme(mask, radius, |a, b| a <= b)
}

/// Open a binary mask
///
/// Opening = Erosion followed by Dilation.
/// Removes small foreground objects and smooths contours.
pub fn open(mask: &ByteRaster, radius: u32) -> ByteRaster {
    dilate(&erode(mask, radius), radius)
}

/// Close a binary mask
///
/// Closing = Dilation followed by Erosion.
/// Fills small holes and connects nearby objects.
pub fn close(mask: &ByteRaster, radius: u32) -> ByteRaster {
    erode(&dilate(mask, radius), radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel() -> ByteRaster {
        let mut m = ByteRaster::new(9, 9).unwrap();
        m.set_pixel(4, 4, 1).unwrap();
        m
    }

    #[test]
    fn test_dilate_radius_two() {
        let d = dilate(&single_pixel(), 2);
        // Rows of half-width 1, 2, 2, 2, 1
        assert_eq!(d.count_foreground(), 3 + 5 + 5 + 5 + 3);
    }

    #[test]
    fn test_erode_removes_point() {
        assert!(erode(&single_pixel(), 1).is_all_background());
    }

    #[test]
    fn test_open_removes_point_close_keeps() {
        assert!(open(&single_pixel(), 1).is_all_background());
        assert_eq!(close(&single_pixel(), 1).count_foreground(), 1);
    }

    #[test]
    fn test_close_fills_gap() {
        let mut m = ByteRaster::new(9, 3).unwrap();
        for x in 0..9 {
            if x != 4 {
                m.set_pixel(x, 1, 1).unwrap();
            }
        }
        let c = close(&m, 1);
        assert!(c.is_foreground(4, 1));
    }

    #[test]
    fn test_erode_ignores_border() {
        let m = ByteRaster::new_with_value(4, 4, 1).unwrap();
        assert_eq!(erode(&m, 1).count_foreground(), 16);
    }
}
