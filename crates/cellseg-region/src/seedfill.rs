//! Seed fill operations on binary masks

use std::collections::VecDeque;

use cellseg_core::{ByteRaster, Connectivity};

/// Fill holes in a binary mask
///
/// Fills interior holes (regions of background completely surrounded by
/// foreground). Background is propagated inward from the raster border
/// with the given connectivity; whatever it cannot reach is a hole.
///
/// # Arguments
///
/// * `mask` - Input binary mask
/// * `connectivity` - Connectivity of the background
///
/// # Returns
///
/// A new mask with holes filled.
pub fn fill_holes(mask: &ByteRaster, connectivity: Connectivity) -> ByteRaster {
    let (width, height) = mask.dimensions();

    // Background connected to the border
    let mut outside = mask.create_template();
    let mut queue = VecDeque::new();

    let seed = |x: u32, y: u32, outside: &mut ByteRaster, queue: &mut VecDeque<(u32, u32)>| {
        if !mask.is_foreground(x, y) && !outside.is_foreground(x, y) {
            outside.set_unchecked(x, y, 1);
            queue.push_back((x, y));
        }
    };
    for x in 0..width {
        seed(x, 0, &mut outside, &mut queue);
        seed(x, height - 1, &mut outside, &mut queue);
    }
    for y in 0..height {
        seed(0, y, &mut outside, &mut queue);
        seed(width - 1, y, &mut outside, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in connectivity.neighbors(x, y, width, height) {
            if !mask.is_foreground(nx, ny) && !outside.is_foreground(nx, ny) {
                outside.set_unchecked(nx, ny, 1);
                queue.push_back((nx, ny));
            }
        }
    }

    outside.invert()
}
