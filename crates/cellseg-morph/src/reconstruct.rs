//! Grayscale reconstruction-by-dilation
//!
//! The marker is repeatedly dilated under the constraint that it never
//! exceeds the mask, until stability. The implementation is the hybrid
//! scheme: one forward and one backward raster scan, followed by a FIFO
//! propagation from the pixels that can still raise a neighbour.
//!
//! Negative infinity is a valid marker value and marks pixels that must
//! receive their value from elsewhere (or stay at negative infinity when
//! no finite marker can reach them).

use std::collections::VecDeque;

use cellseg_core::{Connectivity, FloatRaster};

use crate::error::MorphResult;

/// Reconstruct `marker` under `mask` by dilation
///
/// # Arguments
///
/// * `marker` - Seed raster; values above the mask are clipped to it
/// * `mask` - Upper bound for the reconstruction
/// * `connectivity` - Neighbourhood used for propagation
///
/// # Returns
///
/// The reconstruction, pointwise between `min(marker, mask)` and `mask`.
pub fn reconstruct_by_dilation(
    marker: &FloatRaster,
    mask: &FloatRaster,
    connectivity: Connectivity,
) -> MorphResult<FloatRaster> {
    let mut out = marker.zip_map(mask, f32::min)?;
    let (w, h) = mask.dimensions();
    let (w, h) = (w as i64, h as i64);
    let mask_data = mask.data();
    let causal = connectivity.causal_offsets();

    // Forward pass (top-left to bottom-right)
    {
        let data = out.data_mut();
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) as usize;
                let mut best = data[i];
                for &(dx, dy) in causal {
                    let (nx, ny) = (x + dx as i64, y + dy as i64);
                    if nx >= 0 && ny >= 0 && nx < w {
                        best = best.max(data[(ny * w + nx) as usize]);
                    }
                }
                data[i] = best.min(mask_data[i]);
            }
        }
    }

    // Backward pass (bottom-right to top-left), seeding the queue
    let mut queue: VecDeque<usize> = VecDeque::new();
    {
        let data = out.data_mut();
        for y in (0..h).rev() {
            for x in (0..w).rev() {
                let i = (y * w + x) as usize;
                let mut best = data[i];
                for &(dx, dy) in causal {
                    let (nx, ny) = (x - dx as i64, y - dy as i64);
                    if nx >= 0 && nx < w && ny < h {
                        best = best.max(data[(ny * w + nx) as usize]);
                    }
                }
                let v = best.min(mask_data[i]);
                data[i] = v;
                for &(dx, dy) in causal {
                    let (nx, ny) = (x - dx as i64, y - dy as i64);
                    if nx >= 0 && nx < w && ny < h {
                        let q = (ny * w + nx) as usize;
                        if data[q] < v && data[q] < mask_data[q] {
                            queue.push_back(i);
                            break;
                        }
                    }
                }
            }
        }
    }

    // FIFO propagation
    let offsets = connectivity.offsets();
    let data = out.data_mut();
    while let Some(p) = queue.pop_front() {
        let (px, py) = ((p as i64) % w, (p as i64) / w);
        let vp = data[p];
        for &(dx, dy) in offsets {
            let (nx, ny) = (px + dx as i64, py + dy as i64);
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                continue;
            }
            let q = (ny * w + nx) as usize;
            if data[q] < vp && data[q] != mask_data[q] {
                data[q] = vp.min(mask_data[q]);
                queue.push_back(q);
            }
        }
    }

    Ok(out)
}
