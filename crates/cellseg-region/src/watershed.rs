//! Marker-controlled watershed
//!
//! Labels grow from marker regions over a priority raster in order of
//! decreasing priority (priority-flood). Bright ridges of the priority
//! raster therefore act as basin centres; pass a negated raster to flood
//! from dark to bright instead.
//!
//! Each queued pixel carries the label that queued it. A pixel is queued
//! at most once, by the first label allowed to claim it; among equal
//! priorities pixels are processed first-in first-out, so plateaus are
//! shared out by distance from the competing fronts.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use cellseg_core::{ByteRaster, Connectivity, FloatRaster, LabelRaster};

use crate::error::RegionResult;

/// Options for watershed flooding
#[derive(Debug, Clone)]
pub struct WatershedOptions {
    /// Neighbourhood used for growing regions
    pub connectivity: Connectivity,
    /// Leave a one-pixel unlabeled line where two basins meet
    pub draw_lines: bool,
    /// Pixels with priority below this level are never flooded
    pub min_level: Option<f32>,
}

impl Default for WatershedOptions {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::FourWay,
            draw_lines: false,
            min_level: None,
        }
    }
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Enable or disable watershed lines
    pub fn with_lines(mut self, draw_lines: bool) -> Self {
        self.draw_lines = draw_lines;
        self
    }

    /// Set the lowest priority that may be flooded
    pub fn with_min_level(mut self, level: f32) -> Self {
        self.min_level = Some(level);
        self
    }
}

#[derive(Debug)]
struct Entry {
    value: f32,
    seq: u64,
    index: usize,
    label: u32,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on value, then oldest first
        self.value
            .total_cmp(&other.value)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Run a marker-controlled watershed
///
/// # Arguments
///
/// * `priority` - Flooding priority (higher floods first)
/// * `markers` - Initial labels; nonzero pixels are seeds
/// * `mask` - Optional domain; pixels outside it are never flooded
/// * `options` - Flooding options
///
/// # Returns
///
/// Label raster containing the markers and every pixel they reached.
pub fn watershed(
    priority: &FloatRaster,
    markers: &LabelRaster,
    mask: Option<&ByteRaster>,
    options: &WatershedOptions,
) -> RegionResult<LabelRaster> {
    let min_level = options.min_level;
    watershed_with_admit(priority, markers, mask, options, |_, v| {
        min_level.is_none_or(|m| v >= m)
    })
}

/// Run a marker-controlled watershed with a per-label admission test
///
/// `admit(label, priority)` decides whether `label` may claim a pixel
/// with the given priority. It is evaluated before `options.min_level`,
/// which is ignored here; fold it into `admit` if needed.
pub fn watershed_with_admit<F>(
    priority: &FloatRaster,
    markers: &LabelRaster,
    mask: Option<&ByteRaster>,
    options: &WatershedOptions,
    admit: F,
) -> RegionResult<LabelRaster>
where
    F: Fn(u32, f32) -> bool,
{
    priority.check_same_size(markers)?;
    if let Some(m) = mask {
        priority.check_same_size(m)?;
    }

    let (w, h) = priority.dimensions();
    let offsets = options.connectivity.offsets();
    let values = priority.data();
    let mut out = markers.clone();
    let mut queued: Vec<bool> = markers.data().iter().map(|&l| l != 0).collect();
    let mut heap: BinaryHeap<Entry> = BinaryHeap::new();
    let mut seq = 0u64;

    let in_domain = |i: usize| mask.is_none_or(|m| m.data()[i] != 0) && !values[i].is_nan();

    let neighbors = |i: usize| {
        let x = (i % w as usize) as i64;
        let y = (i / w as usize) as i64;
        offsets.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x + dx as i64, y + dy as i64);
            if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                None
            } else {
                Some((ny as usize) * (w as usize) + nx as usize)
            }
        })
    };

    // Seed the queue with the neighbours of every marker pixel
    for i in 0..out.len() {
        let label = out.data()[i];
        if label == 0 {
            continue;
        }
        for q in neighbors(i) {
            if !queued[q] && in_domain(q) && admit(label, values[q]) {
                queued[q] = true;
                heap.push(Entry {
                    value: values[q],
                    seq,
                    index: q,
                    label,
                });
                seq += 1;
            }
        }
    }

    while let Some(Entry { index, label, .. }) = heap.pop() {
        if options.draw_lines {
            let data = out.data();
            let conflict = neighbors(index).any(|q| data[q] != 0 && data[q] != label);
            if conflict {
                continue;
            }
        }
        out.data_mut()[index] = label;
        for q in neighbors(index) {
            if !queued[q] && in_domain(q) && admit(label, values[q]) {
                queued[q] = true;
                heap.push(Entry {
                    value: values[q],
                    seq,
                    index: q,
                    label,
                });
                seq += 1;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_basins_split_at_valley() {
        let p = FloatRaster::from_data(7, 1, vec![5.0, 4.0, 2.0, 1.0, 2.0, 4.0, 5.0]).unwrap();
        let m = LabelRaster::from_data(7, 1, vec![1, 0, 0, 0, 0, 0, 2]).unwrap();
        let out = watershed(&p, &m, None, &WatershedOptions::default()).unwrap();
        assert_eq!(out.data()[..3], [1, 1, 1]);
        assert_eq!(out.data()[4..], [2, 2, 2]);
        assert_ne!(out.data()[3], 0);
    }

    #[test]
    fn test_lines_leave_gap() {
        let p = FloatRaster::from_data(7, 1, vec![5.0, 4.0, 2.0, 1.0, 2.0, 4.0, 5.0]).unwrap();
        let m = LabelRaster::from_data(7, 1, vec![1, 0, 0, 0, 0, 0, 2]).unwrap();
        let opts = WatershedOptions::new().with_lines(true);
        let out = watershed(&p, &m, None, &opts).unwrap();
        assert_eq!(out.data(), &[1, 1, 1, 0, 2, 2, 2]);
    }

    #[test]
    fn test_min_level_caps_growth() {
        let p = FloatRaster::from_data(5, 1, vec![0.0, -1.0, -2.0, -3.0, -4.0]).unwrap();
        let m = LabelRaster::from_data(5, 1, vec![1, 0, 0, 0, 0]).unwrap();
        let opts = WatershedOptions::new().with_min_level(-2.0);
        let out = watershed(&p, &m, None, &opts).unwrap();
        assert_eq!(out.data(), &[1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_mask_restricts() {
        let p = FloatRaster::new_with_value(5, 1, 1.0).unwrap();
        let m = LabelRaster::from_data(5, 1, vec![1, 0, 0, 0, 0]).unwrap();
        let mask = ByteRaster::from_data(5, 1, vec![1, 1, 0, 1, 1]).unwrap();
        let out = watershed(&p, &m, Some(&mask), &WatershedOptions::default()).unwrap();
        assert_eq!(out.data(), &[1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_plateau_shared_fifo() {
        let p = FloatRaster::new_with_value(9, 1, 1.0).unwrap();
        let m = LabelRaster::from_data(9, 1, vec![1, 0, 0, 0, 0, 0, 0, 0, 2]).unwrap();
        let out = watershed(&p, &m, None, &WatershedOptions::default()).unwrap();
        assert_eq!(out.data(), &[1, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_per_label_admit() {
        let p = FloatRaster::from_data(6, 1, vec![0.0, -1.0, -2.0, -2.0, -1.0, 0.0]).unwrap();
        let m = LabelRaster::from_data(6, 1, vec![1, 0, 0, 0, 0, 2]).unwrap();
        let out = watershed_with_admit(&p, &m, None, &WatershedOptions::default(), |l, v| {
            if l == 1 { v >= -1.0 } else { v >= -2.0 }
        })
        .unwrap();
        assert_eq!(out.data(), &[1, 1, 2, 2, 2, 2]);
    }
}
