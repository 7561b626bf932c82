//! Per-label intensity statistics
//!
//! All functions take a label raster (0 = background) and a float raster
//! of the same size and return one [`RunningStats`] per label, indexed by
//! `label - 1`. Labels above `num_labels` are ignored.

use crate::stats::RunningStats;
use crate::MeasureResult;
use cellseg_core::{FloatRaster, LabelRaster};

/// How boundary pixels are assigned to the objects that share them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryAssignment {
    /// Each boundary pixel belongs only to the object containing it
    #[default]
    Partitioned,
    /// Boundary pixels also count for every adjacent object they touch
    Shared,
}

/// Statistics of `values` over each label
///
/// One pass over the raster.
pub fn label_statistics(
    labels: &LabelRaster,
    values: &FloatRaster,
    num_labels: u32,
) -> MeasureResult<Vec<RunningStats>> {
    labels.check_same_size(values)?;
    let mut stats = vec![RunningStats::new(); num_labels as usize];
    for (&label, &v) in labels.data().iter().zip(values.data()) {
        if label == 0 || label > num_labels {
            continue;
        }
        stats[(label - 1) as usize].add(v as f64);
    }
    Ok(stats)
}

/// Statistics of `values` over the boundary pixels of each label
///
/// A pixel of label `L` lies on the boundary of `L` when one of its
/// 4-neighbours has another label or lies outside the raster. With
/// [`BoundaryAssignment::Shared`] it is also counted once for each other
/// non-zero label among those neighbours.
pub fn boundary_statistics(
    labels: &LabelRaster,
    values: &FloatRaster,
    num_labels: u32,
    assignment: BoundaryAssignment,
) -> MeasureResult<Vec<RunningStats>> {
    labels.check_same_size(values)?;
    let (w, h) = labels.dimensions();
    let mut stats = vec![RunningStats::new(); num_labels as usize];
    let mut touching: Vec<u32> = Vec::with_capacity(4);

    for y in 0..h {
        for x in 0..w {
            let label = labels.get_unchecked(x, y);
            if label == 0 || label > num_labels {
                continue;
            }
            touching.clear();
            let mut on_boundary = false;
            for (dx, dy) in [(0i64, -1i64), (-1, 0), (1, 0), (0, 1)] {
                match labels.get_signed(x as i64 + dx, y as i64 + dy) {
                    Some(n) if n == label => {}
                    Some(n) => {
                        on_boundary = true;
                        if n != 0 && n <= num_labels && !touching.contains(&n) {
                            touching.push(n);
                        }
                    }
                    None => on_boundary = true,
                }
            }
            if !on_boundary {
                continue;
            }
            let v = values.get_unchecked(x, y) as f64;
            stats[(label - 1) as usize].add(v);
            if assignment == BoundaryAssignment::Shared {
                for &n in &touching {
                    stats[(n - 1) as usize].add(v);
                }
            }
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_squares() -> LabelRaster {
        // 1 1 2 2
        // 1 1 2 2
        LabelRaster::from_data(4, 2, vec![1, 1, 2, 2, 1, 1, 2, 2]).unwrap()
    }

    #[test]
    fn test_label_statistics() {
        let labels = two_squares();
        let values = FloatRaster::from_data(4, 2, vec![1.0, 2.0, 5.0, 5.0, 3.0, 4.0, 5.0, 5.0]).unwrap();
        let stats = label_statistics(&labels, &values, 2).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].mean(), 2.5);
        assert_eq!(stats[0].count(), 4);
        assert_eq!(stats[1].std_dev(), 0.0);
    }

    #[test]
    fn test_missing_label_is_empty() {
        let labels = two_squares();
        let values = FloatRaster::new(4, 2).unwrap();
        let stats = label_statistics(&labels, &values, 3).unwrap();
        assert!(stats[2].mean().is_nan());
    }

    #[test]
    fn test_size_mismatch() {
        let labels = two_squares();
        let values = FloatRaster::new(3, 2).unwrap();
        assert!(label_statistics(&labels, &values, 2).is_err());
    }

    #[test]
    fn test_boundary_shared() {
        // Only the outer ring of a 5x5 block counts; the inner 3x3 is interior
        let labels = LabelRaster::new_with_value(5, 5, 1).unwrap();
        let mut values = FloatRaster::new_with_value(5, 5, 1.0).unwrap();
        values.set_pixel(2, 2, 100.0).unwrap();
        values.set_pixel(1, 3, 50.0).unwrap();
        let stats = boundary_statistics(&labels, &values, 1, BoundaryAssignment::Partitioned).unwrap();
        assert_eq!(stats[0].count(), 16);
        assert_eq!(stats[0].max(), 1.0);

        let labels = two_squares();
        let values = FloatRaster::from_data(4, 2, vec![0.0, 1.0, 2.0, 0.0, 0.0, 1.0, 2.0, 0.0]).unwrap();
        let part = boundary_statistics(&labels, &values, 2, BoundaryAssignment::Partitioned).unwrap();
        let shared = boundary_statistics(&labels, &values, 2, BoundaryAssignment::Shared).unwrap();
        assert_eq!(part[0].count(), 4);
        assert_eq!(part[0].max(), 1.0);
        assert_eq!(shared[0].count(), 6);
        assert_eq!(shared[0].max(), 2.0);
        assert_eq!(shared[1].count(), 6);
    }
}
