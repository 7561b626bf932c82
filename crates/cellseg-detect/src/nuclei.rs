//! From seeds to final nuclei
//!
//! Seeds whose background-corrected mean is too low are dropped, the
//! survivors are merged into a nucleus mask, optionally split again by
//! shape, refined at the boundary and finally pruned by area.

use crate::DetectResult;
use crate::input::DetectionInput;
use crate::params::DetectionParams;
use crate::state::SeedState;
use cellseg_core::{ByteRaster, Connectivity, FloatRaster, LabelRaster, Polygon};
use cellseg_filter::background::estimate_from_opening;
use cellseg_filter::laplacian_of_gaussian;
use cellseg_measure::label_statistics;
use cellseg_morph::{dilate, erode, regional_maxima};
use cellseg_region::{
    BoundaryCondition, WatershedOptions, component_sizes, euclidean_distance, fill_holes,
    label_connected_components, relabel_dense, retain_labels, separate_touching, trace_labels,
    watershed,
};
use log::debug;

/// Sigma of the LoG used for boundary refinement
const REFINE_SIGMA: f32 = 1.0;

/// Distance maxima closer than this are merged before splitting by shape
const SPLIT_TOLERANCE: f32 = 0.5;

/// Background-corrected raster the intensity threshold applies to
#[derive(Debug, Clone)]
pub(crate) struct CorrectedRaster {
    pub raster: FloatRaster,
    /// Pixels left out of the background estimate for being too bright
    pub exclusion: Option<ByteRaster>,
}

/// Final nucleus labels, dense from 1 to `count`
#[derive(Debug, Clone)]
pub(crate) struct Nuclei {
    pub labels: LabelRaster,
    pub count: u32,
    pub regions: Vec<(u32, Polygon)>,
}

/// Background-correct the working raster
///
/// The seed stage subtracts the plain opening. Here bright areas above
/// `max_background` are additionally excluded from the estimate, reusing
/// the cached opening.
pub(crate) fn corrected_raster(
    seeds: &SeedState,
    params: &DetectionParams,
) -> DetectResult<CorrectedRaster> {
    let Some(bg) = &seeds.background else {
        return Ok(CorrectedRaster {
            raster: seeds.working.clone(),
            exclusion: None,
        });
    };
    let estimate = estimate_from_opening(
        &bg.marker,
        &bg.opened,
        &seeds.working,
        params.background_radius,
        Some(params.max_background),
    )?;
    if let Some(exclusion) = &estimate.exclusion {
        debug!(
            "background estimate excludes {} bright pixels",
            exclusion.count_foreground()
        );
    }
    Ok(CorrectedRaster {
        raster: estimate.subtract_from(&seeds.working)?,
        exclusion: estimate.exclusion,
    })
}

/// Decide which seeds survive the intensity threshold
///
/// Returns one flag per seed label (index `label - 1`). A seed survives
/// when its mean corrected intensity exceeds `threshold` and it does not
/// overlap excluded background.
pub(crate) fn select_seeds(
    seeds: &SeedState,
    corrected: &CorrectedRaster,
    threshold: f32,
) -> DetectResult<Vec<bool>> {
    let means = label_statistics(&seeds.labels, &corrected.raster, seeds.count)?;
    let excluded = match &corrected.exclusion {
        Some(e) => Some(label_statistics(&seeds.labels, &e.to_float(), seeds.count)?),
        None => None,
    };
    let keep: Vec<bool> = means
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let bright_enough = s.mean() > threshold as f64;
            let clear = excluded.as_ref().is_none_or(|e| e[i].mean() == 0.0);
            bright_enough && clear
        })
        .collect();
    debug!(
        "threshold {threshold}: {} of {} seeds kept",
        keep.iter().filter(|&&k| k).count(),
        keep.len()
    );
    Ok(keep)
}

/// Combine the surviving seeds into a nucleus mask
pub(crate) fn nucleus_mask(
    seeds: &SeedState,
    keep: &[bool],
    params: &DetectionParams,
) -> DetectResult<ByteRaster> {
    let survives = |label: u32| keep.get(label as usize - 1).copied().unwrap_or(false);

    let mask = if params.merge_all {
        let mut filled = seeds.roi_mask.create_template();
        for (label, region) in &seeds.regions {
            if survives(*label) {
                region.fill_into(&mut filled, 1u8);
            }
        }
        dilate(&filled, 1).and(&seeds.log_mask)?
    } else {
        let retained = retain_labels(&seeds.labels, survives);
        separate_touching(&retained).foreground()
    };

    let mask = if params.watershed_post_process {
        split_by_shape(&mask)?
    } else {
        mask
    };
    Ok(mask.and(&seeds.roi_mask)?)
}

/// Separate round blobs that were merged, by a watershed on the distance
/// transform
pub(crate) fn split_by_shape(mask: &ByteRaster) -> DetectResult<ByteRaster> {
    let filled = fill_holes(mask, Connectivity::FourWay);
    let distance = euclidean_distance(&filled, BoundaryCondition::Background)?;
    let maxima = regional_maxima(&distance, SPLIT_TOLERANCE, Connectivity::EightWay)?.and(&filled)?;
    let (markers, count) = label_connected_components(&maxima, Connectivity::EightWay)?;
    let options = WatershedOptions::new().with_lines(true);
    let labels = watershed(&distance, &markers, Some(&filled), &options)?;
    debug!("split by shape: {count} distance maxima");
    Ok(labels.foreground())
}

/// Correct the boundary dilation caused by a large LoG sigma
///
/// The mask is eroded by one pixel and the pixels of the original mask
/// where a small-sigma LoG of the raw raster is positive are added back.
pub(crate) fn refine_boundary(
    mask: &ByteRaster,
    input: &DetectionInput,
    seeds: &SeedState,
) -> DetectResult<ByteRaster> {
    let refine = laplacian_of_gaussian(&input.detection, REFINE_SIGMA)?.mask_above(0.0);
    let refined = erode(mask, 1).or(&refine.and(mask)?)?;
    Ok(refined.and(&seeds.roi_mask)?)
}

/// Label the nucleus mask and drop components outside the area limits
///
/// A limit of 0 disables that side of the check.
pub(crate) fn prune_by_area(mask: &ByteRaster, params: &DetectionParams) -> DetectResult<Nuclei> {
    let (labels, found) = label_connected_components(mask, Connectivity::FourWay)?;
    let sizes = component_sizes(&labels);
    let within = |area: f64| {
        (params.min_area <= 0.0 || area >= params.min_area)
            && (params.max_area <= 0.0 || area <= params.max_area)
    };
    let kept = retain_labels(&labels, |l| within(sizes[(l - 1) as usize] as f64));
    let (labels, count) = relabel_dense(&kept);
    let regions = trace_labels(&labels)?;
    debug!("area pruning: {count} of {found} nuclei kept");
    Ok(Nuclei {
        labels,
        count,
        regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_disks(gap: u32) -> ByteRaster {
        let mut mask = ByteRaster::new(40, 20).unwrap();
        let r = 6i64;
        let c1 = 10i64;
        let c2 = c1 + 2 * r + gap as i64;
        for y in 0..20i64 {
            for x in 0..40i64 {
                let d1 = (x - c1).pow(2) + (y - 10).pow(2);
                let d2 = (x - c2).pow(2) + (y - 10).pow(2);
                if d1 <= r * r || d2 <= r * r {
                    mask.set_unchecked(x as u32, y as u32, 1);
                }
            }
        }
        mask
    }

    #[test]
    fn test_split_touching_disks() {
        // Centres 12 apart: the disks overlap in a narrow neck
        let mask = two_disks(0);
        let (_, before) = label_connected_components(&mask, Connectivity::FourWay).unwrap();
        assert_eq!(before, 1);
        let split = split_by_shape(&mask).unwrap();
        let (_, after) = label_connected_components(&split, Connectivity::FourWay).unwrap();
        assert_eq!(after, 2);
    }

    #[test]
    fn test_area_pruning() {
        let mut mask = ByteRaster::new(20, 10).unwrap();
        // 2x2 and 4x4 squares
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            mask.set_unchecked(x, y, 1);
        }
        for y in 3..7 {
            for x in 10..14 {
                mask.set_unchecked(x, y, 1);
            }
        }
        let params = DetectionParams::default().with_area_range(5.0, 0.0);
        let nuclei = prune_by_area(&mask, &params).unwrap();
        assert_eq!(nuclei.count, 1);
        assert_eq!(nuclei.regions.len(), 1);
        assert_eq!(nuclei.regions[0].1.area(), 16.0);

        let params = DetectionParams::default().with_area_range(0.0, 10.0);
        let nuclei = prune_by_area(&mask, &params).unwrap();
        assert_eq!(nuclei.count, 1);
        assert_eq!(nuclei.regions[0].1.area(), 4.0);

        let params = DetectionParams::default().with_area_range(0.0, 0.0);
        assert_eq!(prune_by_area(&mask, &params).unwrap().count, 2);
    }
}
