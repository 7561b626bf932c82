//! Growing nuclei into cells
//!
//! Cells are the catchment basins of a watershed on the negated distance
//! to the nearest nucleus, seeded with the nucleus labels, so every
//! background pixel goes to its closest nucleus up to the expansion
//! distance. Cell labels equal the labels of the nuclei they grew from.

use crate::DetectResult;
use crate::params::ExpansionMode;
use cellseg_core::{ByteRaster, LabelRaster};
use cellseg_measure::label_statistics;
use cellseg_region::{
    BoundaryCondition, WatershedOptions, euclidean_distance, outward_distance, watershed,
    watershed_with_admit,
};
use log::{debug, warn};

/// Strategy for growing nucleus labels into cell labels
pub trait ExpansionPolicy {
    /// Grow `nuclei` (labels 1..=`count`) by up to `distance` pixels
    /// within `domain`
    fn expand(
        &self,
        nuclei: &LabelRaster,
        count: u32,
        distance: f32,
        domain: &ByteRaster,
    ) -> DetectResult<LabelRaster>;
}

/// Every nucleus expands by the full distance
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl ExpansionPolicy for Unconstrained {
    fn expand(
        &self,
        nuclei: &LabelRaster,
        _count: u32,
        distance: f32,
        domain: &ByteRaster,
    ) -> DetectResult<LabelRaster> {
        let priority = outward_distance(&nuclei.foreground())?.map(|d| -d);
        let options = WatershedOptions::new().with_min_level(-distance);
        Ok(watershed(&priority, nuclei, Some(domain), &options)?)
    }
}

/// Each nucleus expands by at most its own radius
///
/// The radius of a nucleus is estimated as the largest distance from one
/// of its pixels to the nucleus boundary. A nucleus whose radius cannot be
/// estimated is logged and left out of the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeLimited;

impl SizeLimited {
    /// Per-label expansion limit, `None` for skipped nuclei
    fn limits(nuclei: &LabelRaster, count: u32, distance: f32) -> DetectResult<Vec<Option<f32>>> {
        let inside = euclidean_distance(&nuclei.foreground(), BoundaryCondition::Background)?;
        let stats = label_statistics(nuclei, &inside, count)?;
        let limits = stats
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let radius = s.max();
                if radius.is_finite() && radius > 0.0 {
                    Some(distance.min(radius as f32))
                } else {
                    warn!("nucleus {}: cannot estimate radius ({radius}), skipping", i + 1);
                    None
                }
            })
            .collect();
        Ok(limits)
    }
}

impl ExpansionPolicy for SizeLimited {
    fn expand(
        &self,
        nuclei: &LabelRaster,
        count: u32,
        distance: f32,
        domain: &ByteRaster,
    ) -> DetectResult<LabelRaster> {
        let limits = Self::limits(nuclei, count, distance)?;
        let markers = nuclei.map(|l| {
            if l != 0 && limits.get(l as usize - 1).copied().flatten().is_some() {
                l
            } else {
                0
            }
        });
        let priority = outward_distance(&markers.foreground())?.map(|d| -d);
        let cells = watershed_with_admit(
            &priority,
            &markers,
            Some(domain),
            &WatershedOptions::new(),
            |label, value| {
                limits
                    .get(label as usize - 1)
                    .copied()
                    .flatten()
                    .is_some_and(|limit| value >= -limit)
            },
        )?;
        Ok(cells)
    }
}

/// The policy for a configured mode
pub fn policy_for(mode: ExpansionMode) -> Box<dyn ExpansionPolicy> {
    match mode {
        ExpansionMode::Unconstrained => Box::new(Unconstrained),
        ExpansionMode::SizeLimited => Box::new(SizeLimited),
    }
}

/// Expand nuclei with the configured policy
pub(crate) fn expand_cells(
    nuclei: &LabelRaster,
    count: u32,
    distance: f32,
    mode: ExpansionMode,
    domain: &ByteRaster,
) -> DetectResult<LabelRaster> {
    let cells = policy_for(mode).expand(nuclei, count, distance, domain)?;
    debug!(
        "expansion ({mode:?}, {distance} px): {} cell pixels around {} nuclear pixels",
        cells.foreground().count_foreground(),
        nuclei.foreground().count_foreground()
    );
    Ok(cells)
}
