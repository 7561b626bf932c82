//! Per-compartment channel statistics
//!
//! Each channel is aggregated in one pass per compartment label raster:
//! nuclei, whole cells, cytoplasm (cells with the nuclei cut out) and
//! optionally membranes (cell boundary pixels).

use crate::DetectResult;
use crate::params::MembraneMeasurement;
use cellseg_core::{ChannelSet, LabelRaster};
use cellseg_measure::{BoundaryAssignment, RunningStats, boundary_statistics, label_statistics};

/// Statistics per channel, each indexed by `label - 1`
pub(crate) type ChannelStats = Vec<(String, Vec<RunningStats>)>;

/// Statistics of the compartments that exist only around expanded cells
#[derive(Debug, Clone, Default)]
pub(crate) struct CellStats {
    pub cell: ChannelStats,
    pub cytoplasm: ChannelStats,
    pub membrane: Option<ChannelStats>,
}

/// Aggregate every channel over `labels`
pub(crate) fn channel_statistics(
    labels: &LabelRaster,
    channels: &ChannelSet,
    count: u32,
) -> DetectResult<ChannelStats> {
    channels
        .iter()
        .map(|(name, raster)| -> DetectResult<(String, Vec<RunningStats>)> {
            Ok((name.to_string(), label_statistics(labels, raster, count)?))
        })
        .collect()
}

/// Cell labels with every nucleus pixel cleared
pub(crate) fn cytoplasm_labels(
    cells: &LabelRaster,
    nuclei: &LabelRaster,
) -> DetectResult<LabelRaster> {
    Ok(cells.zip_map(nuclei, |c, n| if n != 0 { 0 } else { c })?)
}

/// Aggregate every channel over cell boundaries
pub(crate) fn membrane_statistics(
    cells: &LabelRaster,
    channels: &ChannelSet,
    count: u32,
    mode: MembraneMeasurement,
) -> DetectResult<Option<ChannelStats>> {
    let assignment = match mode {
        MembraneMeasurement::Disabled => return Ok(None),
        MembraneMeasurement::Shared => BoundaryAssignment::Shared,
        MembraneMeasurement::Partitioned => BoundaryAssignment::Partitioned,
    };
    let stats = channels
        .iter()
        .map(|(name, raster)| -> DetectResult<(String, Vec<RunningStats>)> {
            Ok((
                name.to_string(),
                boundary_statistics(cells, raster, count, assignment)?,
            ))
        })
        .collect::<DetectResult<ChannelStats>>()?;
    Ok(Some(stats))
}

/// Cell, cytoplasm and membrane statistics
pub(crate) fn cell_statistics(
    cells: &LabelRaster,
    nuclei: &LabelRaster,
    channels: &ChannelSet,
    count: u32,
    membrane: MembraneMeasurement,
) -> DetectResult<CellStats> {
    let cytoplasm = cytoplasm_labels(cells, nuclei)?;
    Ok(CellStats {
        cell: channel_statistics(cells, channels, count)?,
        cytoplasm: channel_statistics(&cytoplasm, channels, count)?,
        membrane: membrane_statistics(cells, channels, count, membrane)?,
    })
}
