//! Object assembly
//!
//! Turns the final nucleus and cell labels into objects: boundaries are
//! smoothed and simplified, degenerate ones dropped, and the measurement
//! list of every object is built in one go.

use crate::DetectResult;
use crate::compartments::{CellStats, ChannelStats};
use crate::nuclei::Nuclei;
use crate::object::{CellObject, NucleusObject, ObjectKind};
use crate::params::DetectionParams;
use cellseg_core::{LabelRaster, Polygon, simplify, smooth_boundary};
use cellseg_measure::{
    Compartment, MeasurementList, MeasurementListBuilder, NUCLEUS_CELL_AREA_RATIO,
    ShapeMeasurements,
};
use cellseg_region::trace_labels;

/// Label rasters and statistics an assembly pass works from
pub(crate) struct Assembly<'a> {
    pub nuclei: &'a Nuclei,
    pub cells: Option<&'a LabelRaster>,
    pub nucleus_stats: &'a ChannelStats,
    pub cell_stats: Option<&'a CellStats>,
}

/// Smooth and simplify a traced boundary
///
/// Returns `None` if nothing with an area is left.
pub(crate) fn finish_boundary(polygon: &Polygon, params: &DetectionParams) -> Option<Polygon> {
    let smoothed = if params.smooth_boundaries {
        smooth_boundary(polygon)
    } else {
        polygon.clone()
    };
    let simplified = simplify(&smoothed, 0.5 * params.downsample);
    (!simplified.is_degenerate()).then_some(simplified)
}

fn add_intensities(
    builder: &mut MeasurementListBuilder,
    compartment: Compartment,
    stats: &ChannelStats,
    index: usize,
) {
    for (channel, per_label) in stats {
        if let Some(s) = per_label.get(index) {
            builder.add_intensity(compartment, channel, s);
        }
    }
}

impl Assembly<'_> {
    /// Build the objects, ordered by nucleus label
    pub(crate) fn build(&self, params: &DetectionParams) -> DetectResult<Vec<CellObject>> {
        let cell_regions = match self.cells {
            Some(cells) => {
                let mut by_label: Vec<Option<Polygon>> = vec![None; self.nuclei.count as usize + 1];
                for (label, polygon) in trace_labels(cells)? {
                    if let Some(slot) = by_label.get_mut(label as usize) {
                        *slot = Some(polygon);
                    }
                }
                Some(by_label)
            }
            None => None,
        };

        let mut objects = Vec::with_capacity(self.nuclei.regions.len());
        for (label, traced) in &self.nuclei.regions {
            let Some(nucleus) = finish_boundary(traced, params) else {
                continue;
            };
            let index = (*label - 1) as usize;
            let object = match &cell_regions {
                None => self.nucleus_only(*label, index, nucleus, params),
                Some(regions) => {
                    let Some(cell) = regions
                        .get(*label as usize)
                        .and_then(|r| r.as_ref())
                        .and_then(|r| finish_boundary(r, params))
                    else {
                        continue;
                    };
                    self.cell(*label, index, nucleus, cell, params)
                }
            };
            objects.push(object);
        }
        Ok(objects)
    }

    fn nucleus_only(
        &self,
        label: u32,
        index: usize,
        nucleus: Polygon,
        params: &DetectionParams,
    ) -> CellObject {
        let measurements = if params.make_measurements {
            let mut builder = MeasurementList::builder();
            builder.add_shape(Compartment::Nucleus, &ShapeMeasurements::from_polygon(&nucleus));
            add_intensities(&mut builder, Compartment::Nucleus, self.nucleus_stats, index);
            builder.build()
        } else {
            MeasurementList::empty()
        };
        CellObject::new(label, ObjectKind::NucleusOnly, nucleus, None, measurements)
    }

    fn cell(
        &self,
        label: u32,
        index: usize,
        nucleus: Polygon,
        cell: Polygon,
        params: &DetectionParams,
    ) -> CellObject {
        let nucleus_shape = ShapeMeasurements::from_polygon(&nucleus);
        let cell_shape = ShapeMeasurements::from_polygon(&cell);
        let ratio = if cell_shape.area > 0.0 {
            (nucleus_shape.area / cell_shape.area).min(1.0)
        } else {
            0.0
        };
        let attach = params.include_nuclei && ratio > 0.0;

        let measurements = if params.make_measurements {
            let mut builder = MeasurementList::builder();
            builder.add_shape(Compartment::Nucleus, &nucleus_shape);
            add_intensities(&mut builder, Compartment::Nucleus, self.nucleus_stats, index);
            builder.add_shape(Compartment::Cell, &cell_shape);
            if let Some(stats) = self.cell_stats {
                add_intensities(&mut builder, Compartment::Cell, &stats.cell, index);
                add_intensities(&mut builder, Compartment::Cytoplasm, &stats.cytoplasm, index);
                if let Some(membrane) = &stats.membrane {
                    add_intensities(&mut builder, Compartment::Membrane, membrane, index);
                }
            }
            if attach {
                builder.add(NUCLEUS_CELL_AREA_RATIO, ratio);
            }
            builder.build()
        } else {
            MeasurementList::empty()
        };

        let nucleus = attach.then(|| NucleusObject::new(nucleus));
        CellObject::new(label, ObjectKind::Cell, cell, nucleus, measurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_drops_degenerate() {
        let params = DetectionParams::default();
        let line = Polygon::new(vec![
            cellseg_core::Point::new(0.0, 0.0),
            cellseg_core::Point::new(4.0, 0.0),
        ]);
        assert!(finish_boundary(&line, &params).is_none());
        let square = Polygon::rectangle(0.0, 0.0, 6.0, 6.0);
        let finished = finish_boundary(&square, &params).unwrap();
        assert!(finished.area() > 20.0 && finished.area() <= 36.0);
        let raw = finish_boundary(&square, &params.clone().with_smooth_boundaries(false)).unwrap();
        assert_eq!(raw.area(), 36.0);
    }
}
