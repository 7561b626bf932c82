//! Detected objects

use crate::classify::CellClass;
use cellseg_core::Polygon;
use cellseg_measure::MeasurementList;

/// Whether an object's boundary is an expanded cell or the nucleus itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Boundary grown around a nucleus
    Cell,
    /// No expansion was requested; the boundary is the nucleus
    NucleusOnly,
}

/// Nucleus nested inside a cell
#[derive(Debug, Clone, PartialEq)]
pub struct NucleusObject {
    boundary: Polygon,
}

impl NucleusObject {
    pub(crate) fn new(boundary: Polygon) -> Self {
        Self { boundary }
    }

    /// Nucleus boundary
    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }
}

/// One detected cell, or nucleus when cells are not expanded
#[derive(Debug, Clone, PartialEq)]
pub struct CellObject {
    label: u32,
    kind: ObjectKind,
    boundary: Polygon,
    nucleus: Option<NucleusObject>,
    measurements: MeasurementList,
    class: Option<CellClass>,
}

impl CellObject {
    pub(crate) fn new(
        label: u32,
        kind: ObjectKind,
        boundary: Polygon,
        nucleus: Option<NucleusObject>,
        measurements: MeasurementList,
    ) -> Self {
        Self {
            label,
            kind,
            boundary,
            nucleus,
            measurements,
            class: None,
        }
    }

    /// Nucleus label this object was built from
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Cell or nucleus-only object
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Outer boundary of the object
    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    /// Attached nucleus, if any
    pub fn nucleus(&self) -> Option<&NucleusObject> {
        self.nucleus.as_ref()
    }

    /// Measurements of this object
    pub fn measurements(&self) -> &MeasurementList {
        &self.measurements
    }

    /// Positivity class, if classification was requested
    pub fn class(&self) -> Option<CellClass> {
        self.class
    }

    pub(crate) fn set_class(&mut self, class: CellClass) {
        self.class = Some(class);
    }
}
