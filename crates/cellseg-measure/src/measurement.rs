//! Named measurement lists
//!
//! A [`MeasurementList`] is an ordered, immutable set of `name -> value`
//! pairs attached to a detected object. Lists are assembled with a
//! [`MeasurementListBuilder`]; names follow the pattern
//! `"<Compartment>: <feature>"`, e.g. `"Nucleus: Area"` or
//! `"Cell: DAB OD mean"`.

use crate::shape::ShapeMeasurements;
use crate::stats::RunningStats;
use std::fmt;

/// Name of the nucleus/cell area ratio measurement
pub const NUCLEUS_CELL_AREA_RATIO: &str = "Nucleus/Cell area ratio";

/// Part of a cell a measurement refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compartment {
    /// The nucleus region
    Nucleus,
    /// The whole cell region
    Cell,
    /// Cell minus nucleus
    Cytoplasm,
    /// Boundary pixels of the cell
    Membrane,
}

impl Compartment {
    /// Measurement name prefix
    pub fn as_str(self) -> &'static str {
        match self {
            Compartment::Nucleus => "Nucleus",
            Compartment::Cell => "Cell",
            Compartment::Cytoplasm => "Cytoplasm",
            Compartment::Membrane => "Membrane",
        }
    }

    /// Full measurement name for a feature of this compartment
    pub fn name(self, feature: &str) -> String {
        format!("{}: {}", self.as_str(), feature)
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of named measurements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementList {
    entries: Vec<(String, f64)>,
}

impl MeasurementList {
    /// Empty list
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a list
    pub fn builder() -> MeasurementListBuilder {
        MeasurementListBuilder::new()
    }

    /// Value for a measurement name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// True if the name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Iterate over `(name, value)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Measurement names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of measurements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`MeasurementList`]
///
/// Adding a name that is already present overwrites its value in place.
#[derive(Debug, Clone, Default)]
pub struct MeasurementListBuilder {
    entries: Vec<(String, f64)>,
}

impl MeasurementListBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single measurement
    pub fn add(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Add the shape features of a compartment
    pub fn add_shape(&mut self, compartment: Compartment, shape: &ShapeMeasurements) -> &mut Self {
        self.add(compartment.name("Area"), shape.area);
        self.add(compartment.name("Perimeter"), shape.perimeter);
        self.add(compartment.name("Circularity"), shape.circularity);
        self.add(compartment.name("Max caliper"), shape.max_caliper);
        self.add(compartment.name("Min caliper"), shape.min_caliper);
        self.add(compartment.name("Eccentricity"), shape.eccentricity);
        self
    }

    /// Add intensity statistics of one channel over a compartment
    pub fn add_intensity(
        &mut self,
        compartment: Compartment,
        channel: &str,
        stats: &RunningStats,
    ) -> &mut Self {
        self.add(compartment.name(&format!("{channel} mean")), stats.mean());
        self.add(compartment.name(&format!("{channel} sum")), stats.sum());
        self.add(compartment.name(&format!("{channel} std dev")), stats.std_dev());
        self.add(compartment.name(&format!("{channel} min")), stats.min());
        self.add(compartment.name(&format!("{channel} max")), stats.max());
        self.add(compartment.name(&format!("{channel} range")), stats.range());
        self
    }

    /// Add every entry of an existing list
    pub fn extend(&mut self, other: &MeasurementList) -> &mut Self {
        for (name, value) in other.iter() {
            self.add(name, value);
        }
        self
    }

    /// Number of measurements added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish the list
    pub fn build(self) -> MeasurementList {
        MeasurementList {
            entries: self.entries,
        }
    }
}
