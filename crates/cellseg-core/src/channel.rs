//! Named intensity channels of one image plane

use crate::error::{Error, Result};
use crate::raster::FloatRaster;

/// Ordered set of named channels sharing the same dimensions
///
/// Channel order is insertion order and determines the order in which
/// per-channel measurements are reported.
#[derive(Debug, Clone, Default)]
pub struct ChannelSet {
    channels: Vec<(String, FloatRaster)>,
}

impl ChannelSet {
    /// Create an empty channel set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateChannel` if the name is already present and
    /// `Error::DimensionMismatch` if the raster size differs from the
    /// channels already in the set.
    pub fn insert(&mut self, name: impl Into<String>, raster: FloatRaster) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(Error::DuplicateChannel(name));
        }
        if let Some((_, first)) = self.channels.first() {
            first.check_same_size(&raster)?;
        }
        self.channels.push((name, raster));
        Ok(())
    }

    /// Builder form of [`ChannelSet::insert`]
    pub fn with_channel(mut self, name: impl Into<String>, raster: FloatRaster) -> Result<Self> {
        self.insert(name, raster)?;
        Ok(self)
    }

    /// Look up a channel by name
    pub fn get(&self, name: &str) -> Option<&FloatRaster> {
        self.channels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Iterate over (name, raster) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FloatRaster)> {
        self.channels.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Channel names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.channels.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if there are no channels
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Common dimensions, or None for an empty set
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.channels.first().map(|(_, r)| r.dimensions())
    }
}
