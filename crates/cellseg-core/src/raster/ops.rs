//! Pixel-wise arithmetic and mask operations

use super::{ByteRaster, FloatRaster, Raster};
use crate::error::Result;

impl FloatRaster {
    /// Pixel-wise sum `self + other`
    pub fn add(&self, other: &FloatRaster) -> Result<FloatRaster> {
        self.zip_map(other, |a, b| a + b)
    }

    /// Pixel-wise difference `self - other`
    pub fn sub(&self, other: &FloatRaster) -> Result<FloatRaster> {
        self.zip_map(other, |a, b| a - b)
    }

    /// Multiply every pixel by a constant
    pub fn mul_constant(&self, k: f32) -> FloatRaster {
        self.map(|v| v * k)
    }

    /// Add a constant to every pixel
    pub fn add_constant(&self, k: f32) -> FloatRaster {
        self.map(|v| v + k)
    }

    /// Replace non-finite values with the corresponding value of `fallback`
    pub fn replace_non_finite(&self, fallback: &FloatRaster) -> Result<FloatRaster> {
        self.zip_map(fallback, |v, f| if v.is_finite() { v } else { f })
    }

    /// Binary mask of pixels strictly greater than `threshold`
    pub fn mask_above(&self, threshold: f32) -> ByteRaster {
        self.map(|v| u8::from(v > threshold))
    }

    /// Binary mask of pixels greater than or equal to `threshold`
    pub fn mask_at_least(&self, threshold: f32) -> ByteRaster {
        self.map(|v| u8::from(v >= threshold))
    }
}

impl ByteRaster {
    /// Pixel-wise AND
    pub fn and(&self, other: &ByteRaster) -> Result<ByteRaster> {
        self.zip_map(other, |a, b| u8::from(a != 0 && b != 0))
    }

    /// Pixel-wise OR
    pub fn or(&self, other: &ByteRaster) -> Result<ByteRaster> {
        self.zip_map(other, |a, b| u8::from(a != 0 || b != 0))
    }

    /// Pixel-wise `self AND NOT other`
    pub fn and_not(&self, other: &ByteRaster) -> Result<ByteRaster> {
        self.zip_map(other, |a, b| u8::from(a != 0 && b == 0))
    }

    /// Pixel-wise NOT
    pub fn invert(&self) -> ByteRaster {
        self.map(|v| u8::from(v == 0))
    }
}

impl<T: Copy + Default + PartialEq> Raster<T> {
    /// Zero every pixel where `mask` is background
    pub fn masked(&self, mask: &ByteRaster) -> Result<Raster<T>> {
        self.zip_map(mask, |v, m| if m != 0 { v } else { T::default() })
    }
}
