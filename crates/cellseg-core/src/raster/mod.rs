//! Raster - rectangular grid of samples
//!
//! `Raster<T>` is a 2D array stored in row-major order with no padding.
//! Three instantiations are used throughout the library:
//!
//! - [`FloatRaster`] (`f32`) for intensities, filter responses and distances
//! - [`ByteRaster`] (`u8`) for binary masks (0 = background, 1 = foreground)
//! - [`LabelRaster`] (`u32`) for labeled regions (0 = background)
//!
//! See [`ops`] for arithmetic and mask operations.
//!
//! # Examples
//!
//! ```
//! use cellseg_core::FloatRaster;
//!
//! let mut raster = FloatRaster::new(100, 100).unwrap();
//! raster.set_pixel(10, 20, 0.5).unwrap();
//! assert_eq!(raster.get_pixel(10, 20).unwrap(), 0.5);
//!
//! let (max_val, max_x, max_y) = raster.max().unwrap();
//! assert_eq!((max_val, max_x, max_y), (0.5, 10, 20));
//! ```

pub mod ops;

use crate::error::{Error, Result};

/// Rectangular grid of samples
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel data (row-major, no padding)
    data: Vec<T>,
}

/// Floating-point intensity raster
pub type FloatRaster = Raster<f32>;

/// Binary mask raster (0 or 1)
pub type ByteRaster = Raster<u8>;

/// Label raster (0 = background, 1..=N = regions)
pub type LabelRaster = Raster<u32>;

impl<T: Copy + Default> Raster<T> {
    /// Create a new raster with all pixels set to the default value
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, T::default())
    }

    /// Create a zeroed raster with the same dimensions as `self`
    pub fn create_template(&self) -> Self {
        Raster {
            width: self.width,
            height: self.height,
            data: vec![T::default(); self.data.len()],
        }
    }
}

impl<T: Copy> Raster<T> {
    /// Create a new raster with all pixels set to the specified value
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, value: T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(Raster {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create a raster from raw row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }

        Ok(Raster {
            width,
            height,
            data,
        })
    }

    /// Get the raster width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the raster height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the raster dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed raster; provided for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major index of (x, y)
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// (x, y) of a row-major index
    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// Get a pixel value
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<T> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        Ok(self.data[self.index(x, y)])
    }

    /// Set a pixel value
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: T) -> Result<()> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Get a pixel value without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> T {
        self.data[self.index(x, y)]
    }

    /// Set a pixel value without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds.
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Get a pixel value at signed coordinates, `None` outside the raster
    #[inline]
    pub fn get_signed(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            None
        } else {
            Some(self.data[(y as usize) * (self.width as usize) + x as usize])
        }
    }

    /// Get the raw pixel data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get mutable access to the raw pixel data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the raster, returning its pixel data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Get a row of pixel data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[T] {
        let start = (y as usize) * (self.width as usize);
        &self.data[start..start + self.width as usize]
    }

    /// Get a mutable row of pixel data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        let start = (y as usize) * (self.width as usize);
        let w = self.width as usize;
        &mut self.data[start..start + w]
    }

    /// Set all pixels to a value
    pub fn set_all(&mut self, value: T) {
        self.data.fill(value);
    }

    /// True if `other` has the same width and height
    #[inline]
    pub fn same_size<U>(&self, other: &Raster<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Check that `other` has the same width and height
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` otherwise.
    pub fn check_same_size<U: Copy>(&self, other: &Raster<U>) -> Result<()> {
        if self.same_size(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        }
    }

    /// Apply a function to every pixel, producing a new raster
    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        F: FnMut(T) -> U,
    {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Combine two same-sized rasters pixel by pixel
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if sizes differ.
    pub fn zip_map<U, V, F>(&self, other: &Raster<U>, mut f: F) -> Result<Raster<V>>
    where
        U: Copy,
        F: FnMut(T, U) -> V,
    {
        self.check_same_size(other)?;
        Ok(Raster {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}

impl FloatRaster {
    /// Find the minimum value and its location
    ///
    /// Returns (min_value, x, y), or None if every value is NaN.
    pub fn min(&self) -> Option<(f32, u32, u32)> {
        let mut best: Option<(f32, usize)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            if best.is_none_or(|(b, _)| v < b) {
                best = Some((v, i));
            }
        }
        best.map(|(v, i)| {
            let (x, y) = self.coords(i);
            (v, x, y)
        })
    }

    /// Find the maximum value and its location
    ///
    /// Returns (max_value, x, y), or None if every value is NaN.
    pub fn max(&self) -> Option<(f32, u32, u32)> {
        let mut best: Option<(f32, usize)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            if best.is_none_or(|(b, _)| v > b) {
                best = Some((v, i));
            }
        }
        best.map(|(v, i)| {
            let (x, y) = self.coords(i);
            (v, x, y)
        })
    }

    /// Get the mean value over all pixels
    pub fn mean(&self) -> f32 {
        (self.sum() / self.data.len() as f64) as f32
    }

    /// Get the sum of all pixel values (accumulated in f64)
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }
}

impl ByteRaster {
    /// True if the pixel at (x, y) is foreground
    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.get_unchecked(x, y) != 0
    }

    /// Count foreground pixels
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// True if no pixel is foreground
    pub fn is_all_background(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Convert to a float raster with foreground = 1.0
    pub fn to_float(&self) -> FloatRaster {
        self.map(|v| if v != 0 { 1.0 } else { 0.0 })
    }
}

impl LabelRaster {
    /// Largest label present (0 if the raster is all background)
    pub fn max_label(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Binary mask of all labeled pixels
    pub fn foreground(&self) -> ByteRaster {
        self.map(|l| u8::from(l != 0))
    }
}
