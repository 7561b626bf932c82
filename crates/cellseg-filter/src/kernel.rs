//! Convolution kernels
//!
//! Defines kernel structures for raster convolution operations.

use crate::{FilterError, FilterResult};

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// Create a zeroed kernel with the center in the middle
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidKernel` if either dimension is 0.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; (width * height) as usize],
        })
    }

    /// Create a kernel from row-major values
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length doesn't match the dimensions.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values for a {width}x{height} kernel, got {}",
                kernel.data.len(),
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Create a normalized horizontal 1D Gaussian kernel
    ///
    /// The half-width is `ceil(3.5 * sigma)`, at least 1.
    pub fn gaussian_1d(sigma: f32) -> FilterResult<Self> {
        if sigma.is_nan() || sigma <= 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "sigma must be positive, got {sigma}"
            )));
        }
        let radius = ((3.5 * sigma).ceil() as u32).max(1);
        let mut kernel = Self::new(2 * radius + 1, 1)?;
        let denom = 2.0 * sigma * sigma;
        for (i, v) in kernel.data.iter_mut().enumerate() {
            let d = i as f32 - radius as f32;
            *v = (-(d * d) / denom).exp();
        }
        kernel.normalize();
        Ok(kernel)
    }

    /// 3x3 discrete Laplacian, positive at bright blob centres
    ///
    /// ```text
    ///  0 -1  0
    /// -1  4 -1
    ///  0 -1  0
    /// ```
    pub fn laplacian() -> Self {
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0],
        }
    }

    /// Swap rows and columns
    pub fn transposed(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                data[(x * self.height + y) as usize] = self.data[(y * self.width + x) as usize];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cx: self.cy,
            cy: self.cx,
            data,
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set a value at (x, y); out-of-range positions are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = value;
        }
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// Kernels summing to (nearly) zero are left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() >= 1e-6 {
            for v in &mut self.data {
                *v /= sum;
            }
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
