//! Polygon - closed boundary in raster coordinates
//!
//! Vertices are stored once; the closing edge from the last vertex back to
//! the first is implicit. Coordinates are in pixel units with the origin at
//! the top-left corner of pixel (0, 0), so a traced region of `n` pixels has
//! area exactly `n`.
//!
//! # See also
//!
//! - [`smooth`] for interpolation, smoothing and simplification
//! - [`hull`] for convex hulls

pub mod hull;
pub mod smooth;

use crate::error::Result;
use crate::raster::{ByteRaster, LabelRaster};

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1)
    #[inline]
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Axis-aligned bounding box of a polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum x
    pub min_x: f64,
    /// Minimum y
    pub min_y: f64,
    /// Maximum x
    pub max_x: f64,
    /// Maximum y
    pub max_y: f64,
}

impl Bounds {
    /// Width of the box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Closed polygon
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from its vertices
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle with top-left corner (x, y)
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Get the vertices
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if there are no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over edges (a, b), including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Signed area by the shoelace formula
    ///
    /// Positive for clockwise vertex order in image coordinates (y down).
    pub fn signed_area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let twice: f64 = self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum();
        twice / 2.0
    }

    /// Enclosed area
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Length of the closed boundary
    pub fn perimeter(&self) -> f64 {
        if self.vertices.len() < 2 {
            return 0.0;
        }
        self.edges().map(|(a, b)| a.distance(&b)).sum()
    }

    /// True if the polygon cannot enclose any area
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3 || self.area() <= 0.0
    }

    /// Area centroid (vertex mean for degenerate polygons)
    pub fn centroid(&self) -> Option<Point> {
        if self.vertices.is_empty() {
            return None;
        }
        let a = self.signed_area();
        if a == 0.0 {
            let n = self.vertices.len() as f64;
            let sx: f64 = self.vertices.iter().map(|p| p.x).sum();
            let sy: f64 = self.vertices.iter().map(|p| p.y).sum();
            return Some(Point::new(sx / n, sy / n));
        }
        let (mut cx, mut cy) = (0.0, 0.0);
        for (p, q) in self.edges() {
            let cross = p.x * q.y - q.x * p.y;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }
        Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
    }

    /// Bounding box, or None for an empty polygon
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?;
        let mut b = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &self.vertices[1..] {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    /// Even-odd point-in-polygon test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > y) != (b.y > y) {
                let xi = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
                if x < xi {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Visit every pixel whose centre lies inside the polygon
    ///
    /// Pixels outside a `width` x `height` grid are skipped.
    pub fn for_each_pixel<F>(&self, width: u32, height: u32, mut f: F)
    where
        F: FnMut(u32, u32),
    {
        let Some(bounds) = self.bounds() else {
            return;
        };
        let y0 = (bounds.min_y - 0.5).ceil().max(0.0) as i64;
        let y1 = ((bounds.max_y - 0.5).floor() as i64).min(height as i64 - 1);
        let mut xs: Vec<f64> = Vec::new();
        for py in y0..=y1 {
            let yc = py as f64 + 0.5;
            xs.clear();
            for (a, b) in self.edges() {
                if (a.y > yc) != (b.y > yc) {
                    xs.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            xs.sort_by(f64::total_cmp);
            for pair in xs.chunks_exact(2) {
                // Pixel centres px + 0.5 in [pair[0], pair[1])
                let start = (pair[0] - 0.5).ceil().max(0.0) as i64;
                let end = ((pair[1] - 0.5).ceil() as i64).min(width as i64);
                for px in start..end {
                    f(px as u32, py as u32);
                }
            }
        }
    }

    /// Binary mask of the polygon interior
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero.
    pub fn rasterize(&self, width: u32, height: u32) -> Result<ByteRaster> {
        let mut mask = ByteRaster::new(width, height)?;
        self.fill_into(&mut mask, 1);
        Ok(mask)
    }

    /// Write `value` into every pixel of `raster` covered by the polygon
    pub fn fill_into<T: Copy>(&self, raster: &mut crate::raster::Raster<T>, value: T) {
        let (w, h) = raster.dimensions();
        self.for_each_pixel(w, h, |x, y| raster.set_unchecked(x, y, value));
    }

    /// Write `label` into a label raster (convenience for label painting)
    pub fn fill_label(&self, labels: &mut LabelRaster, label: u32) {
        self.fill_into(labels, label);
    }

    /// Uniformly scale all coordinates
    pub fn scaled(&self, factor: f64) -> Polygon {
        Polygon::new(
            self.vertices
                .iter()
                .map(|p| Point::new(p.x * factor, p.y * factor))
                .collect(),
        )
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(vertices: Vec<Point>) -> Self {
        Polygon::new(vertices)
    }
}
