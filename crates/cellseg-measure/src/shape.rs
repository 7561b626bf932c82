//! Shape measurements of polygon boundaries
//!
//! Everything is computed from the polygon geometry alone, in the
//! polygon's coordinate units.

use cellseg_core::{Point, Polygon};
use std::f64::consts::PI;

/// Shape features of a single boundary
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeMeasurements {
    /// Enclosed area
    pub area: f64,
    /// Boundary length
    pub perimeter: f64,
    /// `4 * pi * area / perimeter^2`, at most 1
    pub circularity: f64,
    /// Largest distance between two boundary points
    pub max_caliper: f64,
    /// Smallest width over all directions
    pub min_caliper: f64,
    /// Eccentricity of the ellipse with the same second moments
    pub eccentricity: f64,
}

impl ShapeMeasurements {
    /// Measure a polygon
    ///
    /// Degenerate polygons give zero for every feature that needs an
    /// enclosed area.
    pub fn from_polygon(polygon: &Polygon) -> Self {
        let area = polygon.area();
        let perimeter = polygon.perimeter();
        let circularity = if perimeter > 0.0 && area > 0.0 {
            (4.0 * PI * area / (perimeter * perimeter)).min(1.0)
        } else {
            0.0
        };
        let hull = polygon.convex_hull();
        let (max_caliper, min_caliper) = calipers(hull.vertices());
        Self {
            area,
            perimeter,
            circularity,
            max_caliper,
            min_caliper,
            eccentricity: eccentricity(polygon),
        }
    }
}

/// (maximum, minimum) caliper diameters of a convex hull
fn calipers(hull: &[Point]) -> (f64, f64) {
    let n = hull.len();
    if n < 2 {
        return (0.0, 0.0);
    }
    let mut max_d: f64 = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            max_d = max_d.max(hull[i].distance(&hull[j]));
        }
    }
    if n < 3 {
        return (max_d, 0.0);
    }
    // The minimum width is attained with one side flush against a hull edge
    let mut min_w = f64::INFINITY;
    for i in 0..n {
        let a = hull[i];
        let b = hull[(i + 1) % n];
        let len = a.distance(&b);
        if len == 0.0 {
            continue;
        }
        let width = hull
            .iter()
            .map(|p| ((b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)).abs() / len)
            .fold(0.0, f64::max);
        min_w = min_w.min(width);
    }
    (max_d, if min_w.is_finite() { min_w } else { 0.0 })
}

/// Eccentricity from the central second moments of the polygon area
fn eccentricity(polygon: &Polygon) -> f64 {
    if polygon.is_degenerate() {
        return 0.0;
    }
    let Some(c) = polygon.centroid() else {
        return 0.0;
    };
    let (mut a2, mut mxx, mut myy, mut mxy) = (0.0, 0.0, 0.0, 0.0);
    for (p, q) in polygon.edges() {
        let (x0, y0) = (p.x - c.x, p.y - c.y);
        let (x1, y1) = (q.x - c.x, q.y - c.y);
        let cross = x0 * y1 - x1 * y0;
        a2 += cross;
        mxx += (x0 * x0 + x0 * x1 + x1 * x1) * cross;
        myy += (y0 * y0 + y0 * y1 + y1 * y1) * cross;
        mxy += (x0 * y1 + 2.0 * x0 * y0 + 2.0 * x1 * y1 + x1 * y0) * cross;
    }
    if a2 == 0.0 {
        return 0.0;
    }
    // Normalising by the signed area cancels the orientation
    let area = a2 / 2.0;
    let mu20 = mxx / 12.0 / area;
    let mu02 = myy / 12.0 / area;
    let mu11 = mxy / 24.0 / area;

    let half_trace = (mu20 + mu02) / 2.0;
    let root = (((mu20 - mu02) / 2.0).powi(2) + mu11 * mu11).sqrt();
    let l_max = half_trace + root;
    let l_min = (half_trace - root).max(0.0);
    if l_max <= 0.0 {
        return 0.0;
    }
    (1.0 - l_min / l_max).clamp(0.0, 1.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        let s = ShapeMeasurements::from_polygon(&Polygon::rectangle(0.0, 0.0, 4.0, 4.0));
        assert_eq!(s.area, 16.0);
        assert_eq!(s.perimeter, 16.0);
        assert!((s.circularity - PI / 4.0).abs() < 1e-12);
        assert!((s.max_caliper - 32f64.sqrt()).abs() < 1e-12);
        assert!((s.min_caliper - 4.0).abs() < 1e-12);
        assert!(s.eccentricity.abs() < 1e-6);
    }

    #[test]
    fn test_rectangle_eccentricity() {
        // Variances 4^2/12 and 2^2/12, so e = sqrt(1 - 1/4)
        let s = ShapeMeasurements::from_polygon(&Polygon::rectangle(3.0, 7.0, 4.0, 2.0));
        assert!((s.eccentricity - 0.75f64.sqrt()).abs() < 1e-9);
        assert!((s.min_caliper - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_orientation_independent() {
        let p = Polygon::rectangle(0.0, 0.0, 6.0, 2.0);
        let mut rev = p.vertices().to_vec();
        rev.reverse();
        let a = ShapeMeasurements::from_polygon(&p);
        let b = ShapeMeasurements::from_polygon(&Polygon::new(rev));
        assert!((a.eccentricity - b.eccentricity).abs() < 1e-12);
        assert_eq!(a.area, b.area);
    }

    #[test]
    fn test_degenerate() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
        let s = ShapeMeasurements::from_polygon(&line);
        assert_eq!(s.area, 0.0);
        assert_eq!(s.circularity, 0.0);
        assert_eq!(s.eccentricity, 0.0);
        assert_eq!(s.min_caliper, 0.0);
    }
}
