//! Convex hull (Andrew's monotone chain)

use super::{Point, Polygon};

fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull of a point set
///
/// Collinear points on hull edges are dropped. Fewer than three distinct
/// input points give a hull with the same (deduplicated) points.
pub fn convex_hull(points: &[Point]) -> Polygon {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return Polygon::new(pts);
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    Polygon::new(lower)
}

impl Polygon {
    /// Convex hull of this polygon's vertices
    pub fn convex_hull(&self) -> Polygon {
        convex_hull(self.vertices())
    }
}
