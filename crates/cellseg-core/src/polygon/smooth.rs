//! Boundary interpolation, smoothing and simplification
//!
//! Traced boundaries follow pixel cracks and therefore have a staircase
//! shape. [`smooth_boundary`] turns them into rounder outlines by
//! resampling at unit spacing and averaging neighbouring vertices, and
//! [`simplify`] removes vertices that no longer carry shape information.

use super::{Point, Polygon};

/// Resample a polygon so that no edge is longer than `spacing`
///
/// Original vertices are kept; each edge is split into equal parts.
pub fn interpolate(polygon: &Polygon, spacing: f64) -> Polygon {
    if polygon.len() < 2 || spacing <= 0.0 {
        return polygon.clone();
    }
    let mut out = Vec::with_capacity(polygon.len());
    for (a, b) in polygon.edges() {
        let len = a.distance(&b);
        let parts = ((len / spacing).ceil() as usize).max(1);
        for k in 0..parts {
            out.push(a.lerp(&b, k as f64 / parts as f64));
        }
    }
    Polygon::new(out)
}

/// One pass of cyclic 3-point averaging
pub fn smooth(polygon: &Polygon) -> Polygon {
    let v = polygon.vertices();
    let n = v.len();
    if n < 3 {
        return polygon.clone();
    }
    let out = (0..n)
        .map(|i| {
            let prev = v[(i + n - 1) % n];
            let next = v[(i + 1) % n];
            Point::new(
                (prev.x + v[i].x + next.x) / 3.0,
                (prev.y + v[i].y + next.y) / 3.0,
            )
        })
        .collect();
    Polygon::new(out)
}

/// Smooth a traced boundary: two rounds of unit-spacing interpolation
/// followed by 3-point averaging
pub fn smooth_boundary(polygon: &Polygon) -> Polygon {
    let once = smooth(&interpolate(polygon, 1.0));
    smooth(&interpolate(&once, 1.0))
}

/// Douglas-Peucker simplification of a closed polygon
///
/// The ring is split at the first vertex and the vertex farthest from it,
/// and each half is simplified independently. Returns the input unchanged
/// when it has fewer than four vertices or `tolerance <= 0`.
pub fn simplify(polygon: &Polygon, tolerance: f64) -> Polygon {
    let v = polygon.vertices();
    let n = v.len();
    if n < 4 || tolerance <= 0.0 {
        return polygon.clone();
    }

    let far = (1..n)
        .max_by(|&i, &j| v[0].distance(&v[i]).total_cmp(&v[0].distance(&v[j])))
        .unwrap_or(n / 2);

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[far] = true;
    douglas_peucker(v, 0, far, tolerance, &mut keep);

    // Second half wraps around to vertex 0
    let mut ring: Vec<Point> = v[far..].to_vec();
    ring.push(v[0]);
    let mut keep_ring = vec![false; ring.len()];
    let last = ring.len() - 1;
    douglas_peucker(&ring, 0, last, tolerance, &mut keep_ring);
    for (k, &kept) in keep_ring.iter().enumerate().take(last).skip(1) {
        if kept {
            keep[far + k] = true;
        }
    }

    let out: Vec<Point> = v
        .iter()
        .zip(keep.iter())
        .filter(|&(_, &k)| k)
        .map(|(p, _)| *p)
        .collect();
    if out.len() < 3 {
        return polygon.clone();
    }
    Polygon::new(out)
}

fn douglas_peucker(points: &[Point], first: usize, last: usize, tolerance: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let (a, b) = (points[first], points[last]);
    let mut max_dist = 0.0;
    let mut index = first;
    for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
        let d = segment_distance(p, &a, &b);
        if d > max_dist {
            max_dist = d;
            index = i;
        }
    }
    if max_dist > tolerance {
        keep[index] = true;
        douglas_peucker(points, first, index, tolerance, keep);
        douglas_peucker(points, index, last, tolerance, keep);
    }
}

/// Distance from `p` to the segment `a`-`b`
fn segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(&Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_spacing() {
        let r = Polygon::rectangle(0.0, 0.0, 4.0, 2.0);
        let dense = interpolate(&r, 1.0);
        assert_eq!(dense.len(), 12);
        assert!((dense.perimeter() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_smooth_preserves_centroid() {
        let r = Polygon::rectangle(0.0, 0.0, 6.0, 6.0);
        let s = smooth_boundary(&r);
        let c = s.centroid().unwrap();
        assert!((c.x - 3.0).abs() < 1e-9);
        assert!((c.y - 3.0).abs() < 1e-9);
        assert!(s.area() < r.area());
        assert!(s.area() > 30.0);
    }

    #[test]
    fn test_simplify_removes_collinear() {
        let dense = interpolate(&Polygon::rectangle(0.0, 0.0, 10.0, 5.0), 1.0);
        let simple = simplify(&dense, 0.5);
        assert_eq!(simple.len(), 4);
        assert!((simple.area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_simplify_small_input_unchanged() {
        let tri = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert_eq!(simplify(&tri, 1.0), tri);
    }
}
