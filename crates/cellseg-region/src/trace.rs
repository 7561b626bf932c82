//! Boundary tracing along pixel cracks
//!
//! The outer boundary of a 4-connected region is followed along the edges
//! between pixels ("cracks"), keeping the region on the right-hand side.
//! Vertices are emitted only where the direction changes, and lie on
//! integer pixel-corner coordinates, so the traced polygon encloses
//! exactly the pixels of the region (holes are not traced).

use cellseg_core::{LabelRaster, Point, Polygon};

use crate::error::{RegionError, RegionResult};

/// Direction of travel along a crack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    East,
    South,
    West,
    North,
}

impl Heading {
    fn step(self) -> (i64, i64) {
        match self {
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
            Heading::North => (0, -1),
        }
    }

    fn right(self) -> Self {
        match self {
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
            Heading::North => Heading::East,
        }
    }

    fn left(self) -> Self {
        match self {
            Heading::East => Heading::North,
            Heading::South => Heading::East,
            Heading::West => Heading::South,
            Heading::North => Heading::West,
        }
    }

    /// Pixel offsets (relative to a corner) ahead-left and ahead-right
    ///
    /// The pixel with offset (0, 0) is the one whose top-left corner is
    /// the current corner.
    fn ahead(self) -> ((i64, i64), (i64, i64)) {
        match self {
            Heading::East => ((0, -1), (0, 0)),
            Heading::South => ((0, 0), (-1, 0)),
            Heading::West => ((-1, 0), (-1, -1)),
            Heading::North => ((-1, -1), (0, -1)),
        }
    }
}

/// Trace the region containing the first pixel (in raster order) that
/// carries `label`
///
/// # Returns
///
/// `None` if the label does not occur.
pub fn trace_label(labels: &LabelRaster, label: u32) -> RegionResult<Option<Polygon>> {
    if label == 0 {
        return Err(RegionError::InvalidParameters(
            "cannot trace the background label".to_string(),
        ));
    }
    let Some(start) = labels.data().iter().position(|&l| l == label) else {
        return Ok(None);
    };
    let (x, y) = labels.coords(start);
    trace_from(labels, label, x, y).map(Some)
}

/// Trace every label present, in ascending label order
///
/// Each label is traced from its first pixel in raster order; a label
/// split into several pieces yields the boundary of the first piece.
pub fn trace_labels(labels: &LabelRaster) -> RegionResult<Vec<(u32, Polygon)>> {
    let max = labels.max_label() as usize;
    let mut first: Vec<Option<usize>> = vec![None; max + 1];
    for (i, &l) in labels.data().iter().enumerate() {
        if l != 0 && first[l as usize].is_none() {
            first[l as usize] = Some(i);
        }
    }
    let mut out = Vec::new();
    for (label, start) in first.iter().enumerate() {
        if let Some(i) = *start {
            let (x, y) = labels.coords(i);
            out.push((label as u32, trace_from(labels, label as u32, x, y)?));
        }
    }
    Ok(out)
}

/// Follow the crack boundary starting at the top-left corner of (x0, y0),
/// which must be the first pixel of its region in raster order
fn trace_from(labels: &LabelRaster, label: u32, x0: u32, y0: u32) -> RegionResult<Polygon> {
    let inside = |cx: i64, cy: i64, (dx, dy): (i64, i64)| labels.get_signed(cx + dx, cy + dy) == Some(label);

    let start = (x0 as i64, y0 as i64);
    let mut pos = start;
    let mut heading = Heading::East;
    let mut vertices = vec![Point::new(pos.0 as f64, pos.1 as f64)];

    let (w, h) = labels.dimensions();
    let limit = 4 * (w as usize + 1) * (h as usize + 1);
    for _ in 0..limit {
        let (dx, dy) = heading.step();
        pos = (pos.0 + dx, pos.1 + dy);

        let (left_ahead, right_ahead) = heading.ahead();
        let next = if !inside(pos.0, pos.1, right_ahead) {
            heading.right()
        } else if inside(pos.0, pos.1, left_ahead) {
            heading.left()
        } else {
            heading
        };

        if next != heading {
            vertices.push(Point::new(pos.0 as f64, pos.1 as f64));
        }
        heading = next;

        if pos == start && heading == Heading::East {
            // The start corner was pushed twice
            vertices.pop();
            return Ok(Polygon::new(vertices));
        }
    }

    Err(RegionError::SegmentationError(format!(
        "boundary of label {label} did not close"
    )))
}
