//! Circular neighbourhood windows and sliding extrema
//!
//! A circular window of radius `r` contains every offset `(dx, dy)` with
//! `dx*dx + dy*dy <= r*r + 1`. Pixels outside the image are ignored rather
//! than padded, so windows shrink at the borders.
//!
//! The window is decomposed into one horizontal run per row offset, and each
//! run is evaluated with a monotonic deque, which makes min/max filtering
//! linear in the number of rows of the window instead of its area.

use std::collections::VecDeque;

use crate::raster::Raster;

/// Horizontal half-extent of a circular window for each row offset
///
/// Returns a vector of length `2r + 1`; entry `i` is the half-width of the
/// run at `dy = i - r`.
pub fn circle_extents(radius: u32) -> Vec<u32> {
    let r = radius as i64;
    let limit = r * r + 1;
    (-r..=r)
        .map(|dy| {
            let mut half = 0i64;
            while (half + 1) * (half + 1) + dy * dy <= limit && half < r + 1 {
                half += 1;
            }
            half as u32
        })
        .collect()
}

/// Sliding extreme of `row` over windows `[x - half, x + half]`
///
/// `prefer(a, b)` returns true when `a` should win over `b` (for example
/// `a >= b` for a maximum). Out-of-range positions are ignored.
pub fn sliding_extreme<T, F>(row: &[T], half: u32, prefer: F) -> Vec<T>
where
    T: Copy,
    F: Fn(T, T) -> bool,
{
    let n = row.len();
    let half = half as usize;
    let mut out = Vec::with_capacity(n);
    let mut deque: VecDeque<usize> = VecDeque::new();
    let mut next = 0usize;

    for x in 0..n {
        let hi = (x + half).min(n - 1);
        while next <= hi {
            while let Some(&back) = deque.back() {
                if prefer(row[next], row[back]) {
                    deque.pop_back();
                } else {
                    break;
                }
            }
            deque.push_back(next);
            next += 1;
        }
        let lo = x.saturating_sub(half);
        while let Some(&front) = deque.front() {
            if front < lo {
                deque.pop_front();
            } else {
                break;
            }
        }
        // Window is never empty since x itself is inside it
        out.push(row[deque[0]]);
    }
    out
}

/// Apply a circular extreme filter to a raster
///
/// Used for min/max filtering of intensities and for binary dilation and
/// erosion of masks.
pub fn circular_extreme<T, F>(src: &Raster<T>, radius: u32, prefer: F) -> Raster<T>
where
    T: Copy + Default,
    F: Fn(T, T) -> bool + Copy,
{
    if radius == 0 {
        return src.clone();
    }
    let (w, h) = src.dimensions();
    let extents = circle_extents(radius);
    let r = radius as i64;

    // Row-wise extremes for each distinct half-width, computed lazily
    let mut cache: Vec<Option<Vec<Vec<T>>>> = vec![None; (radius + 2) as usize];
    for &half in &extents {
        if cache[half as usize].is_none() {
            let rows = (0..h)
                .map(|y| sliding_extreme(src.row(y), half, prefer))
                .collect();
            cache[half as usize] = Some(rows);
        }
    }

    let mut out = src.create_template();
    for y in 0..h as i64 {
        let out_row = out.row_mut(y as u32);
        let mut first = true;
        for (i, &half) in extents.iter().enumerate() {
            let sy = y + i as i64 - r;
            if sy < 0 || sy >= h as i64 {
                continue;
            }
            let Some(rows) = cache[half as usize].as_ref() else {
                continue;
            };
            let src_row = &rows[sy as usize];
            if first {
                out_row.copy_from_slice(src_row);
                first = false;
            } else {
                for x in 0..w as usize {
                    if prefer(src_row[x], out_row[x]) {
                        out_row[x] = src_row[x];
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_extents_radius_one() {
        // r*r + 1 = 2 admits the diagonals
        assert_eq!(circle_extents(1), vec![1, 1, 1]);
    }

    #[test]
    fn test_circle_extents_radius_two() {
        // dy = 0: dx^2 <= 5 -> 2; dy = 1: dx^2 <= 4 -> 2; dy = 2: dx^2 <= 1 -> 1
        assert_eq!(circle_extents(2), vec![1, 2, 2, 2, 1]);
    }

    #[test]
    fn test_sliding_max() {
        let row = [1, 5, 2, 0, 0, 3];
        let out = sliding_extreme(&row, 1, |a, b| a >= b);
        assert_eq!(out, vec![5, 5, 5, 2, 3, 3]);
    }

    #[test]
    fn test_sliding_min_zero_half() {
        let row = [4, 2, 7];
        assert_eq!(sliding_extreme(&row, 0, |a, b| a <= b), vec![4, 2, 7]);
    }

    #[test]
    fn test_circular_max_point() {
        let mut src = Raster::<u8>::new(5, 5).unwrap();
        src.set_pixel(2, 2, 1).unwrap();
        let out = circular_extreme(&src, 1, |a, b| a >= b);
        // radius 1 window is the full 3x3 square
        assert_eq!(out.data().iter().filter(|&&v| v == 1).count(), 9);
        assert_eq!(out.get_pixel(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_circular_min_ignores_outside() {
        let src = Raster::<f32>::new_with_value(3, 3, 2.0).unwrap();
        let out = circular_extreme(&src, 2, |a, b| a <= b);
        assert!(out.data().iter().all(|&v| v == 2.0));
    }
}
