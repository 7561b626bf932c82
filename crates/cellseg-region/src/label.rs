//! Connected-component labeling and label-raster housekeeping
//!
//! Labeling uses the classic two-pass scheme with a union-find table:
//! the first pass assigns provisional labels from already-visited
//! neighbours and records equivalences, the second pass resolves them to
//! dense labels `1..=N` numbered in raster order of first appearance.

use cellseg_core::{ByteRaster, Connectivity, LabelRaster};

use crate::error::RegionResult;

/// Union-find over provisional labels
struct Equivalences {
    parent: Vec<u32>,
}

impl Equivalences {
    fn new() -> Self {
        // Index 0 is the background and never merged
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let l = self.parent.len() as u32;
        self.parent.push(l);
        l
    }

    fn find(&mut self, mut l: u32) -> u32 {
        while self.parent[l as usize] != l {
            let grand = self.parent[self.parent[l as usize] as usize];
            self.parent[l as usize] = grand;
            l = grand;
        }
        l
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Label the connected components of a binary mask
///
/// # Arguments
///
/// * `mask` - Binary mask (nonzero = foreground)
/// * `connectivity` - Neighbourhood defining connectedness
///
/// # Returns
///
/// The label raster and the number of components.
pub fn label_connected_components(
    mask: &ByteRaster,
    connectivity: Connectivity,
) -> RegionResult<(LabelRaster, u32)> {
    let (w, h) = mask.dimensions();
    let mut labels = LabelRaster::new(w, h)?;
    let mut eq = Equivalences::new();
    let causal = connectivity.causal_offsets();

    for y in 0..h {
        for x in 0..w {
            if !mask.is_foreground(x, y) {
                continue;
            }
            let mut current = 0u32;
            for &(dx, dy) in causal {
                let Some(l) = labels.get_signed(x as i64 + dx as i64, y as i64 + dy as i64) else {
                    continue;
                };
                if l == 0 {
                    continue;
                }
                if current == 0 {
                    current = l;
                } else if l != current {
                    eq.union(current, l);
                }
            }
            if current == 0 {
                current = eq.make();
            }
            labels.set_unchecked(x, y, current);
        }
    }

    // Resolve roots to dense labels in order of first appearance
    let mut dense = vec![0u32; eq.parent.len()];
    let mut count = 0u32;
    for v in labels.data_mut() {
        if *v == 0 {
            continue;
        }
        let root = eq.find(*v) as usize;
        if dense[root] == 0 {
            count += 1;
            dense[root] = count;
        }
        *v = dense[root];
    }

    Ok((labels, count))
}

/// Pixel count of every label
///
/// Entry `i` holds the size of label `i + 1`; the vector length is the
/// largest label present.
pub fn component_sizes(labels: &LabelRaster) -> Vec<u32> {
    let mut sizes = vec![0u32; labels.max_label() as usize];
    for &l in labels.data() {
        if l > 0 {
            sizes[l as usize - 1] += 1;
        }
    }
    sizes
}

/// Renumber the labels present to `1..=N`, preserving their order
///
/// # Returns
///
/// The renumbered raster and `N`.
pub fn relabel_dense(labels: &LabelRaster) -> (LabelRaster, u32) {
    let max = labels.max_label() as usize;
    let mut present = vec![false; max + 1];
    for &l in labels.data() {
        present[l as usize] = true;
    }
    let mut map = vec![0u32; max + 1];
    let mut next = 0u32;
    for (l, &p) in present.iter().enumerate().skip(1) {
        if p {
            next += 1;
            map[l] = next;
        }
    }
    (labels.map(|l| map[l as usize]), next)
}

/// Keep only the labels for which `keep` returns true
pub fn retain_labels<F>(labels: &LabelRaster, mut keep: F) -> LabelRaster
where
    F: FnMut(u32) -> bool,
{
    let max = labels.max_label() as usize;
    let decisions: Vec<bool> = (0..=max as u32).map(|l| l > 0 && keep(l)).collect();
    labels.map(|l| if decisions[l as usize] { l } else { 0 })
}

/// Pull apart touching labels
///
/// A pixel is cleared when one of its 4-neighbours carries a different,
/// smaller nonzero label. The result has no two distinct labels 4-adjacent.
pub fn separate_touching(labels: &LabelRaster) -> LabelRaster {
    let (w, h) = labels.dimensions();
    let mut out = labels.clone();
    for y in 0..h {
        for x in 0..w {
            let l = labels.get_unchecked(x, y);
            if l == 0 {
                continue;
            }
            let touches_smaller = Connectivity::FourWay.neighbors(x, y, w, h).any(|(nx, ny)| {
                let n = labels.get_unchecked(nx, ny);
                n != 0 && n < l
            });
            if touches_smaller {
                out.set_unchecked(x, y, 0);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> ByteRaster {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        let data = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| u8::from(b == b'#')))
            .collect();
        ByteRaster::from_data(w, h, data).unwrap()
    }

    #[test]
    fn test_u_shape_merges() {
        let m = mask_from(&["#.#", "#.#", "###"]);
        let (labels, n) = label_connected_components(&m, Connectivity::FourWay).unwrap();
        assert_eq!(n, 1);
        assert_eq!(labels.get_pixel(2, 0).unwrap(), 1);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let m = mask_from(&["#..", ".#.", "..#"]);
        let (_, n4) = label_connected_components(&m, Connectivity::FourWay).unwrap();
        let (_, n8) = label_connected_components(&m, Connectivity::EightWay).unwrap();
        assert_eq!(n4, 3);
        assert_eq!(n8, 1);
    }

    #[test]
    fn test_dense_order() {
        let m = mask_from(&["..#", "#..", "..."]);
        let (labels, n) = label_connected_components(&m, Connectivity::FourWay).unwrap();
        assert_eq!(n, 2);
        assert_eq!(labels.get_pixel(2, 0).unwrap(), 1);
        assert_eq!(labels.get_pixel(0, 1).unwrap(), 2);
        assert_eq!(component_sizes(&labels), vec![1, 1]);
    }

    #[test]
    fn test_relabel_and_retain() {
        let labels = LabelRaster::from_data(4, 1, vec![0, 5, 9, 5]).unwrap();
        let (dense, n) = relabel_dense(&labels);
        assert_eq!(n, 2);
        assert_eq!(dense.data(), &[0, 1, 2, 1]);
        let kept = retain_labels(&labels, |l| l == 9);
        assert_eq!(kept.data(), &[0, 0, 9, 0]);
    }

    #[test]
    fn test_separate_touching() {
        let labels = LabelRaster::from_data(4, 1, vec![1, 1, 2, 2]).unwrap();
        let out = separate_touching(&labels);
        assert_eq!(out.data(), &[1, 1, 0, 2]);
    }
}
