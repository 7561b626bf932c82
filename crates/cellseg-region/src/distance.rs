//! Exact Euclidean distance transform
//!
//! Uses the separable lower-envelope-of-parabolas algorithm: a 1D squared
//! distance transform along every column, then along every row of the
//! intermediate result. Runs in linear time and gives exact distances.

use cellseg_core::{ByteRaster, FloatRaster};

use crate::error::RegionResult;

/// Boundary condition for distance computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryCondition {
    /// Treat everything outside the raster as background, so distances
    /// never exceed the distance to the raster edge
    #[default]
    Background,
    /// Ignore the outside of the raster
    Foreground,
}

const FAR: f64 = 1e20;

/// 1D squared distance transform of a sampled function `f`
fn transform_1d(f: &[f64], out: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    if n == 0 {
        return;
    }
    let mut k = 0usize;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;
    for q in 1..n {
        if f[q] >= FAR {
            continue;
        }
        loop {
            let p = v[k];
            if f[p] >= FAR {
                // Replace an infinite parabola outright
                v[k] = q;
                z[k + 1] = f64::INFINITY;
                break;
            }
            let s = ((f[q] + (q * q) as f64) - (f[p] + (p * p) as f64)) / (2.0 * (q as f64 - p as f64));
            if s <= z[k] {
                if k == 0 {
                    v[0] = q;
                    z[1] = f64::INFINITY;
                    break;
                }
                k -= 1;
                continue;
            }
            k += 1;
            v[k] = q;
            z[k] = s;
            z[k + 1] = f64::INFINITY;
            break;
        }
    }
    if f[v[0]] >= FAR {
        out.fill(FAR);
        return;
    }
    k = 0;
    for (q, o) in out.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let p = v[k];
        let d = q as f64 - p as f64;
        *o = d * d + f[p];
    }
}

/// Squared distances on a `w` x `h` grid where `grid` is 0 at sources
/// and `FAR` elsewhere
fn squared_distances(grid: &mut [f64], w: usize, h: usize) {
    let n = w.max(h);
    let mut f = vec![0.0; n];
    let mut out = vec![0.0; n];
    let mut v = vec![0usize; n];
    let mut z = vec![0.0; n + 1];

    for x in 0..w {
        for y in 0..h {
            f[y] = grid[y * w + x];
        }
        transform_1d(&f[..h], &mut out[..h], &mut v, &mut z);
        for y in 0..h {
            grid[y * w + x] = out[y];
        }
    }
    for y in 0..h {
        f[..w].copy_from_slice(&grid[y * w..(y + 1) * w]);
        transform_1d(&f[..w], &mut out[..w], &mut v, &mut z);
        grid[y * w..(y + 1) * w].copy_from_slice(&out[..w]);
    }
}

/// Distance from every foreground pixel to the nearest background pixel
///
/// Background pixels get 0. If no background pixel exists (and the
/// boundary condition does not supply one) distances are infinite.
///
/// # Arguments
///
/// * `mask` - Binary mask (nonzero = foreground)
/// * `boundary` - How to treat the outside of the raster
pub fn euclidean_distance(
    mask: &ByteRaster,
    boundary: BoundaryCondition,
) -> RegionResult<FloatRaster> {
    let (w, h) = mask.dimensions();
    let pad = match boundary {
        BoundaryCondition::Background => 1usize,
        BoundaryCondition::Foreground => 0usize,
    };
    let (gw, gh) = (w as usize + 2 * pad, h as usize + 2 * pad);
    let mut grid = vec![0.0f64; gw * gh];
    for gy in 0..gh {
        for gx in 0..gw {
            let inside = gx >= pad && gy >= pad && gx < gw - pad && gy < gh - pad;
            let fg = inside && mask.is_foreground((gx - pad) as u32, (gy - pad) as u32);
            grid[gy * gw + gx] = if fg { FAR } else { 0.0 };
        }
    }

    squared_distances(&mut grid, gw, gh);

    let mut out = FloatRaster::new(w, h)?;
    for y in 0..h as usize {
        for x in 0..w as usize {
            let d2 = grid[(y + pad) * gw + x + pad];
            let d = if d2 >= FAR { f32::INFINITY } else { d2.sqrt() as f32 };
            out.set_unchecked(x as u32, y as u32, d);
        }
    }
    Ok(out)
}

/// Distance from every pixel to the nearest foreground pixel
///
/// Foreground pixels get 0. The outside of the raster is ignored, so an
/// empty mask yields infinite distances everywhere.
pub fn outward_distance(mask: &ByteRaster) -> RegionResult<FloatRaster> {
    euclidean_distance(&mask.invert(), BoundaryCondition::Foreground)
}
