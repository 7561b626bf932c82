//! Raster regression test
//!
//! Tests raster creation, pixel access, mask logic and channel sets.

use cellseg_core::{ByteRaster, ChannelSet, FloatRaster, LabelRaster};
use cellseg_test::{RegParams, disk_mask, two_blob_raster};

// ==========================================================================
// Test 1: creation and access
// ==========================================================================

#[test]
fn raster_reg_creation() {
    let mut rp = RegParams::new("raster_creation");

    let r = FloatRaster::new(640, 480).expect("FloatRaster::new failed");
    rp.compare_values(640.0, r.width() as f64, 0.0);
    rp.compare_values(480.0, r.height() as f64, 0.0);
    rp.check(r.data().iter().all(|&v| v == 0.0), "zero initialised");

    let v = FloatRaster::new_with_value(10, 10, 42.5).unwrap();
    rp.compare_values(42.5 * 100.0, v.sum(), 1e-6);
    rp.check(LabelRaster::new(0, 3).is_err(), "zero width rejected");

    let blobs = two_blob_raster().unwrap();
    let (max, x, y) = blobs.max().unwrap();
    rp.compare_values(1.0, max as f64, 1e-4);
    rp.check(y == 50 && (x == 30 || x == 70), "maximum at a blob centre");

    assert!(rp.cleanup(), "raster_reg creation tests failed");
}

// ==========================================================================
// Test 2: mask logic
// ==========================================================================

#[test]
fn raster_reg_masks() {
    let mut rp = RegParams::new("raster_masks");

    let a = disk_mask(40, 40, 15.0, 20.0, 8.0).unwrap();
    let b = disk_mask(40, 40, 25.0, 20.0, 8.0).unwrap();
    let and = a.and(&b).unwrap();
    let or = a.or(&b).unwrap();
    let only_a = a.and_not(&b).unwrap();

    let (na, nb) = (a.count_foreground(), b.count_foreground());
    rp.compare_values(na as f64, nb as f64, 0.0);
    rp.compare_values(
        (na + nb) as f64,
        (and.count_foreground() + or.count_foreground()) as f64,
        0.0,
    );
    rp.compare_values(
        na as f64,
        (only_a.count_foreground() + and.count_foreground()) as f64,
        0.0,
    );
    rp.compare_rasters(&a.invert().invert(), &a);

    let mismatch = ByteRaster::new(10, 10).unwrap();
    rp.check(a.and(&mismatch).is_err(), "size mismatch rejected");

    assert!(rp.cleanup(), "raster_reg mask tests failed");
}

// ==========================================================================
// Test 3: channel sets
// ==========================================================================

#[test]
fn raster_reg_channels() {
    let mut rp = RegParams::new("raster_channels");

    let blobs = two_blob_raster().unwrap();
    let flat = FloatRaster::new_with_value(100, 100, 0.25).unwrap();
    let set = ChannelSet::new()
        .with_channel("Hematoxylin OD", blobs)
        .unwrap()
        .with_channel("DAB OD", flat)
        .unwrap();
    rp.compare_values(2.0, set.len() as f64, 0.0);
    rp.compare_strings("Hematoxylin OD", set.names()[0]);
    rp.check(set.dimensions() == Some((100, 100)), "dimensions");

    let mut set = set;
    let small = FloatRaster::new(50, 50).unwrap();
    rp.check(set.insert("Residual", small).is_err(), "size mismatch rejected");

    assert!(rp.cleanup(), "raster_reg channel tests failed");
}
