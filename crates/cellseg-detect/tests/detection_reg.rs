//! Detection regression test
//!
//! Runs the full nucleus/cell detection on synthetic blob images:
//! separated and touching blobs, thresholds, boundary refinement, bright
//! background exclusion, expansion, caching and interruption.
//!
//! Run with:
//! ```
//! cargo test -p cellseg-detect --test detection_reg
//! ```

use cellseg_core::{ChannelSet, FloatRaster, Polygon};
use cellseg_detect::{
    CancelToken, CellClass, CellDetector, DetectError, DetectionInput, DetectionParams,
    ExpansionMode, MembraneMeasurement, ObjectKind, Plane, PositivityParams, RegionId, Stage,
};
use cellseg_test::{Blob, RegParams, disk_mask, gaussian_blobs, two_blob_raster};

fn separated_input() -> DetectionInput {
    DetectionInput::new(RegionId(1), two_blob_raster().unwrap()).with_full_roi()
}

fn touching_input() -> DetectionInput {
    let img = gaussian_blobs(
        100,
        100,
        0.0,
        &[Blob::new(45.0, 50.0, 4.0, 1.0), Blob::new(55.0, 50.0, 4.0, 1.0)],
    )
    .unwrap();
    DetectionInput::new(RegionId(2), img).with_full_roi()
}

fn stained_input() -> DetectionInput {
    let img = two_blob_raster().unwrap();
    let dab = FloatRaster::new_with_value(100, 100, 0.25).unwrap();
    let nucleus_channels = ChannelSet::new()
        .with_channel("Hematoxylin OD", img.clone())
        .unwrap();
    let cell_channels = ChannelSet::new().with_channel("DAB OD", dab).unwrap();
    DetectionInput::new(RegionId(3), img)
        .with_nucleus_channels(nucleus_channels)
        .with_cell_channels(cell_channels)
        .with_full_roi()
}

/// Number of pixels covered by more than one polygon
fn overlapping_pixels(polygons: &[&Polygon], width: u32, height: u32) -> usize {
    let mut cover = vec![0u32; (width * height) as usize];
    for p in polygons {
        p.for_each_pixel(width, height, |x, y| cover[(y * width + x) as usize] += 1);
    }
    cover.iter().filter(|&&c| c > 1).count()
}

#[test]
fn detection_reg_separated_blobs() {
    let mut rp = RegParams::new("detection_separated");

    let input = separated_input();
    let mut detector = CellDetector::new();
    let params = DetectionParams::default().with_threshold(0.3);
    let result = detector.detect(&input, &params).unwrap();

    rp.compare_values(2.0, result.len() as f64, 0.0);
    for obj in &result.objects {
        let circ = obj.measurements().get("Nucleus: Circularity").unwrap_or(0.0);
        rp.check(circ > 0.8, "round nucleus");
        rp.check(obj.kind() == ObjectKind::Cell, "expanded cell");
    }
    rp.compare_strings("2 cells detected", &result.summary);

    // Above the peak nothing survives
    let none = detector
        .detect(&input, &params.clone().with_threshold(1.5))
        .unwrap();
    rp.compare_values(0.0, none.len() as f64, 0.0);
    rp.check(!none.cancelled, "not cancelled");

    assert!(rp.cleanup(), "detection_reg separated tests failed");
}

#[test]
fn detection_reg_split_by_shape() {
    let mut rp = RegParams::new("detection_split");

    let input = touching_input();
    let mut detector = CellDetector::new();
    let params = DetectionParams::default()
        .with_background_radius(0)
        .with_cell_expansion(0.0, ExpansionMode::Unconstrained);

    let split = detector.detect(&input, &params).unwrap();
    rp.compare_values(2.0, split.len() as f64, 0.0);
    rp.check(
        split.objects.iter().all(|o| o.kind() == ObjectKind::NucleusOnly),
        "nucleus-only objects",
    );
    rp.check(split.objects.iter().all(|o| o.nucleus().is_none()), "no nested nucleus");

    let merged = detector
        .detect(&input, &params.clone().with_watershed_post_process(false))
        .unwrap();
    rp.compare_values(1.0, merged.len() as f64, 0.0);
    rp.compare_values(1.0, detector.seed_passes() as f64, 0.0);

    assert!(rp.cleanup(), "detection_reg split tests failed");
}

#[test]
fn detection_reg_disjoint_and_area() {
    let mut rp = RegParams::new("detection_disjoint");

    // Unsmoothed, unsimplified boundaries are exact pixel outlines
    let exact = DetectionParams::default()
        .with_background_radius(0)
        .with_cell_expansion(0.0, ExpansionMode::Unconstrained)
        .with_smooth_boundaries(false)
        .with_downsample(0.01);

    let input = touching_input();
    let mut detector = CellDetector::new();
    let result = detector.detect(&input, &exact).unwrap();
    rp.compare_values(2.0, result.len() as f64, 0.0);
    let polygons: Vec<&Polygon> = result.objects.iter().map(|o| o.boundary()).collect();
    rp.compare_values(0.0, overlapping_pixels(&polygons, 100, 100) as f64, 0.0);

    for obj in &result.objects {
        let area = obj.measurements().get("Nucleus: Area").unwrap_or(0.0);
        rp.check((10.0..=400.0).contains(&area), "area within default limits");
    }

    let small_only = detector
        .detect(&input, &exact.clone().with_area_range(0.0, 50.0))
        .unwrap();
    rp.compare_values(0.0, small_only.len() as f64, 0.0);
    let large_only = detector
        .detect(&input, &exact.clone().with_area_range(500.0, 0.0))
        .unwrap();
    rp.compare_values(0.0, large_only.len() as f64, 0.0);

    assert!(rp.cleanup(), "detection_reg disjoint tests failed");
}

#[test]
fn detection_reg_cells() {
    let mut rp = RegParams::new("detection_cells");

    let input = stained_input();
    let mut detector = CellDetector::new();
    let params = DetectionParams::default()
        .with_threshold(0.3)
        .with_membrane(MembraneMeasurement::Partitioned);
    let result = detector.detect(&input, &params).unwrap();
    rp.compare_values(2.0, result.len() as f64, 0.0);

    for obj in &result.objects {
        let m = obj.measurements();
        let Some(nucleus) = obj.nucleus() else {
            rp.check(false, "nucleus attached");
            continue;
        };
        rp.check(
            nucleus.boundary().area() <= obj.boundary().area(),
            "nucleus inside cell",
        );
        let ratio = m.get("Nucleus/Cell area ratio").unwrap_or(f64::NAN);
        rp.check(ratio > 0.0 && ratio <= 1.0, "area ratio in (0, 1]");
        rp.check(m.contains("Nucleus: Hematoxylin OD mean"), "nucleus intensity");
        rp.compare_values(0.25, m.get("Cytoplasm: DAB OD mean").unwrap_or(f64::NAN), 1e-6);
        rp.compare_values(0.0, m.get("Membrane: DAB OD std dev").unwrap_or(f64::NAN), 1e-6);
        rp.check(m.contains("Cell: Max caliper"), "cell shape");
    }

    // Without nuclei the cells stand alone and carry no ratio
    let bare = detector
        .detect(&input, &params.clone().with_include_nuclei(false))
        .unwrap();
    rp.check(bare.objects.iter().all(|o| o.nucleus().is_none()), "no nuclei");
    rp.check(
        bare.objects
            .iter()
            .all(|o| !o.measurements().contains("Nucleus/Cell area ratio")),
        "no ratio",
    );

    let quiet = detector
        .detect(&input, &params.clone().with_make_measurements(false))
        .unwrap();
    rp.check(quiet.objects.iter().all(|o| o.measurements().is_empty()), "no measurements");

    assert!(rp.cleanup(), "detection_reg cells tests failed");
}

#[test]
fn detection_reg_size_limited() {
    let mut rp = RegParams::new("detection_size_limited");

    let input = separated_input();
    let mut detector = CellDetector::new();
    let base = DetectionParams::default().with_threshold(0.3);
    let free = detector
        .detect(&input, &base.clone().with_cell_expansion(10.0, ExpansionMode::Unconstrained))
        .unwrap();
    let limited = detector
        .detect(&input, &base.clone().with_cell_expansion(10.0, ExpansionMode::SizeLimited))
        .unwrap();
    rp.compare_values(2.0, free.len() as f64, 0.0);
    rp.compare_values(2.0, limited.len() as f64, 0.0);
    for (f, l) in free.objects.iter().zip(&limited.objects) {
        rp.check(l.boundary().area() < f.boundary().area(), "limited cells are smaller");
    }
    rp.compare_values(1.0, detector.seed_passes() as f64, 0.0);

    assert!(rp.cleanup(), "detection_reg size limited tests failed");
}

#[test]
fn detection_reg_caching() {
    let mut rp = RegParams::new("detection_caching");

    let input = separated_input();
    let params = DetectionParams::default().with_threshold(0.3);

    // Two independent detectors agree
    let a = CellDetector::new().detect(&input, &params).unwrap();
    let b = CellDetector::new().detect(&input, &params).unwrap();
    rp.check(a == b, "idempotent");

    let mut detector = CellDetector::new();
    detector.detect(&input, &params).unwrap();
    rp.compare_values(1.0, detector.seed_passes() as f64, 0.0);

    // Later-stage parameters reuse the seeds
    let later = [
        params.clone().with_area_range(20.0, 300.0),
        params.clone().with_threshold(0.2),
        params.clone().with_max_background(0.5),
        params.clone().with_merge_all(false),
        params.clone().with_cell_expansion(3.0, ExpansionMode::SizeLimited),
        params.clone().with_smooth_boundaries(false),
    ];
    for p in &later {
        detector.detect(&input, p).unwrap();
    }
    rp.compare_values(1.0, detector.seed_passes() as f64, 0.0);

    // Seed parameters, region and plane force a new seed pass
    detector.detect(&input, &params.clone().with_sigma(2.0)).unwrap();
    rp.compare_values(2.0, detector.seed_passes() as f64, 0.0);
    let moved = DetectionInput {
        region: RegionId(99),
        ..input.clone()
    };
    detector.detect(&moved, &params).unwrap();
    rp.compare_values(3.0, detector.seed_passes() as f64, 0.0);
    detector
        .detect(&moved.clone().with_plane(Plane::new(1, 0)), &params)
        .unwrap();
    rp.compare_values(4.0, detector.seed_passes() as f64, 0.0);

    // Unchanged inputs return the cached result
    let again = detector
        .detect(&moved.clone().with_plane(Plane::new(1, 0)), &params)
        .unwrap();
    rp.compare_values(4.0, detector.seed_passes() as f64, 0.0);
    rp.check(again == a, "same objects on the same raster");

    assert!(rp.cleanup(), "detection_reg caching tests failed");
}

#[test]
fn detection_reg_cancellation() {
    let mut rp = RegParams::new("detection_cancel");

    let input = separated_input();
    let params = DetectionParams::default().with_threshold(0.3);
    let mut detector = CellDetector::new();
    let full = detector.detect(&input, &params).unwrap();

    // Cancelled mid-pipeline with different parameters
    let stop_at_expansion = |s: Stage| s == Stage::Expansion;
    let changed = params.clone().with_area_range(5.0, 1000.0);
    let cancelled = detector
        .detect_with_interrupt(&input, &changed, &stop_at_expansion)
        .unwrap();
    rp.check(cancelled.cancelled, "cancelled flag");
    rp.compare_values(0.0, cancelled.len() as f64, 0.0);

    // The earlier result is still cached
    let again = detector.detect(&input, &params).unwrap();
    rp.check(again == full, "state untouched");
    rp.compare_values(1.0, detector.seed_passes() as f64, 0.0);

    let token = CancelToken::new();
    token.cancel();
    let mut fresh = CellDetector::new();
    let stopped = fresh.detect_with_interrupt(&input, &params, &token).unwrap();
    rp.check(stopped.cancelled && stopped.is_empty(), "token cancels");
    rp.compare_values(0.0, fresh.seed_passes() as f64, 0.0);
    rp.check(!fresh.has_cached_seeds(), "nothing cached");

    assert!(rp.cleanup(), "detection_reg cancellation tests failed");
}

#[test]
fn detection_reg_roi_and_config() {
    let mut rp = RegParams::new("detection_roi_config");

    let bare = DetectionInput::new(RegionId(5), two_blob_raster().unwrap());
    let mut detector = CellDetector::new();
    let err = detector.detect(&bare, &DetectionParams::default());
    rp.check(matches!(err, Err(DetectError::MissingRoi)), "missing ROI rejected");

    // Only the left blob lies inside the region of interest
    let left = bare.clone().with_roi(Polygon::rectangle(0.0, 0.0, 50.0, 100.0));
    let params = DetectionParams::from_json_str(
        r#"{ "threshold": 0.3, "cell_expansion": 5.0, "expansion_mode": "unconstrained" }"#,
    )
    .unwrap();
    let result = detector.detect(&left, &params).unwrap();
    rp.compare_values(1.0, result.len() as f64, 0.0);
    for obj in &result.objects {
        let bounds = obj.boundary().bounds().unwrap();
        rp.check(bounds.max_x <= 50.0, "cell stays inside the ROI");
    }

    assert!(rp.cleanup(), "detection_reg ROI tests failed");
}

#[test]
fn detection_reg_positivity() {
    let mut rp = RegParams::new("detection_positivity");

    let input = stained_input();
    let mut detector = CellDetector::new();
    let single = DetectionParams::default()
        .with_threshold(0.3)
        .with_positivity(Some(PositivityParams::single("Nucleus: Hematoxylin OD mean", 0.3)));
    let result = detector.detect(&input, &single).unwrap();
    rp.compare_values(2.0, result.len() as f64, 0.0);
    rp.check(
        result.objects.iter().all(|o| o.class() == Some(CellClass::Positive)),
        "all positive",
    );
    rp.compare_strings("2 cells detected, 2 positive (100.0%)", &result.summary);

    let tiers = single.clone().with_positivity(Some(PositivityParams::three_tier(
        "Nucleus: Hematoxylin OD mean",
        0.1,
        0.2,
        2.0,
    )));
    let result = detector.detect(&input, &tiers).unwrap();
    let summary = result.classification.unwrap_or_default();
    rp.compare_values(200.0, summary.h_score.unwrap_or(0.0), 1e-9);
    rp.compare_values(2.0, summary.tiers[1] as f64, 0.0);
    rp.compare_values(1.0, detector.seed_passes() as f64, 0.0);

    assert!(rp.cleanup(), "detection_reg positivity tests failed");
}

#[test]
fn detection_reg_boundary_refinement() {
    let mut rp = RegParams::new("detection_refinement");

    // Flat disk: a large LoG sigma grows the mask past the disk edge
    let disk = disk_mask(60, 60, 30.0, 30.0, 8.0).unwrap();
    let disk_pixels = disk.count_foreground() as f64;
    let input = DetectionInput::new(RegionId(6), disk.to_float()).with_full_roi();
    let exact = DetectionParams::default()
        .with_background_radius(0)
        .with_cell_expansion(0.0, ExpansionMode::Unconstrained)
        .with_smooth_boundaries(false)
        .with_downsample(0.01);

    let mut detector = CellDetector::new();
    for sigma in [2.0, 3.0] {
        let params = exact.clone().with_sigma(sigma);
        let refined = detector.detect(&input, &params).unwrap();
        let plain = detector
            .detect(&input, &params.clone().with_refine_boundary(false))
            .unwrap();
        rp.compare_values(1.0, refined.len() as f64, 0.0);
        rp.compare_values(1.0, plain.len() as f64, 0.0);
        let area = |r: &cellseg_detect::DetectionResult| {
            r.objects[0].measurements().get("Nucleus: Area").unwrap_or(0.0)
        };
        if refined.len() == 1 && plain.len() == 1 {
            rp.check(area(&plain) > disk_pixels, "large sigma dilates the mask");
            rp.check(area(&refined) <= disk_pixels, "refinement stays inside the disk");
            rp.check(area(&refined) >= 0.95 * disk_pixels, "refinement keeps the disk");
        }
    }
    // Refinement is a refined-tier stage
    rp.compare_values(2.0, detector.seed_passes() as f64, 0.0);

    // At the default sigma the stage is off and the toggle changes nothing
    let at_default = exact.clone();
    let on = detector.detect(&input, &at_default).unwrap();
    let off = detector
        .detect(&input, &at_default.clone().with_refine_boundary(false))
        .unwrap();
    rp.check(on == off, "no refinement at sigma 1.5");

    assert!(rp.cleanup(), "detection_reg refinement tests failed");
}

#[test]
fn detection_reg_bright_background_excluded() {
    let mut rp = RegParams::new("detection_bright_background");

    // Right blob sits on a wide plateau above the maximum background level
    let mut img = gaussian_blobs(
        100,
        100,
        0.0,
        &[Blob::new(25.0, 50.0, 4.0, 1.0), Blob::new(75.0, 50.0, 4.0, 1.0)],
    )
    .unwrap();
    for y in 0..100 {
        for x in 55..100 {
            let v = img.get_pixel(x, y).unwrap() + 3.0;
            img.set_pixel(x, y, v).unwrap();
        }
    }
    let input = DetectionInput::new(RegionId(8), img).with_full_roi();
    let params = DetectionParams::default()
        .with_background_radius(5)
        .with_max_background(2.0)
        .with_cell_expansion(0.0, ExpansionMode::Unconstrained);

    let mut detector = CellDetector::new();
    let excluded = detector.detect(&input, &params).unwrap();
    rp.compare_values(1.0, excluded.len() as f64, 0.0);
    for obj in &excluded.objects {
        let x = obj.boundary().centroid().map_or(f64::NAN, |c| c.x);
        rp.compare_values(25.0, x, 2.0);
    }

    // Without a maximum background both blobs survive
    for level in [0.0, f32::INFINITY] {
        let kept = detector
            .detect(&input, &params.clone().with_max_background(level))
            .unwrap();
        rp.compare_values(2.0, kept.len() as f64, 0.0);
    }
    rp.compare_values(1.0, detector.seed_passes() as f64, 0.0);

    assert!(rp.cleanup(), "detection_reg bright background tests failed");
}
