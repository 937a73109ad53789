use block_prune::classify::classify;
use block_prune::edges::detect_edges;
use block_prune::grid::{block_grid, Block};
use block_prune::score::removable_blocks;
use block_prune::{Error, PruneConfig, PruneEngine};
use image::{GrayImage, Rgb, RgbImage};

const FILL: Rgb<u8> = Rgb([255, 255, 255]);

fn flat_image(w: u32, h: u32, value: u8) -> RgbImage {
    let mut img = RgbImage::new(w, h);
    for px in img.pixels_mut() {
        *px = Rgb([value, value, value]);
    }
    img
}

/// Hard diagonal step: bright where `x > y`, dark elsewhere.
fn diagonal_image(size: u32) -> RgbImage {
    let mut img = RgbImage::new(size, size);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let v = if x > y { 200 } else { 50 };
        *px = Rgb([v, v, v]);
    }
    img
}

#[test]
fn flat_image_is_fully_pruned_and_restored() {
    // 16x16 single color, block size 8: every block is texture with zero
    // gradient and zero variance, so the whole grid is erased.
    let engine = PruneEngine::new(PruneConfig::default()).unwrap();
    let img = flat_image(16, 16, 80);

    let reduction = engine.reduce(&img);
    assert_eq!(reduction.counts.total, 4);
    assert_eq!(reduction.counts.structural, 0);
    assert_eq!(reduction.counts.texture, 4);
    assert_eq!(reduction.counts.removable, 4);

    assert!(reduction.mask.pixels().all(|p| p[0] == 255));
    assert!(reduction.image.pixels().all(|p| *p == FILL));

    let restored = engine.restore(&reduction.image, &reduction.mask).unwrap();
    assert_eq!(restored.dimensions(), img.dimensions());
    // Nothing was known, so the synthesized region must not be the fill color.
    assert!(restored.pixels().all(|p| *p != FILL));
}

#[test]
fn diagonal_edge_blocks_are_structural_and_never_removed() {
    let img = diagonal_image(32);
    let cfg = PruneConfig::default();

    let grid = block_grid(32, 32, cfg.block_size);
    let edges = detect_edges(&img, cfg.edge_low, cfg.edge_high);
    let classification = classify(&grid, &edges, cfg.block_size);
    let removable = removable_blocks(
        &img,
        &classification.texture,
        cfg.block_size,
        cfg.gradient_threshold,
        cfg.variance_threshold,
    );

    // Blocks on the grid diagonal straddle the step and must be structural.
    for k in 0..4 {
        let b = Block {
            row: k * 8,
            col: k * 8,
        };
        assert!(
            classification.structural.contains(&b),
            "diagonal block {b:?} should be structural"
        );
    }

    // Blocks far from the step are uniform: texture and removable.
    let far_corners = [Block { row: 0, col: 24 }, Block { row: 24, col: 0 }];
    for b in far_corners {
        assert!(classification.texture.contains(&b));
        assert!(removable.contains(&b), "uniform block {b:?} should pass");
    }

    // Structural blocks never enter the removable set.
    for b in &removable {
        assert!(
            !classification.structural.contains(b),
            "structural block {b:?} leaked into the removable set"
        );
    }
}

#[test]
fn mask_and_erased_image_stay_consistent_on_real_content() {
    let engine = PruneEngine::new(PruneConfig::default()).unwrap();
    let img = diagonal_image(64);

    let reduction = engine.reduce(&img);
    for (x, y, px) in reduction.image.enumerate_pixels() {
        let marked = reduction.mask.get_pixel(x, y)[0] != 0;
        let differs = px != img.get_pixel(x, y);
        assert_eq!(marked, differs, "mask/image disagreement at ({x},{y})");
    }
}

#[test]
fn mask_round_trips_through_png_exactly() {
    let engine = PruneEngine::new(PruneConfig::default()).unwrap();
    let reduction = engine.reduce(&diagonal_image(48));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.png");
    reduction.mask.save(&path).unwrap();

    let reloaded = image::open(&path).unwrap().to_luma8();
    assert_eq!(reloaded.dimensions(), reduction.mask.dimensions());
    for (a, b) in reloaded.pixels().zip(reduction.mask.pixels()) {
        assert_eq!(a, b);
    }
}

#[test]
fn remove_and_restore_work_across_the_file_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    flat_image(32, 32, 120).save(&input).unwrap();

    let engine = PruneEngine::new(PruneConfig::default()).unwrap();
    let image_out = dir.path().join("reduced.png");
    let mask_out = dir.path().join("mask.png");

    let report = engine.reduce_file(&input, &image_out, &mask_out).unwrap();
    assert_eq!(report.counts.removable, 16);
    assert!(image_out.exists());
    assert!(mask_out.exists());

    let restored_out = dir.path().join("restored.png");
    let restore_report = engine
        .restore_file(&image_out, &mask_out, &restored_out)
        .unwrap();
    assert!(restore_report.output_path.exists());

    let restored = image::open(&restored_out).unwrap().to_rgb8();
    assert_eq!(restored.dimensions(), (32, 32));
}

#[test]
fn restore_rejects_mismatched_artifact_pair() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("reduced.png");
    let mask_path = dir.path().join("mask.png");
    flat_image(16, 24, 90).save(&image_path).unwrap();
    GrayImage::new(16, 16).save(&mask_path).unwrap();

    let engine = PruneEngine::new(PruneConfig::default()).unwrap();
    let output = dir.path().join("restored.png");
    let err = engine
        .restore_file(&image_path, &mask_path, &output)
        .unwrap_err();

    assert!(matches!(err, Error::DimensionMismatch { .. }));
    assert!(!output.exists(), "no output may be written on mismatch");
}

#[test]
fn failed_mask_write_leaves_no_partial_artifact_set() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    flat_image(16, 16, 70).save(&input).unwrap();

    let image_out = dir.path().join("reduced.png");
    let mask_out = dir.path().join("mask.png");
    // A directory squatting the mask path makes the mask write fail after
    // the erased image has already been written.
    std::fs::create_dir(&mask_out).unwrap();

    let engine = PruneEngine::new(PruneConfig::default()).unwrap();
    let result = engine.reduce_file(&input, &image_out, &mask_out);

    assert!(result.is_err());
    assert!(
        !image_out.exists(),
        "erased image must not survive a failed mask write"
    );
}

#[test]
fn missing_input_reports_source_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let engine = PruneEngine::new(PruneConfig::default()).unwrap();

    let err = engine
        .reduce_file(
            &dir.path().join("nope.jpg"),
            &dir.path().join("reduced.jpg"),
            &dir.path().join("mask.png"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::SourceNotFound(_)));
}

#[test]
fn reduce_file_rejects_lossy_mask_target() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    flat_image(16, 16, 70).save(&input).unwrap();

    let engine = PruneEngine::new(PruneConfig::default()).unwrap();
    let err = engine
        .reduce_file(
            &input,
            &dir.path().join("reduced.png"),
            &dir.path().join("mask.jpg"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}

#[test]
fn raising_thresholds_never_shrinks_the_erased_area() {
    let img = diagonal_image(64);

    let strict = PruneEngine::new(PruneConfig::default()).unwrap();
    let loose = PruneEngine::new(PruneConfig {
        gradient_threshold: 50.0,
        variance_threshold: 5000.0,
        ..PruneConfig::default()
    })
    .unwrap();

    let strict_mask = strict.reduce(&img).mask;
    let loose_mask = loose.reduce(&img).mask;

    for (a, b) in strict_mask.pixels().zip(loose_mask.pixels()) {
        if a[0] != 0 {
            assert_ne!(b[0], 0, "loosening thresholds must keep erased cells");
        }
    }
}
