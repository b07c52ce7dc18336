//! End-to-end workflow tests over generated sample data.

use floodmap_core::io::read_geotiff;
use floodmap_core::{ProjectLayout, Raster, StudyArea};
use floodmap_pipeline::{FloodThresholds, FloodWorkflow, WorkflowOutcome, STEP_NAMES};
use floodmap_sample::SampleGenerator;
use std::path::Path;

fn workflow(root: &Path) -> FloodWorkflow {
    FloodWorkflow::new(ProjectLayout::new(root), FloodThresholds::default())
}

#[test]
fn missing_dem_skips_without_error() {
    let tmp = tempfile::tempdir().unwrap();
    let dem = tmp.path().join("data/dem/absent.tif");

    let outcome = workflow(tmp.path()).run(&dem, None).unwrap();

    assert!(outcome.is_skipped());
    // Nothing may be written on a skipped run
    assert!(!tmp.path().join("outputs/maps").exists());
}

#[test]
fn full_run_produces_all_step_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(tmp.path());

    let dem_path = SampleGenerator::new(layout.clone(), StudyArea::kosi_basin())
        .with_grid_size(24, 24)
        .with_seed(11)
        .sample_dem()
        .unwrap();

    let outcome = workflow(tmp.path()).run(&dem_path, None).unwrap();
    let outputs = outcome.outputs().expect("workflow should complete");

    assert_eq!(outputs.len(), STEP_NAMES.len());
    for name in STEP_NAMES {
        let path = outputs
            .get(name)
            .unwrap_or_else(|| panic!("missing step output: {name}"));
        assert!(path.exists(), "{name} output should exist on disk");
        assert!(
            path.extension().is_some_and(|ext| ext == "tif"),
            "{name} output should be a .tif"
        );
        assert!(
            path.starts_with(layout.maps_dir()),
            "{name} output should live under outputs/maps"
        );
    }
}

#[test]
fn full_run_with_rainfall_classifies_with_four_criteria() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(tmp.path());

    let generator = SampleGenerator::new(layout.clone(), StudyArea::kosi_basin())
        .with_grid_size(16, 16)
        .with_seed(3);
    let dem_path = generator.sample_dem().unwrap();
    let rain_path = generator.sample_rainfall().unwrap();

    let outcome = workflow(tmp.path())
        .run(&dem_path, Some(&rain_path))
        .unwrap();
    let outputs = outcome.outputs().unwrap();

    let risk: Raster<f64> = read_geotiff(&outputs["flood_risk"]).unwrap();
    assert_eq!(risk.shape(), (16, 16));

    // Classes are ordinal 0..=4 (NaN on edges where slope is undefined)
    for &v in risk.data().iter() {
        if v.is_nan() {
            continue;
        }
        assert!((0.0..=4.0).contains(&v), "risk class {} out of range", v);
        assert_eq!(v, v.trunc(), "risk classes are whole numbers");
    }
}

#[test]
fn flood_risk_reflects_thresholds() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(tmp.path());

    let dem_path = SampleGenerator::new(layout.clone(), StudyArea::kosi_basin())
        .with_grid_size(16, 16)
        .with_seed(9)
        .sample_dem()
        .unwrap();

    // With an impossible elevation criterion every interior cell loses one
    // class relative to a permissive threshold set.
    let permissive = FloodWorkflow::new(
        layout.clone(),
        FloodThresholds {
            elevation_max: f64::MAX,
            ..FloodThresholds::default()
        },
    );
    let outcome = permissive.run(&dem_path, None).unwrap();
    let risk: Raster<f64> = read_geotiff(&outcome.outputs().unwrap()["flood_risk"]).unwrap();

    let strict = FloodWorkflow::new(
        layout,
        FloodThresholds {
            elevation_max: f64::MIN,
            ..FloodThresholds::default()
        },
    );
    let outcome = strict.run(&dem_path, None).unwrap();
    let strict_risk: Raster<f64> =
        read_geotiff(&outcome.outputs().unwrap()["flood_risk"]).unwrap();

    for (a, b) in risk.data().iter().zip(strict_risk.data().iter()) {
        if a.is_nan() || b.is_nan() {
            continue;
        }
        assert_eq!(
            a - 1.0,
            *b,
            "strict elevation threshold should cost exactly one class"
        );
    }
}
