//! Round-trip tests for the native GeoTIFF reader/writer.

use approx::assert_relative_eq;
use floodmap_core::io::{read_geotiff, write_geotiff};
use floodmap_core::{BoundingBox, Crs, GeoTransform, Raster};

fn sample_raster(rows: usize, cols: usize) -> Raster<f64> {
    let mut raster = Raster::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            raster.set(row, col, (row * cols + col) as f64).unwrap();
        }
    }
    let bbox = BoundingBox::new(85.5, 25.5, 88.5, 27.5).unwrap();
    raster.set_transform(GeoTransform::from_bounds(&bbox, cols, rows));
    raster.set_crs(Some(Crs::wgs84()));
    raster
}

#[test]
fn roundtrip_preserves_dimensions_and_values() {
    let raster = sample_raster(12, 8);
    let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();

    write_geotiff(&raster, tmp.path(), None).unwrap();
    let reloaded: Raster<f64> = read_geotiff(tmp.path()).unwrap();

    assert_eq!(reloaded.shape(), (12, 8));
    for row in [0, 5, 11] {
        for col in [0, 3, 7] {
            let orig = raster.get(row, col).unwrap();
            let copy = reloaded.get(row, col).unwrap();
            assert!(
                (orig - copy).abs() < 1e-3,
                "pixel ({row},{col}): orig={orig}, copy={copy}"
            );
        }
    }
}

#[test]
fn roundtrip_preserves_georeferencing() {
    let raster = sample_raster(10, 10);
    let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();

    write_geotiff(&raster, tmp.path(), None).unwrap();
    let reloaded: Raster<f64> = read_geotiff(tmp.path()).unwrap();

    let orig = raster.transform();
    let copy = reloaded.transform();
    assert_relative_eq!(copy.origin_x, orig.origin_x, epsilon = 1e-9);
    assert_relative_eq!(copy.origin_y, orig.origin_y, epsilon = 1e-9);
    assert_relative_eq!(copy.pixel_width, orig.pixel_width, epsilon = 1e-9);
    assert_relative_eq!(copy.pixel_height, orig.pixel_height, epsilon = 1e-9);

    let (min_x, min_y, max_x, max_y) = reloaded.bounds();
    assert_relative_eq!(min_x, 85.5, epsilon = 1e-9);
    assert_relative_eq!(min_y, 25.5, epsilon = 1e-9);
    assert_relative_eq!(max_x, 88.5, epsilon = 1e-9);
    assert_relative_eq!(max_y, 27.5, epsilon = 1e-9);
}

#[test]
fn roundtrip_preserves_crs() {
    let raster = sample_raster(4, 4);
    let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();

    write_geotiff(&raster, tmp.path(), None).unwrap();
    let reloaded: Raster<f64> = read_geotiff(tmp.path()).unwrap();

    let crs = reloaded.crs().expect("CRS should survive the round-trip");
    assert_eq!(crs.epsg(), Some(4326));
}

#[test]
fn read_u8_raster_written_as_float() {
    // Flow-direction style payload: u8 codes survive the f32 sample format
    let mut raster: Raster<u8> = Raster::new(5, 5);
    for row in 0..5 {
        for col in 0..5 {
            raster.set(row, col, ((row + col) % 9) as u8).unwrap();
        }
    }
    let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();

    write_geotiff(&raster, tmp.path(), None).unwrap();
    let reloaded: Raster<u8> = read_geotiff(tmp.path()).unwrap();

    for row in 0..5 {
        for col in 0..5 {
            assert_eq!(
                reloaded.get(row, col).unwrap(),
                raster.get(row, col).unwrap()
            );
        }
    }
}

#[test]
fn write_rejects_empty_raster() {
    let raster: Raster<f64> = Raster::new(0, 0);
    let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
    assert!(write_geotiff(&raster, tmp.path(), None).is_err());
}
