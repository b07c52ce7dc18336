//! Aspect calculation from DEMs
//!
//! Direction of the steepest descent, Horn (1981) method.

use crate::maybe_rayon::*;
use crate::terrain::{horn_gradients, is_valid_cell};
use floodmap_core::{Algorithm, Error, Raster, Result};
use ndarray::Array2;
use std::f64::consts::PI;

/// Output format for aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectOutput {
    /// Degrees (0-360, 0=North, clockwise)
    #[default]
    Degrees,
    /// Radians (0-2pi)
    Radians,
    /// Compass direction (N, NE, E, SE, S, SW, W, NW) as 1-8
    Compass,
}

/// Aspect algorithm
#[derive(Debug, Clone, Default)]
pub struct Aspect;

impl Algorithm for Aspect {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = AspectOutput;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Aspect"
    }

    fn description(&self) -> &'static str {
        "Calculate aspect (direction of steepest descent) from a DEM"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        aspect(&input, params)
    }
}

/// Calculate aspect from a DEM.
///
/// Aspect is a compass bearing: 0 (or 360) = North, 90 = East,
/// 180 = South, 270 = West. Flat cells are assigned -1 (nodata).
pub fn aspect(dem: &Raster<f64>, output_format: AspectOutput) -> Result<Raster<f64>> {
    let (rows, cols) = dem.shape();
    let nodata = dem.nodata();

    const FLAT_THRESHOLD: f64 = 1e-10;

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![-1.0; cols];

            for col in 0..cols {
                let center = unsafe { dem.get_unchecked(row, col) };
                if !is_valid_cell(center, nodata) {
                    continue;
                }

                let Some((dz_dx, dz_dy)) = horn_gradients(dem, row, col) else {
                    continue;
                };

                if dz_dx.abs() < FLAT_THRESHOLD && dz_dy.abs() < FLAT_THRESHOLD {
                    continue;
                }

                // Descent direction in geographic (east, north) space:
                //   east component  = -dz_dx
                //   north component = dz_dy  (pixel Y opposes geo Y)
                // Compass bearing = atan2(east, north)
                let mut bearing = (-dz_dx).atan2(dz_dy);
                if bearing < 0.0 {
                    bearing += 2.0 * PI;
                }

                row_data[col] = match output_format {
                    AspectOutput::Degrees => bearing.to_degrees(),
                    AspectOutput::Radians => bearing,
                    AspectOutput::Compass => compass_sector(bearing.to_degrees()),
                };
            }

            row_data
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(-1.0));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), output_data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

/// 8-sector compass code (1=N, 2=NE, ..., 8=NW) from a bearing in degrees
fn compass_sector(deg: f64) -> f64 {
    if !(22.5..337.5).contains(&deg) {
        1.0 // N
    } else {
        (((deg + 22.5) / 45.0).floor()) + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodmap_core::GeoTransform;

    fn dem_sloping(down_to: (f64, f64)) -> Raster<f64> {
        // Gradient given as (row_step, col_step): elevation increases by
        // row_step per row and col_step per column.
        let mut dem = Raster::new(10, 10);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));
        for row in 0..10 {
            for col in 0..10 {
                dem.set(row, col, row as f64 * down_to.0 + col as f64 * down_to.1)
                    .unwrap();
            }
        }
        dem
    }

    #[test]
    fn test_aspect_north_slope() {
        // Higher in the south (high row) -> descent faces north
        let dem = dem_sloping((1.0, 0.0));
        let result = aspect(&dem, AspectOutput::Degrees).unwrap();
        let val = result.get(5, 5).unwrap();
        assert!(val < 10.0 || val > 350.0, "expected ~0 (North), got {}", val);
    }

    #[test]
    fn test_aspect_east_slope() {
        // Higher in the west -> descent faces east
        let dem = dem_sloping((0.0, -1.0));
        let result = aspect(&dem, AspectOutput::Degrees).unwrap();
        let val = result.get(5, 5).unwrap();
        assert!((val - 90.0).abs() < 10.0, "expected ~90 (East), got {}", val);
    }

    #[test]
    fn test_aspect_flat_is_nodata() {
        let mut dem: Raster<f64> = Raster::filled(10, 10, 100.0);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));

        let result = aspect(&dem, AspectOutput::Degrees).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), -1.0);
    }

    #[test]
    fn test_aspect_compass_sectors() {
        let dem = dem_sloping((0.0, -1.0)); // east-facing
        let result = aspect(&dem, AspectOutput::Compass).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), 3.0); // E

        let dem = dem_sloping((1.0, 0.0)); // north-facing
        let result = aspect(&dem, AspectOutput::Compass).unwrap();
        assert_eq!(result.get(5, 5).unwrap(), 1.0); // N
    }
}
