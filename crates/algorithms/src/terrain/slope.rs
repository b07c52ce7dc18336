//! Slope calculation from DEMs
//!
//! Rate of change of elevation using the Horn (1981) method.

use crate::maybe_rayon::*;
use crate::terrain::{horn_gradients, is_valid_cell};
use floodmap_core::{Algorithm, Error, Raster, Result};
use ndarray::Array2;

/// Units for slope output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlopeUnits {
    /// Degrees (0-90)
    #[default]
    Degrees,
    /// Percent (0-infinity, typically 0-100+)
    Percent,
    /// Radians (0-pi/2)
    Radians,
}

/// Parameters for slope calculation
#[derive(Debug, Clone)]
pub struct SlopeParams {
    /// Output units
    pub units: SlopeUnits,
    /// Z-factor for unit conversion (default 1.0).
    /// Use ~111320 for lat/lon DEMs with meters elevation.
    pub z_factor: f64,
}

impl Default for SlopeParams {
    fn default() -> Self {
        Self {
            units: SlopeUnits::Degrees,
            z_factor: 1.0,
        }
    }
}

/// Slope algorithm
#[derive(Debug, Clone, Default)]
pub struct Slope;

impl Algorithm for Slope {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = SlopeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Slope"
    }

    fn description(&self) -> &'static str {
        "Calculate slope (rate of change of elevation) from a DEM using Horn's method"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        slope(&input, params)
    }
}

/// Calculate slope from a DEM.
///
/// ```text
/// dz/dx = ((c + 2f + i) - (a + 2d + g)) / (8 * cellsize)
/// dz/dy = ((g + 2h + i) - (a + 2b + c)) / (8 * cellsize)
/// slope = atan(sqrt(dz/dx^2 + dz/dy^2))
/// ```
///
/// Edge cells and cells with nodata in their neighborhood are NaN.
pub fn slope(dem: &Raster<f64>, params: SlopeParams) -> Result<Raster<f64>> {
    let (rows, cols) = dem.shape();
    let nodata = dem.nodata();
    let eight_cell = 8.0 * dem.cell_size() * params.z_factor;

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            for col in 0..cols {
                let center = unsafe { dem.get_unchecked(row, col) };
                if !is_valid_cell(center, nodata) {
                    continue;
                }

                let Some((dx, dy)) = horn_gradients(dem, row, col) else {
                    continue;
                };

                let dz_dx = dx / eight_cell;
                let dz_dy = dy / eight_cell;
                let slope_rad = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan();

                row_data[col] = match params.units {
                    SlopeUnits::Degrees => slope_rad.to_degrees(),
                    SlopeUnits::Percent => slope_rad.tan() * 100.0,
                    SlopeUnits::Radians => slope_rad,
                };
            }

            row_data
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), output_data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodmap_core::GeoTransform;

    fn tilted_dem() -> Raster<f64> {
        // z = x + y: a uniformly tilted plane
        let mut dem = Raster::new(10, 10);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));

        for row in 0..10 {
            for col in 0..10 {
                dem.set(row, col, (row + col) as f64).unwrap();
            }
        }
        dem
    }

    #[test]
    fn test_slope_flat() {
        let mut dem: Raster<f64> = Raster::filled(10, 10, 100.0);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));

        let result = slope(&dem, SlopeParams::default()).unwrap();
        let val = result.get(5, 5).unwrap();
        assert!(val.abs() < 0.001, "expected ~0 slope on a flat surface, got {}", val);
    }

    #[test]
    fn test_slope_uniform_on_tilted_plane() {
        let dem = tilted_dem();
        let result = slope(&dem, SlopeParams::default()).unwrap();

        let val1 = result.get(3, 3).unwrap();
        let val2 = result.get(5, 5).unwrap();
        assert!(
            (val1 - val2).abs() < 0.001,
            "expected uniform slope, got {} vs {}",
            val1,
            val2
        );
    }

    #[test]
    fn test_slope_edges_are_nodata() {
        let dem = tilted_dem();
        let result = slope(&dem, SlopeParams::default()).unwrap();
        assert!(result.get(0, 5).unwrap().is_nan());
        assert!(result.get(9, 9).unwrap().is_nan());
    }

    #[test]
    fn test_slope_units() {
        let dem = tilted_dem();

        let deg = slope(
            &dem,
            SlopeParams {
                units: SlopeUnits::Degrees,
                z_factor: 1.0,
            },
        )
        .unwrap();
        let rad = slope(
            &dem,
            SlopeParams {
                units: SlopeUnits::Radians,
                z_factor: 1.0,
            },
        )
        .unwrap();
        let pct = slope(
            &dem,
            SlopeParams {
                units: SlopeUnits::Percent,
                z_factor: 1.0,
            },
        )
        .unwrap();

        let deg_val = deg.get(5, 5).unwrap();
        let rad_val = rad.get(5, 5).unwrap();
        let pct_val = pct.get(5, 5).unwrap();

        assert!((deg_val - rad_val.to_degrees()).abs() < 0.001);
        assert!((pct_val - rad_val.tan() * 100.0).abs() < 0.001);
    }

    #[test]
    fn test_slope_via_algorithm_trait() {
        let dem = tilted_dem();
        let result = Slope.execute_default(dem).unwrap();
        assert_eq!(result.shape(), (10, 10));
    }
}
