//! Hillshade (shaded relief) calculation
//!
//! Shaded relief from a DEM based on illumination angle and direction.

use crate::maybe_rayon::*;
use crate::terrain::{horn_gradients, is_valid_cell};
use floodmap_core::{Algorithm, Error, Raster, Result};
use ndarray::Array2;
use std::f64::consts::PI;

/// Parameters for hillshade calculation
#[derive(Debug, Clone)]
pub struct HillshadeParams {
    /// Sun azimuth in degrees (0 = North, clockwise)
    pub azimuth: f64,
    /// Sun altitude in degrees above horizon (0-90)
    pub altitude: f64,
    /// Z-factor for vertical exaggeration
    pub z_factor: f64,
    /// Output range: false = 0-255, true = 0.0-1.0
    pub normalized: bool,
}

impl Default for HillshadeParams {
    fn default() -> Self {
        Self {
            azimuth: 315.0, // NW illumination (standard)
            altitude: 45.0,
            z_factor: 1.0,
            normalized: false,
        }
    }
}

/// Hillshade algorithm
#[derive(Debug, Clone, Default)]
pub struct Hillshade;

impl Algorithm for Hillshade {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = HillshadeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Hillshade"
    }

    fn description(&self) -> &'static str {
        "Calculate shaded relief from a DEM"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        hillshade(&input, params)
    }
}

/// Calculate hillshade from a DEM.
///
/// ```text
/// shade = cos(zenith) * cos(slope)
///       + sin(zenith) * sin(slope) * cos(azimuth - aspect)
/// ```
///
/// Output is clamped to [0, 1] and scaled to 0-255 unless
/// `params.normalized` is set.
pub fn hillshade(dem: &Raster<f64>, params: HillshadeParams) -> Result<Raster<f64>> {
    let (rows, cols) = dem.shape();
    let nodata = dem.nodata();
    let eight_cell = 8.0 * dem.cell_size() * params.z_factor;

    let azimuth_rad = (360.0 - params.azimuth + 90.0).to_radians();
    let zenith_rad = (90.0 - params.altitude).to_radians();
    let cos_zenith = zenith_rad.cos();
    let sin_zenith = zenith_rad.sin();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0.0; cols];

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

                let aspect_rad = if dz_dx.abs() < 1e-10 && dz_dy.abs() < 1e-10 {
                    0.0 // flat
                } else {
                    let aspect = (-dz_dy).atan2(-dz_dx);
                    if aspect < 0.0 {
                        2.0 * PI + aspect
                    } else {
                        aspect
                    }
                };

                let shade = cos_zenith * slope_rad.cos()
                    + sin_zenith * slope_rad.sin() * (azimuth_rad - aspect_rad).cos();
                let shade = shade.clamp(0.0, 1.0);

                row_data[col] = if params.normalized {
                    shade
                } else {
                    (shade * 255.0).round()
                };
            }

            row_data
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(0.0));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), output_data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodmap_core::GeoTransform;

    fn test_dem() -> Raster<f64> {
        let mut dem = Raster::new(10, 10);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));

        for row in 0..10 {
            for col in 0..10 {
                dem.set(row, col, (row + col) as f64 * 10.0).unwrap();
            }
        }
        dem
    }

    #[test]
    fn test_hillshade_range() {
        let result = hillshade(&test_dem(), HillshadeParams::default()).unwrap();

        for row in 0..result.rows() {
            for col in 0..result.cols() {
                let val = result.get(row, col).unwrap();
                assert!(
                    (0.0..=255.0).contains(&val),
                    "hillshade {} out of range at ({}, {})",
                    val,
                    row,
                    col
                );
            }
        }
    }

    #[test]
    fn test_hillshade_flat() {
        let mut dem: Raster<f64> = Raster::filled(10, 10, 100.0);
        dem.set_transform(GeoTransform::new(0.0, 10.0, 1.0, -1.0));

        let result = hillshade(&dem, HillshadeParams::default()).unwrap();
        let val = result.get(5, 5).unwrap();

        // Flat surface at 45 degrees altitude: shade ~ cos(45) ~ 0.707 -> ~180
        assert!((val - 180.0).abs() < 20.0, "expected ~180, got {}", val);
    }

    #[test]
    fn test_hillshade_normalized() {
        let params = HillshadeParams {
            normalized: true,
            ..Default::default()
        };
        let result = hillshade(&test_dem(), params).unwrap();

        for row in 0..result.rows() {
            for col in 0..result.cols() {
                let val = result.get(row, col).unwrap();
                assert!((0.0..=1.0).contains(&val));
            }
        }
    }
}
