//! Flood-zone classification
//!
//! Scores every cell by how many flood-risk criteria it satisfies:
//! low elevation, gentle slope, high flow accumulation and, when a rainfall
//! raster is supplied, heavy rainfall. The output is an ordinal risk class
//! per cell (0 = none of the criteria met).

use crate::maybe_rayon::*;
use floodmap_core::{Algorithm, Error, Raster, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Threshold criteria for flood-prone zones.
///
/// Defaults follow the Kosi Basin study parameterization: cells below 50 m
/// elevation, under 5 degrees of slope, with at least 1000 upstream cells,
/// and (when rainfall is available) at least 200 mm of rainfall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloodThresholds {
    /// Maximum elevation considered flood-prone
    pub elevation_max: f64,
    /// Maximum slope (degrees) considered flood-prone
    pub slope_max: f64,
    /// Minimum upstream contributing area (cells)
    pub flow_accumulation_min: f64,
    /// Minimum rainfall considered flood-triggering
    pub rainfall_threshold: f64,
}

impl Default for FloodThresholds {
    fn default() -> Self {
        Self {
            elevation_max: 50.0,
            slope_max: 5.0,
            flow_accumulation_min: 1000.0,
            rainfall_threshold: 200.0,
        }
    }
}

/// Input rasters for flood-zone classification.
///
/// All rasters must share dimensions; rainfall is optional and simply
/// drops its criterion when absent.
#[derive(Debug, Clone)]
pub struct FloodZoneInputs {
    pub dem: Raster<f64>,
    pub slope: Raster<f64>,
    pub flow_accumulation: Raster<f64>,
    pub rainfall: Option<Raster<f64>>,
}

/// Flood-zone classification algorithm
#[derive(Debug, Clone, Default)]
pub struct FloodZones;

impl Algorithm for FloodZones {
    type Input = FloodZoneInputs;
    type Output = Raster<f64>;
    type Params = FloodThresholds;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Flood Zones"
    }

    fn description(&self) -> &'static str {
        "Classify flood-prone zones from elevation, slope, flow accumulation and rainfall"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        classify_flood_zones(
            &input.dem,
            &input.slope,
            &input.flow_accumulation,
            input.rainfall.as_ref(),
            &params,
        )
    }
}

/// Classify flood-prone zones.
///
/// Each valid cell gets a class equal to the number of satisfied criteria
/// (0..=3 without rainfall, 0..=4 with). Cells where the DEM or slope is
/// nodata are NaN; an invalid rainfall cell merely fails its criterion.
pub fn classify_flood_zones(
    dem: &Raster<f64>,
    slope: &Raster<f64>,
    flow_accumulation: &Raster<f64>,
    rainfall: Option<&Raster<f64>>,
    thresholds: &FloodThresholds,
) -> Result<Raster<f64>> {
    let (rows, cols) = dem.shape();

    check_shape(dem, slope)?;
    check_shape(dem, flow_accumulation)?;
    if let Some(rain) = rainfall {
        check_shape(dem, rain)?;
    }

    let dem_nodata = dem.nodata();
    let slope_nodata = slope.nodata();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];

            for col in 0..cols {
                let elevation = unsafe { dem.get_unchecked(row, col) };
                let slope_val = unsafe { slope.get_unchecked(row, col) };
                let acc = unsafe { flow_accumulation.get_unchecked(row, col) };

                if !valid(elevation, dem_nodata) || !valid(slope_val, slope_nodata) {
                    continue;
                }

                let mut score = 0.0;
                if elevation <= thresholds.elevation_max {
                    score += 1.0;
                }
                if slope_val <= thresholds.slope_max {
                    score += 1.0;
                }
                if acc.is_finite() && acc >= thresholds.flow_accumulation_min {
                    score += 1.0;
                }
                if let Some(rain) = rainfall {
                    let rain_val = unsafe { rain.get_unchecked(row, col) };
                    if rain_val.is_finite() && rain_val >= thresholds.rainfall_threshold {
                        score += 1.0;
                    }
                }

                row_data[col] = score;
            }

            row_data
        })
        .collect();

    let mut output = dem.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

fn check_shape(reference: &Raster<f64>, other: &Raster<f64>) -> Result<()> {
    if reference.shape() != other.shape() {
        let (er, ec) = reference.shape();
        let (ar, ac) = other.shape();
        return Err(Error::SizeMismatch { er, ec, ar, ac });
    }
    Ok(())
}

fn valid(val: f64, nodata: Option<f64>) -> bool {
    if val.is_nan() {
        return false;
    }
    match nodata {
        Some(nd) if nd.is_nan() => true, // NaN nodata already handled above
        Some(nd) => (val - nd).abs() >= f64::EPSILON,
        None => true,
    }
}
