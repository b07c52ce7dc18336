//! Sink filling for hydrological analysis
//!
//! Planchon-Darboux (2001): fill depressions in a DEM so every cell has a
//! downslope path to the border, as required by flow direction and
//! accumulation.
//!
//! Reference:
//! Planchon, O., Darboux, F. (2001). A fast, simple and versatile algorithm
//! to fill the depressions of digital elevation models.
//! Catena, 46(2-3), 159-176.

use crate::hydrology::{D8_DISTANCES, D8_OFFSETS};
use floodmap_core::{Algorithm, Error, Raster, Result};
use ndarray::Array2;

/// Parameters for sink filling
#[derive(Debug, Clone)]
pub struct FillSinksParams {
    /// Minimum slope to enforce between cells. Set to 0.0 to allow flat
    /// areas after filling.
    pub min_slope: f64,
}

impl Default for FillSinksParams {
    fn default() -> Self {
        Self { min_slope: 0.01 }
    }
}

/// Fill sinks algorithm
#[derive(Debug, Clone, Default)]
pub struct FillSinks;

impl Algorithm for FillSinks {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = FillSinksParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Fill Sinks"
    }

    fn description(&self) -> &'static str {
        "Fill depressions in a DEM using Planchon-Darboux (2001) method"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        fill_sinks(&input, params)
    }
}

/// Fill depressions in a DEM using the Planchon-Darboux (2001) algorithm.
///
/// The water surface W starts at the DEM on the border and "infinitely
/// high" inside, then is iteratively lowered toward the DEM until no cell
/// can drop further while keeping a downslope path out.
pub fn fill_sinks(dem: &Raster<f64>, params: FillSinksParams) -> Result<Raster<f64>> {
    let (rows, cols) = dem.shape();
    let nodata = dem.nodata();
    let epsilon = params.min_slope * dem.cell_size();

    let big_value = f64::MAX / 2.0;
    let mut w = Array2::from_elem((rows, cols), big_value);

    // Border and nodata cells keep their DEM value
    for row in 0..rows {
        for col in 0..cols {
            let val = unsafe { dem.get_unchecked(row, col) };

            if is_nodata(val, nodata) {
                w[(row, col)] = val;
                continue;
            }

            if row == 0 || row == rows - 1 || col == 0 || col == cols - 1 {
                w[(row, col)] = val;
            }
        }
    }

    // Alternate forward (top-left to bottom-right) and backward sweeps
    // until the surface is stable.
    let mut changed = true;
    while changed {
        changed = false;

        for row in 1..rows - 1 {
            for col in 1..cols - 1 {
                changed |= relax_cell(dem, &mut w, row, col, epsilon, big_value, nodata);
            }
        }

        for row in (1..rows - 1).rev() {
            for col in (1..cols - 1).rev() {
                changed |= relax_cell(dem, &mut w, row, col, epsilon, big_value, nodata);
            }
        }
    }

    let mut output = dem.like(0.0);
    *output.data_mut() = w;

    Ok(output)
}

/// One Planchon-Darboux relaxation of W at (row, col).
///
/// Lowers W toward the DEM where a neighbor provides an outlet; returns
/// whether the cell changed.
fn relax_cell(
    dem: &Raster<f64>,
    w: &mut Array2<f64>,
    row: usize,
    col: usize,
    epsilon: f64,
    big_value: f64,
    nodata: Option<f64>,
) -> bool {
    let dem_val = unsafe { dem.get_unchecked(row, col) };
    if is_nodata(dem_val, nodata) || w[(row, col)] <= dem_val {
        return false;
    }

    let mut changed = false;
    for (idx, &(dr, dc)) in D8_OFFSETS.iter().enumerate() {
        let nr = (row as isize + dr) as usize;
        let nc = (col as isize + dc) as usize;

        let wn = w[(nr, nc)];
        if wn.is_nan() || wn >= big_value {
            continue;
        }

        let outlet = wn + epsilon * D8_DISTANCES[idx];
        if dem_val >= outlet {
            // The original surface already drains past this neighbor
            w[(row, col)] = dem_val;
            return true;
        }
        if w[(row, col)] > outlet {
            w[(row, col)] = outlet;
            changed = true;
        }
    }

    changed
}

fn is_nodata(val: f64, nodata: Option<f64>) -> bool {
    if val.is_nan() {
        return true;
    }
    match nodata {
        Some(nd) => (val - nd).abs() < f64::EPSILON,
        None => false,
    }
}
