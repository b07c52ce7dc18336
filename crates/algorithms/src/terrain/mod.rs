//! Terrain analysis algorithms
//!
//! DEM derivatives used by the flood-mapping pipeline:
//! - Slope: rate of change of elevation
//! - Aspect: direction of steepest descent
//! - Hillshade: shaded relief visualization
//!
//! All three derive their gradients from the same Horn (1981) 3x3 kernel.

mod aspect;
mod hillshade;
mod slope;

pub use aspect::{aspect, Aspect, AspectOutput};
pub use hillshade::{hillshade, Hillshade, HillshadeParams};
pub use slope::{slope, Slope, SlopeParams, SlopeUnits};

use floodmap_core::Raster;

/// Raw Horn gradients at (row, col) from the 3x3 neighborhood:
///
/// ```text
/// a b c
/// d e f
/// g h i
/// ```
///
/// Returns `(dz_dx, dz_dy)` *sums*, not yet divided by 8 * cell size.
/// `None` for edge cells and cells whose neighborhood contains nodata.
pub(crate) fn horn_gradients(dem: &Raster<f64>, row: usize, col: usize) -> Option<(f64, f64)> {
    let (rows, cols) = dem.shape();
    if row == 0 || row == rows - 1 || col == 0 || col == cols - 1 {
        return None;
    }

    let a = unsafe { dem.get_unchecked(row - 1, col - 1) };
    let b = unsafe { dem.get_unchecked(row - 1, col) };
    let c = unsafe { dem.get_unchecked(row - 1, col + 1) };
    let d = unsafe { dem.get_unchecked(row, col - 1) };
    let f = unsafe { dem.get_unchecked(row, col + 1) };
    let g = unsafe { dem.get_unchecked(row + 1, col - 1) };
    let h = unsafe { dem.get_unchecked(row + 1, col) };
    let i = unsafe { dem.get_unchecked(row + 1, col + 1) };

    if [a, b, c, d, f, g, h, i].iter().any(|v| v.is_nan()) {
        return None;
    }

    let dz_dx = (c + 2.0 * f + i) - (a + 2.0 * d + g);
    let dz_dy = (g + 2.0 * h + i) - (a + 2.0 * b + c);

    Some((dz_dx, dz_dy))
}

/// Whether the cell holds a usable elevation (not NaN, not the nodata value)
pub(crate) fn is_valid_cell(value: f64, nodata: Option<f64>) -> bool {
    if value.is_nan() {
        return false;
    }
    match nodata {
        Some(nd) => (value - nd).abs() >= f64::EPSILON,
        None => true,
    }
}
