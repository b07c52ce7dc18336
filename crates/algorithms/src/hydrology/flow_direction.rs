//! D8 flow direction
//!
//! Direction of flow from each cell to its steepest downslope neighbor.
//!
//! Encoding:
//! ```text
//!   4  3  2
//!   5  0  1
//!   6  7  8
//! ```
//! 0 = pit/flat (no outflow), 1-8 = direction to the steepest neighbor.

use crate::hydrology::{D8_DISTANCES, D8_OFFSETS};
use crate::maybe_rayon::*;
use floodmap_core::{Algorithm, Error, Raster, RasterElement, Result};
use ndarray::Array2;

/// Flow direction algorithm (D8)
#[derive(Debug, Clone, Default)]
pub struct FlowDirection;

impl Algorithm for FlowDirection {
    type Input = Raster<f64>;
    type Output = Raster<u8>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Flow Direction (D8)"
    }

    fn description(&self) -> &'static str {
        "Calculate D8 flow direction from a filled DEM"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        flow_direction(&input)
    }
}

/// Calculate D8 flow direction from a DEM.
///
/// The input should be hydrologically conditioned (sinks filled) for
/// meaningful results. Cells with no downslope neighbor get code 0.
pub fn flow_direction(dem: &Raster<f64>) -> Result<Raster<u8>> {
    let (rows, cols) = dem.shape();
    let nodata = dem.nodata();
    let cell_size = dem.cell_size();

    let output_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0u8; cols];

            for col in 0..cols {
                let center = unsafe { dem.get_unchecked(row, col) };
                if center.is_nodata(nodata) {
                    continue;
                }

                let mut max_drop = 0.0_f64;
                let mut best_dir: u8 = 0;

                for (idx, &(dr, dc)) in D8_OFFSETS.iter().enumerate() {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;

                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }

                    let neighbor = unsafe { dem.get_unchecked(nr as usize, nc as usize) };
                    if neighbor.is_nodata(nodata) {
                        continue;
                    }

                    let drop = (center - neighbor) / (D8_DISTANCES[idx] * cell_size);
                    if drop > max_drop {
                        max_drop = drop;
                        best_dir = (idx + 1) as u8;
                    }
                }

                row_data[col] = best_dir;
            }

            row_data
        })
        .collect();

    let mut output = dem.with_same_meta::<u8>(rows, cols);
    output.set_nodata(Some(0));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), output_data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}
