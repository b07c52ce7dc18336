//! Flow accumulation
//!
//! Number of upstream cells flowing into each cell, derived from a D8 flow
//! direction raster. This is the upstream contributing area in cell counts.

use crate::hydrology::D8_OFFSETS;
use floodmap_core::{Algorithm, Error, Raster, Result};
use ndarray::Array2;

/// Flow accumulation algorithm
#[derive(Debug, Clone, Default)]
pub struct FlowAccumulation;

impl Algorithm for FlowAccumulation {
    type Input = Raster<u8>;
    type Output = Raster<f64>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Flow Accumulation"
    }

    fn description(&self) -> &'static str {
        "Calculate upstream contributing area from D8 flow direction"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        flow_accumulation(&input)
    }
}

/// Downstream neighbor of (row, col) for a D8 code, if the code is valid
/// and the neighbor is inside the grid.
fn downstream(
    dir: u8,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    if dir == 0 || dir as usize > D8_OFFSETS.len() {
        return None;
    }
    let (dr, dc) = D8_OFFSETS[(dir - 1) as usize];
    let nr = row as isize + dr;
    let nc = col as isize + dc;

    if nr < 0 || nc < 0 || nr as usize >= rows || nc as usize >= cols {
        return None;
    }
    Some((nr as usize, nc as usize))
}

/// Calculate flow accumulation from a D8 flow direction raster.
///
/// Topological propagation: start at headwater cells (no inflow) and push
/// counts downstream. Headwaters have accumulation 0; each cell passes its
/// accumulation + 1 to its downstream neighbor.
pub fn flow_accumulation(flow_dir: &Raster<u8>) -> Result<Raster<f64>> {
    let (rows, cols) = flow_dir.shape();

    // In-degree: how many cells flow INTO each cell
    let mut in_degree = Array2::<u32>::zeros((rows, cols));
    for row in 0..rows {
        for col in 0..cols {
            let dir = unsafe { flow_dir.get_unchecked(row, col) };
            if let Some((nr, nc)) = downstream(dir, row, col, rows, cols) {
                in_degree[(nr, nc)] += 1;
            }
        }
    }

    // Seed the queue with headwater cells. Direction 0 means pit/flat, not
    // nodata; every cell participates.
    let mut queue: Vec<(usize, usize)> = Vec::new();
    let mut accumulation = Array2::<f64>::zeros((rows, cols));

    for row in 0..rows {
        for col in 0..cols {
            if in_degree[(row, col)] == 0 {
                queue.push((row, col));
            }
        }
    }

    while let Some((row, col)) = queue.pop() {
        let dir = unsafe { flow_dir.get_unchecked(row, col) };
        let Some((nr, nc)) = downstream(dir, row, col, rows, cols) else {
            continue;
        };

        accumulation[(nr, nc)] += accumulation[(row, col)] + 1.0;

        in_degree[(nr, nc)] = in_degree[(nr, nc)].saturating_sub(1);
        if in_degree[(nr, nc)] == 0 {
            queue.push((nr, nc));
        }
    }

    let mut output = flow_dir.with_same_meta::<f64>(rows, cols);
    *output.data_mut() = accumulation;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrology::flow_direction;
    use floodmap_core::GeoTransform;

    #[test]
    fn test_accumulation_linear_strip() {
        // 1x5 strip sloping east: cell 0 -> 1 -> 2 -> 3 -> 4
        let mut dem = Raster::new(1, 5);
        dem.set_transform(GeoTransform::new(0.0, 1.0, 1.0, -1.0));
        for col in 0..5 {
            dem.set(0, col, (5 - col) as f64).unwrap();
        }

        let fdir = flow_direction(&dem).unwrap();
        let acc = flow_accumulation(&fdir).unwrap();

        for (col, expected) in [0.0, 1.0, 2.0, 3.0, 4.0].iter().enumerate() {
            assert_eq!(acc.get(0, col).unwrap(), *expected);
        }
    }

    #[test]
    fn test_accumulation_convergent() {
        // 3x3 with the center lowest: all 8 neighbors drain into it
        let mut dem = Raster::filled(3, 3, 5.0);
        dem.set_transform(GeoTransform::new(0.0, 3.0, 1.0, -1.0));
        dem.set(1, 1, 1.0).unwrap();

        let fdir = flow_direction(&dem).unwrap();
        let acc = flow_accumulation(&fdir).unwrap();

        assert_eq!(acc.get(1, 1).unwrap(), 8.0);
    }

    #[test]
    fn test_accumulation_south_plane() {
        let mut dem = Raster::new(5, 5);
        dem.set_transform(GeoTransform::new(0.0, 5.0, 1.0, -1.0));
        for row in 0..5 {
            for col in 0..5 {
                dem.set(row, col, (5 - row) as f64 * 10.0).unwrap();
            }
        }

        let fdir = flow_direction(&dem).unwrap();
        let acc = flow_accumulation(&fdir).unwrap();

        for col in 0..5 {
            assert_eq!(acc.get(0, col).unwrap(), 0.0, "top row is headwater");
        }
        assert!(acc.get(4, 2).unwrap() >= 4.0, "bottom row accumulates");
    }
}
