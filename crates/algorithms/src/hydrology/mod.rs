//! Hydrological analysis algorithms
//!
//! DEM hydrology for the flood-mapping pipeline:
//! - Fill sinks: remove depressions for continuous flow (Planchon-Darboux 2001)
//! - Flow direction: D8 single flow direction
//! - Flow accumulation: upstream contributing area

mod fill_sinks;
mod flow_accumulation;
mod flow_direction;

pub use fill_sinks::{fill_sinks, FillSinks, FillSinksParams};
pub use flow_accumulation::{flow_accumulation, FlowAccumulation};
pub use flow_direction::{flow_direction, FlowDirection};

/// D8 neighbor offsets, indexed to match the direction encoding:
///
/// ```text
///   4  3  2
///   5  .  1
///   6  7  8
/// ```
///
/// Entry `k` is the (row, col) offset for direction code `k + 1`
/// (1=E, 2=NE, 3=N, 4=NW, 5=W, 6=SW, 7=S, 8=SE).
pub(crate) const D8_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Distance factor for each D8 direction (diagonals are sqrt(2) cells away)
pub(crate) const D8_DISTANCES: [f64; 8] = [
    1.0,
    std::f64::consts::SQRT_2,
    1.0,
    std::f64::consts::SQRT_2,
    1.0,
    std::f64::consts::SQRT_2,
    1.0,
    std::f64::consts::SQRT_2,
];
