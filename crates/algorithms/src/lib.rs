//! # Floodmap Algorithms
//!
//! The analysis steps of the flood-prone zone mapping pipeline:
//!
//! - **terrain**: slope, aspect, hillshade (Horn 1981)
//! - **hydrology**: fill sinks, D8 flow direction, flow accumulation
//! - **classify**: flood-zone classification from threshold criteria

pub mod classify;
pub mod hydrology;
pub mod terrain;

pub(crate) mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classify::{classify_flood_zones, FloodThresholds, FloodZones};
    pub use crate::hydrology::{
        fill_sinks, flow_accumulation, flow_direction, FillSinks, FillSinksParams,
        FlowAccumulation, FlowDirection,
    };
    pub use crate::terrain::{
        aspect, hillshade, slope, Aspect, AspectOutput, Hillshade, HillshadeParams, Slope,
        SlopeParams, SlopeUnits,
    };
    pub use floodmap_core::prelude::*;
}
