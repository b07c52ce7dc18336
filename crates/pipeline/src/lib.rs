//! # Floodmap Pipeline
//!
//! The flood-mapping workflow: a fixed, linear sequence of analysis steps
//! over an input DEM, each writing its raster product under `outputs/maps`
//! and recording the path in the workflow result.
//!
//! Step order: load DEM, hillshade, slope, aspect, fill sinks, flow
//! direction, flow accumulation, flood-zone classification.

mod sequencer;

pub use floodmap_algorithms::classify::FloodThresholds;
pub use sequencer::{FloodWorkflow, WorkflowOutcome, STEP_NAMES};
