//! # Floodmap Sample
//!
//! Synthetic sample data for the flood-mapping pipeline: georeferenced
//! elevation and rainfall rasters drawn from configurable distributions,
//! written into the standard project layout.
//!
//! Generation is seedable so tests can assert exact values; unseeded runs
//! draw from OS entropy.

mod distribution;
mod generator;

pub use distribution::ValueRule;
pub use generator::{ProcessingReport, SampleGenerator, DEM_FILENAME, RAINFALL_FILENAME};
