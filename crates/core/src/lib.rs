//! # Floodmap Core
//!
//! Core types and I/O for the floodmap flood-prone zone mapping workspace.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced raster grid type
//! - `GeoTransform`: affine transformation for georeferencing
//! - `Crs`: coordinate reference system handling
//! - `StudyArea` / `BoundingBox`: geographic extent of an analysis
//! - `ProjectLayout`: the on-disk directory convention of a project
//! - Native GeoTIFF reading/writing

pub mod crs;
pub mod error;
pub mod io;
pub mod layout;
pub mod raster;
pub mod study_area;

pub use crs::Crs;
pub use error::{Error, Result};
pub use layout::ProjectLayout;
pub use raster::{GeoTransform, Raster, RasterElement};
pub use study_area::{BoundingBox, StudyArea};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::layout::ProjectLayout;
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::study_area::{BoundingBox, StudyArea};
    pub use crate::Algorithm;
}

/// Core trait for the analysis steps in floodmap.
///
/// An algorithm is a pure function from input data and parameters to output
/// data; it never touches the filesystem.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
