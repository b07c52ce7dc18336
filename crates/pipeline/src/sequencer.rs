//! The workflow sequencer

use floodmap_algorithms::classify::{classify_flood_zones, FloodThresholds};
use floodmap_algorithms::hydrology::{
    fill_sinks, flow_accumulation, flow_direction, FillSinksParams,
};
use floodmap_algorithms::terrain::{
    aspect, hillshade, slope, AspectOutput, HillshadeParams, SlopeParams,
};
use floodmap_core::io::{read_geotiff, write_geotiff};
use floodmap_core::{ProjectLayout, Raster, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The seven product-writing steps, in execution order.
pub const STEP_NAMES: [&str; 7] = [
    "hillshade",
    "slope",
    "aspect",
    "filled_dem",
    "flow_direction",
    "flow_accumulation",
    "flood_risk",
];

/// Result of a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// The input DEM was absent; nothing was computed or written.
    Skipped { dem_path: PathBuf },
    /// All steps ran; step name mapped to the written raster path.
    Completed(BTreeMap<String, PathBuf>),
}

impl WorkflowOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, WorkflowOutcome::Skipped { .. })
    }

    /// The step map of a completed run
    pub fn outputs(&self) -> Option<&BTreeMap<String, PathBuf>> {
        match self {
            WorkflowOutcome::Completed(map) => Some(map),
            WorkflowOutcome::Skipped { .. } => None,
        }
    }
}

/// Runs the flood-mapping steps in a fixed linear order.
///
/// The sequencer itself never validates step inputs beyond what each
/// algorithm requires; the only precondition checked is that the input DEM
/// file exists, and a missing DEM skips the run with a warning instead of
/// failing.
#[derive(Debug, Clone)]
pub struct FloodWorkflow {
    layout: ProjectLayout,
    thresholds: FloodThresholds,
}

impl FloodWorkflow {
    pub fn new(layout: ProjectLayout, thresholds: FloodThresholds) -> Self {
        Self { layout, thresholds }
    }

    pub fn thresholds(&self) -> &FloodThresholds {
        &self.thresholds
    }

    /// Run the complete workflow over a DEM, with an optional rainfall
    /// raster for the classification step.
    pub fn run(&self, dem_path: &Path, rainfall_path: Option<&Path>) -> Result<WorkflowOutcome> {
        if !dem_path.exists() {
            warn!(dem = %dem_path.display(), "DEM file not found, skipping workflow run");
            return Ok(WorkflowOutcome::Skipped {
                dem_path: dem_path.to_path_buf(),
            });
        }

        info!(dem = %dem_path.display(), "starting flood inundation mapping workflow");
        self.layout.materialize()?;
        let maps = self.layout.maps_dir();

        let mut outputs = BTreeMap::new();
        let mut record = |name: &str, path: PathBuf| {
            outputs.insert(name.to_string(), path);
        };

        let dem: Raster<f64> = read_geotiff(dem_path)?;

        info!("generating hillshade");
        let shade = hillshade(&dem, HillshadeParams::default())?;
        record("hillshade", write_step(&shade, &maps, "hillshade.tif")?);

        info!("calculating slope and aspect");
        let slope_raster = slope(&dem, SlopeParams::default())?;
        record("slope", write_step(&slope_raster, &maps, "slope.tif")?);

        let aspect_raster = aspect(&dem, AspectOutput::default())?;
        record("aspect", write_step(&aspect_raster, &maps, "aspect.tif")?);

        info!("filling sinks");
        let filled = fill_sinks(&dem, FillSinksParams::default())?;
        record("filled_dem", write_step(&filled, &maps, "dem_filled.tif")?);

        info!("calculating flow direction");
        let fdir = flow_direction(&filled)?;
        record("flow_direction", write_step(&fdir, &maps, "flow_direction.tif")?);

        info!("calculating flow accumulation");
        let facc = flow_accumulation(&fdir)?;
        record(
            "flow_accumulation",
            write_step(&facc, &maps, "flow_accumulation.tif")?,
        );

        info!("classifying flood zones");
        let rainfall: Option<Raster<f64>> = match rainfall_path {
            Some(path) => Some(read_geotiff(path)?),
            None => None,
        };
        let risk = classify_flood_zones(
            &dem,
            &slope_raster,
            &facc,
            rainfall.as_ref(),
            &self.thresholds,
        )?;
        record("flood_risk", write_step(&risk, &maps, "flood_risk.tif")?);

        info!("workflow completed");
        Ok(WorkflowOutcome::Completed(outputs))
    }
}

fn write_step<T: floodmap_core::RasterElement>(
    raster: &Raster<T>,
    maps_dir: &Path,
    filename: &str,
) -> Result<PathBuf> {
    let path = maps_dir.join(filename);
    write_geotiff(raster, &path, None)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names_cover_the_pipeline() {
        assert_eq!(STEP_NAMES.len(), 7);
        assert_eq!(STEP_NAMES[0], "hillshade");
        assert_eq!(STEP_NAMES[6], "flood_risk");
    }

    #[test]
    fn test_skipped_outcome_accessors() {
        let outcome = WorkflowOutcome::Skipped {
            dem_path: PathBuf::from("/missing.tif"),
        };
        assert!(outcome.is_skipped());
        assert!(outcome.outputs().is_none());
    }
}
