//! Floodmap CLI - flood-prone zone mapping from DEM analysis

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use floodmap_algorithms::classify::{classify_flood_zones, FloodThresholds};
use floodmap_algorithms::hydrology::{
    fill_sinks, flow_accumulation, flow_direction, FillSinksParams,
};
use floodmap_algorithms::terrain::{
    aspect, hillshade, slope, AspectOutput, HillshadeParams, SlopeParams, SlopeUnits,
};
use floodmap_core::io::{read_geotiff, write_geotiff};
use floodmap_core::{ProjectLayout, Raster, StudyArea};
use floodmap_pipeline::{FloodWorkflow, WorkflowOutcome};
use floodmap_sample::SampleGenerator;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "floodmap")]
#[command(author, version, about = "Flood-prone zone mapping from DEM analysis and rainfall thresholds", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Generate synthetic sample data (DEM + rainfall) into a project
    Generate {
        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Grid size (cells per side)
        #[arg(long, default_value = "1000")]
        size: usize,
        /// Random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the full flood-mapping workflow over a DEM
    Workflow {
        /// Input DEM file
        dem: PathBuf,
        /// Optional rainfall raster for the classification step
        #[arg(long)]
        rainfall: Option<PathBuf>,
        /// Project root directory (outputs land under <root>/outputs/maps)
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Terrain analysis algorithms
    Terrain {
        #[command(subcommand)]
        algorithm: TerrainCommands,
    },
    /// Hydrology algorithms
    Hydrology {
        #[command(subcommand)]
        algorithm: HydrologyCommands,
    },
    /// Classify flood-prone zones from precomputed rasters
    Classify {
        /// Input DEM file
        #[arg(long)]
        dem: PathBuf,
        /// Slope raster (degrees)
        #[arg(long)]
        slope: PathBuf,
        /// Flow accumulation raster
        #[arg(long)]
        flow_accumulation: PathBuf,
        /// Optional rainfall raster
        #[arg(long)]
        rainfall: Option<PathBuf>,
        /// Output file
        output: PathBuf,
        /// Maximum flood-prone elevation
        #[arg(long, default_value = "50")]
        elevation_max: f64,
        /// Maximum flood-prone slope (degrees)
        #[arg(long, default_value = "5")]
        slope_max: f64,
        /// Minimum upstream contributing area (cells)
        #[arg(long, default_value = "1000")]
        flow_accumulation_min: f64,
        /// Minimum flood-triggering rainfall
        #[arg(long, default_value = "200")]
        rainfall_threshold: f64,
    },
}

#[derive(Subcommand)]
enum TerrainCommands {
    /// Calculate slope from DEM
    Slope {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Output units: degrees, percent, radians
        #[arg(short, long, default_value = "degrees")]
        units: String,
        /// Z-factor for unit conversion
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
    /// Calculate aspect from DEM
    Aspect {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Output format: degrees, radians, compass
        #[arg(short, long, default_value = "degrees")]
        format: String,
    },
    /// Calculate hillshade from DEM
    Hillshade {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Sun azimuth in degrees (0=North, clockwise)
        #[arg(short, long, default_value = "315")]
        azimuth: f64,
        /// Sun altitude in degrees above horizon
        #[arg(short = 'l', long, default_value = "45")]
        altitude: f64,
        /// Z-factor for vertical exaggeration
        #[arg(short, long, default_value = "1.0")]
        z_factor: f64,
    },
}

#[derive(Subcommand)]
enum HydrologyCommands {
    /// Fill sinks / depressions in DEM (Planchon-Darboux 2001)
    FillSinks {
        /// Input DEM file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Minimum slope to enforce
        #[arg(long, default_value = "0.01")]
        min_slope: f64,
    },
    /// D8 flow direction from DEM
    FlowDirection {
        /// Input DEM file (ideally sink-filled)
        input: PathBuf,
        /// Output file (codes 0-8)
        output: PathBuf,
    },
    /// Flow accumulation from flow direction raster
    FlowAccumulation {
        /// Input flow direction raster (D8 codes)
        input: PathBuf,
        /// Output file (upstream cell count)
        output: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_dem(path: &PathBuf) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path).context("Failed to read raster")?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn read_u8(path: &PathBuf) -> Result<Raster<u8>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<u8> = read_geotiff(path).context("Failed to read raster")?;
    pb.finish_and_clear();
    Ok(raster)
}

fn write_result<T: floodmap_core::RasterElement>(raster: &Raster<T>, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, None).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let raster = read_dem(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs);
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {:?}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len() as f64
            );
        }

        // ── Generate ─────────────────────────────────────────────────
        Commands::Generate { root, size, seed } => {
            let layout = ProjectLayout::new(&root);
            let mut generator = SampleGenerator::new(layout, StudyArea::kosi_basin())
                .with_grid_size(size, size);
            if let Some(seed) = seed {
                generator = generator.with_seed(seed);
            }

            let start = Instant::now();
            let report = generator
                .run_processing()
                .context("Failed to generate sample data")?;
            let elapsed = start.elapsed();

            println!("=== Data Processing Results ===");
            println!("Study Area: {}", generator.study_area().name());
            println!("DEM File: {}", report.dem_file.display());
            println!("Rainfall File: {}", report.rainfall_file.display());
            println!("Success: {}", report.success);
            println!("  Processing time: {:.2?}", elapsed);
        }

        // ── Workflow ─────────────────────────────────────────────────
        Commands::Workflow {
            dem,
            rainfall,
            root,
        } => {
            let workflow =
                FloodWorkflow::new(ProjectLayout::new(&root), FloodThresholds::default());

            let start = Instant::now();
            let outcome = workflow
                .run(&dem, rainfall.as_deref())
                .context("Workflow failed")?;
            let elapsed = start.elapsed();

            match outcome {
                WorkflowOutcome::Skipped { dem_path } => {
                    println!("Workflow skipped: DEM not found at {}", dem_path.display());
                    println!("Run `floodmap generate` first, or point --dem at an existing raster.");
                }
                WorkflowOutcome::Completed(outputs) => {
                    println!("Workflow completed in {:.2?}:", elapsed);
                    for (step, path) in &outputs {
                        println!("  {:<18} {}", step, path.display());
                    }
                }
            }
        }

        // ── Terrain ──────────────────────────────────────────────────
        Commands::Terrain { algorithm } => match algorithm {
            TerrainCommands::Slope {
                input,
                output,
                units,
                z_factor,
            } => {
                let units = match units.to_lowercase().as_str() {
                    "degrees" | "deg" | "d" => SlopeUnits::Degrees,
                    "percent" | "pct" | "%" => SlopeUnits::Percent,
                    "radians" | "rad" | "r" => SlopeUnits::Radians,
                    _ => {
                        eprintln!("Unknown units: {}. Using degrees.", units);
                        SlopeUnits::Degrees
                    }
                };
                let dem = read_dem(&input)?;
                let start = Instant::now();
                let result = slope(&dem, SlopeParams { units, z_factor })
                    .context("Failed to calculate slope")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Slope", &output, elapsed);
            }

            TerrainCommands::Aspect {
                input,
                output,
                format,
            } => {
                let fmt = match format.to_lowercase().as_str() {
                    "degrees" | "deg" | "d" => AspectOutput::Degrees,
                    "radians" | "rad" | "r" => AspectOutput::Radians,
                    "compass" | "c" => AspectOutput::Compass,
                    _ => {
                        eprintln!("Unknown format: {}. Using degrees.", format);
                        AspectOutput::Degrees
                    }
                };
                let dem = read_dem(&input)?;
                let start = Instant::now();
                let result = aspect(&dem, fmt).context("Failed to calculate aspect")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Aspect", &output, elapsed);
            }

            TerrainCommands::Hillshade {
                input,
                output,
                azimuth,
                altitude,
                z_factor,
            } => {
                let dem = read_dem(&input)?;
                let start = Instant::now();
                let result = hillshade(
                    &dem,
                    HillshadeParams {
                        azimuth,
                        altitude,
                        z_factor,
                        normalized: false,
                    },
                )
                .context("Failed to calculate hillshade")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Hillshade", &output, elapsed);
            }
        },

        // ── Hydrology ────────────────────────────────────────────────
        Commands::Hydrology { algorithm } => match algorithm {
            HydrologyCommands::FillSinks {
                input,
                output,
                min_slope,
            } => {
                let dem = read_dem(&input)?;
                let start = Instant::now();
                let result = fill_sinks(&dem, FillSinksParams { min_slope })
                    .context("Failed to fill sinks")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Fill sinks", &output, elapsed);
            }

            HydrologyCommands::FlowDirection { input, output } => {
                let dem = read_dem(&input)?;
                let start = Instant::now();
                let result = flow_direction(&dem).context("Failed to calculate flow direction")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Flow direction", &output, elapsed);
            }

            HydrologyCommands::FlowAccumulation { input, output } => {
                let fdir = read_u8(&input)?;
                let start = Instant::now();
                let result =
                    flow_accumulation(&fdir).context("Failed to calculate flow accumulation")?;
                let elapsed = start.elapsed();
                write_result(&result, &output)?;
                done("Flow accumulation", &output, elapsed);
            }
        },

        // ── Classify ─────────────────────────────────────────────────
        Commands::Classify {
            dem,
            slope: slope_path,
            flow_accumulation: facc_path,
            rainfall,
            output,
            elevation_max,
            slope_max,
            flow_accumulation_min,
            rainfall_threshold,
        } => {
            let thresholds = FloodThresholds {
                elevation_max,
                slope_max,
                flow_accumulation_min,
                rainfall_threshold,
            };

            let dem_raster = read_dem(&dem)?;
            let slope_raster = read_dem(&slope_path)?;
            let facc_raster = read_dem(&facc_path)?;
            let rain_raster = match &rainfall {
                Some(path) => Some(read_dem(path)?),
                None => None,
            };

            let start = Instant::now();
            let result = classify_flood_zones(
                &dem_raster,
                &slope_raster,
                &facc_raster,
                rain_raster.as_ref(),
                &thresholds,
            )
            .context("Failed to classify flood zones")?;
            let elapsed = start.elapsed();
            write_result(&result, &output)?;
            done("Flood zones", &output, elapsed);
        }
    }

    Ok(())
}
