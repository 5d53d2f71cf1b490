//! Command-line driver for the SMART sub-surface model.
//!
//! ```bash
//! # Single cell over a timeseries, table on stdout
//! smart run -c smart.toml -f forcing.json
//!
//! # Same, all fluxes written as JSON columns
//! smart run -c smart.toml -f forcing.json -o fluxes.json
//!
//! # Grid of cells, forcing given per step and per cell
//! smart grid -c smart.toml -f grid-forcing.json
//! ```
//!
//! Logging goes through `SMART_LOG`, then `RUST_LOG` (an `EnvFilter`
//! directive, default `smart_core=info`); `SMART_LOG_FORMAT=json`
//! switches to JSON lines.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smart_core::forcing::ForcingData;
use smart_core::smart::run;
use smart_core::{Checkpoint, Grid, Result, RunConfig, SmartError, State};

#[derive(Parser, Debug)]
#[command(name = "smart", version, about = "SMART sub-surface bucket model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single cell over a forcing timeseries.
    Run {
        /// TOML run configuration.
        #[arg(short, long)]
        config: PathBuf,
        /// JSON file with `throughfall` and `transpiration` arrays [kg m-2 s-1].
        #[arg(short, long)]
        forcing: PathBuf,
        /// Write every flux as JSON columns instead of printing a table.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Step a grid of cells; forcing arrays are indexed [step][cell].
    Grid {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        forcing: PathBuf,
    },
}

#[derive(Deserialize)]
struct SeriesFile {
    throughfall: Vec<f64>,
    transpiration: Vec<f64>,
}

#[derive(Deserialize)]
struct GridFile {
    throughfall: Vec<Vec<f64>>,
    transpiration: Vec<Vec<f64>>,
}

fn main() {
    let log_format = std::env::var("SMART_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_env("SMART_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| "smart_core=info".into());

    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    let cli = Cli::parse();
    if let Err(e) = execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            config,
            forcing,
            output,
        } => run_cell(&config, &forcing, output.as_deref()),
        Command::Grid { config, forcing } => run_grid(&config, &forcing),
    }
}

/// Restore from the configured checkpoint when it exists.
///
/// The checkpoint must have been taken with the configured timestep.
fn restore(config: &RunConfig) -> Result<Option<Checkpoint>> {
    match &config.checkpoint {
        Some(path) if path.exists() => {
            let checkpoint = Checkpoint::load(path)?;
            checkpoint.check_dt(config.timestep_seconds)?;
            Ok(Some(checkpoint))
        }
        _ => Ok(None),
    }
}

fn run_cell(config_path: &Path, forcing_path: &Path, output: Option<&Path>) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let series: SeriesFile = serde_json::from_str(&fs::read_to_string(forcing_path)?)?;
    let forcing = ForcingData::new(series.throughfall, series.transpiration, config.timestep_seconds)?;

    let checkpoint = restore(&config)?;
    let (initial, steps_before) = match &checkpoint {
        Some(cp) => {
            let state = cp
                .states
                .first()
                .copied()
                .ok_or_else(|| SmartError::shape_mismatch("checkpoint states", 1, 0))?;
            state.check_physical(&config.parameters, 0)?;
            (Some(state), cp.steps_taken)
        }
        None => (None, 0),
    };

    let initial_water = initial
        .unwrap_or_else(|| State::initialize(&config.parameters))
        .soil_water();
    let (result, final_state) = run::run(&config.parameters, &forcing, initial.as_ref());
    tracing::info!(steps = result.len(), "single-cell run finished");

    match output {
        Some(path) => {
            let columns: BTreeMap<&str, &[f64]> = result.columns().into_iter().collect();
            fs::write(path, serde_json::to_string(&columns)?)?;
            tracing::info!(path = %path.display(), "wrote fluxes");
        }
        None => {
            println!(" Step | Throughfall |  Surface Q  |  Ground Q   | Stress | Soil water");
            println!("------|-------------|-------------|-------------|--------|-----------");
            for t in 0..result.len() {
                println!(
                    " {:>4} | {:>11.3e} | {:>11.3e} | {:>11.3e} | {:>6.3} | {:>9.2}",
                    t + 1,
                    result.throughfall[t],
                    result.surface_runoff_flux_delivered_to_rivers[t],
                    result.net_groundwater_flux_to_rivers[t],
                    result.soil_water_stress_for_transpiration[t],
                    result.soil_water[t],
                );
            }

            // Water balance check over the run [kg m-2]
            let total_in: f64 = result.excess_rain.iter().sum();
            let total_et: f64 = result.soil_evaporation.iter().sum();
            let total_q: f64 = result
                .surface_runoff_flux_delivered_to_rivers
                .iter()
                .chain(&result.net_groundwater_flux_to_rivers)
                .sum::<f64>()
                * forcing.dt;
            let stored = final_state.soil_water() - initial_water
                + final_state.stores().iter().sum::<f64>()
                - initial.map(|s| s.stores().iter().sum::<f64>()).unwrap_or(0.0);
            println!(
                "\nTotals [kg m-2]: in={:.2}, ET={:.2}, Q={:.2}, dS={:.2}",
                total_in, total_et, total_q, stored
            );
        }
    }

    if let Some(path) = &config.checkpoint {
        let steps = steps_before + result.len() as u64;
        Checkpoint::single(final_state, forcing.dt, steps).save(path)?;
    }
    Ok(())
}

fn run_grid(config_path: &Path, forcing_path: &Path) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let file: GridFile = serde_json::from_str(&fs::read_to_string(forcing_path)?)?;
    if file.throughfall.len() != file.transpiration.len() {
        return Err(SmartError::shape_mismatch(
            "transpiration steps",
            file.throughfall.len(),
            file.transpiration.len(),
        ));
    }

    let params = vec![config.parameters; config.cells];
    let mut grid = match restore(&config)? {
        Some(cp) => Grid::restore(params, cp)?,
        None => Grid::new(params, config.timestep_seconds)?,
    };

    println!(" Step | Mean surface Q | Mean ground Q | Mean stress");
    println!("------|----------------|---------------|------------");
    for (throughfall, transpiration) in file.throughfall.iter().zip(&file.transpiration) {
        let out = grid.step(throughfall, transpiration)?;
        println!(
            " {:>4} | {:>14.3e} | {:>13.3e} | {:>11.3}",
            grid.steps_taken(),
            mean(&out.surface_runoff_flux_delivered_to_rivers),
            mean(&out.net_groundwater_flux_to_rivers),
            mean(&out.soil_water_stress_for_transpiration),
        );
    }
    tracing::info!(cells = grid.len(), steps = grid.steps_taken(), "grid run finished");

    if let Some(path) = &config.checkpoint {
        grid.checkpoint().save(path)?;
    }
    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
