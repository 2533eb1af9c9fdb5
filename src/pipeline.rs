// pipeline.rs - One reduction run from configuration to written outputs

use std::path::PathBuf;

use log::info;

use crate::asc::load_asc;
use crate::config::load_configuration;
use crate::error::Result;
use crate::lookup::load_betas;
use crate::params::validate_step;
use crate::reduce::reduce_and_emit;
use crate::scan::{scan_epsilons, Rasters};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub configuration: PathBuf,
    pub gis: PathBuf,
    pub tolerance: f64,
    pub step: f64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No cell qualified, or every candidate is already on record.
    NothingToReduce,
    Written {
        records: usize,
        results: PathBuf,
        script: PathBuf,
    },
}

/// Load every input, scan, reduce, and write the work list and script.
/// The step is checked before any file is opened.
pub fn run(options: &RunOptions) -> Result<Outcome> {
    let step = validate_step(options.step)?;

    let cfg = load_configuration(&options.configuration)?;
    let population = cfg.population(&options.gis)?;
    let zone = cfg.climate_zones(&options.gis, population.header())?;
    let treatment = cfg.treatment_raster(&options.gis, population.header())?;
    let lookup = load_betas(&cfg.reduction.calibration)?;
    let beta = load_asc(&cfg.reduction.beta)?;
    let epsilon = load_asc(&cfg.reduction.epsilon)?;

    info!(
        "Evaluating epsilons for {} rows, {} columns",
        epsilon.rows(),
        epsilon.cols()
    );
    let rasters = Rasters {
        zone,
        beta,
        population,
        treatment,
        epsilon,
    };
    let accumulator = scan_epsilons(&rasters, &lookup, options.tolerance, step)?;

    let paths = &cfg.reduction;
    match reduce_and_emit(accumulator, &lookup, &options.username, &paths.results) {
        None => Ok(Outcome::NothingToReduce),
        Some(reduction) => {
            reduction.write(&paths.results, &paths.script)?;
            Ok(Outcome::Written {
                records: reduction.records.len(),
                results: paths.results.clone(),
                script: paths.script.clone(),
            })
        }
    }
}
