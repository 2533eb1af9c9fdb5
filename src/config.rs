//! Run configuration, read from the simulation's YAML configuration file.
//!
//! Only the keys listed on [`Configuration`] are read; the rest of the
//! simulation configuration is ignored.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::asc::{load_asc, AscHeader, Grid};
use crate::error::{ReduceError, Result};

/// Where the rasters live, relative to the GIS directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RasterDb {
    #[serde(default = "default_population_raster")]
    pub population_raster: PathBuf,
    /// When absent, every cell is in [`Configuration::ecozone`].
    #[serde(default)]
    pub ecozone_raster: Option<PathBuf>,
    /// When absent, every cell uses [`Configuration::treatment`].
    #[serde(default)]
    pub pr_treatment_under5: Option<PathBuf>,
}

/// Inputs produced by the beta map step and the outputs of this tool.
/// Relative paths are taken from the working directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReductionPaths {
    #[serde(default = "default_calibration")]
    pub calibration: PathBuf,
    #[serde(default = "default_beta")]
    pub beta: PathBuf,
    #[serde(default = "default_epsilon")]
    pub epsilon: PathBuf,
    #[serde(default = "default_results")]
    pub results: PathBuf,
    #[serde(default = "default_script")]
    pub script: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub raster_db: RasterDb,
    /// Climate zone for countries with a single ecozone.
    #[serde(default)]
    pub ecozone: f64,
    /// Treatment rate for countries with a single rate.
    #[serde(default = "default_treatment")]
    pub treatment: f64,
    #[serde(default)]
    pub reduction: ReductionPaths,
}

fn default_population_raster() -> PathBuf {
    PathBuf::from("rwa_population.asc")
}

fn default_calibration() -> PathBuf {
    PathBuf::from("data/calibration.csv")
}

fn default_beta() -> PathBuf {
    PathBuf::from("out/mean_beta.asc")
}

fn default_epsilon() -> PathBuf {
    PathBuf::from("out/epsilons_beta.asc")
}

fn default_results() -> PathBuf {
    PathBuf::from("out/reduction.csv")
}

fn default_script() -> PathBuf {
    PathBuf::from("out/script.sh")
}

fn default_treatment() -> f64 {
    0.99
}

impl Default for RasterDb {
    fn default() -> Self {
        Self {
            population_raster: default_population_raster(),
            ecozone_raster: None,
            pr_treatment_under5: None,
        }
    }
}

impl Default for ReductionPaths {
    fn default() -> Self {
        Self {
            calibration: default_calibration(),
            beta: default_beta(),
            epsilon: default_epsilon(),
            results: default_results(),
            script: default_script(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            raster_db: RasterDb::default(),
            ecozone: 0.0,
            treatment: default_treatment(),
            reduction: ReductionPaths::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit; treat it as all defaults.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn population(&self, gis: &Path) -> Result<Grid> {
        load_asc(gis.join(&self.raster_db.population_raster))
    }

    /// Climate zones from the ecozone raster, or a uniform grid shaped
    /// like `template` when no raster is configured.
    pub fn climate_zones(&self, gis: &Path, template: &AscHeader) -> Result<Grid> {
        match &self.raster_db.ecozone_raster {
            Some(file) => load_asc(gis.join(file)),
            None => {
                debug!("No ecozone raster, using zone {} everywhere", self.ecozone);
                Ok(Grid::filled(template.clone(), self.ecozone))
            }
        }
    }

    /// Treatment rates from the treatment raster, or a uniform grid shaped
    /// like `template` when no raster is configured.
    pub fn treatment_raster(&self, gis: &Path, template: &AscHeader) -> Result<Grid> {
        match &self.raster_db.pr_treatment_under5 {
            Some(file) => load_asc(gis.join(file)),
            None => {
                debug!("No treatment raster, using rate {} everywhere", self.treatment);
                Ok(Grid::filled(template.clone(), self.treatment))
            }
        }
    }
}

/// Read the configuration file at `path`.
pub fn load_configuration<P: AsRef<Path>>(path: P) -> Result<Configuration> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ReduceError::io(path, e))?;
    Configuration::from_yaml_str(&text).map_err(|source| ReduceError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
