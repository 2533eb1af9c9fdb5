// lookup.rs - Reference calibration table: zone -> population bin -> treatment bin -> betas

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;

use crate::error::{ReduceError, Result};
use crate::fixed::Fixed;

/// One calibration result already on record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceEntry {
    /// Observed prevalence the simulation produced.
    pub pfpr: f64,
    pub beta: Fixed,
}

pub type TreatmentBins = BTreeMap<Fixed, Vec<ReferenceEntry>>;
pub type PopulationBins = BTreeMap<i64, TreatmentBins>;

/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    zones: BTreeMap<i64, PopulationBins>,
}

/// A row of the calibration CSV. Column names follow the calibration
/// scripts; the short names are accepted too.
#[derive(Debug, Deserialize)]
struct CalibrationRow {
    #[serde(alias = "ecozone")]
    zone: f64,
    population: f64,
    #[serde(alias = "access")]
    treatment: f64,
    #[serde(alias = "pfpr2to10", default)]
    pfpr: f64,
    beta: f64,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, zone: i64, population_bin: i64, treatment_bin: Fixed, entry: ReferenceEntry) {
        self.zones
            .entry(zone)
            .or_default()
            .entry(population_bin)
            .or_default()
            .entry(treatment_bin)
            .or_default()
            .push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of reference entries across all keys.
    pub fn len(&self) -> usize {
        self.zones
            .values()
            .flat_map(|pops| pops.values())
            .flat_map(|treatments| treatments.values())
            .map(Vec::len)
            .sum()
    }

    pub fn zone(&self, zone: i64) -> Option<&PopulationBins> {
        self.zones.get(&zone)
    }

    pub fn population(&self, zone: i64, population_bin: i64) -> Option<&TreatmentBins> {
        self.zone(zone)?.get(&population_bin)
    }

    /// Entries for one exact key, empty when the key is unknown.
    pub fn entries(&self, zone: i64, population_bin: i64, treatment_bin: Fixed) -> &[ReferenceEntry] {
        self.population(zone, population_bin)
            .and_then(|treatments| treatments.get(&treatment_bin))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Betas already simulated under one exact key.
    pub fn betas(&self, zone: i64, population_bin: i64, treatment_bin: Fixed) -> BTreeSet<Fixed> {
        self.entries(zone, population_bin, treatment_bin)
            .iter()
            .map(|entry| entry.beta)
            .collect()
    }

    /// Read a calibration table from CSV with a header row.
    pub fn from_reader<R: io::Read>(reader: R) -> csv::Result<Self> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut table = LookupTable::new();
        for row in rdr.deserialize() {
            let row: CalibrationRow = row?;
            table.insert(
                row.zone.round() as i64,
                row.population.round() as i64,
                Fixed::from_f64(row.treatment),
                ReferenceEntry {
                    pfpr: row.pfpr,
                    beta: Fixed::from_f64(row.beta),
                },
            );
        }
        Ok(table)
    }
}

/// Load the calibration lookup table from `path`.
pub fn load_betas<P: AsRef<Path>>(path: P) -> Result<LookupTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| ReduceError::io(path, e))?;
    let table = LookupTable::from_reader(file).map_err(|e| ReduceError::csv(path, e))?;
    debug!("Loaded {} reference entries from {}", table.len(), path.display());
    Ok(table)
}
