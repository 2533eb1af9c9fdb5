//! Drop candidates the reference table already covers and emit the rest
//! as a work list plus the shell script that launches it.

use std::fs;
use std::io;
use std::path::Path;

use csv::WriterBuilder;
use log::info;

use crate::accumulator::CandidateAccumulator;
use crate::error::{ReduceError, Result};
use crate::fixed::Fixed;
use crate::lookup::LookupTable;

/// One beta to simulate under one lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReductionRecord {
    pub zone: i64,
    pub population_bin: i64,
    pub treatment_bin: Fixed,
    pub beta: Fixed,
}

impl ReductionRecord {
    fn fields(&self) -> [String; 4] {
        [
            self.zone.to_string(),
            self.population_bin.to_string(),
            self.treatment_bin.to_string(),
            self.beta.to_string(),
        ]
    }
}

/// Non-empty result of a reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// Sorted by zone, population bin, treatment bin, then beta.
    pub records: Vec<ReductionRecord>,
    pub script: String,
}

/// The launcher script for a work list.
pub fn render_script(population_bins: &[i64], zones: &[i64], results_name: &str, username: &str) -> String {
    let join = |values: &[i64]| {
        values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    let mut script = String::from("#!/bin/bash\n");
    script.push_str("source ./calibrationLib.sh\n");
    script.push_str(&format!("generateAsc \"\\\"{}\\\"\"\n", join(population_bins)));
    script.push_str(&format!("generateZoneAsc \"\\\"{}\\\"\"\n", join(zones)));
    script.push_str(&format!("runCsv '{results_name}' {username}\n"));
    script
}

/// Compare `accumulator` against `lookup` and keep the betas not yet on
/// record. Returns `None` when nothing is left to simulate.
///
/// The script refers to the work list by the file name of `results`, since
/// it runs from the directory the list is written to.
pub fn reduce_and_emit(
    accumulator: CandidateAccumulator,
    lookup: &LookupTable,
    username: &str,
    results: &Path,
) -> Option<Reduction> {
    if accumulator.is_empty() {
        return None;
    }

    let mut records = Vec::new();
    for (zone, population_bin, treatment_bin, candidates) in accumulator.iter() {
        let known = lookup.betas(zone, population_bin, treatment_bin);
        records.extend(
            candidates
                .iter()
                .filter(|beta| !known.contains(beta))
                .map(|&beta| ReductionRecord {
                    zone,
                    population_bin,
                    treatment_bin,
                    beta,
                }),
        );
    }
    if records.is_empty() {
        return None;
    }

    let results_name = results
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| results.display().to_string());
    let script = render_script(
        &accumulator.population_bins(),
        &accumulator.zones(),
        &results_name,
        username,
    );
    Some(Reduction { records, script })
}

/// Write records as headerless `zone,population,treatment,beta` rows.
pub fn write_records<W: io::Write>(records: &[ReductionRecord], writer: W) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    for record in records {
        wtr.write_record(record.fields())?;
    }
    wtr.flush()?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| ReduceError::io(dir, e))
        }
        _ => Ok(()),
    }
}

impl Reduction {
    /// Write the work list to `results` and the launcher to `script`.
    pub fn write(&self, results: &Path, script: &Path) -> Result<()> {
        info!("Preparing inputs, {}", results.display());
        create_parent(results)?;
        let file = fs::File::create(results).map_err(|e| ReduceError::io(results, e))?;
        write_records(&self.records, file).map_err(|e| ReduceError::csv(results, e))?;

        info!("Preparing script, {}", script.display());
        create_parent(script)?;
        fs::write(script, &self.script).map_err(|e| ReduceError::io(script, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(script, fs::Permissions::from_mode(0o755))
                .map_err(|e| ReduceError::io(script, e))?;
        }
        Ok(())
    }
}
