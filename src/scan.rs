// scan.rs - Walk the epsilon raster and collect candidates for cells over tolerance

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::accumulator::CandidateAccumulator;
use crate::asc::Grid;
use crate::error::{ReduceError, Result};
use crate::lookup::LookupTable;

/// The five rasters a scan reads, cell-aligned with `epsilon`.
#[derive(Debug, Clone)]
pub struct Rasters {
    pub zone: Grid,
    pub beta: Grid,
    pub population: Grid,
    pub treatment: Grid,
    pub epsilon: Grid,
}

impl Rasters {
    /// Every raster must have the epsilon raster's row and column count.
    pub fn check_alignment(&self) -> Result<()> {
        let expected = self.epsilon.shape();
        let others = [
            ("zone", &self.zone),
            ("beta", &self.beta),
            ("population", &self.population),
            ("treatment", &self.treatment),
        ];
        for (name, grid) in others {
            if grid.shape() != expected {
                return Err(ReduceError::GridShape {
                    name,
                    expected,
                    found: grid.shape(),
                });
            }
        }
        Ok(())
    }
}

fn row_progress(rows: usize) -> ProgressBar {
    let bar = ProgressBar::new(rows as u64);
    if let Ok(style) = ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} rows [{elapsed_precise}]") {
        bar.set_style(style);
    }
    bar
}

/// Collect candidates for every cell whose epsilon is data and at least
/// `tolerance`. Fails on the first cell that cannot be binned.
pub fn scan_epsilons(
    rasters: &Rasters,
    lookup: &LookupTable,
    tolerance: f64,
    step: f64,
) -> Result<CandidateAccumulator> {
    rasters.check_alignment()?;
    let epsilon = &rasters.epsilon;
    let mut accumulator = CandidateAccumulator::new();
    let mut qualifying = 0usize;

    let bar = row_progress(epsilon.rows());
    for row in 0..epsilon.rows() {
        for (col, &value) in epsilon.row(row).iter().enumerate() {
            if epsilon.is_nodata(value) || value < tolerance {
                continue;
            }
            qualifying += 1;
            accumulator.add_candidate(
                lookup,
                step,
                rasters.zone.get(row, col),
                rasters.beta.get(row, col),
                rasters.population.get(row, col),
                rasters.treatment.get(row, col),
            )?;
        }
        bar.inc(1);
    }
    bar.finish();

    debug!(
        "{qualifying} cells at or above tolerance {tolerance}, {} candidate betas",
        accumulator.len()
    );
    Ok(accumulator)
}
