// accumulator.rs - Candidate betas gathered per (zone, population bin, treatment bin)

use std::collections::{BTreeMap, BTreeSet};

use crate::binning::resolve_bin;
use crate::error::{ReduceError, Result};
use crate::fixed::Fixed;
use crate::lookup::LookupTable;

/// How many steps to reach either side of the observed beta.
pub const REACH: u32 = 10;

type TreatmentCandidates = BTreeMap<Fixed, BTreeSet<Fixed>>;
type PopulationCandidates = BTreeMap<i64, TreatmentCandidates>;

/// Betas worth simulating, keyed like the lookup table. Every stored beta
/// is strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateAccumulator {
    zones: BTreeMap<i64, PopulationCandidates>,
}

/// Betas from `round(beta - REACH*step)` up to, but excluding,
/// `round(beta + REACH*step)`, each obtained by adding `step` to the
/// previous one and rounding. Non-positive values are dropped.
///
/// Stops early if a rounded increment no longer moves the value, which
/// happens for steps finer than the four-decimal grid.
pub fn stepped_betas(beta: f64, step: f64) -> Vec<Fixed> {
    let reach = step * REACH as f64;
    let end = Fixed::from_f64(beta + reach);
    let mut value = Fixed::from_f64(beta - reach);
    let mut betas = Vec::with_capacity(2 * REACH as usize);

    for _ in 0..2 * REACH {
        if value >= end {
            break;
        }
        if value.is_positive() {
            betas.push(value);
        }
        let next = Fixed::from_f64(value.value() + step);
        if next <= value {
            break;
        }
        value = next;
    }
    betas
}

impl CandidateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Total number of candidate betas.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, _, _, betas)| betas.len()).sum()
    }

    /// Candidates under one exact key.
    pub fn candidates(&self, zone: i64, population_bin: i64, treatment_bin: Fixed) -> Option<&BTreeSet<Fixed>> {
        self.zones.get(&zone)?.get(&population_bin)?.get(&treatment_bin)
    }

    /// All keys with their candidates, ascending by zone, population bin,
    /// then treatment bin.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64, Fixed, &BTreeSet<Fixed>)> + '_ {
        self.zones.iter().flat_map(|(&zone, pops)| {
            pops.iter().flat_map(move |(&population, treatments)| {
                treatments
                    .iter()
                    .map(move |(&treatment, betas)| (zone, population, treatment, betas))
            })
        })
    }

    pub fn zones(&self) -> Vec<i64> {
        self.zones.keys().copied().collect()
    }

    /// Distinct population bins across every zone, ascending.
    pub fn population_bins(&self) -> Vec<i64> {
        self.zones
            .values()
            .flat_map(|pops| pops.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bin the cell against `lookup` and add the stepped betas around
    /// `beta` to that bin's candidate set.
    ///
    /// `step` must lie in (0, 1); that is checked once by the caller
    /// (see [`crate::params::validate_step`]).
    pub fn add_candidate(
        &mut self,
        lookup: &LookupTable,
        step: f64,
        zone: f64,
        beta: f64,
        population: f64,
        treatment: f64,
    ) -> Result<()> {
        if !zone.is_finite() {
            return Err(ReduceError::InvalidBin { value: zone });
        }
        let zone_key = zone.round() as i64;

        let populations = lookup
            .zone(zone_key)
            .ok_or(ReduceError::InvalidBin { value: zone })?;
        let population_bin = resolve_bin(population, populations.keys().copied())?;
        let treatments = lookup
            .population(zone_key, population_bin)
            .ok_or(ReduceError::InvalidBin { value: population })?;
        let treatment_bin = resolve_bin(treatment, treatments.keys().copied())?;

        let betas = self
            .zones
            .entry(zone_key)
            .or_default()
            .entry(population_bin)
            .or_default()
            .entry(treatment_bin)
            .or_default();
        betas.extend(stepped_betas(beta, step));
        Ok(())
    }
}

/// Free-function form of [`CandidateAccumulator::add_candidate`].
pub fn add_candidate(
    accumulator: &mut CandidateAccumulator,
    lookup: &LookupTable,
    step: f64,
    zone: f64,
    beta: f64,
    population: f64,
    treatment: f64,
) -> Result<()> {
    accumulator.add_candidate(lookup, step, zone, beta, population, treatment)
}
