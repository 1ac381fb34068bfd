//! Cohort-level aggregation of patient outcomes.
//!
//! [`CohortOutcomes`] collects four samples from finished patients:
//!
//! | Sample | One entry per | Notes |
//! |--------|---------------|-------|
//! | survival times | patient who died within the horizon | survivors are censored |
//! | stroke counts | patient | |
//! | discounted costs | patient | |
//! | discounted utilities | patient | |
//!
//! plus a [`SummaryStat`] for each and the [`SurvivalCurve`] (number of living
//! patients over time).

use serde::Serialize;

use crate::error::ModelResult;
use crate::stats::SummaryStat;

use super::patient::StateMonitor;

/// Step function of the number of living patients.
///
/// Starts at the cohort size at time 0 and steps down at each distinct death
/// time by the number of patients dying at that instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SurvivalCurve {
    pub initial_size: u32,
    /// `(time, living)` after each step, in increasing time order.
    pub steps: Vec<SurvivalStep>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SurvivalStep {
    pub time: f64,
    pub living: u32,
}

impl SurvivalCurve {
    pub fn from_death_times(initial_size: u32, death_times: &[f64]) -> Self {
        let mut sorted = death_times.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut steps: Vec<SurvivalStep> = Vec::new();
        let mut living = initial_size;
        for &time in &sorted {
            living = living.saturating_sub(1);
            match steps.last_mut() {
                Some(last) if last.time == time => last.living = living,
                _ => steps.push(SurvivalStep { time, living }),
            }
        }
        Self {
            initial_size,
            steps,
        }
    }

    /// Number of living patients at `time` (right-continuous).
    pub fn living_at(&self, time: f64) -> u32 {
        self.steps
            .iter()
            .take_while(|s| s.time <= time)
            .last()
            .map_or(self.initial_size, |s| s.living)
    }
}

/// Outcome samples and summaries of one simulated cohort.
#[derive(Clone, Debug, Serialize)]
pub struct CohortOutcomes {
    pub survival_times: Vec<f64>,
    pub num_strokes: Vec<f64>,
    pub costs: Vec<f64>,
    pub utilities: Vec<f64>,

    /// `None` when nobody died within the horizon.
    pub stat_survival_time: Option<SummaryStat>,
    pub stat_num_strokes: SummaryStat,
    pub stat_cost: SummaryStat,
    pub stat_utility: SummaryStat,

    pub living_patients: SurvivalCurve,
}

impl CohortOutcomes {
    /// Extract outcomes from finished patients. Intervals use significance `alpha`.
    pub fn build(patients: &[StateMonitor], alpha: f64) -> ModelResult<Self> {
        let mut survival_times = Vec::new();
        let mut num_strokes = Vec::with_capacity(patients.len());
        let mut costs = Vec::with_capacity(patients.len());
        let mut utilities = Vec::with_capacity(patients.len());

        for p in patients {
            if let Some(t) = p.survival_time() {
                survival_times.push(t);
            }
            num_strokes.push(p.num_strokes() as f64);
            costs.push(p.accumulator().total_discounted_cost());
            utilities.push(p.accumulator().total_discounted_utility());
        }

        let stat_survival_time = if survival_times.is_empty() {
            None
        } else {
            Some(SummaryStat::new("Survival time", &survival_times, alpha)?)
        };
        let stat_num_strokes = SummaryStat::new("Number of strokes", &num_strokes, alpha)?;
        let stat_cost = SummaryStat::new("Discounted cost", &costs, alpha)?;
        let stat_utility = SummaryStat::new("Discounted utility", &utilities, alpha)?;

        let living_patients =
            SurvivalCurve::from_death_times(patients.len() as u32, &survival_times);

        Ok(Self {
            survival_times,
            num_strokes,
            costs,
            utilities,
            stat_survival_time,
            stat_num_strokes,
            stat_cost,
            stat_utility,
            living_patients,
        })
    }

    pub fn population_size(&self) -> usize {
        self.costs.len()
    }

    /// Patients still alive at the end of the horizon.
    pub fn num_censored(&self) -> usize {
        self.population_size() - self.survival_times.len()
    }
}
