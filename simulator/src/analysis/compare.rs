//! Incremental outcomes between two independently simulated cohorts.

use serde::Serialize;
use tracing::warn;

use crate::error::ModelResult;
use crate::simulation::CohortOutcomes;
use crate::stats::DifferenceStat;

/// `treatment − control` for each outcome, with Welch intervals.
#[derive(Clone, Debug, Serialize)]
pub struct IncrementalOutcomes {
    /// `None` when either cohort has no recorded death.
    pub survival_time: Option<DifferenceStat>,
    pub num_strokes: DifferenceStat,
    pub cost: DifferenceStat,
    pub utility: DifferenceStat,
}

impl IncrementalOutcomes {
    pub fn build(
        treatment: &CohortOutcomes,
        control: &CohortOutcomes,
        alpha: f64,
    ) -> ModelResult<Self> {
        let survival_time =
            if treatment.survival_times.is_empty() || control.survival_times.is_empty() {
                warn!(
                    treatment_deaths = treatment.survival_times.len(),
                    control_deaths = control.survival_times.len(),
                    "no deaths recorded in one cohort, incremental survival time omitted"
                );
                None
            } else {
                Some(DifferenceStat::independent(
                    "Incremental survival time",
                    &treatment.survival_times,
                    &control.survival_times,
                    alpha,
                )?)
            };

        Ok(Self {
            survival_time,
            num_strokes: DifferenceStat::independent(
                "Incremental number of strokes",
                &treatment.num_strokes,
                &control.num_strokes,
                alpha,
            )?,
            cost: DifferenceStat::independent(
                "Incremental discounted cost",
                &treatment.costs,
                &control.costs,
                alpha,
            )?,
            utility: DifferenceStat::independent(
                "Incremental discounted utility",
                &treatment.utilities,
                &control.utilities,
                alpha,
            )?,
        })
    }
}
