//! Serialisable run summary.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::analysis::ComparativeAnalysis;
use crate::config::SimulationConfig;
use crate::error::ModelResult;
use crate::parameters::PolicyParameters;
use crate::simulation::{Cohort, CohortOutcomes, MarkovTrace};
use crate::types::Therapy;

/// Cohort ids used by [`RunReport::run`]. Distinct ids give the two policies
/// independent random streams.
pub const CONTROL_COHORT_ID: u32 = 0;
pub const TREATMENT_COHORT_ID: u32 = 1;

/// Outcomes of one policy: simulated and expected.
#[derive(Clone, Debug, Serialize)]
pub struct PolicyReport {
    pub therapy: Therapy,
    pub cohort_id: u32,
    pub outcomes: CohortOutcomes,
    pub expected: MarkovTrace,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub config: SimulationConfig,
    pub control: PolicyReport,
    pub treatment: PolicyReport,
    pub analysis: ComparativeAnalysis,
}

impl PolicyReport {
    fn simulate(therapy: Therapy, cohort_id: u32, config: &SimulationConfig) -> ModelResult<Self> {
        let params = PolicyParameters::for_therapy(therapy, &config.inputs)?;
        let cohort = Cohort::new(cohort_id, config.population_size, params)?;
        let expected = MarkovTrace::run(cohort.params(), config.horizon)?;
        let outcomes = cohort.simulate(config.horizon, config.alpha)?;
        Ok(Self {
            therapy: cohort.params().therapy,
            cohort_id: cohort.id(),
            outcomes,
            expected,
        })
    }
}

impl RunReport {
    /// Simulate no therapy against anticoagulation and compare them.
    pub fn run(config: &SimulationConfig) -> ModelResult<Self> {
        config.validate()?;
        let control = PolicyReport::simulate(Therapy::None, CONTROL_COHORT_ID, config)?;
        let treatment =
            PolicyReport::simulate(Therapy::Anticoagulation, TREATMENT_COHORT_ID, config)?;
        let analysis = ComparativeAnalysis::new(
            (control.therapy, &control.outcomes),
            (treatment.therapy, &treatment.outcomes),
            config,
        )?;
        Ok(Self {
            config: config.clone(),
            control,
            treatment,
            analysis,
        })
    }
}

/// Write `report` as pretty JSON, creating parent directories as needed.
pub fn save_report(report: &RunReport, path: &Path) -> ModelResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "report saved");
    Ok(())
}
