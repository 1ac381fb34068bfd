//! Comparative analysis of two simulated policies.
//!
//! - [`compare`]: Incremental outcomes (treatment − control) with Welch intervals
//! - [`cea`]: ICER with percentile-bootstrap interval, cost-effectiveness table
//! - [`cba`]: Net monetary benefit curves and the break-even willingness-to-pay
//!
//! The control cohort is always the reference. Both cohorts must have been
//! simulated with independent random streams (distinct cohort ids).

pub mod cba;
pub mod cea;
pub mod compare;

pub use cba::{NetMonetaryBenefit, NmbCurve, NmbPoint};
pub use cea::{icer, CeaRow, CostEffect, Icer};
pub use compare::IncrementalOutcomes;

use serde::Serialize;
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::ModelResult;
use crate::simulation::CohortOutcomes;
use crate::types::Therapy;

#[derive(Clone, Debug, Serialize)]
pub struct ComparativeAnalysis {
    pub control: Therapy,
    pub treatment: Therapy,
    pub incremental: IncrementalOutcomes,
    pub icer: Icer,
    /// Control row first.
    pub cea_table: Vec<CeaRow>,
    pub nmb: NetMonetaryBenefit,
}

impl ComparativeAnalysis {
    pub fn new(
        (control, control_outcomes): (Therapy, &CohortOutcomes),
        (treatment, treatment_outcomes): (Therapy, &CohortOutcomes),
        config: &SimulationConfig,
    ) -> ModelResult<Self> {
        let alpha = config.alpha;
        let incremental = IncrementalOutcomes::build(treatment_outcomes, control_outcomes, alpha)?;

        let t = CostEffect::new(&treatment_outcomes.costs, &treatment_outcomes.utilities)?;
        let c = CostEffect::new(&control_outcomes.costs, &control_outcomes.utilities)?;

        let icer = icer(
            t,
            c,
            alpha,
            config.bootstrap_samples,
            config.bootstrap_seed,
        )?;

        let cea_table = vec![
            CeaRow {
                strategy: control.to_string(),
                mean_cost: control_outcomes.stat_cost.mean,
                mean_effect: control_outcomes.stat_utility.mean,
                incremental_cost: 0.0,
                incremental_effect: 0.0,
                icer: None,
            },
            CeaRow {
                strategy: treatment.to_string(),
                mean_cost: treatment_outcomes.stat_cost.mean,
                mean_effect: treatment_outcomes.stat_utility.mean,
                incremental_cost: incremental.cost.mean,
                incremental_effect: incremental.utility.mean,
                icer: Some(icer.clone()),
            },
        ];

        let nmb = NetMonetaryBenefit::build(
            (treatment.name(), t),
            (control.name(), c),
            &config.wtp_grid(),
            alpha,
        )?;

        info!(
            control = %control,
            treatment = %treatment,
            incremental_cost = incremental.cost.mean,
            incremental_utility = incremental.utility.mean,
            icer = ?icer.estimate(),
            threshold = ?nmb.threshold,
            "comparative analysis done"
        );

        Ok(Self {
            control,
            treatment,
            incremental,
            icer,
            cea_table,
            nmb,
        })
    }
}
