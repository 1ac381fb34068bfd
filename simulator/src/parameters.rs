//! Per-policy parameter bundle.

use serde::Serialize;

use crate::config::ModelInputs;
use crate::error::{ModelError, ModelResult};
use crate::transition::{apply_treatment_effect, build_baseline, TransitionMatrix};
use crate::types::{state_attributes, HealthState, StateAttributes, StateTable, Therapy};

/// Everything a patient reads while being simulated under one policy.
///
/// Built once per policy and shared read-only by every patient of the cohort;
/// nothing mutates it after construction.
#[derive(Clone, Debug, Serialize)]
pub struct PolicyParameters {
    pub therapy: Therapy,
    pub initial_state: HealthState,
    pub transitions: TransitionMatrix,
    pub attributes: StateTable<StateAttributes>,
    /// Annual treatment cost (0 under the control policy).
    pub annual_treatment_cost: f64,
    pub annual_discount_rate: f64,
}

impl PolicyParameters {
    /// Assemble a bundle from an explicit matrix.
    pub fn new(
        therapy: Therapy,
        transitions: TransitionMatrix,
        attributes: StateTable<StateAttributes>,
        annual_treatment_cost: f64,
        annual_discount_rate: f64,
    ) -> ModelResult<Self> {
        if !(annual_discount_rate >= 0.0 && annual_discount_rate.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "discount rate must be non-negative, got {annual_discount_rate}"
            )));
        }
        if !(annual_treatment_cost >= 0.0 && annual_treatment_cost.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "treatment cost must be non-negative, got {annual_treatment_cost}"
            )));
        }
        transitions.validate()?;
        Ok(Self {
            therapy,
            initial_state: HealthState::Well,
            transitions,
            attributes,
            annual_treatment_cost,
            annual_discount_rate,
        })
    }

    /// Build the bundle for `therapy` from the shared scalar inputs.
    ///
    /// The control policy uses the baseline matrix and no treatment cost;
    /// anticoagulation applies the relative-risk adjustment and its annual cost.
    pub fn for_therapy(therapy: Therapy, inputs: &ModelInputs) -> ModelResult<Self> {
        inputs.validate()?;
        let baseline = build_baseline(&inputs.transitions)?;
        let (transitions, treatment_cost) = match therapy {
            Therapy::None => (baseline, 0.0),
            Therapy::Anticoagulation => (
                apply_treatment_effect(&baseline, inputs.anticoag_relative_risk)?,
                inputs.anticoag_cost,
            ),
        };
        Self::new(
            therapy,
            transitions,
            state_attributes(inputs.state_costs, inputs.state_utilities),
            treatment_cost,
            inputs.discount_rate,
        )
    }
}
