//! Transition probability matrices.
//!
//! A [`TransitionMatrix`] maps each source [`HealthState`] to a probability
//! distribution over destination states. Every constructor validates the result:
//! each row must sum to 1 within [`ROW_SUM_TOLERANCE`] and hold no negative entry.
//! Nothing here silently renormalises a row; the only documented adjustment is
//! the treatment effect, which moves probability mass from the adverse transition
//! onto the diagonal of the same row.

use serde::{Deserialize, Serialize};

use crate::constants::ROW_SUM_TOLERANCE;
use crate::error::{ModelError, ModelResult};
use crate::types::{HealthState, StateTable, NUM_STATES};

/// State whose row the treatment modifies.
pub const TREATED_STATE: HealthState = HealthState::PostStroke;

/// Adverse transition the treatment protects against.
pub const ADVERSE_STATE: HealthState = HealthState::Stroke;

/// Scalar annual probabilities the baseline matrix is built from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionInputs {
    /// Well → Stroke.
    pub p_stroke: f64,
    /// PostStroke → Stroke.
    pub p_recurrence: f64,
    /// Stroke → PostStroke (the remainder of the row dies).
    pub p_survive_stroke: f64,
    /// All-cause mortality applied to every non-absorbing state before the other
    /// transitions are scaled.
    pub p_background_death: f64,
}

/// Row-stochastic matrix over [`HealthState`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    rows: StateTable<StateTable<f64>>,
}

impl TransitionMatrix {
    /// Build from explicit rows listed in canonical state order.
    pub fn from_rows(rows: [[f64; NUM_STATES]; NUM_STATES]) -> ModelResult<Self> {
        let matrix = Self {
            rows: StateTable::from_fn(|s| StateTable::new(rows[s.index()])),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Probability row for `state`.
    #[inline(always)]
    pub fn row(&self, state: HealthState) -> &[f64; NUM_STATES] {
        self.rows[state].as_array()
    }

    /// P(`from` → `to`) within one cycle.
    #[inline(always)]
    pub fn probability(&self, from: HealthState, to: HealthState) -> f64 {
        self.rows[from][to]
    }

    /// Check every row: no negative entry, sum within tolerance of 1, and
    /// absorbing states only return to themselves.
    pub fn validate(&self) -> ModelResult<()> {
        for (state, row) in self.rows.iter() {
            for (dest, &p) in row.iter() {
                if !p.is_finite() || p < 0.0 {
                    return Err(ModelError::InvalidMatrix {
                        state,
                        reason: format!("probability to {dest} is {p}"),
                    });
                }
            }
            let sum: f64 = row.as_array().iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(ModelError::InvalidMatrix {
                    state,
                    reason: format!("row sums to {sum}"),
                });
            }
            if state.is_absorbing() && row[state] != 1.0 {
                return Err(ModelError::InvalidMatrix {
                    state,
                    reason: "absorbing state must transition only to itself".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> ModelResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ModelError::InvalidParameter(format!(
            "{name} must be in [0, 1], got {p}"
        )));
    }
    Ok(())
}

/// Build the baseline (untreated) matrix.
///
/// Background mortality `m` is applied first; the disease transitions of each
/// non-absorbing row share the remaining `1 - m`.
pub fn build_baseline(inputs: &TransitionInputs) -> ModelResult<TransitionMatrix> {
    check_probability("p_stroke", inputs.p_stroke)?;
    check_probability("p_recurrence", inputs.p_recurrence)?;
    check_probability("p_survive_stroke", inputs.p_survive_stroke)?;
    check_probability("p_background_death", inputs.p_background_death)?;

    let m = inputs.p_background_death;
    let alive = 1.0 - m;

    TransitionMatrix::from_rows([
        // Well
        [
            alive * (1.0 - inputs.p_stroke),
            alive * inputs.p_stroke,
            0.0,
            m,
        ],
        // Stroke
        [
            0.0,
            0.0,
            alive * inputs.p_survive_stroke,
            m + alive * (1.0 - inputs.p_survive_stroke),
        ],
        // PostStroke
        [
            0.0,
            alive * inputs.p_recurrence,
            alive * (1.0 - inputs.p_recurrence),
            m,
        ],
        // Dead
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Derive the treatment matrix from `baseline`.
///
/// Only the [`TREATED_STATE`] row changes: its [`ADVERSE_STATE`] entry is
/// multiplied by `relative_risk` and the removed mass is added to its diagonal.
/// All other rows are copied unchanged.
pub fn apply_treatment_effect(
    baseline: &TransitionMatrix,
    relative_risk: f64,
) -> ModelResult<TransitionMatrix> {
    if !(relative_risk > 0.0 && relative_risk <= 1.0) {
        return Err(ModelError::InvalidParameter(format!(
            "relative risk must be in (0, 1], got {relative_risk}"
        )));
    }

    let mut rows = baseline.rows;
    let row = &mut rows[TREATED_STATE];
    let adverse = row[ADVERSE_STATE];
    let reduced = adverse * relative_risk;
    row[ADVERSE_STATE] = reduced;
    row[TREATED_STATE] += adverse - reduced;

    let matrix = TransitionMatrix { rows };
    matrix.validate()?;
    Ok(matrix)
}
