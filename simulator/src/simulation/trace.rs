//! Deterministic Markov cohort trace.
//!
//! Propagates the expected state-occupancy vector through the same transition
//! matrix a [`Patient`](super::Patient) samples from, with the same per-cycle
//! accrual rules:
//!
//! - cost and utility of a `from → to` move take the mean of the endpoint rates,
//! - treatment cost is halved in the cycle of death,
//! - every amount is discounted to the cycle midpoint,
//! - a stroke is counted whenever a living patient starts a cycle in Stroke,
//! - deaths are placed at `t + 0.5`.
//!
//! The trace therefore gives the exact expectation of each per-patient outcome
//! that the microsimulation estimates.

use serde::Serialize;

use crate::config::check_horizon;
use crate::econ::half_cycle_pv;
use crate::error::ModelResult;
use crate::parameters::PolicyParameters;
use crate::types::{HealthState, StateTable};

use super::patient::EVENT_STATE;

#[derive(Clone, Debug, Serialize)]
pub struct MarkovTrace {
    /// Occupancy at the start of each cycle; `occupancy[horizon]` is the final
    /// distribution.
    pub occupancy: Vec<StateTable<f64>>,
    pub expected_cost: f64,
    pub expected_utility: f64,
    pub expected_strokes: f64,
    /// Probability of dying within the horizon.
    pub death_probability: f64,
    /// Mean survival time among those dying within the horizon; `None` when
    /// nobody can die.
    pub expected_survival_time: Option<f64>,
}

impl MarkovTrace {
    pub fn run(params: &PolicyParameters, horizon: u32) -> ModelResult<Self> {
        check_horizon(horizon)?;

        let mut current: StateTable<f64> = StateTable::default();
        current[params.initial_state] = 1.0;

        let mut occupancy = Vec::with_capacity(horizon as usize + 1);
        let mut expected_cost = 0.0;
        let mut expected_utility = 0.0;
        let mut expected_strokes = 0.0;
        let mut death_probability = 0.0;
        let mut weighted_death_time = 0.0;

        let a = &params.attributes;
        let rate = params.annual_discount_rate;

        for t in 0..horizon {
            occupancy.push(current);
            let mut next: StateTable<f64> = StateTable::default();

            for (from, &mass) in current.iter() {
                if mass == 0.0 {
                    continue;
                }
                if from.is_absorbing() {
                    next[from] += mass;
                    continue;
                }
                if from == EVENT_STATE {
                    expected_strokes += mass;
                }
                for to in HealthState::ALL {
                    let flow = mass * params.transitions.probability(from, to);
                    if flow == 0.0 {
                        continue;
                    }
                    next[to] += flow;

                    let treatment = if to.is_absorbing() {
                        0.5 * params.annual_treatment_cost
                    } else {
                        params.annual_treatment_cost
                    };
                    let cost = 0.5 * (a[from].annual_cost + a[to].annual_cost) + treatment;
                    let utility = 0.5 * (a[from].annual_utility + a[to].annual_utility);
                    expected_cost += flow * half_cycle_pv(cost, rate, t);
                    expected_utility += flow * half_cycle_pv(utility, rate, t);

                    if to.is_absorbing() {
                        death_probability += flow;
                        weighted_death_time += flow * (t as f64 + 0.5);
                    }
                }
            }
            current = next;
        }
        occupancy.push(current);

        let expected_survival_time =
            (death_probability > 0.0).then(|| weighted_death_time / death_probability);

        Ok(Self {
            occupancy,
            expected_cost,
            expected_utility,
            expected_strokes,
            death_probability,
            expected_survival_time,
        })
    }

    /// Expected number of patients out of `population` still alive at the end.
    pub fn expected_censored(&self, population: u32) -> f64 {
        population as f64 * (1.0 - self.death_probability)
    }
}
