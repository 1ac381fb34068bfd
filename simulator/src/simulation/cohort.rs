//! Cohort simulation: N independent patients under one policy.
//!
//! Patient `i` of cohort `c` gets identifier `c * N + i`, and its random stream
//! is seeded from that identifier alone. Patients share only the read-only
//! [`PolicyParameters`], so the multiset of trajectories is reproducible bit for
//! bit regardless of the order in which patients run.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{check_horizon, check_population};
use crate::error::ModelResult;
use crate::parameters::PolicyParameters;

use super::outcomes::CohortOutcomes;
use super::patient::{Patient, StateMonitor};

/// A population simulated under one policy.
pub struct Cohort {
    id: u32,
    population_size: u32,
    params: PolicyParameters,
}

impl Cohort {
    pub fn new(id: u32, population_size: u32, params: PolicyParameters) -> ModelResult<Self> {
        check_population(population_size)?;
        Ok(Self {
            id,
            population_size,
            params,
        })
    }

    /// Identifier of the `index`-th patient of this cohort.
    #[inline]
    pub fn patient_id(&self, index: u32) -> u64 {
        self.id as u64 * self.population_size as u64 + index as u64
    }

    /// Simulate every patient for at most `horizon` cycles and aggregate their
    /// outcomes with intervals at significance `alpha`.
    pub fn simulate(&self, horizon: u32, alpha: f64) -> ModelResult<CohortOutcomes> {
        check_horizon(horizon)?;
        let start = Instant::now();

        let patients: Vec<StateMonitor> = (0..self.population_size)
            .map(|i| {
                let mut patient = Patient::new(self.patient_id(i), &self.params);
                patient.simulate(horizon);
                patient.into_monitor()
            })
            .collect();

        debug!(
            cohort = self.id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "patients simulated"
        );

        let outcomes = CohortOutcomes::build(&patients, alpha)?;

        info!(
            cohort = self.id,
            therapy = %self.params.therapy,
            population = self.population_size,
            horizon,
            deaths = outcomes.survival_times.len(),
            censored = outcomes.num_censored(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "cohort simulated"
        );

        Ok(outcomes)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn params(&self) -> &PolicyParameters {
        &self.params
    }
}
