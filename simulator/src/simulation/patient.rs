//! Single-patient simulation.
//!
//! A [`Patient`] walks the transition matrix one cycle at a time:
//!
//! 1. look up the row of the current state,
//! 2. draw u ~ U[0, 1) from the patient's own stream,
//! 3. map u to a destination by inverse CDF,
//! 4. hand `(t, destination)` to the [`StateMonitor`].
//!
//! The loop stops the cycle an absorbing state is entered, or after `horizon`
//! cycles. The monitor records survival time and stroke count and forwards every
//! transition to the [`CostUtilityAccumulator`], which adds the half-cycle
//! corrected, discounted cost and utility of that cycle.

use serde::Serialize;

use crate::econ::half_cycle_pv;
use crate::parameters::PolicyParameters;
use crate::types::HealthState;

use super::fast_prng::{sample_index, SplitMix64};

/// State counted as one adverse event each time a patient leaves it.
pub const EVENT_STATE: HealthState = HealthState::Stroke;

/// Running discounted totals for one patient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CostUtilityAccumulator {
    total_discounted_cost: f64,
    total_discounted_utility: f64,
}

impl CostUtilityAccumulator {
    /// Accrue cycle `t`, spent moving from `from` to `to`.
    ///
    /// State cost and utility take the mean of the two endpoint rates. Treatment
    /// cost is charged for the full cycle unless the patient dies, in which case
    /// half a cycle is charged. Both amounts sit at the cycle midpoint.
    pub fn update(
        &mut self,
        params: &PolicyParameters,
        t: u32,
        from: HealthState,
        to: HealthState,
    ) {
        let a = &params.attributes;
        let mut cost = 0.5 * (a[from].annual_cost + a[to].annual_cost);
        let utility = 0.5 * (a[from].annual_utility + a[to].annual_utility);

        cost += if to.is_absorbing() {
            0.5 * params.annual_treatment_cost
        } else {
            params.annual_treatment_cost
        };

        let rate = params.annual_discount_rate;
        self.total_discounted_cost += half_cycle_pv(cost, rate, t);
        self.total_discounted_utility += half_cycle_pv(utility, rate, t);
    }

    pub fn total_discounted_cost(&self) -> f64 {
        self.total_discounted_cost
    }

    pub fn total_discounted_utility(&self) -> f64 {
        self.total_discounted_utility
    }
}

/// Clinical history of one patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateMonitor {
    current_state: HealthState,
    /// `None` until death; then `cycle + 0.5`.
    survival_time: Option<f64>,
    num_strokes: u32,
    accumulator: CostUtilityAccumulator,
}

impl StateMonitor {
    pub fn new(initial_state: HealthState) -> Self {
        Self {
            current_state: initial_state,
            survival_time: None,
            num_strokes: 0,
            accumulator: CostUtilityAccumulator::default(),
        }
    }

    /// Record the transition made during cycle `t`. No-op once absorbed.
    pub fn update(&mut self, params: &PolicyParameters, t: u32, new_state: HealthState) {
        if self.current_state.is_absorbing() {
            return;
        }

        if new_state.is_absorbing() {
            // Deaths are placed at the cycle midpoint.
            self.survival_time = Some(t as f64 + 0.5);
        }

        if self.current_state == EVENT_STATE {
            self.num_strokes += 1;
        }

        self.accumulator
            .update(params, t, self.current_state, new_state);
        self.current_state = new_state;
    }

    pub fn current_state(&self) -> HealthState {
        self.current_state
    }

    pub fn is_alive(&self) -> bool {
        !self.current_state.is_absorbing()
    }

    pub fn survival_time(&self) -> Option<f64> {
        self.survival_time
    }

    pub fn num_strokes(&self) -> u32 {
        self.num_strokes
    }

    pub fn accumulator(&self) -> &CostUtilityAccumulator {
        &self.accumulator
    }
}

/// One simulated individual.
pub struct Patient<'a> {
    rng: SplitMix64,
    params: &'a PolicyParameters,
    monitor: StateMonitor,
    cycle: u32,
}

impl<'a> Patient<'a> {
    /// The random stream is seeded by `id` alone.
    pub fn new(id: u64, params: &'a PolicyParameters) -> Self {
        Self {
            rng: SplitMix64::new(id),
            params,
            monitor: StateMonitor::new(params.initial_state),
            cycle: 0,
        }
    }

    /// Advance one cycle. Returns the new state, or `None` if the patient is
    /// already absorbed (no draw is consumed in that case).
    pub fn step(&mut self) -> Option<HealthState> {
        if !self.monitor.is_alive() {
            return None;
        }
        let row = self.params.transitions.row(self.monitor.current_state());
        let index = sample_index(row, &mut self.rng);
        // Rows have exactly one entry per state, so the index is always valid.
        let new_state = HealthState::from_index(index).unwrap_or(HealthState::Dead);
        self.monitor.update(self.params, self.cycle, new_state);
        self.cycle += 1;
        Some(new_state)
    }

    /// Run cycles `0..horizon`, stopping early at death.
    pub fn simulate(&mut self, horizon: u32) {
        while self.cycle < horizon && self.monitor.is_alive() {
            self.step();
        }
    }

    /// Cycles simulated so far.
    pub fn cycles(&self) -> u32 {
        self.cycle
    }

    pub fn monitor(&self) -> &StateMonitor {
        &self.monitor
    }

    pub fn into_monitor(self) -> StateMonitor {
        self.monitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionMatrix;
    use crate::types::{state_attributes, Therapy};

    fn params_with(rows: [[f64; 4]; 4], treatment_cost: f64) -> PolicyParameters {
        PolicyParameters::new(
            Therapy::None,
            TransitionMatrix::from_rows(rows).unwrap(),
            state_attributes([0.0, 5000.0, 200.0, 0.0], [1.0, 0.8865, 0.9, 0.0]),
            treatment_cost,
            0.03,
        )
        .unwrap()
    }

    fn scenario_params() -> PolicyParameters {
        params_with(
            [
                [0.75, 0.10, 0.0, 0.15],
                [0.0, 0.0, 0.7, 0.3],
                [0.0, 0.2, 0.55, 0.25],
                [0.0, 0.0, 0.0, 1.0],
            ],
            0.0,
        )
    }

    #[test]
    fn test_accumulator_first_cycle_stroke() {
        let params = scenario_params();
        let mut acc = CostUtilityAccumulator::default();
        acc.update(&params, 0, HealthState::Well, HealthState::Stroke);
        let cost = 0.5 * (0.0 + 5000.0);
        let utility = 0.5 * (1.0 + 0.8865);
        assert!((acc.total_discounted_cost() - cost / 1.015).abs() < 1e-9);
        assert!((acc.total_discounted_utility() - utility / 1.015).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_treatment_cost_halved_at_death() {
        let params = params_with(
            [
                [0.75, 0.10, 0.0, 0.15],
                [0.0, 0.0, 0.7, 0.3],
                [0.0, 0.2, 0.55, 0.25],
                [0.0, 0.0, 0.0, 1.0],
            ],
            2000.0,
        );
        let mut alive = CostUtilityAccumulator::default();
        alive.update(&params, 3, HealthState::Well, HealthState::Well);
        let mut dying = CostUtilityAccumulator::default();
        dying.update(&params, 3, HealthState::Well, HealthState::Dead);

        let factor = 1.015f64.powi(7);
        assert!((alive.total_discounted_cost() - 2000.0 / factor).abs() < 1e-9);
        assert!((dying.total_discounted_cost() - 1000.0 / factor).abs() < 1e-9);
        assert!((dying.total_discounted_utility() - 0.5 / factor).abs() < 1e-12);
    }

    #[test]
    fn test_monitor_half_cycle_survival_time() {
        let params = scenario_params();
        let mut monitor = StateMonitor::new(HealthState::Well);
        monitor.update(&params, 0, HealthState::Well);
        monitor.update(&params, 1, HealthState::Well);
        assert_eq!(monitor.survival_time(), None);
        monitor.update(&params, 2, HealthState::Dead);
        assert_eq!(monitor.survival_time(), Some(2.5));
        assert!(!monitor.is_alive());
    }

    #[test]
    fn test_monitor_counts_stroke_on_exit() {
        let params = scenario_params();
        let mut monitor = StateMonitor::new(HealthState::Well);
        monitor.update(&params, 0, HealthState::Stroke);
        assert_eq!(monitor.num_strokes(), 0);
        monitor.update(&params, 1, HealthState::PostStroke);
        assert_eq!(monitor.num_strokes(), 1);
        monitor.update(&params, 2, HealthState::Stroke);
        monitor.update(&params, 3, HealthState::Dead);
        assert_eq!(monitor.num_strokes(), 2);
    }

    #[test]
    fn test_monitor_ignores_updates_after_death() {
        let params = scenario_params();
        let mut monitor = StateMonitor::new(HealthState::Well);
        monitor.update(&params, 0, HealthState::Stroke);
        monitor.update(&params, 1, HealthState::Dead);
        let frozen = monitor.clone();
        monitor.update(&params, 2, HealthState::Stroke);
        monitor.update(&params, 3, HealthState::Well);
        assert_eq!(monitor, frozen);
    }

    #[test]
    fn test_patient_deterministic() {
        let params = scenario_params();
        let trace = |id| {
            let mut p = Patient::new(id, &params);
            let states: Vec<_> = std::iter::from_fn(|| p.step()).take(50).collect();
            (states, p.into_monitor())
        };
        for id in [0, 1, 17, 123_456] {
            assert_eq!(trace(id), trace(id));
        }
    }

    #[test]
    fn test_patient_stops_at_death() {
        let params = scenario_params();
        for id in 0..200 {
            let mut p = Patient::new(id, &params);
            p.simulate(1000);
            // 0.15+ annual mortality from every state: no one lasts 1000 cycles.
            let survival = p.monitor().survival_time().unwrap();
            assert_eq!(survival, p.cycles() as f64 - 0.5);
            assert_eq!(p.step(), None);
        }
    }

    #[test]
    fn test_patient_censored_at_horizon() {
        let params = params_with(
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            0.0,
        );
        let mut p = Patient::new(5, &params);
        p.simulate(10);
        assert_eq!(p.cycles(), 10);
        assert_eq!(p.monitor().survival_time(), None);
        assert_eq!(p.monitor().current_state(), HealthState::Well);
        // Ten full years in Well, each at utility 1.
        let expected: f64 = (0..10).map(|t| 1.0 / 1.015f64.powi(2 * t + 1)).sum();
        let got = p.monitor().accumulator().total_discounted_utility();
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn test_patient_certain_death_first_cycle() {
        let params = params_with(
            [
                [0.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            0.0,
        );
        let mut p = Patient::new(0, &params);
        p.simulate(50);
        assert_eq!(p.cycles(), 1);
        assert_eq!(p.monitor().survival_time(), Some(0.5));
    }
}
