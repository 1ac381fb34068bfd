//! Model inputs and run settings.
//!
//! [`ModelInputs`] is the scalar input set a policy's parameter bundle is built
//! from; [`SimulationConfig`] holds the run settings (population, horizon,
//! significance level, WTP sweep, bootstrap). Both default to the values in
//! [`crate::constants`] and can be read from one JSON file:
//!
//! ```json
//! {
//!   "inputs": { "transitions": { "p_stroke": 0.08 }, "discount_rate": 0.035 },
//!   "population_size": 5000,
//!   "horizon": 40
//! }
//! ```
//!
//! Any field may be omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ModelError, ModelResult};
use crate::stats::check_alpha;
use crate::transition::TransitionInputs;
use crate::types::NUM_STATES;

impl Default for TransitionInputs {
    fn default() -> Self {
        Self {
            p_stroke: P_STROKE,
            p_recurrence: P_RECURRENCE,
            p_survive_stroke: P_SURVIVE_STROKE,
            p_background_death: P_BACKGROUND_DEATH,
        }
    }
}

/// Scalar inputs shared by every policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInputs {
    pub transitions: TransitionInputs,
    /// Annual cost per state in canonical order (Well, Stroke, PostStroke, Dead).
    pub state_costs: [f64; NUM_STATES],
    /// Annual utility per state in canonical order.
    pub state_utilities: [f64; NUM_STATES],
    pub anticoag_cost: f64,
    pub anticoag_relative_risk: f64,
    pub discount_rate: f64,
}

impl Default for ModelInputs {
    fn default() -> Self {
        Self {
            transitions: TransitionInputs::default(),
            state_costs: STATE_COSTS,
            state_utilities: STATE_UTILITIES,
            anticoag_cost: ANTICOAG_COST,
            anticoag_relative_risk: ANTICOAG_RR,
            discount_rate: DISCOUNT_RATE,
        }
    }
}

impl ModelInputs {
    /// Checks that do not depend on the transition matrix. Matrix inputs are
    /// validated when the matrix is built.
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.discount_rate >= 0.0 && self.discount_rate.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "discount rate must be non-negative, got {}",
                self.discount_rate
            )));
        }
        if !(self.anticoag_cost >= 0.0 && self.anticoag_cost.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "treatment cost must be non-negative, got {}",
                self.anticoag_cost
            )));
        }
        for (i, (&c, &u)) in self
            .state_costs
            .iter()
            .zip(self.state_utilities.iter())
            .enumerate()
        {
            if !(c >= 0.0 && c.is_finite()) || !(u >= 0.0 && u.is_finite()) {
                return Err(ModelError::InvalidParameter(format!(
                    "state {i}: cost and utility must be non-negative, got {c} and {u}"
                )));
            }
        }
        Ok(())
    }
}

/// Run settings for one comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub inputs: ModelInputs,
    pub population_size: u32,
    pub horizon: u32,
    pub alpha: f64,
    pub wtp_min: f64,
    pub wtp_max: f64,
    pub wtp_points: usize,
    pub bootstrap_samples: usize,
    pub bootstrap_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            inputs: ModelInputs::default(),
            population_size: POPULATION_SIZE,
            horizon: HORIZON,
            alpha: ALPHA,
            wtp_min: WTP_MIN,
            wtp_max: WTP_MAX,
            wtp_points: WTP_POINTS,
            bootstrap_samples: BOOTSTRAP_SAMPLES,
            bootstrap_seed: BOOTSTRAP_SEED,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> ModelResult<()> {
        self.inputs.validate()?;
        check_population(self.population_size)?;
        check_horizon(self.horizon)?;
        check_alpha(self.alpha)?;
        if !(self.wtp_min >= 0.0 && self.wtp_min <= self.wtp_max && self.wtp_max.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "willingness-to-pay range must satisfy 0 <= min <= max, got [{}, {}]",
                self.wtp_min, self.wtp_max
            )));
        }
        if self.wtp_points < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "willingness-to-pay sweep needs at least 2 points, got {}",
                self.wtp_points
            )));
        }
        if self.bootstrap_samples == 0 {
            return Err(ModelError::InvalidParameter(
                "bootstrap needs at least 1 resample".to_string(),
            ));
        }
        Ok(())
    }

    /// Evenly spaced willingness-to-pay values from `wtp_min` to `wtp_max`.
    pub fn wtp_grid(&self) -> Vec<f64> {
        let step = (self.wtp_max - self.wtp_min) / (self.wtp_points - 1) as f64;
        (0..self.wtp_points)
            .map(|i| self.wtp_min + step * i as f64)
            .collect()
    }
}

pub fn check_population(population_size: u32) -> ModelResult<()> {
    if population_size == 0 {
        return Err(ModelError::InvalidParameter(
            "population size must be positive".to_string(),
        ));
    }
    Ok(())
}

pub fn check_horizon(horizon: u32) -> ModelResult<()> {
    if horizon == 0 {
        return Err(ModelError::InvalidParameter(
            "horizon must be at least one cycle".to_string(),
        ));
    }
    if horizon > MAX_HORIZON {
        return Err(ModelError::InvalidParameter(format!(
            "horizon must be at most {MAX_HORIZON} cycles, got {horizon}"
        )));
    }
    Ok(())
}

/// Read a [`SimulationConfig`] from a JSON file and validate it.
pub fn load_config(path: &Path) -> ModelResult<SimulationConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ModelError::Config(format!("cannot read {}: {e}", path.display())))?;
    let config: SimulationConfig = serde_json::from_str(&text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.population_size, 10_000);
        assert_eq!(config.horizon, 50);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "inputs": { "transitions": { "p_stroke": 0.08 } }, "horizon": 40 }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.horizon, 40);
        assert_eq!(config.inputs.transitions.p_stroke, 0.08);
        assert_eq!(config.inputs.transitions.p_recurrence, P_RECURRENCE);
        assert_eq!(config.inputs.anticoag_cost, ANTICOAG_COST);
        assert_eq!(config.population_size, POPULATION_SIZE);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut config = SimulationConfig::default();
        config.population_size = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.horizon = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.horizon = MAX_HORIZON + 1;
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidParameter(_))
        ));
        config.horizon = MAX_HORIZON;
        config.validate().unwrap();

        let mut config = SimulationConfig::default();
        config.inputs.discount_rate = -0.01;
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidParameter(_))
        ));

        let mut config = SimulationConfig::default();
        config.wtp_min = 10.0;
        config.wtp_max = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wtp_grid_endpoints() {
        let config = SimulationConfig::default();
        let grid = config.wtp_grid();
        assert_eq!(grid.len(), 21);
        assert_eq!(grid[0], 0.0);
        assert!((grid[20] - 100_000.0).abs() < 1e-9);
        assert!((grid[1] - 5000.0).abs() < 1e-9);
    }
}
