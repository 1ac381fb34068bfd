//! Cost-effectiveness: incremental cost-effectiveness ratio.
//!
//! ICER = Δcost / Δutility with the control cohort as reference. The interval
//! is a percentile bootstrap: each resample draws both cohorts independently
//! with replacement, keeping each cohort size, and recomputes the ratio of
//! mean differences. Resamples whose Δutility vanishes are skipped.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::MIN_INCREMENTAL_EFFECT;
use crate::error::{ModelError, ModelResult};
use crate::simulation::SplitMix64;
use crate::stats::{check_alpha, ConfidenceInterval};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Icer {
    Ratio {
        estimate: f64,
        interval: ConfidenceInterval,
    },
    /// Δutility too close to zero for the ratio to mean anything.
    Undefined {
        incremental_cost: f64,
        incremental_effect: f64,
    },
}

impl Icer {
    pub fn estimate(&self) -> Option<f64> {
        match self {
            Icer::Ratio { estimate, .. } => Some(*estimate),
            Icer::Undefined { .. } => None,
        }
    }
}

/// Cost and effect samples of one strategy.
#[derive(Clone, Copy, Debug)]
pub struct CostEffect<'a> {
    pub costs: &'a [f64],
    pub effects: &'a [f64],
}

impl<'a> CostEffect<'a> {
    pub fn new(costs: &'a [f64], effects: &'a [f64]) -> ModelResult<Self> {
        if costs.is_empty() {
            return Err(ModelError::EmptySample("costs".to_string()));
        }
        if costs.len() != effects.len() {
            return Err(ModelError::InvalidParameter(format!(
                "cost and effect samples differ in length: {} vs {}",
                costs.len(),
                effects.len()
            )));
        }
        Ok(Self { costs, effects })
    }

    fn means(&self) -> (f64, f64) {
        let n = self.costs.len() as f64;
        (
            self.costs.iter().sum::<f64>() / n,
            self.effects.iter().sum::<f64>() / n,
        )
    }

    fn resampled_means(&self, rng: &mut SplitMix64) -> (f64, f64) {
        let n = self.costs.len();
        let (mut cost, mut effect) = (0.0, 0.0);
        for _ in 0..n {
            let i = rng.random_range(0..n);
            cost += self.costs[i];
            effect += self.effects[i];
        }
        (cost / n as f64, effect / n as f64)
    }
}

/// Value at quantile `q` of an ascending slice (nearest rank).
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = (q * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// ICER of `treatment` against `control` with a `1 - alpha` bootstrap interval.
pub fn icer(
    treatment: CostEffect<'_>,
    control: CostEffect<'_>,
    alpha: f64,
    num_resamples: usize,
    seed: u64,
) -> ModelResult<Icer> {
    check_alpha(alpha)?;
    if num_resamples == 0 {
        return Err(ModelError::InvalidParameter(
            "bootstrap needs at least 1 resample".to_string(),
        ));
    }

    let (cost_t, effect_t) = treatment.means();
    let (cost_c, effect_c) = control.means();
    let d_cost = cost_t - cost_c;
    let d_effect = effect_t - effect_c;

    if d_effect.abs() < MIN_INCREMENTAL_EFFECT {
        warn!(
            incremental_cost = d_cost,
            incremental_effect = d_effect,
            "incremental effect is zero, ICER undefined"
        );
        return Ok(Icer::Undefined {
            incremental_cost: d_cost,
            incremental_effect: d_effect,
        });
    }
    let estimate = d_cost / d_effect;

    let mut rng = SplitMix64::new(seed);
    let mut ratios = Vec::with_capacity(num_resamples);
    for _ in 0..num_resamples {
        let (ct, et) = treatment.resampled_means(&mut rng);
        let (cc, ec) = control.resampled_means(&mut rng);
        let de = et - ec;
        if de.abs() >= MIN_INCREMENTAL_EFFECT {
            ratios.push((ct - cc) / de);
        }
    }

    let skipped = num_resamples - ratios.len();
    if skipped > 0 {
        debug!(skipped, "bootstrap resamples with zero incremental effect");
    }

    let interval = if ratios.is_empty() {
        warn!("every bootstrap resample had zero incremental effect");
        ConfidenceInterval::point(estimate)
    } else {
        ratios.sort_by(f64::total_cmp);
        ConfidenceInterval {
            lower: percentile(&ratios, alpha / 2.0),
            upper: percentile(&ratios, 1.0 - alpha / 2.0),
        }
    };

    Ok(Icer::Ratio { estimate, interval })
}

/// One row of a cost-effectiveness table.
#[derive(Clone, Debug, Serialize)]
pub struct CeaRow {
    pub strategy: String,
    pub mean_cost: f64,
    pub mean_effect: f64,
    /// Relative to the control strategy; zero for the control row.
    pub incremental_cost: f64,
    pub incremental_effect: f64,
    /// `None` for the control row.
    pub icer: Option<Icer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icer_point_estimate() {
        let costs_t = [100.0, 300.0, 200.0, 200.0];
        let effects_t = [2.0, 2.2, 2.1, 2.1];
        let costs_c = [100.0, 100.0, 100.0, 100.0];
        let effects_c = [2.0, 2.0, 2.0, 2.0];
        let result = icer(
            CostEffect::new(&costs_t, &effects_t).unwrap(),
            CostEffect::new(&costs_c, &effects_c).unwrap(),
            0.05,
            200,
            1,
        )
        .unwrap();
        match result {
            Icer::Ratio { estimate, interval } => {
                assert!((estimate - 1000.0).abs() < 1e-9);
                assert!(interval.lower <= interval.upper);
                // Treatment cost is affine in effect with slope 1000 through the
                // control point, so every resample has the same ratio.
                assert!((interval.lower - 1000.0).abs() < 1e-6);
                assert!((interval.upper - 1000.0).abs() < 1e-6);
            }
            Icer::Undefined { .. } => panic!("expected a ratio"),
        }
    }

    #[test]
    fn test_icer_undefined_when_effects_equal() {
        let costs = [10.0, 20.0];
        let effects = [1.0, 1.0];
        let result = icer(
            CostEffect::new(&costs, &effects).unwrap(),
            CostEffect::new(&[5.0, 5.0], &effects).unwrap(),
            0.05,
            100,
            1,
        )
        .unwrap();
        assert_eq!(
            result,
            Icer::Undefined {
                incremental_cost: 10.0,
                incremental_effect: 0.0
            }
        );
        assert_eq!(result.estimate(), None);
    }

    #[test]
    fn test_bootstrap_is_reproducible_and_covers_estimate() {
        let costs_t: Vec<f64> = (0..200).map(|i| 1000.0 + (i % 17) as f64 * 30.0).collect();
        let effects_t: Vec<f64> = (0..200).map(|i| 5.0 + (i % 11) as f64 * 0.1).collect();
        let costs_c: Vec<f64> = (0..150).map(|i| 800.0 + (i % 13) as f64 * 25.0).collect();
        let effects_c: Vec<f64> = (0..150).map(|i| 4.5 + (i % 7) as f64 * 0.1).collect();
        let run = |seed| {
            icer(
                CostEffect::new(&costs_t, &effects_t).unwrap(),
                CostEffect::new(&costs_c, &effects_c).unwrap(),
                0.05,
                500,
                seed,
            )
            .unwrap()
        };
        let first = run(42);
        assert_eq!(first, run(42));
        match first {
            Icer::Ratio { estimate, interval } => {
                assert!(interval.contains(estimate), "{estimate} not in {interval:?}");
            }
            Icer::Undefined { .. } => panic!("expected a ratio"),
        }
    }

    #[test]
    fn test_cost_effect_validation() {
        assert!(matches!(
            CostEffect::new(&[], &[]),
            Err(ModelError::EmptySample(_))
        ));
        assert!(matches!(
            CostEffect::new(&[1.0], &[1.0, 2.0]),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let sorted: Vec<f64> = (0..=100).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.05), 5.0);
        assert_eq!(percentile(&sorted, 0.95), 95.0);
        assert_eq!(percentile(&sorted, 0.0), 0.0);
        assert_eq!(percentile(&sorted, 1.0), 100.0);
    }
}
