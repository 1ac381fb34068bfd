//! Cost-benefit: net monetary benefit over a willingness-to-pay sweep.
//!
//! For a willingness-to-pay λ, each patient's net monetary benefit is
//! `λ * utility − cost`. The incremental NMB of treatment over control is then
//! `λ * Δutility − Δcost`, affine in λ, and crosses zero at `λ* = Δcost / Δutility`.

use serde::Serialize;

use crate::error::ModelResult;
use crate::stats::{ConfidenceInterval, DifferenceStat, SummaryStat};

use super::cea::CostEffect;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NmbPoint {
    pub wtp: f64,
    pub estimate: f64,
    pub interval: ConfidenceInterval,
}

#[derive(Clone, Debug, Serialize)]
pub struct NmbCurve {
    pub label: String,
    pub points: Vec<NmbPoint>,
}

impl NmbCurve {
    /// Largest willingness-to-pay in the sweep whose interval lies wholly
    /// below zero, if any.
    pub fn last_negative_wtp(&self) -> Option<f64> {
        self.points
            .iter()
            .filter(|p| p.interval.upper < 0.0)
            .map(|p| p.wtp)
            .last()
    }
}

/// Per-patient NMB sample at willingness-to-pay `wtp`.
pub fn nmb_sample(sample: CostEffect<'_>, wtp: f64) -> Vec<f64> {
    sample
        .costs
        .iter()
        .zip(sample.effects)
        .map(|(c, u)| wtp * u - c)
        .collect()
}

/// NMB curve of one strategy: mean and one-sample interval at each λ.
pub fn strategy_curve(
    label: &str,
    sample: CostEffect<'_>,
    wtp_grid: &[f64],
    alpha: f64,
) -> ModelResult<NmbCurve> {
    let points = wtp_grid
        .iter()
        .map(|&wtp| {
            let stat = SummaryStat::new(label, &nmb_sample(sample, wtp), alpha)?;
            Ok(NmbPoint {
                wtp,
                estimate: stat.mean,
                interval: stat.interval,
            })
        })
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(NmbCurve {
        label: label.to_string(),
        points,
    })
}

/// Incremental NMB curve of `treatment` over `control` with Welch intervals.
pub fn incremental_curve(
    label: &str,
    treatment: CostEffect<'_>,
    control: CostEffect<'_>,
    wtp_grid: &[f64],
    alpha: f64,
) -> ModelResult<NmbCurve> {
    let points = wtp_grid
        .iter()
        .map(|&wtp| {
            let diff = DifferenceStat::independent(
                label,
                &nmb_sample(treatment, wtp),
                &nmb_sample(control, wtp),
                alpha,
            )?;
            Ok(NmbPoint {
                wtp,
                estimate: diff.mean,
                interval: diff.interval,
            })
        })
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(NmbCurve {
        label: label.to_string(),
        points,
    })
}

/// Willingness-to-pay at which incremental NMB is zero. Only defined when
/// treatment gains effect.
pub fn nmb_threshold(incremental_cost: f64, incremental_effect: f64) -> Option<f64> {
    (incremental_effect > 0.0).then(|| incremental_cost / incremental_effect)
}

/// Net monetary benefit analysis of a treatment against a control.
#[derive(Clone, Debug, Serialize)]
pub struct NetMonetaryBenefit {
    pub incremental: NmbCurve,
    /// Control first, then treatment.
    pub strategies: Vec<NmbCurve>,
    pub threshold: Option<f64>,
}

impl NetMonetaryBenefit {
    pub fn build(
        (treatment_label, treatment): (&str, CostEffect<'_>),
        (control_label, control): (&str, CostEffect<'_>),
        wtp_grid: &[f64],
        alpha: f64,
    ) -> ModelResult<Self> {
        let incremental = incremental_curve(
            &format!("{treatment_label} vs {control_label}"),
            treatment,
            control,
            wtp_grid,
            alpha,
        )?;
        let strategies = vec![
            strategy_curve(control_label, control, wtp_grid, alpha)?,
            strategy_curve(treatment_label, treatment, wtp_grid, alpha)?,
        ];

        let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
        let threshold = nmb_threshold(
            mean(treatment.costs) - mean(control.costs),
            mean(treatment.effects) - mean(control.effects),
        );

        Ok(Self {
            incremental,
            strategies,
            threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> ([f64; 4], [f64; 4], [f64; 4], [f64; 4]) {
        (
            [1200.0, 1000.0, 1100.0, 1300.0],
            [5.0, 4.8, 5.1, 5.3],
            [100.0, 150.0, 50.0, 100.0],
            [4.9, 4.7, 4.8, 4.8],
        )
    }

    #[test]
    fn test_nmb_sample() {
        let costs = [100.0, 200.0];
        let effects = [1.0, 2.0];
        let ce = CostEffect::new(&costs, &effects).unwrap();
        assert_eq!(nmb_sample(ce, 0.0), vec![-100.0, -200.0]);
        assert_eq!(nmb_sample(ce, 1000.0), vec![900.0, 1800.0]);
    }

    #[test]
    fn test_incremental_curve_is_affine_and_crosses_at_threshold() {
        let (ct, et, cc, ec) = samples();
        let t = CostEffect::new(&ct, &et).unwrap();
        let c = CostEffect::new(&cc, &ec).unwrap();
        let grid = [0.0, 5000.0, 10_000.0, 20_000.0];
        let nmb =
            NetMonetaryBenefit::build(("Anticoagulation", t), ("None", c), &grid, 0.05).unwrap();

        // Δcost = 1050, Δutility = 0.25
        let points = &nmb.incremental.points;
        assert!((points[0].estimate + 1050.0).abs() < 1e-9);
        assert!((points[1].estimate - 200.0).abs() < 1e-9);
        let slope1 = points[1].estimate - points[0].estimate;
        let slope2 = points[2].estimate - points[1].estimate;
        assert!((slope1 - slope2).abs() < 1e-6);

        let threshold = nmb.threshold.unwrap();
        assert!((threshold - 4200.0).abs() < 1e-9);
        assert_eq!(nmb.strategies.len(), 2);
        assert_eq!(nmb.strategies[0].label, "None");
        assert_eq!(nmb.incremental.label, "Anticoagulation vs None");
    }

    #[test]
    fn test_strategy_curve_means() {
        let (ct, et, _, _) = samples();
        let t = CostEffect::new(&ct, &et).unwrap();
        let curve = strategy_curve("t", t, &[0.0, 1000.0], 0.05).unwrap();
        assert!((curve.points[0].estimate + 1150.0).abs() < 1e-9);
        assert!((curve.points[1].estimate - (5050.0 - 1150.0)).abs() < 1e-9);
        for p in &curve.points {
            assert!(p.interval.contains(p.estimate));
        }
    }

    #[test]
    fn test_threshold_requires_effect_gain() {
        assert_eq!(nmb_threshold(100.0, 0.5), Some(200.0));
        assert_eq!(nmb_threshold(100.0, 0.0), None);
        assert_eq!(nmb_threshold(100.0, -0.5), None);
    }

    #[test]
    fn test_last_negative_wtp() {
        let point = |wtp: f64, lower: f64, upper: f64| NmbPoint {
            wtp,
            estimate: 0.5 * (lower + upper),
            interval: ConfidenceInterval { lower, upper },
        };
        let curve = NmbCurve {
            label: "x".to_string(),
            points: vec![
                point(0.0, -10.0, -5.0),
                point(1.0, -6.0, -1.0),
                point(2.0, -2.0, 3.0),
            ],
        };
        assert_eq!(curve.last_negative_wtp(), Some(1.0));
    }
}
