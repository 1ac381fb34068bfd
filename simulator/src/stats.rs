//! Descriptive statistics and confidence intervals.
//!
//! Intervals use Student-t critical values via `statrs`: one-sample intervals
//! for a mean, Welch intervals for a difference of means between two
//! independent samples.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{ModelError, ModelResult};

/// Two-sided interval estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn point(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn overlaps(&self, other: &ConfidenceInterval) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

pub fn check_alpha(alpha: f64) -> ModelResult<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(ModelError::InvalidParameter(format!(
            "significance level must be in (0, 1), got {alpha}"
        )));
    }
    Ok(())
}

/// Mean and unbiased (n - 1) variance. Variance is 0 for a single observation.
pub fn mean_and_variance(sample: &[f64]) -> (f64, f64) {
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    if sample.len() < 2 {
        return (mean, 0.0);
    }
    let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

/// Two-sided Student-t critical value `t_{1 - alpha/2, df}`.
pub fn t_critical(alpha: f64, df: f64) -> ModelResult<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
        ModelError::InvalidParameter(format!("t distribution with {df} degrees of freedom: {e}"))
    })?;
    Ok(dist.inverse_cdf(1.0 - alpha / 2.0))
}

/// Summary of one outcome sample.
#[derive(Clone, Debug, Serialize)]
pub struct SummaryStat {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub alpha: f64,
    /// Confidence interval of the mean at level `1 - alpha`.
    pub interval: ConfidenceInterval,
}

impl SummaryStat {
    pub fn new(name: &str, sample: &[f64], alpha: f64) -> ModelResult<Self> {
        check_alpha(alpha)?;
        if sample.is_empty() {
            return Err(ModelError::EmptySample(name.to_string()));
        }

        let n = sample.len();
        let (mean, variance) = mean_and_variance(sample);
        let std_dev = variance.sqrt();
        let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
        let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let interval = if n < 2 || std_dev == 0.0 {
            ConfidenceInterval::point(mean)
        } else {
            let half_width = t_critical(alpha, (n - 1) as f64)? * std_dev / (n as f64).sqrt();
            ConfidenceInterval {
                lower: mean - half_width,
                upper: mean + half_width,
            }
        };

        Ok(Self {
            name: name.to_string(),
            n,
            mean,
            std_dev,
            min,
            max,
            alpha,
            interval,
        })
    }

    /// Standard error of the mean.
    pub fn std_err(&self) -> f64 {
        self.std_dev / (self.n as f64).sqrt()
    }
}

/// Difference of means `mean(x) - mean(y_ref)` between independent samples.
#[derive(Clone, Debug, Serialize)]
pub struct DifferenceStat {
    pub name: String,
    pub mean: f64,
    pub std_err: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,
    pub alpha: f64,
    pub interval: ConfidenceInterval,
}

impl DifferenceStat {
    /// Welch interval for the location shift between `x` and `y_ref`.
    ///
    /// The samples need not have equal sizes or variances and are not paired.
    pub fn independent(name: &str, x: &[f64], y_ref: &[f64], alpha: f64) -> ModelResult<Self> {
        check_alpha(alpha)?;
        if x.is_empty() || y_ref.is_empty() {
            return Err(ModelError::EmptySample(name.to_string()));
        }

        let (mean_x, var_x) = mean_and_variance(x);
        let (mean_y, var_y) = mean_and_variance(y_ref);
        let nx = x.len() as f64;
        let ny = y_ref.len() as f64;

        let vx = var_x / nx;
        let vy = var_y / ny;
        let std_err = (vx + vy).sqrt();
        let mean = mean_x - mean_y;

        let mut df = 0.0;
        for (v, n) in [(vx, nx), (vy, ny)] {
            if n > 1.0 {
                df += v * v / (n - 1.0);
            }
        }
        let df = if df > 0.0 { (vx + vy).powi(2) / df } else { 0.0 };

        let interval = if std_err == 0.0 || df <= 0.0 {
            ConfidenceInterval::point(mean)
        } else {
            let half_width = t_critical(alpha, df)? * std_err;
            ConfidenceInterval {
                lower: mean - half_width,
                upper: mean + half_width,
            }
        };

        Ok(Self {
            name: name.to_string(),
            mean,
            std_err,
            df,
            alpha,
            interval,
        })
    }
}
