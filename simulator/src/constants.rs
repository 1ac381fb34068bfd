//! Default model inputs and run settings.
//!
//! All probabilities are annual (one cycle = one year). Costs are in dollars per
//! year spent in a state; utilities are quality weights per year. These are the
//! values [`crate::config::ModelInputs::default`] and
//! [`crate::config::SimulationConfig::default`] start from; a JSON config file
//! or CLI flags can override any of them.

/// Annual probability of a first stroke while in `Well`.
pub const P_STROKE: f64 = 0.05;

/// Annual probability of a recurrent stroke while in `PostStroke`.
pub const P_RECURRENCE: f64 = 0.2;

/// Probability of surviving the cycle in which a stroke occurs.
pub const P_SURVIVE_STROKE: f64 = 0.7;

/// Annual all-cause mortality applied to every non-absorbing state.
/// Zero disables background mortality (death only follows a stroke).
pub const P_BACKGROUND_DEATH: f64 = 0.0;

/// Annual cost per state: Well, Stroke, PostStroke, Dead.
pub const STATE_COSTS: [f64; 4] = [0.0, 5000.0, 200.0, 0.0];

/// Annual utility per state: Well, Stroke, PostStroke, Dead.
/// The stroke weight assumes a one-year cycle.
pub const STATE_UTILITIES: [f64; 4] = [1.0, 0.8865, 0.9, 0.0];

/// Annual cost of anticoagulation.
pub const ANTICOAG_COST: f64 = 2000.0;

/// Relative risk of recurrent stroke from `PostStroke` under anticoagulation.
pub const ANTICOAG_RR: f64 = 0.65;

/// Annual discount rate applied to cost and utility.
pub const DISCOUNT_RATE: f64 = 0.03;

/// Patients per simulated cohort.
pub const POPULATION_SIZE: u32 = 10_000;

/// Simulation horizon in cycles (years).
pub const HORIZON: u32 = 50;

/// Longest accepted horizon in cycles.
pub const MAX_HORIZON: u32 = 1_000;

/// Significance level for confidence intervals.
pub const ALPHA: f64 = 0.05;

/// Willingness-to-pay sweep for net monetary benefit, in dollars per QALY.
pub const WTP_MIN: f64 = 0.0;
pub const WTP_MAX: f64 = 100_000.0;
pub const WTP_POINTS: usize = 21;

/// Bootstrap resamples used for the ICER interval.
pub const BOOTSTRAP_SAMPLES: usize = 1000;

/// Seed of the bootstrap stream (independent of every patient stream).
pub const BOOTSTRAP_SEED: u64 = 0x5EED_1CE5;

/// Maximum deviation of a transition row sum from 1.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Incremental effects smaller than this make the ICER undefined.
pub const MIN_INCREMENTAL_EFFECT: f64 = 1e-12;
