//! Patient and cohort simulation.
//!
//! - [`fast_prng`]: SplitMix64 per-patient stream and inverse-CDF sampling
//! - [`patient`]: Single-patient walk, state monitor, cost/utility accumulator
//! - [`cohort`]: Sequential simulation of N patients under one policy
//! - [`outcomes`]: Outcome samples, summary statistics, survival curve
//! - [`trace`]: Deterministic expected-value Markov trace

pub mod cohort;
pub mod fast_prng;
pub mod outcomes;
pub mod patient;
pub mod trace;

// Re-export commonly used items
pub use cohort::Cohort;
pub use fast_prng::{sample_index, SplitMix64};
pub use outcomes::{CohortOutcomes, SurvivalCurve, SurvivalStep};
pub use patient::{CostUtilityAccumulator, Patient, StateMonitor, EVENT_STATE};
pub use trace::MarkovTrace;
