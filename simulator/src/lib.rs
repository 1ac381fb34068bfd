//! # Stroke Markov: individual-level microsimulation of stroke outcomes
//!
//! Simulates cohorts of patients through a discrete-time Markov model
//! (Well, Stroke, PostStroke, Dead) with annual cycles, accumulates discounted
//! costs and quality-adjusted life years per patient, and compares a control
//! policy (no therapy) with anticoagulation.
//!
//! ## Pipeline
//!
//! | Step | Rust module | Description |
//! |------|-------------|-------------|
//! | 1 | [`config`], [`transition`], [`parameters`] | Validate inputs, build baseline and treatment matrices, bundle per-policy parameters |
//! | 2 | [`simulation::patient`] | Walk each patient through the matrix with its own SplitMix64 stream, accruing half-cycle corrected, discounted cost and utility |
//! | 3 | [`simulation::cohort`], [`simulation::outcomes`] | Simulate N patients sequentially, collect samples, summary statistics and the survival curve |
//! | 4 | [`analysis`] | Incremental outcomes, ICER with bootstrap interval, net monetary benefit sweep |
//! | 5 | [`report`] | Serialisable run summary |
//!
//! [`simulation::trace`] computes the exact expectations the microsimulation
//! estimates, by propagating the occupancy vector instead of sampling.
//!
//! ## Timing conventions
//!
//! - A patient that dies during cycle `t` has survival time `t + 0.5`.
//! - Cost and utility of cycle `t` are discounted over `2t + 1` half-periods at
//!   half the annual rate.
//! - Patients alive after the last cycle are censored: they contribute cost,
//!   utility and strokes but no survival time.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod econ;
pub mod env_config;
pub mod error;
pub mod parameters;
pub mod report;
pub mod simulation;
pub mod stats;
pub mod transition;
pub mod types;
