//! Model errors.

use crate::types::HealthState;

/// Errors raised while building or running the model.
///
/// Matrix and parameter errors are raised at construction time, before any
/// patient is simulated.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid transition row for {state}: {reason}")]
    InvalidMatrix { state: HealthState, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty sample: {0}")]
    EmptySample(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
