//! Shared environment configuration for the binaries.
//!
//! Consolidates the `STROKE_LOG` and `STROKE_OUTPUT_DIR` reads.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Default output directory when `STROKE_OUTPUT_DIR` is unset.
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Install a fmt subscriber filtered by `STROKE_LOG` (default `info`).
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("STROKE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Read `STROKE_OUTPUT_DIR` (default [`DEFAULT_OUTPUT_DIR`]).
pub fn output_dir() -> PathBuf {
    std::env::var("STROKE_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR))
}
