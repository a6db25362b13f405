//! Error types for gseim-solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("singular system matrix")]
    SingularMatrix,

    #[error("Newton iteration failed to converge after {iterations} iterations at t={time:.6e}s")]
    ConvergenceFailed { iterations: usize, time: f64 },

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),
}

pub type Result<T> = std::result::Result<T, Error>;
