//! Numeric engine for the GSEIM solver.
//!
//! Dense LU linear solve, Newton-Raphson iteration for nonlinear circuits,
//! and a fixed-step transient engine with Backward Euler and Trapezoidal
//! companion models.

pub mod error;
pub mod linear;
pub mod newton;
pub mod transient;

pub use error::{Error, Result};
pub use linear::solve_dense;
pub use newton::{ConvergenceCriteria, NewtonStamper, solve_newton};
pub use transient::{
    CapacitorState, InductorState, IntegrationMethod, TimePoint, TransientParams, TransientResult,
    TransientStamper, solve_transient,
};
