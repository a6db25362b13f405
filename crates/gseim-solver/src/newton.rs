//! Newton-Raphson iteration for nonlinear systems.

use gseim_core::mna::MnaSystem;
use nalgebra::DVector;

use crate::error::{Error, Result};
use crate::linear::solve_dense;

/// Convergence criteria for the Newton loop.
#[derive(Debug, Clone)]
pub struct ConvergenceCriteria {
    /// Absolute voltage tolerance (V).
    pub v_abstol: f64,
    /// Relative tolerance on all variables.
    pub reltol: f64,
    /// Absolute current tolerance (A), applied to branch variables.
    pub i_abstol: f64,
    /// Iteration limit; exceeding it is a numeric error.
    pub max_iterations: usize,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            v_abstol: 1e-6,
            reltol: 1e-3,
            i_abstol: 1e-9,
            max_iterations: 100,
        }
    }
}

/// Re-stamps the full linearized system at each Newton iterate.
///
/// An implementation must clear nothing itself; the loop hands it a zeroed
/// system and expects linear elements, companion models, and nonlinear
/// linearizations all stamped around `x`.
pub trait NewtonStamper {
    fn stamp_at(&self, mna: &mut MnaSystem, x: &DVector<f64>);
}

/// Solve a nonlinear system by Newton-Raphson iteration.
///
/// Returns the converged solution, or [`Error::ConvergenceFailed`] tagged
/// with `time` (the simulation time of the step being solved, for
/// diagnostics) when the iteration limit is exhausted.
pub fn solve_newton(
    num_nodes: usize,
    num_branches: usize,
    stamper: &dyn NewtonStamper,
    criteria: &ConvergenceCriteria,
    initial_guess: &DVector<f64>,
    time: f64,
) -> Result<DVector<f64>> {
    let mut x = initial_guess.clone();
    let mut mna = MnaSystem::new(num_nodes, num_branches);

    for _ in 0..criteria.max_iterations {
        mna.clear();
        stamper.stamp_at(&mut mna, &x);

        let x_new = solve_dense(mna.matrix(), mna.rhs())?;
        let converged = check_convergence(&x, &x_new, num_nodes, criteria);
        x = x_new;

        if converged {
            return Ok(x);
        }
    }

    Err(Error::ConvergenceFailed {
        iterations: criteria.max_iterations,
        time,
    })
}

fn check_convergence(
    old: &DVector<f64>,
    new: &DVector<f64>,
    num_nodes: usize,
    criteria: &ConvergenceCriteria,
) -> bool {
    for i in 0..old.len() {
        let abstol = if i < num_nodes {
            criteria.v_abstol
        } else {
            criteria.i_abstol
        };
        let delta = (new[i] - old[i]).abs();
        let tol = criteria.reltol * new[i].abs().max(old[i].abs()) + abstol;
        if delta > tol {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x solves g*x + is*(exp(x/vt) - 1) = j  (a current source feeding a
    /// resistor-diode node).
    struct DiodeNodeStamper {
        g: f64,
        is: f64,
        vt: f64,
        j: f64,
    }

    impl NewtonStamper for DiodeNodeStamper {
        fn stamp_at(&self, mna: &mut MnaSystem, x: &DVector<f64>) {
            mna.stamp_conductance(Some(0), None, self.g);
            mna.stamp_current_source(None, Some(0), self.j);

            let v = x[0].min(1.0); // crude limiting, test circuit only
            let e = (v / self.vt).exp();
            let id = self.is * (e - 1.0);
            let gd = self.is * e / self.vt;
            mna.stamp_conductance(Some(0), None, gd);
            mna.stamp_current_source(Some(0), None, id - gd * v);
        }
    }

    #[test]
    fn test_converges_on_diode_node() {
        let stamper = DiodeNodeStamper {
            g: 1e-3,
            is: 1e-14,
            vt: 0.02585,
            j: 1e-3,
        };

        let criteria = ConvergenceCriteria::default();
        let guess = DVector::zeros(1);
        let x = solve_newton(1, 0, &stamper, &criteria, &guess, 0.0).unwrap();

        // Residual of the original nonlinear equation must vanish.
        let v = x[0];
        let residual = stamper.g * v + stamper.is * ((v / stamper.vt).exp() - 1.0) - stamper.j;
        assert!(residual.abs() < 1e-9, "residual = {residual}");
        assert!(v > 0.3 && v < 0.8, "v = {v}");
    }

    #[test]
    fn test_iteration_limit_is_an_error() {
        // A stamper that never settles: alternates the RHS each call.
        struct Flapping(std::cell::Cell<bool>);
        impl NewtonStamper for Flapping {
            fn stamp_at(&self, mna: &mut MnaSystem, _x: &DVector<f64>) {
                let flip = self.0.get();
                self.0.set(!flip);
                mna.stamp_conductance(Some(0), None, 1.0);
                mna.stamp_current_source(None, Some(0), if flip { 1.0 } else { -1.0 });
            }
        }

        let criteria = ConvergenceCriteria {
            max_iterations: 8,
            ..Default::default()
        };
        let guess = DVector::zeros(1);
        let result = solve_newton(1, 0, &Flapping(std::cell::Cell::new(false)), &criteria, &guess, 0.5);

        assert!(matches!(
            result,
            Err(Error::ConvergenceFailed { iterations: 8, time }) if time == 0.5
        ));
    }

    #[test]
    fn test_linear_system_converges_in_two_iterations() {
        struct Linear;
        impl NewtonStamper for Linear {
            fn stamp_at(&self, mna: &mut MnaSystem, _x: &DVector<f64>) {
                mna.stamp_conductance(Some(0), None, 2.0);
                mna.stamp_current_source(None, Some(0), 4.0);
            }
        }

        let x = solve_newton(
            1,
            0,
            &Linear,
            &ConvergenceCriteria::default(),
            &DVector::zeros(1),
            0.0,
        )
        .unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
    }
}
