//! Fixed-step transient integration engine.

use gseim_core::mna::MnaSystem;
use nalgebra::DVector;

use crate::error::{Error, Result};
use crate::linear::solve_dense;
use crate::newton::{ConvergenceCriteria, NewtonStamper, solve_newton};

/// Numerical integration method for reactive elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMethod {
    /// Backward Euler (first order, A-stable).
    BackwardEuler,
    /// Trapezoidal rule (second order, A-stable).
    Trapezoidal,
}

/// Transient run parameters.
#[derive(Debug, Clone)]
pub struct TransientParams {
    /// Simulation start time (s).
    pub t_start: f64,
    /// Simulation end time (s).
    pub t_end: f64,
    /// Fixed timestep (s).
    pub t_step: f64,
    /// Integration method.
    pub method: IntegrationMethod,
}

impl TransientParams {
    fn validate(&self) -> Result<usize> {
        if !(self.t_step > 0.0) {
            return Err(Error::InvalidTimeGrid(format!(
                "t_step must be positive, got {}",
                self.t_step
            )));
        }
        if self.t_end <= self.t_start {
            return Err(Error::InvalidTimeGrid(format!(
                "t_end ({}) must exceed t_start ({})",
                self.t_end, self.t_start
            )));
        }
        let n = ((self.t_end - self.t_start) / self.t_step).round() as usize;
        Ok(n.max(1))
    }
}

/// Companion-model state of a capacitor.
#[derive(Debug, Clone)]
pub struct CapacitorState {
    pub capacitance: f64,
    pub v_prev: f64,
    pub i_prev: f64,
    pub node_pos: Option<usize>,
    pub node_neg: Option<usize>,
}

impl CapacitorState {
    /// Create a state pinned at initial voltage `v0`.
    pub fn new(capacitance: f64, node_pos: Option<usize>, node_neg: Option<usize>, v0: f64) -> Self {
        Self {
            capacitance,
            v_prev: v0,
            i_prev: 0.0,
            node_pos,
            node_neg,
        }
    }

    /// Stamp the companion model for step size `h`.
    ///
    /// Backward Euler: `Geq = C/h`, `Ieq = Geq * v_prev`.
    /// Trapezoidal: `Geq = 2C/h`, `Ieq = Geq * v_prev + i_prev`.
    pub fn stamp(&self, mna: &mut MnaSystem, h: f64, method: IntegrationMethod) {
        let (geq, ieq) = match method {
            IntegrationMethod::BackwardEuler => {
                let geq = self.capacitance / h;
                (geq, geq * self.v_prev)
            }
            IntegrationMethod::Trapezoidal => {
                let geq = 2.0 * self.capacitance / h;
                (geq, geq * self.v_prev + self.i_prev)
            }
        };
        mna.stamp_conductance(self.node_pos, self.node_neg, geq);
        mna.stamp_current_source(self.node_neg, self.node_pos, ieq);
    }

    /// Advance the state after a solved step.
    pub fn update(&mut self, v_new: f64, h: f64, method: IntegrationMethod) {
        match method {
            IntegrationMethod::BackwardEuler => {
                self.i_prev = self.capacitance / h * (v_new - self.v_prev);
            }
            IntegrationMethod::Trapezoidal => {
                self.i_prev = 2.0 * self.capacitance / h * (v_new - self.v_prev) - self.i_prev;
            }
        }
        self.v_prev = v_new;
    }
}

/// Companion-model state of an inductor.
#[derive(Debug, Clone)]
pub struct InductorState {
    pub inductance: f64,
    pub i_prev: f64,
    pub v_prev: f64,
    pub node_pos: Option<usize>,
    pub node_neg: Option<usize>,
}

impl InductorState {
    /// Create a state pinned at initial current `i0`.
    pub fn new(inductance: f64, node_pos: Option<usize>, node_neg: Option<usize>, i0: f64) -> Self {
        Self {
            inductance,
            i_prev: i0,
            v_prev: 0.0,
            node_pos,
            node_neg,
        }
    }

    /// Stamp the companion model for step size `h`.
    ///
    /// Backward Euler: `Geq = h/L`, `Ieq = i_prev`.
    /// Trapezoidal: `Geq = h/2L`, `Ieq = i_prev + Geq * v_prev`.
    pub fn stamp(&self, mna: &mut MnaSystem, h: f64, method: IntegrationMethod) {
        let (geq, ieq) = match method {
            IntegrationMethod::BackwardEuler => (h / self.inductance, self.i_prev),
            IntegrationMethod::Trapezoidal => {
                let geq = h / (2.0 * self.inductance);
                (geq, self.i_prev + geq * self.v_prev)
            }
        };
        mna.stamp_conductance(self.node_pos, self.node_neg, geq);
        // The companion current adds to the branch current, so it leaves
        // node_pos (opposite orientation to the capacitor's source).
        mna.stamp_current_source(self.node_pos, self.node_neg, ieq);
    }

    /// Advance the state after a solved step.
    pub fn update(&mut self, v_new: f64, h: f64, method: IntegrationMethod) {
        match method {
            IntegrationMethod::BackwardEuler => {
                self.i_prev += h / self.inductance * v_new;
            }
            IntegrationMethod::Trapezoidal => {
                self.i_prev += h / (2.0 * self.inductance) * (v_new + self.v_prev);
            }
        }
        self.v_prev = v_new;
    }
}

/// One solved timepoint.
#[derive(Debug, Clone)]
pub struct TimePoint {
    pub time: f64,
    /// Node voltages followed by branch currents.
    pub solution: DVector<f64>,
}

/// Full transient run result.
#[derive(Debug, Clone)]
pub struct TransientResult {
    pub points: Vec<TimePoint>,
    pub num_nodes: usize,
}

/// Stamps the circuit for the transient engine.
pub trait TransientStamper {
    /// Stamp every linear, non-reactive element at time `t`.
    fn stamp_at(&self, mna: &mut MnaSystem, t: f64);

    /// Stamp every nonlinear element linearized around `x`.
    fn stamp_nonlinear_at(&self, mna: &mut MnaSystem, x: &DVector<f64>);

    /// Whether any element needs Newton iteration.
    fn has_nonlinear(&self) -> bool;

    fn num_nodes(&self) -> usize;
    fn num_branches(&self) -> usize;
}

/// Full assembly of one timestep: linear elements + companion models
/// (+ nonlinear linearizations inside the Newton loop).
struct StepStamper<'a> {
    stamper: &'a dyn TransientStamper,
    caps: &'a [CapacitorState],
    inds: &'a [InductorState],
    h: f64,
    method: IntegrationMethod,
    t: f64,
}

impl StepStamper<'_> {
    fn stamp_linear(&self, mna: &mut MnaSystem) {
        self.stamper.stamp_at(mna, self.t);
        for cap in self.caps {
            cap.stamp(mna, self.h, self.method);
        }
        for ind in self.inds {
            ind.stamp(mna, self.h, self.method);
        }
    }
}

impl NewtonStamper for StepStamper<'_> {
    fn stamp_at(&self, mna: &mut MnaSystem, x: &DVector<f64>) {
        self.stamp_linear(mna);
        self.stamper.stamp_nonlinear_at(mna, x);
    }
}

/// Pseudo-step ratio used for the consistent initial solve: small enough
/// that companion stamps pin each reactive element at its initial
/// condition, large enough to stay well inside f64 range.
const INIT_STEP_RATIO: f64 = 1e-9;

/// Run a fixed-step transient simulation.
///
/// The first recorded point is a consistent solve at `t_start` with every
/// reactive element held at its initial condition; subsequent points step
/// the companion models with `t_step`. Nonlinear circuits run a Newton
/// iteration per step, warm-started from the previous solution.
pub fn solve_transient(
    stamper: &dyn TransientStamper,
    caps: &mut [CapacitorState],
    inds: &mut [InductorState],
    params: &TransientParams,
    criteria: &ConvergenceCriteria,
) -> Result<TransientResult> {
    let num_steps = params.validate()?;
    let num_nodes = stamper.num_nodes();
    let num_branches = stamper.num_branches();
    let size = num_nodes + num_branches;
    let h = params.t_step;
    let nonlinear = stamper.has_nonlinear();

    let mut result = TransientResult {
        points: Vec::with_capacity(num_steps + 1),
        num_nodes,
    };

    let mut solution = DVector::zeros(size);

    // Initial point: solve at t_start with a stiff Backward-Euler stamp so
    // the network sees each capacitor as v0 and each inductor as i0.
    {
        let step = StepStamper {
            stamper,
            caps,
            inds,
            h: h * INIT_STEP_RATIO,
            method: IntegrationMethod::BackwardEuler,
            t: params.t_start,
        };
        solution = if nonlinear {
            solve_newton(num_nodes, num_branches, &step, criteria, &solution, params.t_start)?
        } else {
            let mut mna = MnaSystem::new(num_nodes, num_branches);
            step.stamp_linear(&mut mna);
            solve_dense(mna.matrix(), mna.rhs())?
        };
    }

    result.points.push(TimePoint {
        time: params.t_start,
        solution: solution.clone(),
    });

    for k in 1..=num_steps {
        let t = params.t_start + (k as f64) * h;
        let step = StepStamper {
            stamper,
            caps,
            inds,
            h,
            method: params.method,
            t,
        };

        solution = if nonlinear {
            solve_newton(num_nodes, num_branches, &step, criteria, &solution, t)?
        } else {
            let mut mna = MnaSystem::new(num_nodes, num_branches);
            step.stamp_linear(&mut mna);
            solve_dense(mna.matrix(), mna.rhs())?
        };

        for cap in caps.iter_mut() {
            let vp = cap.node_pos.map(|i| solution[i]).unwrap_or(0.0);
            let vn = cap.node_neg.map(|i| solution[i]).unwrap_or(0.0);
            cap.update(vp - vn, h, params.method);
        }
        for ind in inds.iter_mut() {
            let vp = ind.node_pos.map(|i| solution[i]).unwrap_or(0.0);
            let vn = ind.node_neg.map(|i| solution[i]).unwrap_or(0.0);
            ind.update(vp - vn, h, params.method);
        }

        result.points.push(TimePoint {
            time: t,
            solution: solution.clone(),
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// V1 -- R -- node1 -- C -- GND, with V1 at node 0.
    struct RcStamper {
        voltage: f64,
        resistance: f64,
    }

    impl TransientStamper for RcStamper {
        fn stamp_at(&self, mna: &mut MnaSystem, _t: f64) {
            mna.stamp_voltage_source(Some(0), None, 0, self.voltage);
            mna.stamp_conductance(Some(0), Some(1), 1.0 / self.resistance);
        }

        fn stamp_nonlinear_at(&self, _mna: &mut MnaSystem, _x: &DVector<f64>) {}

        fn has_nonlinear(&self) -> bool {
            false
        }

        fn num_nodes(&self) -> usize {
            2
        }

        fn num_branches(&self) -> usize {
            1
        }
    }

    fn rc_params(method: IntegrationMethod) -> TransientParams {
        TransientParams {
            t_start: 0.0,
            t_end: 5e-3,
            t_step: 10e-6,
            method,
        }
    }

    #[test]
    fn test_rc_charging_backward_euler() {
        // tau = 1k * 1uF = 1ms
        let stamper = RcStamper {
            voltage: 5.0,
            resistance: 1000.0,
        };
        let mut caps = vec![CapacitorState::new(1e-6, Some(1), None, 0.0)];

        let result = solve_transient(
            &stamper,
            &mut caps,
            &mut [],
            &rc_params(IntegrationMethod::BackwardEuler),
            &ConvergenceCriteria::default(),
        )
        .unwrap();

        // Initial point holds the capacitor at v0 = 0.
        assert!(result.points[0].solution[1].abs() < 1e-6);

        // After 5 tau the capacitor is essentially charged.
        let v_final = result.points.last().unwrap().solution[1];
        assert!((v_final - 5.0).abs() < 0.05, "v_final = {v_final}");

        // At t = tau, v = 5 * (1 - 1/e).
        let at_tau = result.points[100].solution[1];
        let expected = 5.0 * (1.0 - (-1.0_f64).exp());
        assert!((at_tau - expected).abs() < 0.2, "v(tau) = {at_tau}");
    }

    #[test]
    fn test_rc_charging_trapezoidal_is_tighter() {
        let stamper = RcStamper {
            voltage: 5.0,
            resistance: 1000.0,
        };
        let mut caps = vec![CapacitorState::new(1e-6, Some(1), None, 0.0)];

        let result = solve_transient(
            &stamper,
            &mut caps,
            &mut [],
            &rc_params(IntegrationMethod::Trapezoidal),
            &ConvergenceCriteria::default(),
        )
        .unwrap();

        let at_tau = result.points[100].solution[1];
        let expected = 5.0 * (1.0 - (-1.0_f64).exp());
        assert!((at_tau - expected).abs() < 0.01, "v(tau) = {at_tau}");
    }

    #[test]
    fn test_initial_condition_respected() {
        let stamper = RcStamper {
            voltage: 5.0,
            resistance: 1000.0,
        };
        let mut caps = vec![CapacitorState::new(1e-6, Some(1), None, 2.0)];

        let result = solve_transient(
            &stamper,
            &mut caps,
            &mut [],
            &rc_params(IntegrationMethod::BackwardEuler),
            &ConvergenceCriteria::default(),
        )
        .unwrap();

        let v0 = result.points[0].solution[1];
        assert!((v0 - 2.0).abs() < 1e-3, "v(0) = {v0}, expected 2.0");
    }

    #[test]
    fn test_rl_current_ramp() {
        // V -- R -- node1 -- L -- GND; steady-state i = V/R.
        struct RlStamper;
        impl TransientStamper for RlStamper {
            fn stamp_at(&self, mna: &mut MnaSystem, _t: f64) {
                mna.stamp_voltage_source(Some(0), None, 0, 10.0);
                mna.stamp_conductance(Some(0), Some(1), 1.0 / 100.0);
            }
            fn stamp_nonlinear_at(&self, _mna: &mut MnaSystem, _x: &DVector<f64>) {}
            fn has_nonlinear(&self) -> bool {
                false
            }
            fn num_nodes(&self) -> usize {
                2
            }
            fn num_branches(&self) -> usize {
                1
            }
        }

        // tau = L/R = 10u; run 10 tau.
        let mut inds = vec![InductorState::new(1e-3, Some(1), None, 0.0)];
        let params = TransientParams {
            t_start: 0.0,
            t_end: 100e-6,
            t_step: 0.5e-6,
            method: IntegrationMethod::Trapezoidal,
        };

        let result = solve_transient(
            &RlStamper,
            &mut [],
            &mut inds,
            &params,
            &ConvergenceCriteria::default(),
        )
        .unwrap();

        // Inductor ends up carrying V/R = 100 mA.
        assert!((inds[0].i_prev - 0.1).abs() < 1e-3, "i = {}", inds[0].i_prev);
        // Node 1 collapses to ~0 V as the inductor becomes a short.
        let v1 = result.points.last().unwrap().solution[1];
        assert!(v1.abs() < 0.1, "v1 = {v1}");
    }

    #[test]
    fn test_bad_time_grid_rejected() {
        let stamper = RcStamper {
            voltage: 1.0,
            resistance: 1.0,
        };
        let params = TransientParams {
            t_start: 0.0,
            t_end: 0.0,
            t_step: 1e-6,
            method: IntegrationMethod::BackwardEuler,
        };
        let result = solve_transient(
            &stamper,
            &mut [],
            &mut [],
            &params,
            &ConvergenceCriteria::default(),
        );
        assert!(matches!(result, Err(Error::InvalidTimeGrid(_))));
    }
}
