//! Diode model (Shockley equation) with Newton linearization.

use gseim_core::mna::MnaSystem;
use gseim_core::{Device, NodeId};
use nalgebra::DVector;

/// Thermal voltage kT/q at temperature `temp_k`.
pub fn thermal_voltage(temp_k: f64) -> f64 {
    const K_BOLTZMANN: f64 = 1.380649e-23;
    const Q_ELECTRON: f64 = 1.602176634e-19;
    K_BOLTZMANN * temp_k / Q_ELECTRON
}

/// Minimum junction conductance, keeps the Jacobian nonsingular when the
/// diode is deeply reverse-biased.
const G_MIN: f64 = 1e-12;

/// A junction diode.
#[derive(Debug, Clone)]
pub struct Diode {
    pub name: String,
    /// Anode.
    pub node_pos: NodeId,
    /// Cathode.
    pub node_neg: NodeId,
    /// Saturation current (A).
    pub is: f64,
    /// Emission coefficient.
    pub n: f64,
}

impl Diode {
    pub fn new(name: impl Into<String>, node_pos: NodeId, node_neg: NodeId) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            is: 1e-14,
            n: 1.0,
        }
    }

    /// Diode current and small-signal conductance at junction voltage `vd`.
    pub fn evaluate(&self, vd: f64) -> (f64, f64) {
        let nvt = self.n * thermal_voltage(300.15);
        let vd = limit_voltage(vd, nvt, self.is);

        let exp_term = (vd / nvt).exp();
        let id = self.is * (exp_term - 1.0);
        let gd = (self.is * exp_term / nvt).max(G_MIN);
        (id, gd)
    }
}

/// Compress large forward voltages so `exp()` cannot overflow while the
/// Newton iteration is still far from the solution.
fn limit_voltage(vd: f64, nvt: f64, is: f64) -> f64 {
    let vcrit = nvt * (nvt / (std::f64::consts::SQRT_2 * is)).ln();
    if vd > vcrit {
        vcrit + nvt * (1.0 + ((vd - vcrit) / nvt).ln_1p())
    } else {
        vd
    }
}

impl Device for Diode {
    fn name(&self) -> &str {
        &self.name
    }

    fn stamp(&self, mna: &mut MnaSystem, _t: f64) {
        // Linear pass contributes only the Gmin shunt; the junction itself
        // enters through stamp_nonlinear.
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            G_MIN,
        );
    }

    fn is_nonlinear(&self) -> bool {
        true
    }

    fn stamp_nonlinear(&self, mna: &mut MnaSystem, x: &DVector<f64>) {
        let i = self.node_pos.matrix_index();
        let j = self.node_neg.matrix_index();

        let vp = i.map(|k| x[k]).unwrap_or(0.0);
        let vn = j.map(|k| x[k]).unwrap_or(0.0);
        let vd = vp - vn;

        let (id, gd) = self.evaluate(vd);
        let nvt = self.n * thermal_voltage(300.15);
        let vd_used = limit_voltage(vd, nvt, self.is);
        let ieq = id - gd * vd_used;

        mna.stamp_conductance(i, j, gd);
        mna.stamp_current_source(i, j, ieq);
    }
}
