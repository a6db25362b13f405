//! Bridges a parsed circuit to the transient engine's stamper trait.

use gseim_core::mna::MnaSystem;
use gseim_core::{Circuit, ReactiveInfo};
use gseim_solver::{CapacitorState, InductorState, TransientStamper};
use nalgebra::DVector;

/// Stamps every non-reactive element of a parsed circuit.
pub struct CircuitStamper<'a> {
    pub circuit: &'a Circuit,
}

impl TransientStamper for CircuitStamper<'_> {
    fn stamp_at(&self, mna: &mut MnaSystem, t: f64) {
        self.circuit.stamp_at(mna, t);
    }

    fn stamp_nonlinear_at(&self, mna: &mut MnaSystem, x: &DVector<f64>) {
        self.circuit.stamp_nonlinear_at(mna, x);
    }

    fn has_nonlinear(&self) -> bool {
        self.circuit.has_nonlinear()
    }

    fn num_nodes(&self) -> usize {
        self.circuit.num_nodes()
    }

    fn num_branches(&self) -> usize {
        self.circuit.num_branches()
    }
}

/// Collect companion-model state for every reactive element.
pub fn build_reactive_state(circuit: &Circuit) -> (Vec<CapacitorState>, Vec<InductorState>) {
    let mut caps = Vec::new();
    let mut inds = Vec::new();

    for device in circuit.devices() {
        match device.reactive_info() {
            ReactiveInfo::Capacitor {
                node_pos,
                node_neg,
                capacitance,
                v0,
            } => {
                caps.push(CapacitorState::new(capacitance, node_pos, node_neg, v0));
            }
            ReactiveInfo::Inductor {
                node_pos,
                node_neg,
                inductance,
                i0,
            } => {
                inds.push(InductorState::new(inductance, node_pos, node_neg, i0));
            }
            ReactiveInfo::None => {}
        }
    }

    (caps, inds)
}
