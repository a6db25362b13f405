//! Passive elements: resistor, capacitor, inductor.

use gseim_core::mna::MnaSystem;
use gseim_core::{Device, NodeId, ReactiveInfo};

/// A linear resistor.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub resistance: f64,
}

impl Resistor {
    pub fn new(name: impl Into<String>, node_pos: NodeId, node_neg: NodeId, resistance: f64) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            resistance,
        }
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

impl Device for Resistor {
    fn name(&self) -> &str {
        &self.name
    }

    fn stamp(&self, mna: &mut MnaSystem, _t: f64) {
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.conductance(),
        );
    }
}

/// A capacitor with an optional initial voltage.
///
/// Stamps nothing itself; the transient engine integrates it through its
/// companion model using [`ReactiveInfo::Capacitor`].
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub capacitance: f64,
    pub v0: f64,
}

impl Capacitor {
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        capacitance: f64,
        v0: f64,
    ) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            capacitance,
            v0,
        }
    }
}

impl Device for Capacitor {
    fn name(&self) -> &str {
        &self.name
    }

    fn stamp(&self, _mna: &mut MnaSystem, _t: f64) {}

    fn reactive_info(&self) -> ReactiveInfo {
        ReactiveInfo::Capacitor {
            node_pos: self.node_pos.matrix_index(),
            node_neg: self.node_neg.matrix_index(),
            capacitance: self.capacitance,
            v0: self.v0,
        }
    }
}

/// An inductor with an optional initial current.
///
/// Like the capacitor, integrated by the engine's companion model; no
/// branch-current variable is needed in transient form.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub inductance: f64,
    pub i0: f64,
}

impl Inductor {
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        inductance: f64,
        i0: f64,
    ) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            inductance,
            i0,
        }
    }
}

impl Device for Inductor {
    fn name(&self) -> &str {
        &self.name
    }

    fn stamp(&self, _mna: &mut MnaSystem, _t: f64) {}

    fn reactive_info(&self) -> ReactiveInfo {
        ReactiveInfo::Inductor {
            node_pos: self.node_pos.matrix_index(),
            node_neg: self.node_neg.matrix_index(),
            inductance: self.inductance,
            i0: self.i0,
        }
    }
}
