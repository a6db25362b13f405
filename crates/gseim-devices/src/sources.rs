//! Independent voltage and current sources.

use gseim_core::mna::MnaSystem;
use gseim_core::{Device, NodeId};

use crate::waveforms::Waveform;

/// An independent voltage source driven by a waveform.
///
/// Carries one branch-current variable (ideal source, MNA extended row).
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub waveform: Waveform,
    pub branch_idx: usize,
}

impl VoltageSource {
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        waveform: Waveform,
        branch_idx: usize,
    ) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            waveform,
            branch_idx,
        }
    }
}

impl Device for VoltageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn stamp(&self, mna: &mut MnaSystem, t: f64) {
        mna.stamp_voltage_source(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.branch_idx,
            self.waveform.value_at(t),
        );
    }

    fn num_branches(&self) -> usize {
        1
    }

    fn branch_index(&self) -> Option<usize> {
        Some(self.branch_idx)
    }
}

/// An independent current source driven by a waveform.
///
/// Positive current flows from `node_pos` through the source into
/// `node_neg` (the SPICE convention).
#[derive(Debug, Clone)]
pub struct CurrentSource {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub waveform: Waveform,
}

impl CurrentSource {
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        waveform: Waveform,
    ) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            waveform,
        }
    }
}

impl Device for CurrentSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn stamp(&self, mna: &mut MnaSystem, t: f64) {
        mna.stamp_current_source(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.waveform.value_at(t),
        );
    }
}
