//! The circuit container and the element trait.

use std::collections::HashSet;

use nalgebra::DVector;

use crate::error::{Error, Result};
use crate::mna::MnaSystem;
use crate::node::NodeTable;

/// Reactive-element data extracted for companion-model integration.
///
/// The transient engine owns the integration state; elements only report
/// their topology, value, and initial condition through this tagged enum.
#[derive(Debug, Clone)]
pub enum ReactiveInfo {
    /// Capacitor with initial voltage `v0`.
    Capacitor {
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        capacitance: f64,
        v0: f64,
    },
    /// Inductor with initial current `i0`.
    Inductor {
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        inductance: f64,
        i0: f64,
    },
    /// Not a reactive element.
    None,
}

/// A circuit element that can stamp itself into the MNA system.
pub trait Device: std::fmt::Debug + Send + Sync {
    /// Element name as written in the scenario file (e.g. "r1", "vin").
    fn name(&self) -> &str;

    /// Stamp the element's contribution at simulation time `t`.
    ///
    /// Reactive elements stamp nothing here; the engine stamps their
    /// companion models. Nonlinear elements stamp nothing here either and
    /// contribute through [`Device::stamp_nonlinear`] instead.
    fn stamp(&self, mna: &mut MnaSystem, t: f64);

    /// Number of branch-current variables this element needs.
    fn num_branches(&self) -> usize {
        0
    }

    /// Branch-current variable index, if this element carries one.
    fn branch_index(&self) -> Option<usize> {
        None
    }

    /// Companion-model data, for reactive elements.
    fn reactive_info(&self) -> ReactiveInfo {
        ReactiveInfo::None
    }

    /// True if the element requires Newton iteration.
    fn is_nonlinear(&self) -> bool {
        false
    }

    /// Stamp the Newton linearization of the element around solution `x`.
    fn stamp_nonlinear(&self, _mna: &mut MnaSystem, _x: &DVector<f64>) {}
}

/// A boxed element.
pub type BoxedDevice = Box<dyn Device>;

/// A complete circuit parsed from a scenario file.
#[derive(Debug, Default)]
pub struct Circuit {
    title: Option<String>,
    nodes: NodeTable,
    devices: Vec<BoxedDevice>,
    num_branches: usize,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the circuit title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Circuit title, if one was given.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The node-interning table.
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Mutable access to the node table (used while parsing).
    pub fn nodes_mut(&mut self) -> &mut NodeTable {
        &mut self.nodes
    }

    /// Add an element, accounting for its branch-current variables.
    pub fn add_device(&mut self, device: impl Device + 'static) {
        self.num_branches += device.num_branches();
        self.devices.push(Box::new(device));
    }

    /// Number of non-ground nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of branch-current variables.
    pub fn num_branches(&self) -> usize {
        self.num_branches
    }

    /// Next free branch-current index (used while parsing).
    pub fn next_branch_index(&self) -> usize {
        self.num_branches
    }

    /// All elements, in scenario-file order.
    pub fn devices(&self) -> &[BoxedDevice] {
        &self.devices
    }

    /// Number of elements.
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// True if any element requires Newton iteration.
    pub fn has_nonlinear(&self) -> bool {
        self.devices.iter().any(|d| d.is_nonlinear())
    }

    /// Stamp every non-reactive linear element at time `t`.
    pub fn stamp_at(&self, mna: &mut MnaSystem, t: f64) {
        for device in &self.devices {
            device.stamp(mna, t);
        }
    }

    /// Stamp every nonlinear element linearized around `x`.
    pub fn stamp_nonlinear_at(&self, mna: &mut MnaSystem, x: &DVector<f64>) {
        for device in &self.devices {
            device.stamp_nonlinear(mna, x);
        }
    }

    /// Check structural rules individual stamps cannot: element names must
    /// be unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for device in &self.devices {
            if !seen.insert(device.name()) {
                return Err(Error::DuplicateDevice(device.name().to_string()));
            }
        }
        Ok(())
    }

    /// Branch-current index of the named element, if it carries one.
    pub fn find_branch_index(&self, name: &str) -> Option<usize> {
        self.devices
            .iter()
            .find(|d| d.name() == name)
            .and_then(|d| d.branch_index())
    }
}
