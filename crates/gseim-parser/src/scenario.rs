//! Parsed scenario: circuit + solve parameters + output selection.

use gseim_core::{Circuit, NodeId};

/// Integration method requested in the solve block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `method=be`
    BackwardEuler,
    /// `method=trz` (default)
    Trapezoidal,
}

/// Parameters from the `begin_solve` block.
#[derive(Debug, Clone)]
pub struct SolveParams {
    pub method: Method,
    /// Simulation start time (s), default 0.
    pub t_start: f64,
    /// Simulation end time (s). Required.
    pub t_end: f64,
    /// Fixed timestep (s). Required.
    pub t_step: f64,
    /// Newton iteration limit override.
    pub itmax: Option<usize>,
    /// Newton absolute voltage tolerance override.
    pub vtol: Option<f64>,
    /// Newton absolute current tolerance override.
    pub itol: Option<f64>,
}

/// One output column requested in the `begin_output` block.
#[derive(Debug, Clone)]
pub enum OutputVar {
    /// `v(<node>)`: voltage of a named node.
    NodeVoltage { label: String, node: NodeId },
    /// `i(<element>)`: branch current of a voltage source.
    BranchCurrent { label: String, branch: usize },
}

impl OutputVar {
    /// Column label as written in the scenario (`v(out)`, `i(vin)`).
    pub fn label(&self) -> &str {
        match self {
            OutputVar::NodeVoltage { label, .. } => label,
            OutputVar::BranchCurrent { label, .. } => label,
        }
    }
}

/// A fully parsed scenario file.
#[derive(Debug)]
pub struct Scenario {
    pub circuit: Circuit,
    pub solve: SolveParams,
    pub outputs: Vec<OutputVar>,
}
