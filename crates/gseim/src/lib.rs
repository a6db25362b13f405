//! # GSEIM
//!
//! A batch circuit solver: parse a scenario (`.in`) file, run a fixed-step
//! transient simulation, collect the requested output columns.
//!
//! ## Quick start
//!
//! ```rust
//! use gseim::prelude::*;
//!
//! let scenario = gseim::parse(
//!     "begin_circuit\n\
//!      vsrc vin 1 0 dc=10\n\
//!      res r1 1 2 r=1k\n\
//!      res r2 2 0 r=1k\n\
//!      end_circuit\n\
//!      begin_solve\n\
//!      t_end=1m\n\
//!      t_step=10u\n\
//!      end_solve\n",
//! )
//! .unwrap();
//! assert_eq!(scenario.circuit.num_nodes(), 2);
//! ```

// Re-export component crates
pub use gseim_core as core;
pub use gseim_devices as devices;
pub use gseim_parser as parser;
pub use gseim_solver as solver;

// ============================================================================
// Convenient re-exports from gseim_core
// ============================================================================

pub use gseim_core::{
    // Circuit representation
    Circuit,
    Device,
    // Errors
    Error as CoreError,
    NodeId,
    NodeTable,
    ReactiveInfo,
};

// MNA system (exported from submodule)
pub use gseim_core::mna::MnaSystem;

// ============================================================================
// Convenient re-exports from gseim_parser
// ============================================================================

pub use gseim_parser::{
    // Errors
    Error as ParseError,
    Method,
    OutputVar,
    // Scenario model
    Scenario,
    SolveParams,
    // Main parse function
    parse,
};

// ============================================================================
// Convenient re-exports from gseim_solver
// ============================================================================

pub use gseim_solver::{
    CapacitorState,
    ConvergenceCriteria,
    // Errors
    Error as SolverError,
    InductorState,
    IntegrationMethod,
    TimePoint,
    TransientParams,
    TransientResult,
    TransientStamper,
    solve_dense,
    solve_newton,
    // Transient analysis
    solve_transient,
};

// ============================================================================
// Convenient re-exports from gseim_devices
// ============================================================================

pub use gseim_devices::{
    Capacitor,
    ClockedSwitch,
    CurrentSource,
    // Semiconductors
    Diode,
    Inductor,
    // Passive elements
    Resistor,
    // Sources
    VoltageSource,
    // Waveforms
    Waveform,
};

// ============================================================================
// Re-export commonly used external types
// ============================================================================

/// Re-export of nalgebra's dynamic vector type.
pub use nalgebra::DVector;

/// Re-export of nalgebra's dynamic matrix type.
pub use nalgebra::DMatrix;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types and traits.
///
/// ```rust
/// use gseim::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::{Circuit, Device, MnaSystem, NodeId, ReactiveInfo};

    // Parser
    pub use crate::{Method, OutputVar, Scenario, SolveParams, parse};

    // Solver
    pub use crate::{
        CapacitorState, ConvergenceCriteria, InductorState, IntegrationMethod, TransientParams,
        TransientResult, TransientStamper, solve_transient,
    };

    // Devices
    pub use crate::{
        Capacitor, ClockedSwitch, CurrentSource, Diode, Inductor, Resistor, VoltageSource,
        Waveform,
    };

    // Common external types
    pub use crate::{DMatrix, DVector};
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVIDER: &str = "begin_circuit\n\
                           vsrc vin 1 0 dc=10\n\
                           res r1 1 2 r=1k\n\
                           res r2 2 0 r=1k\n\
                           end_circuit\n\
                           begin_solve\n\
                           t_end=1m\n\
                           t_step=10u\n\
                           end_solve\n";

    #[test]
    fn test_parse_simple_scenario() {
        let scenario = parse(DIVIDER).unwrap();
        assert_eq!(scenario.circuit.num_devices(), 3);
        assert!((scenario.solve.t_step - 1e-5).abs() < 1e-18);
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        // Verify types are accessible
        let _: NodeId = NodeId::GROUND;
        let r = Resistor::new("r1", NodeId::new(1), NodeId::new(2), 1000.0);
        assert_eq!(r.resistance, 1000.0);
    }
}
