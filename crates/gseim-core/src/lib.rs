//! Core circuit representation for the GSEIM solver.
//!
//! This crate provides the data structures shared by the parser, element
//! library, and numeric engine: node identifiers and the node-interning
//! table, the Modified Nodal Analysis (MNA) matrix system, the [`Device`]
//! trait, and the [`Circuit`] container a scenario file is parsed into.

pub mod circuit;
pub mod error;
pub mod mna;
pub mod node;
pub mod units;

pub use circuit::{Circuit, Device, ReactiveInfo};
pub use error::{Error, Result};
pub use mna::MnaSystem;
pub use node::{NodeId, NodeTable};
