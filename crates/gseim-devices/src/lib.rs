//! Element library for the GSEIM solver.
//!
//! Every element implements [`gseim_core::Device`] and stamps itself into
//! the MNA system. Reactive elements (capacitor, inductor) report their
//! topology through `ReactiveInfo` and are integrated by the transient
//! engine's companion models; the diode participates through its Newton
//! linearization.

pub mod diode;
pub mod passive;
pub mod sources;
pub mod switch;
pub mod waveforms;

pub use diode::Diode;
pub use passive::{Capacitor, Inductor, Resistor};
pub use sources::{CurrentSource, VoltageSource};
pub use switch::ClockedSwitch;
pub use waveforms::Waveform;
