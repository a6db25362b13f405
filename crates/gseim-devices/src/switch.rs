//! Clock-driven switch for power-electronics scenarios.

use gseim_core::mna::MnaSystem;
use gseim_core::{Device, NodeId};

/// A two-state resistance toggled by an internal clock.
///
/// The switch is ON (resistance `ron`) for the first `duty` fraction of
/// each period `1/freq`, starting at delay `td`, and OFF (`roff`)
/// otherwise. This models gate-driven devices (buck switches, thyristor
/// firing) without a separate control network; the state is a pure
/// function of time, so runs stay deterministic.
#[derive(Debug, Clone)]
pub struct ClockedSwitch {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    /// Switching frequency (Hz).
    pub freq: f64,
    /// ON fraction of each period, in `[0, 1]`.
    pub duty: f64,
    /// Delay before the first ON interval (s).
    pub td: f64,
    /// ON resistance (ohms).
    pub ron: f64,
    /// OFF resistance (ohms).
    pub roff: f64,
}

impl ClockedSwitch {
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        freq: f64,
        duty: f64,
    ) -> Self {
        Self {
            name: name.into(),
            node_pos,
            node_neg,
            freq,
            duty,
            td: 0.0,
            ron: 1e-3,
            roff: 1e6,
        }
    }

    /// Switch state at time `t`.
    pub fn is_on(&self, t: f64) -> bool {
        if t < self.td {
            return false;
        }
        let period = 1.0 / self.freq;
        let tau = (t - self.td) % period;
        tau < self.duty * period
    }

    fn conductance_at(&self, t: f64) -> f64 {
        if self.is_on(t) {
            1.0 / self.ron
        } else {
            1.0 / self.roff
        }
    }
}

impl Device for ClockedSwitch {
    fn name(&self) -> &str {
        &self.name
    }

    fn stamp(&self, mna: &mut MnaSystem, t: f64) {
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.conductance_at(t),
        );
    }
}
