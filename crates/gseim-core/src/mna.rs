//! Modified Nodal Analysis (MNA) system.

use nalgebra::{DMatrix, DVector};

/// The linear system `A x = b` assembled from element stamps.
///
/// `x` holds node voltages first, then branch currents (one per voltage
/// source). Ground has no row; element stamps pass `None` for a terminal
/// tied to ground.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    matrix: DMatrix<f64>,
    rhs: DVector<f64>,
    num_nodes: usize,
    num_branches: usize,
}

impl MnaSystem {
    /// Create a zeroed system for `num_nodes` non-ground nodes and
    /// `num_branches` branch-current variables.
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
            num_nodes,
            num_branches,
        }
    }

    /// Total system size (nodes + branch currents).
    pub fn size(&self) -> usize {
        self.num_nodes + self.num_branches
    }

    /// Number of non-ground nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of branch-current variables.
    pub fn num_branches(&self) -> usize {
        self.num_branches
    }

    /// Zero the matrix and RHS so the system can be re-stamped.
    pub fn clear(&mut self) {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);
    }

    /// Stamp a conductance `g` between two nodes.
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        if let Some(i) = node_i {
            self.matrix[(i, i)] += g;
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += g;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= g;
            self.matrix[(j, i)] -= g;
        }
    }

    /// Stamp a current source driving `current` amps from `node_i` into
    /// `node_j`.
    pub fn stamp_current_source(
        &mut self,
        node_i: Option<usize>,
        node_j: Option<usize>,
        current: f64,
    ) {
        if let Some(i) = node_i {
            self.rhs[i] -= current;
        }
        if let Some(j) = node_j {
            self.rhs[j] += current;
        }
    }

    /// Stamp an ideal voltage source between `node_pos` and `node_neg`
    /// using branch-current variable `branch_idx`.
    pub fn stamp_voltage_source(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        branch_idx: usize,
        voltage: f64,
    ) {
        let row = self.num_nodes + branch_idx;

        if let Some(i) = node_pos {
            self.matrix[(i, row)] += 1.0;
            self.matrix[(row, i)] += 1.0;
        }
        if let Some(j) = node_neg {
            self.matrix[(j, row)] -= 1.0;
            self.matrix[(row, j)] -= 1.0;
        }

        self.rhs[row] = voltage;
    }

    /// Coefficient matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Right-hand side vector.
    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let sys = MnaSystem::new(3, 2);
        assert_eq!(sys.size(), 5);
        assert_eq!(sys.num_nodes(), 3);
        assert_eq!(sys.num_branches(), 2);
    }

    #[test]
    fn test_conductance_stamp() {
        let mut sys = MnaSystem::new(2, 0);
        sys.stamp_conductance(Some(0), Some(1), 0.5);

        assert_eq!(sys.matrix()[(0, 0)], 0.5);
        assert_eq!(sys.matrix()[(1, 1)], 0.5);
        assert_eq!(sys.matrix()[(0, 1)], -0.5);
        assert_eq!(sys.matrix()[(1, 0)], -0.5);
    }

    #[test]
    fn test_conductance_stamp_to_ground() {
        let mut sys = MnaSystem::new(1, 0);
        sys.stamp_conductance(Some(0), None, 2.0);
        assert_eq!(sys.matrix()[(0, 0)], 2.0);
    }

    #[test]
    fn test_current_source_stamp() {
        let mut sys = MnaSystem::new(2, 0);
        sys.stamp_current_source(None, Some(1), 0.01);
        assert_eq!(sys.rhs()[0], 0.0);
        assert_eq!(sys.rhs()[1], 0.01);
    }

    #[test]
    fn test_voltage_source_stamp() {
        let mut sys = MnaSystem::new(2, 1);
        sys.stamp_voltage_source(Some(0), None, 0, 12.0);

        assert_eq!(sys.matrix()[(0, 2)], 1.0);
        assert_eq!(sys.matrix()[(2, 0)], 1.0);
        assert_eq!(sys.rhs()[2], 12.0);
    }

    #[test]
    fn test_clear() {
        let mut sys = MnaSystem::new(1, 0);
        sys.stamp_conductance(Some(0), None, 1.0);
        sys.clear();
        assert_eq!(sys.matrix()[(0, 0)], 0.0);
    }
}
