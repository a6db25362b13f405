//! Circuit nodes and the node-interning table.

use std::fmt;

use indexmap::IndexMap;

/// Unique identifier for a circuit node.
///
/// Node 0 is ground; it never gets a matrix row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The ground (reference) node.
    pub const GROUND: NodeId = NodeId(0);

    /// Create a NodeId from a raw value.
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Raw node number.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// True for the ground node.
    pub fn is_ground(self) -> bool {
        self.0 == 0
    }

    /// MNA matrix row for this node, or `None` for ground.
    pub fn matrix_index(self) -> Option<usize> {
        if self.is_ground() {
            None
        } else {
            Some((self.0 - 1) as usize)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Interning table mapping node names to ids.
///
/// Names are assigned ids in first-appearance order, so everything derived
/// from node order (matrix layout, default output columns) is a pure
/// function of the scenario file. The literal name `"0"` is ground.
#[derive(Debug, Default)]
pub struct NodeTable {
    names: IndexMap<String, NodeId>,
}

impl NodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a node name, returning its id.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if name == "0" {
            return NodeId::GROUND;
        }
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = NodeId::new(self.names.len() as u32 + 1);
        self.names.insert(name.to_string(), id);
        id
    }

    /// Look up a previously interned name.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        if name == "0" {
            return Some(NodeId::GROUND);
        }
        self.names.get(name).copied()
    }

    /// The name a node was interned under.
    pub fn name_of(&self, node: NodeId) -> Option<&str> {
        if node.is_ground() {
            return Some("0");
        }
        self.names
            .get_index(node.as_u32() as usize - 1)
            .map(|(name, _)| name.as_str())
    }

    /// Number of non-ground nodes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no non-ground node has been interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Non-ground node ids in interning order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.names.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground() {
        assert!(NodeId::GROUND.is_ground());
        assert_eq!(NodeId::GROUND.matrix_index(), None);

        let mut table = NodeTable::new();
        assert_eq!(table.intern("0"), NodeId::GROUND);
        assert!(table.is_empty());
    }

    #[test]
    fn test_intern_order() {
        let mut table = NodeTable::new();
        let a = table.intern("out");
        let b = table.intern("mid");
        let again = table.intern("out");

        assert_eq!(a, NodeId::new(1));
        assert_eq!(b, NodeId::new(2));
        assert_eq!(again, a);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name_of(b), Some("mid"));
    }

    #[test]
    fn test_matrix_index() {
        assert_eq!(NodeId::new(1).matrix_index(), Some(0));
        assert_eq!(NodeId::new(7).matrix_index(), Some(6));
    }
}
