//! Simulation nodes and the arena that owns them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

/// Stable identifier of a simulation node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId(id)
    }
}

/// Position and velocity of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl SimulationNode {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// A node to be registered with [`Simulation::add_nodes`](crate::Simulation::add_nodes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputNode {
    pub id: NodeId,
    /// Explicit starting position; `None` places the node on the spiral.
    pub position: Option<(f64, f64)>,
}

impl InputNode {
    pub fn new(id: NodeId) -> Self {
        Self { id, position: None }
    }

    /// A node that starts at `(x, y)`.
    pub fn at(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Some((x, y)),
        }
    }
}

impl From<NodeId> for InputNode {
    fn from(id: NodeId) -> Self {
        InputNode::new(id)
    }
}

/// Dense storage for simulation nodes, in insertion order, with an id index.
///
/// Nodes are only ever appended; an index handed out stays valid until
/// [`NodeArena::clear`].
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<SimulationNode>,
    index: HashMap<NodeId, usize>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SimulationNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SimulationNode> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[SimulationNode] {
        &self.nodes
    }

    /// Resolve ids to arena indices, failing on the first unknown id.
    pub fn resolve(&self, ids: &[NodeId]) -> LayoutResult<Vec<usize>> {
        ids.iter()
            .map(|&id| self.index_of(id).ok_or(LayoutError::UnknownNode(id)))
            .collect()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [SimulationNode] {
        &mut self.nodes
    }

    /// Append a node. The caller has already checked `node.id` is new.
    pub(crate) fn push(&mut self, node: SimulationNode) {
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_lookup() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(5), 1.0, 2.0));
        arena.push(SimulationNode::new(NodeId(-1), 3.0, 4.0));

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.index_of(NodeId(-1)), Some(1));
        assert_eq!(arena.get(NodeId(5)).map(|n| n.position()), Some((1.0, 2.0)));
        assert!(arena.get(NodeId(6)).is_none());
    }

    #[test]
    fn test_resolve_unknown() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(1), 0.0, 0.0));
        assert_eq!(arena.resolve(&[NodeId(1)]), Ok(vec![0]));
        assert_eq!(
            arena.resolve(&[NodeId(1), NodeId(9)]),
            Err(LayoutError::UnknownNode(NodeId(9)))
        );
    }
}
