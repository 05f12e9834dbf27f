use super::{collect_ids, Force};
use crate::error::{finite, LayoutResult};
use crate::jiggle::Jiggle;
use crate::node::{NodeArena, NodeId, SimulationNode};

/// Coordinate a [`PositionForce`] pulls toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionTarget {
    /// A fixed coordinate.
    Fixed(f64),
    /// The live midpoint of nodes `a` and `b` on the force's axis, plus `offset`.
    Midpoint { a: NodeId, b: NodeId, offset: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn coord(self, node: &SimulationNode) -> f64 {
        match self {
            Axis::X => node.x,
            Axis::Y => node.y,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ResolvedTarget {
    Fixed(f64),
    Midpoint { a: usize, b: usize, offset: f64 },
}

/// Pulls one coordinate of each node toward a target:
/// `v += (target - coord) * strength * alpha`.
#[derive(Debug, Clone)]
pub struct PositionForce {
    axis: Axis,
    ids: Vec<NodeId>,
    indices: Vec<usize>,
    target: PositionTarget,
    resolved: ResolvedTarget,
    strength: f64,
}

impl PositionForce {
    /// Pull along the x axis.
    pub fn x(ids: impl IntoIterator<Item = NodeId>, target: PositionTarget, strength: f64) -> LayoutResult<Self> {
        Self::new(Axis::X, ids, target, strength)
    }

    /// Pull along the y axis.
    pub fn y(ids: impl IntoIterator<Item = NodeId>, target: PositionTarget, strength: f64) -> LayoutResult<Self> {
        Self::new(Axis::Y, ids, target, strength)
    }

    fn new(
        axis: Axis,
        ids: impl IntoIterator<Item = NodeId>,
        target: PositionTarget,
        strength: f64,
    ) -> LayoutResult<Self> {
        let resolved = match target {
            PositionTarget::Fixed(v) => ResolvedTarget::Fixed(finite("position.target", v)?),
            PositionTarget::Midpoint { offset, .. } => ResolvedTarget::Midpoint {
                a: 0,
                b: 0,
                offset: finite("position.offset", offset)?,
            },
        };
        Ok(Self {
            axis,
            ids: collect_ids(ids),
            indices: Vec::new(),
            target,
            resolved,
            strength: finite("position.strength", strength)?,
        })
    }

    pub fn target(&self) -> PositionTarget {
        self.target
    }
}

impl Force for PositionForce {
    fn initialize(&mut self, nodes: &NodeArena) -> LayoutResult<()> {
        self.indices = nodes.resolve(&self.ids)?;
        if let PositionTarget::Midpoint { a, b, offset } = self.target {
            let ends = nodes.resolve(&[a, b])?;
            self.resolved = ResolvedTarget::Midpoint {
                a: ends[0],
                b: ends[1],
                offset,
            };
        }
        Ok(())
    }

    fn apply(&mut self, nodes: &mut [SimulationNode], alpha: f64, _jiggle: &mut Jiggle) {
        let target = match self.resolved {
            ResolvedTarget::Fixed(v) => v,
            ResolvedTarget::Midpoint { a, b, offset } => {
                (self.axis.coord(&nodes[a]) + self.axis.coord(&nodes[b])) / 2.0 + offset
            }
        };
        let k = self.strength * alpha;
        for &i in &self.indices {
            let node = &mut nodes[i];
            match self.axis {
                Axis::X => node.vx += (target - node.x) * k,
                Axis::Y => node.vy += (target - node.y) * k,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn test_fixed_target() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(1), 10.0, -4.0));
        let mut fx = PositionForce::x([NodeId(1)], PositionTarget::Fixed(0.0), 0.5).unwrap();
        let mut fy = PositionForce::y([NodeId(1)], PositionTarget::Fixed(0.0), 0.5).unwrap();
        fx.initialize(&arena).unwrap();
        fy.initialize(&arena).unwrap();

        let mut jiggle = Jiggle::new(0);
        fx.apply(arena.as_mut_slice(), 0.5, &mut jiggle);
        fy.apply(arena.as_mut_slice(), 0.5, &mut jiggle);

        let node = arena.as_slice()[0];
        assert_eq!(node.vx, -2.5);
        assert_eq!(node.vy, 1.0);
    }

    #[test]
    fn test_midpoint_target_tracks_endpoints() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(1), 0.0, 0.0));
        arena.push(SimulationNode::new(NodeId(2), 100.0, 0.0));
        arena.push(SimulationNode::new(NodeId(-1), 0.0, 0.0));
        let target = PositionTarget::Midpoint {
            a: NodeId(1),
            b: NodeId(2),
            offset: 0.0,
        };
        let mut force = PositionForce::x([NodeId(-1)], target, 1.0).unwrap();
        force.initialize(&arena).unwrap();

        arena.as_mut_slice()[1].x = 40.0;
        force.apply(arena.as_mut_slice(), 1.0, &mut Jiggle::new(0));
        assert_eq!(arena.as_slice()[2].vx, 20.0);
        assert_eq!(arena.as_slice()[0].vx, 0.0);
    }

    #[test]
    fn test_midpoint_unknown_endpoint() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(-1), 0.0, 0.0));
        let target = PositionTarget::Midpoint {
            a: NodeId(1),
            b: NodeId(2),
            offset: 0.0,
        };
        let mut force = PositionForce::y([NodeId(-1)], target, 0.35).unwrap();
        assert_eq!(force.initialize(&arena), Err(LayoutError::UnknownNode(NodeId(1))));
    }
}
