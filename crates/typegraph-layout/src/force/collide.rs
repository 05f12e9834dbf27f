use super::{collect_ids, Force};
use crate::error::{finite, positive, LayoutResult};
use crate::jiggle::Jiggle;
use crate::node::{NodeArena, NodeId, SimulationNode};
use crate::quadtree::QuadTree;

/// Treats nodes as circles of `radius` and pushes overlapping pairs apart.
///
/// Works on predicted positions `x + vx` and is not scaled by alpha. Each
/// overlap is resolved by `strength` (default 1), split equally between the
/// pair. Candidate pairs come from a quadtree, pruned by cell bounds.
#[derive(Debug, Clone)]
pub struct CollideForce {
    ids: Vec<NodeId>,
    indices: Vec<usize>,
    radius: f64,
    strength: f64,
}

impl CollideForce {
    pub fn new(ids: impl IntoIterator<Item = NodeId>, radius: f64) -> LayoutResult<Self> {
        Ok(Self {
            ids: collect_ids(ids),
            indices: Vec::new(),
            radius: positive("collide.radius", radius)?,
            strength: 1.0,
        })
    }

    pub fn with_strength(mut self, strength: f64) -> LayoutResult<Self> {
        self.strength = finite("collide.strength", strength)?;
        Ok(self)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Force for CollideForce {
    fn initialize(&mut self, nodes: &NodeArena) -> LayoutResult<()> {
        self.indices = nodes.resolve(&self.ids)?;
        Ok(())
    }

    fn apply(&mut self, nodes: &mut [SimulationNode], _alpha: f64, jiggle: &mut Jiggle) {
        if self.indices.len() < 2 {
            return;
        }

        let predicted: Vec<(f64, f64)> = self
            .indices
            .iter()
            .map(|&i| (nodes[i].x + nodes[i].vx, nodes[i].y + nodes[i].vy))
            .collect();
        let tree = QuadTree::build(&predicted, QuadTree::DEFAULT_MAX_DEPTH);

        let r = self.radius * 2.0;
        let r2 = r * r;
        let strength = self.strength;
        let indices = &self.indices;

        for (a, &i) in indices.iter().enumerate() {
            let xi = nodes[i].x + nodes[i].vx;
            let yi = nodes[i].y + nodes[i].vy;

            tree.visit(|cell| {
                if !cell.is_leaf() {
                    return !(cell.x0 > xi + r || cell.x1() < xi - r || cell.y0 > yi + r || cell.y1() < yi - r);
                }
                // each pair once
                for &b in tree.points(cell) {
                    if b <= a {
                        continue;
                    }
                    let j = indices[b];
                    let mut x = xi - nodes[j].x - nodes[j].vx;
                    let mut y = yi - nodes[j].y - nodes[j].vy;
                    let mut l = x * x + y * y;
                    if l >= r2 {
                        continue;
                    }
                    if x == 0.0 {
                        x = jiggle.sample();
                        l += x * x;
                    }
                    if y == 0.0 {
                        y = jiggle.sample();
                        l += y * y;
                    }
                    let dist = l.sqrt();
                    let k = (r - dist) / dist * strength * 0.5;
                    x *= k;
                    y *= k;
                    nodes[i].vx += x;
                    nodes[i].vy += y;
                    nodes[j].vx -= x;
                    nodes[j].vy -= y;
                }
                false
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_pair_is_separated() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(1), 0.0, 0.0));
        arena.push(SimulationNode::new(NodeId(2), 4.0, 0.0));
        let mut force = CollideForce::new([NodeId(1), NodeId(2)], 5.0).unwrap();
        force.initialize(&arena).unwrap();
        force.apply(arena.as_mut_slice(), 0.0, &mut Jiggle::new(0));

        let n = arena.as_slice();
        let (x1, x2) = (n[0].x + n[0].vx, n[1].x + n[1].vx);
        assert!((x2 - x1 - 10.0).abs() < 1e-6);
        // split equally
        assert!((n[0].vx + n[1].vx).abs() < 1e-9);
    }

    #[test]
    fn test_distant_pair_untouched() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(1), 0.0, 0.0));
        arena.push(SimulationNode::new(NodeId(2), 50.0, 50.0));
        let mut force = CollideForce::new([NodeId(1), NodeId(2)], 5.0).unwrap();
        force.initialize(&arena).unwrap();
        force.apply(arena.as_mut_slice(), 1.0, &mut Jiggle::new(0));
        assert!(arena.iter().all(|n| n.vx == 0.0 && n.vy == 0.0));
    }

    #[test]
    fn test_coincident_pair_gets_direction() {
        let mut arena = NodeArena::new();
        arena.push(SimulationNode::new(NodeId(1), 3.0, 3.0));
        arena.push(SimulationNode::new(NodeId(2), 3.0, 3.0));
        let mut force = CollideForce::new([NodeId(1), NodeId(2)], 1.0).unwrap();
        force.initialize(&arena).unwrap();
        force.apply(arena.as_mut_slice(), 1.0, &mut Jiggle::new(3));

        let n = arena.as_slice();
        assert!(n.iter().all(|n| n.vx.is_finite() && n.vy.is_finite()));
        assert!(n[0].vx != 0.0 || n[0].vy != 0.0);
    }
}
