use super::{collect_ids, Force};
use crate::error::{finite, positive, LayoutError, LayoutResult};
use crate::jiggle::Jiggle;
use crate::node::{NodeArena, NodeId, SimulationNode};
use crate::quadtree::QuadTree;

/// Charge between every pair of nodes; negative strength repels.
///
/// Approximated with Barnes-Hut: a cell of width `w` at squared distance `l`
/// acts as one point at its centroid when `w² / θ² < l`.
#[derive(Debug, Clone)]
pub struct ManyBodyForce {
    ids: Vec<NodeId>,
    indices: Vec<usize>,
    strength: f64,
    theta: f64,
    distance_min: f64,
    distance_max: f64,
}

impl ManyBodyForce {
    pub fn new(ids: impl IntoIterator<Item = NodeId>, strength: f64) -> LayoutResult<Self> {
        Ok(Self {
            ids: collect_ids(ids),
            indices: Vec::new(),
            strength: finite("charge.strength", strength)?,
            theta: 0.9,
            distance_min: 1.0,
            distance_max: f64::INFINITY,
        })
    }

    pub fn with_theta(mut self, theta: f64) -> LayoutResult<Self> {
        self.theta = positive("charge.theta", theta)?;
        Ok(self)
    }

    /// Distances below this are clamped, so near neighbours do not explode.
    pub fn with_distance_min(mut self, distance: f64) -> LayoutResult<Self> {
        self.distance_min = positive("charge.distance_min", distance)?;
        Ok(self)
    }

    /// Pairs further apart than this do not interact. May be infinite.
    pub fn with_distance_max(mut self, distance: f64) -> LayoutResult<Self> {
        if distance.is_nan() || distance <= 0.0 {
            return Err(LayoutError::InvalidParameter {
                name: "charge.distance_max",
                value: distance,
            });
        }
        self.distance_max = distance;
        Ok(self)
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl Force for ManyBodyForce {
    fn initialize(&mut self, nodes: &NodeArena) -> LayoutResult<()> {
        self.indices = nodes.resolve(&self.ids)?;
        Ok(())
    }

    fn apply(&mut self, nodes: &mut [SimulationNode], alpha: f64, jiggle: &mut Jiggle) {
        if self.indices.len() < 2 || self.strength == 0.0 {
            return;
        }

        let positions: Vec<(f64, f64)> = self.indices.iter().map(|&i| nodes[i].position()).collect();
        let weights = vec![self.strength; positions.len()];
        let tree = QuadTree::build_weighted(&positions, &weights, QuadTree::DEFAULT_MAX_DEPTH);

        let theta2 = self.theta * self.theta;
        let min2 = self.distance_min * self.distance_min;
        let max2 = self.distance_max * self.distance_max;
        let strength = self.strength;

        for (a, &i) in self.indices.iter().enumerate() {
            let (px, py) = positions[a];
            let (mut dvx, mut dvy) = (0.0, 0.0);

            tree.visit(|cell| {
                let mut x = cell.cx - px;
                let mut y = cell.cy - py;
                let mut l = x * x + y * y;

                // far enough to act as a single body
                if cell.width * cell.width / theta2 < l && !tree.contains_point(cell, a) {
                    if l < max2 {
                        if x == 0.0 {
                            x = jiggle.sample();
                            l += x * x;
                        }
                        if y == 0.0 {
                            y = jiggle.sample();
                            l += y * y;
                        }
                        if l < min2 {
                            l = (min2 * l).sqrt();
                        }
                        dvx += x * cell.weight * alpha / l;
                        dvy += y * cell.weight * alpha / l;
                    }
                    return false;
                }

                if !cell.is_leaf() {
                    return true;
                }

                for &b in tree.points(cell) {
                    if b == a {
                        continue;
                    }
                    let (qx, qy) = tree.point(b);
                    let mut x = qx - px;
                    let mut y = qy - py;
                    let mut l = x * x + y * y;
                    if l >= max2 {
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
                    if l < min2 {
                        l = (min2 * l).sqrt();
                    }
                    dvx += x * strength * alpha / l;
                    dvy += y * strength * alpha / l;
                }
                false
            });

            nodes[i].vx += dvx;
            nodes[i].vy += dvy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize, radius: f64) -> NodeArena {
        let mut arena = NodeArena::new();
        for k in 0..n {
            let t = k as f64 / n as f64 * std::f64::consts::TAU;
            arena.push(SimulationNode::new(NodeId(k as i64), radius * t.cos(), radius * t.sin()));
        }
        arena
    }

    fn ids(arena: &NodeArena) -> Vec<NodeId> {
        arena.iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_pair_repels_symmetrically() {
        let mut arena = ring(2, 5.0);
        let mut force = ManyBodyForce::new(ids(&arena), -30.0).unwrap();
        force.initialize(&arena).unwrap();
        force.apply(arena.as_mut_slice(), 1.0, &mut Jiggle::new(0));

        let n = arena.as_slice();
        // node 0 at (5,0) pushed right, node 1 at (-5,0) pushed left: 30 * 10 / 100
        assert!((n[0].vx - 3.0).abs() < 1e-9);
        assert!((n[1].vx + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_far_cluster_approximates_exact_sum() {
        // a tight cluster of 30 and one distant observer node
        let mut arena = NodeArena::new();
        for k in 0..30 {
            let t = k as f64 * 2.399_963;
            let r = (k as f64).sqrt() * 0.9;
            arena.push(SimulationNode::new(NodeId(k), r * t.cos(), r * t.sin()));
        }
        arena.push(SimulationNode::new(NodeId(100), 300.0, 0.0));
        let mut exact = arena.clone();

        let mut force = ManyBodyForce::new(ids(&arena), -20.0).unwrap();
        force.initialize(&arena).unwrap();
        force.apply(arena.as_mut_slice(), 0.5, &mut Jiggle::new(0));

        // theta this small never approximates
        let mut brute = ManyBodyForce::new(ids(&exact), -20.0).unwrap().with_theta(1e-9).unwrap();
        brute.initialize(&exact).unwrap();
        brute.apply(exact.as_mut_slice(), 0.5, &mut Jiggle::new(0));

        let approx = arena.get(NodeId(100)).unwrap();
        let exact = exact.get(NodeId(100)).unwrap();
        assert!(exact.vx > 0.0);
        let err = (approx.vx - exact.vx).hypot(approx.vy - exact.vy);
        assert!(err / exact.vx.hypot(exact.vy) < 0.01);
    }

    #[test]
    fn test_distance_max_cuts_off() {
        let mut arena = ring(2, 50.0);
        let mut force = ManyBodyForce::new(ids(&arena), -30.0)
            .unwrap()
            .with_distance_max(10.0)
            .unwrap();
        force.initialize(&arena).unwrap();
        force.apply(arena.as_mut_slice(), 1.0, &mut Jiggle::new(0));
        assert!(arena.iter().all(|n| n.vx == 0.0 && n.vy == 0.0));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(ManyBodyForce::new(Vec::new(), f64::NAN).is_err());
        let force = ManyBodyForce::new(Vec::new(), -1.0).unwrap();
        assert!(force.clone().with_theta(0.0).is_err());
        assert!(force.with_distance_max(f64::INFINITY).is_ok());
    }
}
