use super::{collect_ids, Force};
use crate::error::{finite, LayoutResult};
use crate::jiggle::Jiggle;
use crate::node::{NodeArena, NodeId, SimulationNode};

/// Translates its nodes so their centroid sits at `(x, y)`.
///
/// This moves positions directly and is not scaled by alpha, so with the
/// default strength of 1 the centroid lands exactly on the centre.
#[derive(Debug, Clone)]
pub struct CenterForce {
    ids: Vec<NodeId>,
    indices: Vec<usize>,
    x: f64,
    y: f64,
    strength: f64,
}

impl CenterForce {
    pub fn new(ids: impl IntoIterator<Item = NodeId>, x: f64, y: f64) -> LayoutResult<Self> {
        Ok(Self {
            ids: collect_ids(ids),
            indices: Vec::new(),
            x: finite("center.x", x)?,
            y: finite("center.y", y)?,
            strength: 1.0,
        })
    }

    pub fn with_strength(mut self, strength: f64) -> LayoutResult<Self> {
        self.strength = finite("center.strength", strength)?;
        Ok(self)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Force for CenterForce {
    fn initialize(&mut self, nodes: &NodeArena) -> LayoutResult<()> {
        self.indices = nodes.resolve(&self.ids)?;
        Ok(())
    }

    fn apply(&mut self, nodes: &mut [SimulationNode], _alpha: f64, _jiggle: &mut Jiggle) {
        if self.indices.is_empty() {
            return;
        }
        let n = self.indices.len() as f64;
        let (mut sx, mut sy) = (0.0, 0.0);
        for &i in &self.indices {
            sx += nodes[i].x;
            sy += nodes[i].y;
        }
        let dx = (sx / n - self.x) * self.strength;
        let dy = (sy / n - self.y) * self.strength;
        for &i in &self.indices {
            nodes[i].x -= dx;
            nodes[i].y -= dy;
        }
    }
}
