use std::collections::{HashMap, HashSet};

use super::{collect_ids, Force};
use crate::error::{finite, positive, LayoutError, LayoutResult};
use crate::jiggle::Jiggle;
use crate::node::{NodeArena, NodeId, SimulationNode};

/// An undirected spring between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
}

impl Link {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedLink {
    source: usize,
    target: usize,
    strength: f64,
    /// Share of the correction applied to the target.
    bias: f64,
}

/// Springs with rest length `distance` along each link.
///
/// Per-link strength defaults to `1 / min(degree(source), degree(target))`.
/// The correction is split by degree so the better-connected endpoint moves
/// less. Self-loops carry no force.
#[derive(Debug, Clone)]
pub struct LinkForce {
    ids: Vec<NodeId>,
    links: Vec<Link>,
    distance: f64,
    strength: Option<f64>,
    resolved: Vec<ResolvedLink>,
}

impl LinkForce {
    pub fn new(
        ids: impl IntoIterator<Item = NodeId>,
        links: impl IntoIterator<Item = Link>,
        distance: f64,
    ) -> LayoutResult<Self> {
        Ok(Self {
            ids: collect_ids(ids),
            links: links.into_iter().collect(),
            distance: positive("link.distance", distance)?,
            strength: None,
            resolved: Vec::new(),
        })
    }

    /// Use one strength for every link instead of the degree-based default.
    pub fn with_strength(mut self, strength: f64) -> LayoutResult<Self> {
        self.strength = Some(finite("link.strength", strength)?);
        Ok(self)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Force for LinkForce {
    fn initialize(&mut self, nodes: &NodeArena) -> LayoutResult<()> {
        let members: HashSet<usize> = nodes.resolve(&self.ids)?.into_iter().collect();
        let member = |id: NodeId| {
            nodes
                .index_of(id)
                .filter(|i| members.contains(i))
                .ok_or(LayoutError::UnknownNode(id))
        };

        let mut endpoints = Vec::with_capacity(self.links.len());
        let mut degree: HashMap<usize, usize> = HashMap::new();
        for link in &self.links {
            let source = member(link.source)?;
            let target = member(link.target)?;
            if source == target {
                continue;
            }
            *degree.entry(source).or_default() += 1;
            *degree.entry(target).or_default() += 1;
            endpoints.push((source, target));
        }

        self.resolved = endpoints
            .into_iter()
            .map(|(source, target)| {
                let ds = degree[&source] as f64;
                let dt = degree[&target] as f64;
                ResolvedLink {
                    source,
                    target,
                    strength: self.strength.unwrap_or(1.0 / ds.min(dt)),
                    bias: ds / (ds + dt),
                }
            })
            .collect();
        Ok(())
    }

    fn apply(&mut self, nodes: &mut [SimulationNode], alpha: f64, jiggle: &mut Jiggle) {
        for link in &self.resolved {
            let s = nodes[link.source];
            let t = nodes[link.target];

            // predicted positions
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = jiggle.sample();
            }
            if y == 0.0 {
                y = jiggle.sample();
            }

            let l = (x * x + y * y).sqrt();
            let k = (l - self.distance) / l * alpha * link.strength;
            x *= k;
            y *= k;

            nodes[link.target].vx -= x * link.bias;
            nodes[link.target].vy -= y * link.bias;
            nodes[link.source].vx += x * (1.0 - link.bias);
            nodes[link.source].vy += y * (1.0 - link.bias);
        }
    }
}
