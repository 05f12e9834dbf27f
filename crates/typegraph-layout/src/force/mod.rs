//! Force abstractions and the built-in forces.
//!
//! A force is built over an explicit set of node ids. Registration with
//! [`Simulation::set_force`](crate::Simulation::set_force) calls
//! [`Force::initialize`], which resolves those ids to arena indices once;
//! every tick then calls [`Force::apply`] with the whole node slice.

mod center;
mod collide;
mod link;
mod many_body;
mod position;

pub use center::CenterForce;
pub use collide::CollideForce;
pub use link::{Link, LinkForce};
pub use many_body::ManyBodyForce;
pub use position::{PositionForce, PositionTarget};

use crate::error::LayoutResult;
use crate::jiggle::Jiggle;
use crate::node::{NodeArena, NodeId, SimulationNode};

/// A pluggable velocity mutator.
pub trait Force: Send {
    /// Resolve node ids against the arena. Fails on unknown ids.
    fn initialize(&mut self, nodes: &NodeArena) -> LayoutResult<()>;

    /// Add this tick's velocity (or position) deltas to `nodes`.
    fn apply(&mut self, nodes: &mut [SimulationNode], alpha: f64, jiggle: &mut Jiggle);
}

/// Named forces, applied in insertion order.
///
/// Replacing a name keeps its original slot.
#[derive(Default)]
pub struct ForceRegistry {
    entries: Vec<(String, Box<dyn Force>)>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `force` under `name`, returning the force it replaced.
    pub fn insert(&mut self, name: impl Into<String>, force: Box<dyn Force>) -> Option<Box<dyn Force>> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, force)),
            None => {
                self.entries.push((name, force));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Force>> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Force> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Force names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Force>> {
        self.entries.iter_mut().map(|(_, f)| f)
    }
}

impl std::fmt::Debug for ForceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

pub(crate) fn collect_ids(ids: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
    ids.into_iter().collect()
}
