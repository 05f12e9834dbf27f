//! The simulation engine.

use std::collections::HashSet;
use std::f64::consts::PI;

use tracing::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::{finite, unit_interval, LayoutError, LayoutResult};
use crate::force::{Force, ForceRegistry};
use crate::jiggle::Jiggle;
use crate::node::{InputNode, NodeArena, NodeId, SimulationNode};

/// Summary of one [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStats {
    /// Ticks run since the last clear, including this one.
    pub iteration: u64,
    /// Alpha used for this tick.
    pub alpha: f64,
    /// Sum of node movement lengths this tick.
    pub displacement: f64,
    /// Whether alpha has dropped below alpha-min.
    pub converged: bool,
}

/// A force-directed simulation over an arena of nodes.
///
/// Iteration order is insertion order everywhere, so a given seed, node
/// order and force order always produce the same layout.
pub struct Simulation {
    nodes: NodeArena,
    forces: ForceRegistry,
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
    initial_radius: f64,
    seed: u64,
    jiggle: Jiggle,
    iteration: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Create an empty simulation with default parameters.
    pub fn new() -> Self {
        Self::from_valid_config(&SimulationConfig::default())
    }

    /// Create an empty simulation, validating `config` first.
    pub fn with_config(config: &SimulationConfig) -> LayoutResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &SimulationConfig) -> Self {
        Self {
            nodes: NodeArena::new(),
            forces: ForceRegistry::new(),
            alpha: config.alpha,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            alpha_target: config.alpha_target,
            velocity_decay: config.velocity_decay,
            initial_radius: config.initial_radius,
            seed: config.seed,
            jiggle: Jiggle::new(config.seed),
            iteration: 0,
        }
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Register a batch of nodes.
    ///
    /// The batch is checked as a whole first: any id repeated within it, or
    /// already in the simulation, fails with [`LayoutError::DuplicateNode`]
    /// and nothing is added.
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = InputNode>) -> LayoutResult<Vec<NodeId>> {
        let inputs: Vec<InputNode> = nodes.into_iter().collect();

        let mut seen = HashSet::with_capacity(inputs.len());
        for input in &inputs {
            if self.nodes.contains(input.id) || !seen.insert(input.id) {
                return Err(LayoutError::DuplicateNode(input.id));
            }
        }

        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            let (x, y) = match input.position {
                Some(position) => position,
                None => self.initial_position(self.nodes.len()),
            };
            self.nodes.push(SimulationNode::new(input.id, x, y));
            ids.push(input.id);
        }

        debug!(added = ids.len(), total = self.nodes.len(), "Added simulation nodes");
        Ok(ids)
    }

    /// Phyllotaxis spiral position for the `index`-th node, slightly jittered.
    fn initial_position(&mut self, index: usize) -> (f64, f64) {
        let radius = self.initial_radius * (0.5 + index as f64).sqrt();
        let angle = index as f64 * PI * (3.0 - 5.0_f64.sqrt());
        let jitter = self.initial_radius * 0.1;
        (
            radius * angle.cos() + self.jiggle.offset(jitter),
            radius * angle.sin() + self.jiggle.offset(jitter),
        )
    }

    /// Read-only view of every node.
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&SimulationNode> {
        self.nodes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Forces
    // =========================================================================

    /// Register `force` under `name`, replacing any force already there.
    ///
    /// The force is initialized against the current nodes before it is
    /// stored; on error the registry is unchanged.
    pub fn set_force(&mut self, name: impl Into<String>, mut force: impl Force + 'static) -> LayoutResult<&mut Self> {
        let name = name.into();
        force.initialize(&self.nodes)?;
        let replaced = self.forces.insert(name.clone(), Box::new(force)).is_some();
        debug!(force = %name, replaced, "Registered force");
        Ok(self)
    }

    /// Unregister the force under `name`; later forces keep their order.
    pub fn remove_force(&mut self, name: &str) -> Option<Box<dyn Force>> {
        self.forces.remove(name)
    }

    pub fn force(&self, name: &str) -> Option<&dyn Force> {
        self.forces.get(name)
    }

    /// Registered force names in application order.
    pub fn force_names(&self) -> Vec<&str> {
        self.forces.names().collect()
    }

    // =========================================================================
    // Alpha schedule
    // =========================================================================

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) -> &mut Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha_min(&self) -> f64 {
        self.alpha_min
    }

    pub fn set_alpha_min(&mut self, alpha_min: f64) -> LayoutResult<&mut Self> {
        self.alpha_min = finite("alpha_min", alpha_min)?;
        Ok(self)
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, alpha_target: f64) -> &mut Self {
        self.alpha_target = alpha_target;
        self
    }

    pub fn alpha_decay(&self) -> f64 {
        self.alpha_decay
    }

    /// Fraction of the gap to alpha-target closed each tick, in `[0, 1]`.
    pub fn set_alpha_decay(&mut self, alpha_decay: f64) -> LayoutResult<&mut Self> {
        self.alpha_decay = unit_interval("alpha_decay", alpha_decay)?;
        Ok(self)
    }

    pub fn velocity_decay(&self) -> f64 {
        self.velocity_decay
    }

    /// Fraction of velocity kept after each tick, in `[0, 1]`.
    pub fn set_velocity_decay(&mut self, velocity_decay: f64) -> LayoutResult<&mut Self> {
        self.velocity_decay = unit_interval("velocity_decay", velocity_decay)?;
        Ok(self)
    }

    pub fn is_converged(&self) -> bool {
        self.alpha < self.alpha_min
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance one step: decay alpha, apply forces in order, integrate.
    ///
    /// Ticking after convergence is allowed; stopping is up to the caller.
    pub fn tick(&mut self) -> TickStats {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.iteration += 1;
        let alpha = self.alpha;

        let nodes = self.nodes.as_mut_slice();
        for force in self.forces.iter_mut() {
            force.apply(nodes, alpha, &mut self.jiggle);
        }

        let mut displacement = 0.0;
        for node in nodes.iter_mut() {
            node.x += node.vx;
            node.y += node.vy;
            displacement += node.vx.hypot(node.vy);
            node.vx *= self.velocity_decay;
            node.vy *= self.velocity_decay;
        }

        let stats = TickStats {
            iteration: self.iteration,
            alpha,
            displacement,
            converged: alpha < self.alpha_min,
        };
        trace!(iteration = stats.iteration, alpha, displacement, "Tick");
        stats
    }

    /// Drop every node and force and rewind the iteration count and jiggle.
    ///
    /// Alpha is left alone; callers restarting a layout set it explicitly.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.forces.clear();
        self.iteration = 0;
        self.jiggle = Jiggle::new(self.seed);
        info!("Cleared simulation");
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("nodes", &self.nodes.len())
            .field("forces", &self.forces)
            .field("alpha", &self.alpha)
            .field("alpha_min", &self.alpha_min)
            .field("iteration", &self.iteration)
            .finish()
    }
}
