//! Force-directed graph layout.
//!
//! A [`Simulation`] owns a dense arena of [`SimulationNode`]s and an ordered
//! registry of named [`Force`]s. Each [`Simulation::tick`] decays alpha,
//! lets every force add to node velocities, then integrates positions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   add_nodes    ┌───────────────────────────────────────┐
//! │  InputNode   │───────────────▶│              NodeArena                │
//! │ (id, xy?)    │                │  Vec<SimulationNode> + id -> index    │
//! └──────────────┘                └───────────────────┬───────────────────┘
//!                                                     │ &mut [SimulationNode]
//!                                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ ForceRegistry (insertion order = application order)                     │
//! │  center │ link │ collide (QuadTree) │ charge (Barnes-Hut) │ x / y        │
//! └─────────────────────────────────────┬───────────────────────────────────┘
//!                                       ▼
//!                    integrate: x += vx; vx *= velocity_decay
//! ```
//!
//! ## Performance
//!
//! - Many-body and collision forces rebuild a quadtree per tick: O(n log n)
//! - Link force: O(edges)
//! - Center and position forces: O(n)

mod config;
mod error;
pub mod force;
mod jiggle;
mod node;
mod quadtree;
mod simulation;

pub use config::SimulationConfig;
pub use error::{LayoutError, LayoutResult};
pub use force::{
    CenterForce, CollideForce, Force, ForceRegistry, Link, LinkForce, ManyBodyForce,
    PositionForce, PositionTarget,
};
pub use jiggle::Jiggle;
pub use node::{InputNode, NodeArena, NodeId, SimulationNode};
pub use quadtree::{Cell, QuadTree};
pub use simulation::{Simulation, TickStats};
