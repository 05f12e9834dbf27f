//! Keeps a [`Simulation`] in step with a growing [`GraphState`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};
use typegraph_core::{EdgeId, GraphBatch, VertexId};
use typegraph_geometry::Point;
use typegraph_layout::{
    CenterForce, CollideForce, InputNode, Jiggle, Link, LinkForce, ManyBodyForce, NodeId,
    PositionForce, PositionTarget, Simulation, TickStats,
};

use crate::config::LayoutConfig;
use crate::error::{VizError, VizResult};
use crate::state::{node_id, BandState, EdgeState, GraphState, VertexState};

const CENTER: &str = "center";
const COLLIDE: &str = "collide";
const CHARGE: &str = "charge";
const LINK: &str = "link";
const POSITION_X: &str = "x";
const POSITION_Y: &str = "y";
const BAND_COLLIDE: &str = "band_collide";

/// A force layout over query-result vertices and edges.
///
/// Vertices become simulation nodes with the same id. When two or more edges
/// join the same pair of vertices (a band), each gets an extra band node with
/// a negative id, held near the edge midpoint, that the edge is drawn through.
pub struct VisualiserSimulation {
    state: GraphState,
    simulation: Simulation,
    config: LayoutConfig,
    started: bool,
    charge_strength: f64,
    bands_by_endpoints: HashMap<(VertexId, VertexId), Vec<EdgeId>>,
    next_band_node: i64,
    jiggle: Jiggle,
}

impl VisualiserSimulation {
    pub fn new(config: LayoutConfig) -> VizResult<Self> {
        config.validate()?;
        Ok(Self {
            state: GraphState::new(),
            simulation: Simulation::with_config(&config.simulation)?,
            charge_strength: config.initial_charge,
            jiggle: Jiggle::new(config.simulation.seed),
            config,
            started: false,
            bands_by_endpoints: HashMap::new(),
            next_band_node: -1,
        })
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True when there is nothing to lay out.
    pub fn is_empty(&self) -> bool {
        self.simulation.is_empty()
    }

    pub fn alpha(&self) -> f64 {
        self.simulation.alpha()
    }

    pub fn alpha_min(&self) -> f64 {
        self.simulation.alpha_min()
    }

    /// Start a fresh layout of whatever the graph state already holds.
    pub fn init(&mut self) -> VizResult<()> {
        let (vertices, edges, explanations) = self.state.take();
        self.reset();

        let all: Vec<NodeId> = Vec::new();
        self.simulation
            .set_force(CENTER, CenterForce::new(all.clone(), self.config.center_x, self.config.center_y)?)?
            .set_force(COLLIDE, CollideForce::new(all.clone(), self.config.collide_radius)?)?
            .set_force(CHARGE, ManyBodyForce::new(all.clone(), self.charge_strength)?)?
            .set_force(
                POSITION_X,
                PositionForce::x(all.clone(), PositionTarget::Fixed(self.config.center_x), self.config.position_strength)?,
            )?
            .set_force(
                POSITION_Y,
                PositionForce::y(all.clone(), PositionTarget::Fixed(self.config.center_y), self.config.position_strength)?,
            )?
            .set_force(BAND_COLLIDE, CollideForce::new(all, self.config.band_collide_radius)?)?;

        let alpha_min = self.config.simulation.alpha_min;
        self.simulation
            .set_alpha(1.0)
            .set_alpha_target(0.0)
            .set_alpha_min(alpha_min)?;
        self.started = true;

        if !vertices.is_empty() || !edges.is_empty() {
            self.apply(vertices, edges)?;
        }
        for explanation in explanations {
            self.state.push_explanation(explanation);
        }
        info!(vertices = self.state.vertices().len(), edges = self.state.edges().len(), "Initialized layout");
        Ok(())
    }

    /// Drop the graph and the layout.
    pub fn clear(&mut self) {
        self.state.clear();
        self.reset();
        info!("Cleared layout");
    }

    fn reset(&mut self) {
        self.simulation.clear();
        self.started = false;
        self.charge_strength = self.config.initial_charge;
        self.bands_by_endpoints.clear();
        self.next_band_node = -1;
        self.jiggle = Jiggle::new(self.config.simulation.seed);
    }

    /// Add a batch of vertices, edges and vertex explanations.
    ///
    /// The batch is checked before anything changes: vertex and edge ids must
    /// be new, and every edge endpoint and explained vertex must be a known
    /// vertex or one in the batch. Before [`init`](Self::init) the batch is
    /// only recorded.
    pub fn ingest(&mut self, batch: GraphBatch) -> VizResult<()> {
        self.validate(&batch)?;
        let vertices: Vec<VertexState> = batch.vertices.into_iter().map(VertexState::from).collect();
        let edges: Vec<EdgeState> = batch.edges.into_iter().map(EdgeState::from).collect();
        let explanations = batch.explanations;

        if !self.started {
            debug!(
                vertices = vertices.len(),
                edges = edges.len(),
                explanations = explanations.len(),
                "Recorded batch before init"
            );
            for vertex in vertices {
                self.state.push_vertex(vertex);
            }
            for edge in edges {
                self.state.push_edge(edge);
            }
        } else {
            self.apply(vertices, edges)?;
        }

        for explanation in explanations {
            self.state.push_explanation(explanation);
        }
        Ok(())
    }

    fn validate(&self, batch: &GraphBatch) -> VizResult<()> {
        let mut vertex_ids = HashSet::with_capacity(batch.vertices.len());
        for vertex in &batch.vertices {
            if self.state.contains_vertex(vertex.id)
                || self.simulation.nodes().contains(node_id(vertex.id))
                || !vertex_ids.insert(vertex.id)
            {
                return Err(VizError::DuplicateVertex(vertex.id));
            }
        }

        let mut edge_ids = HashSet::with_capacity(batch.edges.len());
        for edge in &batch.edges {
            if self.state.contains_edge(edge.id) || !edge_ids.insert(edge.id) {
                return Err(VizError::DuplicateEdge(edge.id));
            }
            for vertex in [edge.source, edge.target] {
                if !self.state.contains_vertex(vertex) && !vertex_ids.contains(&vertex) {
                    return Err(VizError::UnknownVertex { edge: edge.id, vertex });
                }
            }
        }

        for explained in &batch.explanations {
            if !self.state.contains_vertex(explained.vertex) && !vertex_ids.contains(&explained.vertex) {
                return Err(VizError::UnknownExplainedVertex {
                    explanation: explained.explanation,
                    vertex: explained.vertex,
                });
            }
        }
        Ok(())
    }

    /// Feed already-validated vertices and edges into a started layout.
    fn apply(&mut self, vertices: Vec<VertexState>, edges: Vec<EdgeState>) -> VizResult<()> {
        let new_vertices = vertices.len();
        let new_edges = edges.len();

        if !vertices.is_empty() {
            self.simulation
                .add_nodes(vertices.iter().map(|v| InputNode::new(v.node_id())))?;
            for mut vertex in vertices {
                if let Some(node) = self.simulation.node(vertex.node_id()) {
                    vertex.position = Point::new(node.x, node.y);
                }
                self.state.push_vertex(vertex);
            }
        }

        let new_edge_ids: Vec<EdgeId> = edges.iter().map(|e| e.id).collect();
        for edge in edges {
            self.state.push_edge(edge);
        }

        let vertex_nodes: Vec<NodeId> = self.state.vertices().iter().map(|v| v.node_id()).collect();
        if new_edges > 0 {
            let links: Vec<Link> = self
                .state
                .edges()
                .iter()
                .map(|e| Link::new(node_id(e.source), node_id(e.target)))
                .collect();
            self.simulation.set_force(
                LINK,
                LinkForce::new(vertex_nodes.clone(), links, self.config.link_distance)?
                    .with_strength(self.config.link_strength)?,
            )?;
            self.charge_strength = self.config.base_charge * self.state.edges().len() as f64
                / (self.state.vertices().len() + 1) as f64;
        }

        for edge in new_edge_ids {
            self.add_to_band(edge)?;
        }

        self.register_graph_forces(vertex_nodes)?;

        let alpha = self.simulation.alpha().max(self.config.reheat_alpha);
        self.simulation.set_alpha(alpha);
        self.sync_positions()?;

        debug!(
            vertices = new_vertices,
            edges = new_edges,
            bands = self.state.bands().len(),
            alpha,
            "Ingested batch"
        );
        Ok(())
    }

    /// Forces whose node sets grow with the graph.
    fn register_graph_forces(&mut self, vertex_nodes: Vec<NodeId>) -> VizResult<()> {
        let all_nodes: Vec<NodeId> = self.simulation.nodes().iter().map(|n| n.id).collect();
        let band_nodes: Vec<NodeId> = self.state.bands().iter().map(|b| b.node).collect();
        let config = &self.config;

        self.simulation
            .set_force(CENTER, CenterForce::new(all_nodes, config.center_x, config.center_y)?)?
            .set_force(COLLIDE, CollideForce::new(vertex_nodes.clone(), config.collide_radius)?)?
            .set_force(CHARGE, ManyBodyForce::new(vertex_nodes.clone(), self.charge_strength)?)?
            .set_force(
                POSITION_X,
                PositionForce::x(vertex_nodes.clone(), PositionTarget::Fixed(config.center_x), config.position_strength)?,
            )?
            .set_force(
                POSITION_Y,
                PositionForce::y(vertex_nodes, PositionTarget::Fixed(config.center_y), config.position_strength)?,
            )?
            .set_force(BAND_COLLIDE, CollideForce::new(band_nodes, config.band_collide_radius)?)?;
        Ok(())
    }

    /// Put `edge` in the band for its endpoints, creating band nodes for every
    /// member once the band has two or more edges.
    fn add_to_band(&mut self, edge: EdgeId) -> VizResult<()> {
        let Some(endpoints) = self.state.edge(edge).map(|e| e.unordered_endpoints()) else {
            return Ok(());
        };
        let band = self.bands_by_endpoints.entry(endpoints).or_default();
        band.push(edge);
        if band.len() < 2 {
            return Ok(());
        }

        let members = band.clone();
        for member in members {
            if self.state.band(member).is_none() {
                self.add_band_node(member)?;
            }
        }
        Ok(())
    }

    fn add_band_node(&mut self, edge: EdgeId) -> VizResult<()> {
        let Some((source, target)) = self.state.edge(edge).map(|e| (node_id(e.source), node_id(e.target))) else {
            return Ok(());
        };
        let a = self.simulation.node(source).ok_or(VizError::MissingNode(source))?;
        let b = self.simulation.node(target).ok_or(VizError::MissingNode(target))?;
        let (mx, my) = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);

        while self.simulation.nodes().contains(NodeId(self.next_band_node)) {
            self.next_band_node -= 1;
        }
        let id = NodeId(self.next_band_node);
        self.next_band_node -= 1;

        self.simulation.add_nodes([InputNode::at(id, mx, my)])?;
        let offset = self.jiggle.sample();
        let strength = self.config.band_strength;
        let target_at = PositionTarget::Midpoint { a: source, b: target, offset };
        self.simulation
            .set_force(format!("x_{}", id), PositionForce::x([id], target_at, strength)?)?
            .set_force(format!("y_{}", id), PositionForce::y([id], target_at, strength)?)?;

        self.state.push_band(BandState {
            edge,
            node: id,
            position: Point::new(mx, my),
        });
        Ok(())
    }

    /// Advance the layout one tick and copy positions into the graph state.
    pub fn tick(&mut self) -> VizResult<TickStats> {
        let stats = self.simulation.tick();
        self.sync_positions()?;
        Ok(stats)
    }

    fn sync_positions(&mut self) -> VizResult<()> {
        let simulation = &self.simulation;
        let position_of = |id: NodeId| {
            simulation
                .node(id)
                .map(|n| Point::new(n.x, n.y))
                .ok_or(VizError::MissingNode(id))
        };

        let mut positions = HashMap::with_capacity(self.state.vertices().len());
        for vertex in self.state.vertices_mut() {
            vertex.position = position_of(vertex.node_id())?;
            positions.insert(vertex.id, vertex.position);
        }
        for edge in self.state.edges_mut() {
            edge.source_position = positions
                .get(&edge.source)
                .copied()
                .ok_or(VizError::MissingNode(node_id(edge.source)))?;
            edge.target_position = positions
                .get(&edge.target)
                .copied()
                .ok_or(VizError::MissingNode(node_id(edge.target)))?;
        }
        for band in self.state.bands_mut() {
            band.position = position_of(band.node)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for VisualiserSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualiserSimulation")
            .field("vertices", &self.state.vertices().len())
            .field("edges", &self.state.edges().len())
            .field("bands", &self.state.bands().len())
            .field("started", &self.started)
            .field("simulation", &self.simulation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegraph_core::{EdgeData, VertexData, VertexEncoding, VertexExplanation};

    fn vertex(id: i64) -> VertexData {
        VertexData::new(id, VertexEncoding::Entity, format!("person {}", id), 100.0, 35.0)
    }

    fn started() -> VisualiserSimulation {
        let mut sim = VisualiserSimulation::new(LayoutConfig::default()).unwrap();
        sim.init().unwrap();
        sim
    }

    #[test]
    fn test_init_installs_forces() {
        let sim = started();
        assert!(sim.is_started());
        assert!(sim.is_empty());
        assert_eq!(
            sim.simulation().force_names(),
            vec!["center", "collide", "charge", "x", "y", "band_collide"]
        );
        assert_eq!(sim.alpha(), 1.0);
        assert_eq!(sim.alpha_min(), 0.01);
    }

    #[test]
    fn test_ingest_adds_nodes_and_link() {
        let mut sim = started();
        let batch = GraphBatch::new(vec![vertex(1), vertex(2)], vec![EdgeData::new(10, 1, 2, "knows")]);
        sim.ingest(batch).unwrap();

        assert_eq!(sim.simulation().nodes().len(), 2);
        assert!(sim.simulation().force("link").is_some());
        assert!(sim.state().bands().is_empty());

        let edge = &sim.state().edges()[0];
        assert_eq!(Some(edge.source_position), sim.state().vertex(VertexId(1)).map(|v| v.position));
    }

    #[test]
    fn test_invalid_batch_changes_nothing() {
        let mut sim = started();
        sim.ingest(GraphBatch::new(vec![vertex(1)], Vec::new())).unwrap();

        let dangling = GraphBatch::new(vec![vertex(2)], vec![EdgeData::new(10, 2, 3, "knows")]);
        assert!(matches!(
            sim.ingest(dangling),
            Err(VizError::UnknownVertex { vertex: VertexId(3), .. })
        ));
        assert!(matches!(
            sim.ingest(GraphBatch::new(vec![vertex(1)], Vec::new())),
            Err(VizError::DuplicateVertex(VertexId(1)))
        ));
        let repeated_edge = GraphBatch::new(
            vec![vertex(4)],
            vec![EdgeData::new(11, 1, 4, "a"), EdgeData::new(11, 4, 1, "b")],
        );
        assert!(matches!(sim.ingest(repeated_edge), Err(VizError::DuplicateEdge(EdgeId(11)))));

        assert_eq!(sim.state().vertices().len(), 1);
        assert!(sim.state().edges().is_empty());
        assert_eq!(sim.simulation().nodes().len(), 1);
    }

    #[test]
    fn test_explanations_recorded_for_known_and_incoming_vertices() {
        let mut sim = started();
        sim.ingest(GraphBatch::new(vec![vertex(1)], Vec::new())).unwrap();

        let batch = GraphBatch::new(vec![vertex(2)], Vec::new()).with_explanations(vec![
            VertexExplanation::new(1, 5),
            VertexExplanation::new(2, 5),
            VertexExplanation::new(2, 6),
        ]);
        sim.ingest(batch).unwrap();

        assert_eq!(sim.state().vertex_explanations().len(), 3);
        assert_eq!(sim.state().explanations_of(VertexId(2)), &[5, 6]);
        assert_eq!(sim.state().explanations_of(VertexId(1)), &[5]);
    }

    #[test]
    fn test_explanation_of_unknown_vertex_changes_nothing() {
        let mut sim = started();
        sim.ingest(GraphBatch::new(vec![vertex(1)], Vec::new())).unwrap();

        let batch = GraphBatch::new(vec![vertex(2)], vec![EdgeData::new(10, 1, 2, "a")])
            .with_explanations(vec![VertexExplanation::new(2, 5), VertexExplanation::new(9, 5)]);
        assert!(matches!(
            sim.ingest(batch),
            Err(VizError::UnknownExplainedVertex { explanation: 5, vertex: VertexId(9) })
        ));

        assert_eq!(sim.state().vertices().len(), 1);
        assert!(sim.state().edges().is_empty());
        assert!(sim.state().vertex_explanations().is_empty());
        assert_eq!(sim.simulation().nodes().len(), 1);
    }

    #[test]
    fn test_init_keeps_explanations_recorded_before_it() {
        let mut sim = VisualiserSimulation::new(LayoutConfig::default()).unwrap();
        sim.ingest(
            GraphBatch::new(vec![vertex(1)], Vec::new()).with_explanations(vec![VertexExplanation::new(1, 3)]),
        )
        .unwrap();
        sim.init().unwrap();
        assert_eq!(sim.state().explanations_of(VertexId(1)), &[3]);

        sim.clear();
        assert!(sim.state().vertex_explanations().is_empty());
    }

    #[test]
    fn test_parallel_edges_get_band_nodes() {
        let mut sim = started();
        sim.ingest(GraphBatch::new(
            vec![vertex(1), vertex(2)],
            vec![EdgeData::new(10, 1, 2, "a")],
        ))
        .unwrap();
        assert!(sim.state().bands().is_empty());

        sim.ingest(GraphBatch::new(Vec::new(), vec![EdgeData::new(11, 2, 1, "b")]))
            .unwrap();
        let bands = sim.state().bands();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].node, NodeId(-1));
        assert_eq!(bands[1].node, NodeId(-2));
        assert!(sim.state().band(EdgeId(10)).is_some());

        let names = sim.simulation().force_names();
        assert!(names.contains(&"x_-1") && names.contains(&"y_-2"));
        assert_eq!(sim.simulation().nodes().len(), 4);
    }

    #[test]
    fn test_batch_before_init_is_laid_out_by_init() {
        let mut sim = VisualiserSimulation::new(LayoutConfig::default()).unwrap();
        sim.ingest(GraphBatch::new(vec![vertex(1), vertex(2)], vec![EdgeData::new(10, 1, 2, "a")]))
            .unwrap();
        assert!(sim.is_empty());
        assert_eq!(sim.state().vertices().len(), 2);

        sim.init().unwrap();
        assert_eq!(sim.simulation().nodes().len(), 2);
        assert_eq!(sim.state().edges().len(), 1);
        assert!(sim.simulation().force("link").is_some());
    }

    #[test]
    fn test_charge_follows_edge_ratio() {
        let mut sim = started();
        sim.ingest(GraphBatch::new(
            vec![vertex(1), vertex(2), vertex(3)],
            vec![EdgeData::new(10, 1, 2, "a"), EdgeData::new(11, 2, 3, "b")],
        ))
        .unwrap();
        // -600 * 2 / (3 + 1)
        assert_eq!(sim.charge_strength, -300.0);
    }

    #[test]
    fn test_reheat_and_clear() {
        let mut sim = started();
        sim.ingest(GraphBatch::new(vec![vertex(1), vertex(2)], Vec::new()))
            .unwrap();
        while sim.alpha() >= sim.alpha_min() {
            sim.tick().unwrap();
        }
        sim.ingest(GraphBatch::new(vec![vertex(3)], Vec::new())).unwrap();
        assert_eq!(sim.alpha(), 0.3);

        sim.clear();
        assert!(!sim.is_started());
        assert!(sim.is_empty());
        assert!(sim.state().vertices().is_empty());
    }
}
