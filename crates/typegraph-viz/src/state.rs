//! The live graph a renderer reads from.

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use typegraph_core::{
    EdgeData, EdgeEncoding, EdgeId, VertexData, VertexEncoding, VertexExplanation, VertexId, VertexShape,
};
use typegraph_geometry::{midpoint, Ellipse, Point, Rect};
use typegraph_layout::NodeId;

/// A vertex with its current layout position.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexState {
    pub id: VertexId,
    pub encoding: VertexEncoding,
    pub label: String,
    pub short_label: String,
    pub width: f64,
    pub height: f64,
    pub inferred: bool,
    /// Centre of the vertex, written every tick.
    pub position: Point,
}

impl VertexState {
    pub fn shape(&self) -> VertexShape {
        self.encoding.shape()
    }

    /// The vertex box around its current position.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, self.width, self.height)
    }

    /// Shape-aware hit test.
    pub fn contains(&self, point: Point) -> bool {
        match self.shape() {
            VertexShape::RoundedRect => self.rect().contains(point),
            VertexShape::Diamond => self.rect().diamond_contains(point),
            VertexShape::Ellipse => Ellipse::new(
                self.position.x,
                self.position.y,
                self.width / 2.0,
                self.height / 2.0,
            )
            .contains(point),
        }
    }

    pub(crate) fn node_id(&self) -> NodeId {
        node_id(self.id)
    }
}

impl From<VertexData> for VertexState {
    fn from(data: VertexData) -> Self {
        Self {
            id: data.id,
            encoding: data.encoding,
            label: data.label,
            short_label: data.short_label,
            width: data.width,
            height: data.height,
            inferred: data.inferred,
            position: Point::ZERO,
        }
    }
}

/// An edge with the positions of its endpoint vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeState {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub encoding: EdgeEncoding,
    pub label: String,
    pub inferred: bool,
    pub source_position: Point,
    pub target_position: Point,
}

impl EdgeState {
    pub fn midpoint(&self) -> Point {
        midpoint(self.source_position, self.target_position)
    }

    /// Endpoints ordered so that parallel edges in either direction compare equal.
    pub fn unordered_endpoints(&self) -> (VertexId, VertexId) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

impl From<EdgeData> for EdgeState {
    fn from(data: EdgeData) -> Self {
        Self {
            id: data.id,
            source: data.source,
            target: data.target,
            encoding: data.encoding,
            label: data.label,
            inferred: data.inferred,
            source_position: Point::ZERO,
            target_position: Point::ZERO,
        }
    }
}

/// A member of an edge band and the extra node that bends it.
#[derive(Debug, Clone, PartialEq)]
pub struct BandState {
    pub edge: EdgeId,
    pub node: NodeId,
    /// Position of the band node, written every tick.
    pub position: Point,
}

/// Insertion-ordered vertices, edges, bands and vertex explanations.
#[derive(Debug, Clone, Default)]
pub struct GraphState {
    vertices: Vec<VertexState>,
    edges: Vec<EdgeState>,
    bands: Vec<BandState>,
    vertex_explanations: Vec<VertexExplanation>,
    vertex_index: HashMap<VertexId, usize>,
    edge_index: HashMap<EdgeId, usize>,
    band_index: HashMap<EdgeId, usize>,
    explanations_by_vertex: HashMap<VertexId, Vec<i64>>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[VertexState] {
        &self.vertices
    }

    pub fn edges(&self) -> &[EdgeState] {
        &self.edges
    }

    pub fn bands(&self) -> &[BandState] {
        &self.bands
    }

    pub fn vertex_explanations(&self) -> &[VertexExplanation] {
        &self.vertex_explanations
    }

    /// Explanation ids recorded for `vertex`, oldest first.
    pub fn explanations_of(&self, vertex: VertexId) -> &[i64] {
        self.explanations_by_vertex
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn vertex(&self, id: VertexId) -> Option<&VertexState> {
        self.vertex_index.get(&id).map(|&i| &self.vertices[i])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeState> {
        self.edge_index.get(&id).map(|&i| &self.edges[i])
    }

    /// The band entry of an edge, if the edge is part of a band.
    pub fn band(&self, edge: EdgeId) -> Option<&BandState> {
        self.band_index.get(&edge).map(|&i| &self.bands[i])
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertex_index.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edge_index.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Up to `limit` vertices, nearest first.
    pub fn vertices_near(&self, point: Point, limit: usize) -> Vec<&VertexState> {
        let mut by_distance: Vec<_> = self.vertices.iter().collect();
        by_distance.sort_by_key(|v| OrderedFloat(v.position.distance(point)));
        by_distance.truncate(limit);
        by_distance
    }

    /// The nearest vertex whose shape contains `point`.
    pub fn vertex_at(&self, point: Point) -> Option<&VertexState> {
        self.vertices_near(point, self.vertices.len())
            .into_iter()
            .find(|v| v.contains(point))
    }

    pub fn clear(&mut self) {
        self.vertex_explanations.clear();
        self.bands.clear();
        self.edges.clear();
        self.vertices.clear();
        self.vertex_index.clear();
        self.edge_index.clear();
        self.band_index.clear();
        self.explanations_by_vertex.clear();
    }

    pub(crate) fn push_vertex(&mut self, vertex: VertexState) {
        self.vertex_index.insert(vertex.id, self.vertices.len());
        self.vertices.push(vertex);
    }

    pub(crate) fn push_edge(&mut self, edge: EdgeState) {
        self.edge_index.insert(edge.id, self.edges.len());
        self.edges.push(edge);
    }

    pub(crate) fn push_band(&mut self, band: BandState) {
        self.band_index.insert(band.edge, self.bands.len());
        self.bands.push(band);
    }

    /// Record an explanation; a pair already recorded is ignored.
    pub(crate) fn push_explanation(&mut self, explanation: VertexExplanation) {
        let ids = self.explanations_by_vertex.entry(explanation.vertex).or_default();
        if ids.contains(&explanation.explanation) {
            return;
        }
        ids.push(explanation.explanation);
        self.vertex_explanations.push(explanation);
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [VertexState] {
        &mut self.vertices
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [EdgeState] {
        &mut self.edges
    }

    pub(crate) fn bands_mut(&mut self) -> &mut [BandState] {
        &mut self.bands
    }

    /// Move the graph data out, leaving the state empty. Bands are dropped.
    pub(crate) fn take(&mut self) -> (Vec<VertexState>, Vec<EdgeState>, Vec<VertexExplanation>) {
        let vertices = std::mem::take(&mut self.vertices);
        let edges = std::mem::take(&mut self.edges);
        let explanations = std::mem::take(&mut self.vertex_explanations);
        self.clear();
        (vertices, edges, explanations)
    }
}

/// Vertex ids double as simulation node ids.
pub(crate) fn node_id(id: VertexId) -> NodeId {
    NodeId(id.0)
}
