//! Core domain types shared across the typegraph workspace.
//!
//! These are the values a data source hands to the visualiser: vertices and
//! edges produced by a query run, grouped into [`GraphBatch`]es.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier for a vertex in a query-result graph.
///
/// Vertex ids double as simulation node ids, so they must be unique for the
/// lifetime of a layout run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub i64);

/// Identifier for an edge in a query-result graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub i64);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Encodings
// =============================================================================

/// The kind of concept a vertex represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexEncoding {
    /// An entity type in the schema.
    EntityType,
    /// A relation type in the schema.
    RelationType,
    /// An attribute type in the schema.
    AttributeType,
    /// The root `thing` type.
    ThingType,
    /// An entity instance.
    Entity,
    /// A relation instance.
    Relation,
    /// An attribute instance.
    Attribute,
}

/// The body a vertex is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexShape {
    /// Rounded box.
    RoundedRect,
    /// Rhombus inscribed in the vertex box.
    Diamond,
    /// Ellipse inscribed in the vertex box.
    Ellipse,
}

impl VertexEncoding {
    /// Shape used to render (and clip edges against) this kind of vertex.
    pub fn shape(&self) -> VertexShape {
        match self {
            VertexEncoding::EntityType | VertexEncoding::ThingType | VertexEncoding::Entity => {
                VertexShape::RoundedRect
            }
            VertexEncoding::RelationType | VertexEncoding::Relation => VertexShape::Diamond,
            VertexEncoding::AttributeType | VertexEncoding::Attribute => VertexShape::Ellipse,
        }
    }

    /// Whether the vertex is a schema type rather than an instance.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            VertexEncoding::EntityType
                | VertexEncoding::RelationType
                | VertexEncoding::AttributeType
                | VertexEncoding::ThingType
        )
    }
}

/// The kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgeEncoding {
    /// Thing owns an attribute instance.
    Has,
    /// Type owns an attribute type.
    Owns,
    /// Type plays a role.
    Plays,
    /// Relation type relates a role.
    Relates,
    /// Subtyping.
    Sub,
    /// Relation instance to one of its role players.
    RolePlayer,
    /// Instance to its type.
    #[default]
    Isa,
}

// =============================================================================
// Batches
// =============================================================================

/// A vertex as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexData {
    /// Unique identifier.
    pub id: VertexId,
    /// Kind of concept.
    pub encoding: VertexEncoding,
    /// Full display label.
    pub label: String,
    /// Abbreviated label for small zoom levels.
    #[serde(default)]
    pub short_label: String,
    /// Box width in world units.
    pub width: f64,
    /// Box height in world units.
    pub height: f64,
    /// Whether the concept was produced by reasoning.
    #[serde(default)]
    pub inferred: bool,
}

impl VertexData {
    pub fn new(id: i64, encoding: VertexEncoding, label: impl Into<String>, width: f64, height: f64) -> Self {
        let label = label.into();
        Self {
            id: VertexId(id),
            encoding,
            short_label: label.clone(),
            label,
            width,
            height,
            inferred: false,
        }
    }
}

/// An edge as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Unique identifier.
    pub id: EdgeId,
    /// Vertex the edge starts at.
    pub source: VertexId,
    /// Vertex the edge points to.
    pub target: VertexId,
    /// Kind of relationship.
    #[serde(default)]
    pub encoding: EdgeEncoding,
    /// Label drawn at the edge midpoint.
    pub label: String,
    /// Whether the edge was produced by reasoning.
    #[serde(default)]
    pub inferred: bool,
}

impl EdgeData {
    pub fn new(id: i64, source: i64, target: i64, label: impl Into<String>) -> Self {
        Self {
            id: EdgeId(id),
            source: VertexId(source),
            target: VertexId(target),
            encoding: EdgeEncoding::default(),
            label: label.into(),
            inferred: false,
        }
    }
}

/// Links an inferred vertex to one of the explanations that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexExplanation {
    pub vertex: VertexId,
    pub explanation: i64,
}

impl VertexExplanation {
    pub fn new(vertex: i64, explanation: i64) -> Self {
        Self {
            vertex: VertexId(vertex),
            explanation,
        }
    }
}

/// A complete unit of graph data handed over by the data source.
///
/// A batch is applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphBatch {
    #[serde(default)]
    pub vertices: Vec<VertexData>,
    #[serde(default)]
    pub edges: Vec<EdgeData>,
    #[serde(default)]
    pub explanations: Vec<VertexExplanation>,
}

impl GraphBatch {
    pub fn new(vertices: Vec<VertexData>, edges: Vec<EdgeData>) -> Self {
        Self {
            vertices,
            edges,
            explanations: Vec::new(),
        }
    }

    pub fn with_explanations(mut self, explanations: Vec<VertexExplanation>) -> Self {
        self.explanations = explanations;
        self
    }

    /// Check if the batch carries anything at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.explanations.is_empty()
    }

    /// Decode a batch from its JSON representation.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the batch as JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while decoding core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
