//! Error types for the visualiser layer.

use thiserror::Error;
use typegraph_core::{EdgeId, VertexId};
use typegraph_layout::{LayoutError, NodeId};

/// Result type for visualiser operations.
pub type VizResult<T> = Result<T, VizError>;

/// Errors that can occur while feeding or driving a layout.
#[derive(Debug, Error)]
pub enum VizError {
    /// The simulation rejected an operation.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// A batch carried a vertex id that is already in use.
    #[error("Duplicate vertex id {0}")]
    DuplicateVertex(VertexId),

    /// A batch carried an edge id that is already in use.
    #[error("Duplicate edge id {0}")]
    DuplicateEdge(EdgeId),

    /// An edge points at a vertex that is neither known nor in the same batch.
    #[error("Edge {edge} references unknown vertex {vertex}")]
    UnknownVertex { edge: EdgeId, vertex: VertexId },

    /// An explanation names a vertex that is neither known nor in the same batch.
    #[error("Explanation {explanation} references unknown vertex {vertex}")]
    UnknownExplainedVertex { explanation: i64, vertex: VertexId },

    /// A vertex or band has no simulation node behind it.
    #[error("No simulation node for id {0}")]
    MissingNode(NodeId),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
