//! Graph state, layout orchestration and edge routing for query-result graphs.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐  GraphBatch   ┌──────────────┐ drain  ┌──────────────────┐
//! │  BatchSender   │──────────────▶│  DataSource  │───────▶│   LayoutDriver   │
//! │ (any thread)   │    (mpsc)     └──────────────┘        │  frame(now)      │
//! └────────────────┘                                       └────────┬─────────┘
//!                                                                   │ ingest / tick
//!                                                                   ▼
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │ VisualiserSimulation                                 │
//!                      │  GraphState (vertices, edges, bands) <-> Simulation  │
//!                      └───────────────────────────┬──────────────────────────┘
//!                                                  │ positions
//!                                                  ▼
//!                             routing: edge_endpoint / label_rect / route_edge
//! ```
//!
//! The renderer owns the animation loop: it calls [`LayoutDriver::frame`] once
//! per frame, reads [`GraphState`], and asks [`route_edge`] how to draw each
//! edge.

mod config;
mod driver;
mod error;
pub mod routing;
mod simulation;
mod source;
mod state;

pub use config::LayoutConfig;
pub use driver::{FrameOutcome, LayoutDriver};
pub use error::{VizError, VizResult};
pub use routing::{edge_endpoint, label_rect, route_edge, EdgePiece, EdgeRoute};
pub use simulation::VisualiserSimulation;
pub use source::{channel, BatchSender, DataSource, SourceClosed, SourceError, SourceMessage};
pub use state::{BandState, EdgeState, GraphState, VertexState};
