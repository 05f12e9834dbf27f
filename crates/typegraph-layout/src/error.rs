//! Error types for layout operations.

use thiserror::Error;

use crate::NodeId;

/// Errors that can occur while building or configuring a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A node id was registered twice.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A force or link referenced a node that is not in the simulation.
    #[error("Unknown node id: {0}")]
    UnknownNode(NodeId),

    /// A force or simulation parameter is out of range.
    #[error("Invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Result type for layout operations.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Require `value` to be finite and strictly positive.
pub(crate) fn positive(name: &'static str, value: f64) -> LayoutResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidParameter { name, value })
    }
}

/// Require `value` to be finite.
pub(crate) fn finite(name: &'static str, value: f64) -> LayoutResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::InvalidParameter { name, value })
    }
}

/// Require `value` to lie in `[0, 1]`.
pub(crate) fn unit_interval(name: &'static str, value: f64) -> LayoutResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(LayoutError::InvalidParameter { name, value })
    }
}
