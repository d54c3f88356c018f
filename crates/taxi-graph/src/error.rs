//! Graph-subsystem error type.

use thiserror::Error;

use taxi_core::NodeId;

/// Errors produced by `taxi-graph`.
///
/// None of these are fatal to a simulation: callers turn them into an empty
/// route and keep the affected taxi idle.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("waypoint {0} not found in graph")]
    NodeNotFound(NodeId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
