//! Roadmap error type.

use thiserror::Error;

use ped_core::NodeId;

/// Errors produced by `ped-roadmap`.
#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in roadmap")]
    NodeNotFound(NodeId),

    #[error("node {node} has a degenerate capture shape: {reason}")]
    InvalidShape { node: NodeId, reason: &'static str },
}

pub type RoadmapResult<T> = Result<T, RoadmapError>;
