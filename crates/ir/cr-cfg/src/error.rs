//! CFG construction errors.

use thiserror::Error;

use crate::NodeId;

/// Result type for CFG construction.
pub type CfgResult<T> = Result<T, CfgError>;

/// Structural problems found when freezing a [`crate::CfgBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfgError {
    /// No `Start` node was added and none was set explicitly.
    #[error("control-flow graph has no start node")]
    MissingStart,

    /// The designated start node does not exist.
    #[error("start node {0} is not part of the graph")]
    InvalidStart(NodeId),

    /// An edge endpoint does not exist.
    #[error("edge {from} -> {to} references a node outside the graph")]
    InvalidEdge {
        /// Source of the edge
        from: NodeId,
        /// Target of the edge
        to: NodeId,
    },
}
