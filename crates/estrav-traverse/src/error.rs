//! Invalid-position errors.
//!
//! Negative answers (no match, no binding, not an import reference) are
//! `Ok(false)`; only misuse of a path or a malformed mutation surfaces here.

use crate::path::PathId;
use crate::scope::ScopeId;
use estrav_ast::{NodeIndex, NodeType, ShapeError};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum TraverseError {
    /// The path was removed; its position no longer exists.
    #[error("path {0:?} has been removed")]
    Removed(PathId),

    /// `container[key]` no longer holds the path's node.
    #[error("path {0:?} is stale: its container no longer holds its node")]
    Stale(PathId),

    #[error("unknown path {0:?}")]
    UnknownPath(PathId),

    #[error("unknown scope {0:?}")]
    UnknownScope(ScopeId),

    /// The node that introduced the scope was removed or replaced.
    #[error("scope {0:?} is detached from the tree")]
    DetachedScope(ScopeId),

    #[error("node {0:?} does not exist in the arena")]
    MissingNode(NodeIndex),

    #[error("{node_type} has no child field `{field}`")]
    UnknownField { node_type: NodeType, field: String },

    #[error("{node_type}.{field} is not a list")]
    NotAList {
        node_type: NodeType,
        field: &'static str,
    },

    #[error("{node_type}.{field} is a list; address an element by index")]
    NotASingleField {
        node_type: NodeType,
        field: &'static str,
    },

    #[error("index {index} is out of bounds for {field} (length {len})")]
    IndexOutOfBounds {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("the root path cannot be removed")]
    RootRemoval,

    /// Nothing can be inserted next to a node held in this position.
    #[error("cannot insert next to a {node_type} held in {key}")]
    UnsupportedInsertion { node_type: NodeType, key: String },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Result type for path and scope operations.
pub type Result<T> = std::result::Result<T, TraverseError>;
