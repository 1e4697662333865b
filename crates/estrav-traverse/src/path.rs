//! Path identity: one tree position addressed by container and key.

use crate::scope::ScopeId;
use estrav_ast::{NodeIndex, NodeType};

/// Handle to a path in [`TraverseState`](crate::TraverseState).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub u32);

impl PathId {
    pub const NONE: PathId = PathId(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a path sits inside its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// A single named child field.
    Field(&'static str),
    /// An element of a list field.
    Index(usize),
}

impl PathKey {
    pub fn as_field(self) -> Option<&'static str> {
        match self {
            PathKey::Field(field) => Some(field),
            PathKey::Index(_) => None,
        }
    }

    pub fn as_index(self) -> Option<usize> {
        match self {
            PathKey::Index(index) => Some(index),
            PathKey::Field(_) => None,
        }
    }
}

impl std::fmt::Display for PathKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathKey::Field(field) => f.write_str(field),
            PathKey::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The structure holding a path's node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    /// The traversal root, held by the state itself.
    Root,
    /// A single field of `owner`; the key names the field.
    Field { owner: NodeIndex },
    /// The list `owner.field`; the key is the element index.
    List {
        owner: NodeIndex,
        field: &'static str,
    },
}

impl Container {
    pub fn owner(self) -> Option<NodeIndex> {
        match self {
            Container::Root => None,
            Container::Field { owner } | Container::List { owner, .. } => Some(owner),
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Container::List { .. })
    }
}

/// Bookkeeping for one path.
///
/// `node_type` is recorded when the path is created or its node replaced, and
/// survives removal.
#[derive(Clone, Copy, Debug)]
pub struct PathData {
    pub node: NodeIndex,
    pub node_type: NodeType,
    pub parent: PathId,
    pub container: Container,
    pub key: PathKey,
    pub scope: ScopeId,
    pub removed: bool,
}

/// Child cache key under one parent path: field name plus list index.
pub(crate) type CacheKey = (&'static str, Option<usize>);

/// Fields that hold either one statement or a block.
pub const STATEMENT_OR_BLOCK_KEYS: &[&str] = &["consequent", "body", "alternate"];
