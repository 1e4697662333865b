//! Base handle types shared by every node variant.

use serde::Serialize;

/// Index of a node in a [`NodeArena`](crate::NodeArena).
///
/// `NodeIndex::NONE` marks an absent optional child (an `else`-less `if`,
/// an array hole, a `for(;;)` without init).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

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

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// Ordered sequence of child nodes (statement lists, arguments, specifiers).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> Self {
        NodeList { nodes: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<NodeIndex> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }
}

impl FromIterator<NodeIndex> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeIndex>>(iter: I) -> Self {
        NodeList {
            nodes: iter.into_iter().collect(),
        }
    }
}
