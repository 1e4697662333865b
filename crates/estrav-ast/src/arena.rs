//! Node arena for syntax tree storage.

use crate::base::NodeIndex;
use crate::node::{Node, NodeKind, NodeType};
use crate::value::{Slot, SlotMut};
use estrav_common::SourceLocation;
use serde::Serialize;

/// Arena-based storage for syntax tree nodes.
/// Nodes are stored contiguously and referenced by index. Detached nodes stay
/// in the arena; they simply stop being reachable from any container.
#[derive(Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    /// Add a synthesized (location-less) node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeIndex {
        self.add(Node::new(kind))
    }

    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.index())
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.index())
        }
    }

    /// Replace a node at the given index
    /// Returns the old node if successful
    pub fn replace(&mut self, index: NodeIndex, new_node: Node) -> Option<Node> {
        self.get_mut(index)
            .map(|old| std::mem::replace(old, new_node))
    }

    #[inline]
    pub fn node_type(&self, index: NodeIndex) -> Option<NodeType> {
        self.get(index).map(Node::node_type)
    }

    pub fn identifier_name(&self, index: NodeIndex) -> Option<&str> {
        self.get(index)?.identifier_name()
    }

    pub fn string_value(&self, index: NodeIndex) -> Option<&str> {
        self.get(index)?.string_value()
    }

    /// Attach a source location, marking the node as user-authored.
    pub fn set_loc(&mut self, index: NodeIndex, loc: SourceLocation) {
        if let Some(node) = self.get_mut(index) {
            node.loc = Some(loc);
        }
    }

    /// The child position `key` of node `index`.
    pub fn slot(&self, index: NodeIndex, key: &str) -> Option<Slot<'_>> {
        self.get(index)?.kind.slot(key)
    }

    pub fn slot_mut(&mut self, index: NodeIndex, key: &str) -> Option<SlotMut<'_>> {
        self.get_mut(index)?.kind.slot_mut(key)
    }

    /// Child node stored in the single-child field `key`.
    pub fn child(&self, index: NodeIndex, key: &str) -> NodeIndex {
        match self.slot(index, key) {
            Some(Slot::Single(child)) => child,
            _ => NodeIndex::NONE,
        }
    }

    /// Children of `index` in visiting order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.get(index).map(Node::children).unwrap_or_default()
    }

    /// Pre-order walk of the subtree rooted at `root`, including `root`.
    pub fn descendants(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            if self.get(index).is_none() {
                continue;
            }
            out.push(index);
            let children = self.children(index);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize the subtree rooted at `root` as ESTree-shaped JSON, with
    /// child indices expanded into nested objects. Used for debug dumps.
    pub fn to_json(&self, root: NodeIndex) -> serde_json::Value {
        let Some(node) = self.get(root) else {
            return serde_json::Value::Null;
        };
        let mut value = serde_json::to_value(node).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(map) = &mut value {
            for key in node.node_type().visitor_keys() {
                let expanded = match node.kind.slot(key) {
                    Some(Slot::Single(child)) => self.to_json(child),
                    Some(Slot::List(list)) => {
                        serde_json::Value::Array(list.iter().map(|c| self.to_json(c)).collect())
                    }
                    None => continue,
                };
                map.insert((*key).to_string(), expanded);
            }
        }
        value
    }
}
