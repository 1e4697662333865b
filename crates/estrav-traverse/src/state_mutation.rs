//! Tree mutation through paths.
//!
//! Every edit updates the container in place, shifts the keys of sibling
//! paths in the same list, and drops cached paths below replaced or removed
//! nodes. Nothing is re-traversed; the visitor driver decides what to revisit.

use crate::error::{Result, TraverseError};
use crate::path::{Container, PathId, PathKey};
use crate::state::TraverseState;
use estrav_ast::shape::{check_child_type, validate_node};
use estrav_ast::{Alias, NodeIndex, NodeType, SlotMut};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    Before,
    After,
}

impl TraverseState {
    /// Store `replacement` at `path`'s position. The path keeps its identity
    /// and now refers to the new node.
    ///
    /// An expression replacing a statement is wrapped in an
    /// `ExpressionStatement`, except in `for` heads where either is valid.
    pub fn replace_with(&mut self, path: PathId, replacement: NodeIndex) -> Result<()> {
        let data = *self.validated(path)?;
        let mut replacement_type = self
            .arena
            .node_type(replacement)
            .ok_or(TraverseError::MissingNode(replacement))?;
        if replacement == data.node {
            return Ok(());
        }

        let mut replacement = replacement;
        if data.node_type.has_alias(Alias::Statement)
            && replacement_type.has_alias(Alias::Expression)
            && !replacement_type.has_alias(Alias::Statement)
            && !self.can_have_variable_declaration_or_expression(path)?
        {
            replacement = self.arena.expression_statement(replacement);
            replacement_type = NodeType::ExpressionStatement;
        }

        self.check_placement(data.container, data.key, replacement, replacement_type)?;
        self.store(path, data.container, data.key, replacement)?;

        self.invalidate_descendants(path);
        self.detach_own_scope(path);
        let entry = &mut self.paths[path.index()];
        entry.node = replacement;
        entry.node_type = replacement_type;
        self.assign_scope(path);

        self.log_mutation("replace", path, 1);
        Ok(())
    }

    /// Replace a list element with zero or more nodes. Returns the paths of
    /// the inserted nodes; `path` itself is removed.
    pub fn replace_with_multiple(
        &mut self,
        path: PathId,
        nodes: Vec<NodeIndex>,
    ) -> Result<Vec<PathId>> {
        let data = *self.validated(path)?;
        if !data.container.is_list() {
            return Err(TraverseError::NotAList {
                node_type: self.node_type(data.parent).unwrap_or(data.node_type),
                field: data.key.as_field().unwrap_or("root"),
            });
        }
        let inserted = self.insert_after(path, nodes)?;
        self.remove(path)?;
        Ok(inserted)
    }

    /// Remove `path`'s node from its container. List siblings after it shift
    /// down by one; a single field becomes empty. The path is marked removed
    /// and keeps answering `node_type`.
    pub fn remove(&mut self, path: PathId) -> Result<()> {
        let data = *self.validated(path)?;
        match (data.container, data.key) {
            (Container::Root, _) => return Err(TraverseError::RootRemoval),
            (Container::Field { owner }, PathKey::Field(field)) => {
                if let Some(SlotMut::Single(slot)) = self.arena.slot_mut(owner, field) {
                    *slot = NodeIndex::NONE;
                }
                if let Some(cache) = self.child_cache.get_mut(&data.parent) {
                    cache.remove(&(field, None));
                }
            }
            (Container::List { owner, field }, PathKey::Index(index)) => {
                if let Some(SlotMut::List(list)) = self.arena.slot_mut(owner, field)
                    && index < list.nodes.len()
                {
                    list.nodes.remove(index);
                }
                if let Some(cache) = self.child_cache.get_mut(&data.parent) {
                    cache.remove(&(field, Some(index)));
                }
                self.shift_keys(data.parent, field, index + 1, -1);
            }
            _ => return Err(TraverseError::Stale(path)),
        }

        self.mark_removed(path);
        self.invalidate_descendants(path);
        self.log_mutation("remove", path, 1);
        Ok(())
    }

    /// Insert `nodes` before `path`. Returns the paths of the inserted nodes.
    pub fn insert_before(&mut self, path: PathId, nodes: Vec<NodeIndex>) -> Result<Vec<PathId>> {
        self.insert_sibling(path, nodes, Placement::Before)
    }

    /// Insert `nodes` after `path`. Returns the paths of the inserted nodes.
    pub fn insert_after(&mut self, path: PathId, nodes: Vec<NodeIndex>) -> Result<Vec<PathId>> {
        self.insert_sibling(path, nodes, Placement::After)
    }

    fn insert_sibling(
        &mut self,
        path: PathId,
        nodes: Vec<NodeIndex>,
        placement: Placement,
    ) -> Result<Vec<PathId>> {
        let data = *self.validated(path)?;
        for &node in &nodes {
            self.arena
                .node_type(node)
                .ok_or(TraverseError::MissingNode(node))?;
        }
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        // Statements go next to the statement wrapping this expression or
        // label body.
        if data.parent.is_some()
            && matches!(
                self.paths[data.parent.index()].node_type,
                NodeType::ExpressionStatement | NodeType::LabeledStatement
            )
        {
            return self.insert_sibling(data.parent, nodes, placement);
        }

        match (data.container, data.key) {
            (Container::List { owner, field }, PathKey::Index(index)) => {
                let owner_type = self
                    .arena
                    .node_type(owner)
                    .ok_or(TraverseError::MissingNode(owner))?;
                let nodes = nodes
                    .into_iter()
                    .map(|node| self.coerce_into_list(owner_type, field, node))
                    .collect::<Result<Vec<_>>>()?;
                let count = nodes.len();
                let at = match placement {
                    Placement::Before => index,
                    Placement::After => index + 1,
                };

                self.shift_keys(data.parent, field, at, count as isize);
                if let Some(SlotMut::List(list)) = self.arena.slot_mut(owner, field) {
                    list.nodes.splice(at..at, nodes);
                }

                let mut inserted = Vec::with_capacity(count);
                for offset in 0..count {
                    inserted.extend(self.child_at(data.parent, field, at + offset)?);
                }
                self.log_mutation("insert", path, count);
                Ok(inserted)
            }
            (Container::Field { owner }, PathKey::Field(field))
                if self.is_statement_or_block(path)? && self.holds_any_statement(owner, field) =>
            {
                let count = nodes.len();
                let mut body = nodes
                    .into_iter()
                    .map(|node| self.coerce_into_list(NodeType::BlockStatement, "body", node))
                    .collect::<Result<Vec<_>>>()?;
                let offset = match placement {
                    Placement::Before => {
                        body.push(data.node);
                        0
                    }
                    Placement::After => {
                        body.insert(0, data.node);
                        1
                    }
                };
                let block = self.arena.block(body);
                self.replace_with(path, block)?;

                let mut inserted = Vec::with_capacity(count);
                for i in 0..count {
                    inserted.extend(self.child_at(path, "body", offset + i)?);
                }
                Ok(inserted)
            }
            _ => Err(TraverseError::UnsupportedInsertion {
                node_type: data.node_type,
                key: data.key.to_string(),
            }),
        }
    }

    /// Whether `owner.field` takes a bare statement as well as a block. Function
    /// bodies and conditional-expression branches do not.
    fn holds_any_statement(&self, owner: NodeIndex, field: &'static str) -> bool {
        self.arena.node_type(owner).is_some_and(|owner_type| {
            check_child_type(owner_type, field, NodeType::ExpressionStatement).is_ok()
                && check_child_type(owner_type, field, NodeType::BlockStatement).is_ok()
        })
    }

    /// Wrap an expression headed for a statement list, then check it fits.
    fn coerce_into_list(
        &mut self,
        owner_type: NodeType,
        field: &'static str,
        node: NodeIndex,
    ) -> Result<NodeIndex> {
        let node_type = self
            .arena
            .node_type(node)
            .ok_or(TraverseError::MissingNode(node))?;
        let mut placed = node;
        let mut placed_type = node_type;
        if node_type.has_alias(Alias::Expression)
            && !node_type.has_alias(Alias::Statement)
            && check_child_type(owner_type, field, node_type).is_err()
            && check_child_type(owner_type, field, NodeType::ExpressionStatement).is_ok()
        {
            placed = self.arena.expression_statement(node);
            placed_type = NodeType::ExpressionStatement;
        }
        if self.options.validate_shapes {
            check_child_type(owner_type, field, placed_type)?;
            validate_node(&self.arena, placed)?;
        }
        Ok(placed)
    }

    /// Shape-check a node about to be stored at `container[key]`.
    fn check_placement(
        &self,
        container: Container,
        key: PathKey,
        node: NodeIndex,
        node_type: NodeType,
    ) -> Result<()> {
        if !self.options.validate_shapes {
            return Ok(());
        }
        let field = match (container, key) {
            (Container::Field { .. }, PathKey::Field(field)) => Some(field),
            (Container::List { field, .. }, _) => Some(field),
            _ => None,
        };
        if let (Some(owner), Some(field)) = (container.owner(), field) {
            let owner_type = self
                .arena
                .node_type(owner)
                .ok_or(TraverseError::MissingNode(owner))?;
            check_child_type(owner_type, field, node_type)?;
        }
        validate_node(&self.arena, node)?;
        Ok(())
    }

    fn store(
        &mut self,
        path: PathId,
        container: Container,
        key: PathKey,
        node: NodeIndex,
    ) -> Result<()> {
        match (container, key) {
            (Container::Root, _) => {
                self.root = node;
                Ok(())
            }
            (Container::Field { owner }, PathKey::Field(field)) => {
                match self.arena.slot_mut(owner, field) {
                    Some(SlotMut::Single(slot)) => {
                        *slot = node;
                        Ok(())
                    }
                    _ => Err(TraverseError::Stale(path)),
                }
            }
            (Container::List { owner, field }, PathKey::Index(index)) => {
                match self.arena.slot_mut(owner, field) {
                    Some(SlotMut::List(list)) if index < list.nodes.len() => {
                        list.nodes[index] = node;
                        Ok(())
                    }
                    _ => Err(TraverseError::Stale(path)),
                }
            }
            _ => Err(TraverseError::Stale(path)),
        }
    }

    /// Move cached element paths of `parent.field` at index `from` and later
    /// by `delta` positions.
    fn shift_keys(&mut self, parent: PathId, field: &'static str, from: usize, delta: isize) {
        let Some(cache) = self.child_cache.get_mut(&parent) else {
            return;
        };
        let mut moved: Vec<(usize, PathId)> = cache
            .iter()
            .filter_map(|(&(f, index), &child)| match index {
                Some(index) if f == field && index >= from => Some((index, child)),
                _ => None,
            })
            .collect();
        for (index, _) in &moved {
            cache.remove(&(field, Some(*index)));
        }
        moved.sort_unstable();
        for (index, child) in moved {
            let shifted = index.saturating_add_signed(delta);
            cache.insert((field, Some(shifted)), child);
            self.paths[child.index()].key = PathKey::Index(shifted);
        }
    }
}
