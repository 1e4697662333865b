//! Positional classifiers over the path chain.

use crate::error::Result;
use crate::path::{Container, PathId, PathKey, STATEMENT_OR_BLOCK_KEYS};
use crate::state::TraverseState;
use estrav_ast::{Alias, NodeType, Slot};
use estrav_common::limits::MAX_ANCESTOR_WALK_ITERATIONS;

impl TraverseState {
    /// Whether the value at `path` would become the completion value of the
    /// program: every position from here up to the Program is the last
    /// element of its list. Crossing a function boundary answers
    /// `allow_inside_function`.
    pub fn is_completion_record(&self, path: PathId, allow_inside_function: bool) -> Result<bool> {
        let mut current = path;
        let mut first = true;
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > MAX_ANCESTOR_WALK_ITERATIONS {
                return Ok(false);
            }
            let data = *self.validated(current)?;

            if !first && data.node_type.has_alias(Alias::Function) {
                return Ok(allow_inside_function);
            }
            first = false;

            if let (Container::List { owner, field }, PathKey::Index(index)) =
                (data.container, data.key)
            {
                let len = match self.arena.slot(owner, field) {
                    Some(Slot::List(list)) => list.len(),
                    _ => 0,
                };
                if index + 1 != len {
                    return Ok(false);
                }
            }

            let parent = data.parent;
            if parent.is_none() || self.node_type(parent)? == NodeType::Program {
                return Ok(true);
            }
            current = parent;
        }
    }

    /// Whether `path` sits in a `body`, `consequent` or `alternate` field,
    /// the positions that may hold either one statement or a block. Never
    /// directly under a labeled statement or in a block's statement list.
    pub fn is_statement_or_block(&self, path: PathId) -> Result<bool> {
        let data = self.validated(path)?;
        if data.parent.is_some() && self.node_type(data.parent)? == NodeType::LabeledStatement {
            return Ok(false);
        }
        if let Container::List { owner, .. } = data.container
            && self.arena.node_type(owner) == Some(NodeType::BlockStatement)
        {
            return Ok(false);
        }
        Ok(matches!(data.key, PathKey::Field(field) if STATEMENT_OR_BLOCK_KEYS.contains(&field)))
    }

    /// Whether `path` is a `for` head (`init`, or `left` of for-in/for-of),
    /// where a declaration and an expression are both valid.
    pub fn can_have_variable_declaration_or_expression(&self, path: PathId) -> Result<bool> {
        let data = self.validated(path)?;
        if !matches!(data.key, PathKey::Field("init" | "left")) {
            return Ok(false);
        }
        Ok(data.parent.is_some() && self.node_type(data.parent)?.has_alias(Alias::For))
    }
}
