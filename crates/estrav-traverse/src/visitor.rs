//! Depth-first walk over paths with enter/exit callbacks.
//!
//! Visitors receive the state mutably and may edit the tree from either
//! callback. The walk re-reads the tree after every callback:
//! - a path replaced in `enter` has its new node's children visited;
//! - a path removed in `enter` is not exited;
//! - list siblings removed or inserted around the current element shift the
//!   walk's position with them.

use crate::error::Result;
use crate::path::PathId;
use crate::state::TraverseState;
use estrav_ast::Slot;
use tracing::trace;

/// What the walk does after a callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VisitResult {
    #[default]
    Continue,
    /// Do not descend into this path's children. Only meaningful from
    /// `enter`.
    SkipChildren,
    /// End the whole walk.
    Stop,
}

/// Enter/exit callbacks for [`traverse`].
pub trait Visitor {
    fn enter(&mut self, _state: &mut TraverseState, _path: PathId) -> Result<VisitResult> {
        Ok(VisitResult::Continue)
    }

    fn exit(&mut self, _state: &mut TraverseState, _path: PathId) -> Result<VisitResult> {
        Ok(VisitResult::Continue)
    }
}

/// Walk the whole tree from the root.
pub fn traverse<V: Visitor + ?Sized>(state: &mut TraverseState, visitor: &mut V) -> Result<()> {
    let root = state.root();
    traverse_from(state, root, visitor)
}

/// Walk the subtree at `path`, `path` included.
pub fn traverse_from<V: Visitor + ?Sized>(
    state: &mut TraverseState,
    path: PathId,
    visitor: &mut V,
) -> Result<()> {
    state.validated(path)?;
    walk(state, path, visitor)?;
    Ok(())
}

fn walk<V: Visitor + ?Sized>(
    state: &mut TraverseState,
    path: PathId,
    visitor: &mut V,
) -> Result<VisitResult> {
    if !state.is_valid(path) {
        return Ok(VisitResult::Continue);
    }
    match visitor.enter(state, path)? {
        VisitResult::Stop => return Ok(VisitResult::Stop),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if !state.is_valid(path) {
                trace!(path = path.0, "removed on enter");
                return Ok(VisitResult::Continue);
            }
            if walk_children(state, path, visitor)? == VisitResult::Stop {
                return Ok(VisitResult::Stop);
            }
        }
    }
    if !state.is_valid(path) {
        return Ok(VisitResult::Continue);
    }
    match visitor.exit(state, path)? {
        VisitResult::Stop => Ok(VisitResult::Stop),
        _ => Ok(VisitResult::Continue),
    }
}

fn walk_children<V: Visitor + ?Sized>(
    state: &mut TraverseState,
    path: PathId,
    visitor: &mut V,
) -> Result<VisitResult> {
    // Replacement in `enter` may have changed the node type.
    let node_type = state.node_type(path)?;
    for &field in node_type.visitor_keys() {
        if !state.is_valid(path) {
            return Ok(VisitResult::Continue);
        }
        let node = state.node(path)?;
        let is_list = matches!(state.arena().slot(node, field), Some(Slot::List(_)));

        if !is_list {
            if let Some(child) = state.child(path, field)?
                && walk(state, child, visitor)? == VisitResult::Stop
            {
                return Ok(VisitResult::Stop);
            }
            continue;
        }

        let mut index = 0;
        loop {
            if !state.is_valid(path) || index >= state.list_len(path, field)? {
                break;
            }
            let Some(child) = state.child_at(path, field, index)? else {
                index += 1;
                continue;
            };
            if walk(state, child, visitor)? == VisitResult::Stop {
                return Ok(VisitResult::Stop);
            }
            // A removed element's successors moved into its slot.
            if !state.is_removed(child) {
                index = state.path_data(child)?.key.as_index().map_or(index + 1, |key| key + 1);
            }
        }
    }
    Ok(VisitResult::Continue)
}
