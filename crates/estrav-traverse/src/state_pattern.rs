//! Dotted-name matching against member-expression chains.

use crate::error::Result;
use crate::path::PathId;
use crate::state::TraverseState;
use estrav_ast::{NodeIndex, NodeKind};
use estrav_common::limits::MAX_PATTERN_SEGMENTS;
use std::collections::VecDeque;
use tracing::trace;

/// Segment matching any name.
pub const WILDCARD: &str = "*";

impl TraverseState {
    /// Match `path`'s member chain against a dotted pattern such as
    /// `"React.createClass"`.
    ///
    /// Dot and string-bracket access are interchangeable: `a.b.c`, `a["b"].c`
    /// and `a.b["c"]` all match `"a.b.c"`. A `*` segment matches any name. A
    /// computed key that is not a literal never matches. With `allow_partial`,
    /// a chain that covers a prefix of the pattern (or whose prefix covers the
    /// whole pattern) matches too.
    pub fn matches_pattern(&self, path: PathId, pattern: &str, allow_partial: bool) -> Result<bool> {
        let node = self.node_ref(path)?;
        if !matches!(node.kind, NodeKind::MemberExpression { .. }) {
            return Ok(false);
        }
        let parts: Vec<&str> = pattern.split('.').collect();
        if parts.len() > MAX_PATTERN_SEGMENTS {
            return Ok(false);
        }
        let matched = self.match_chain(self.node(path)?, &parts, allow_partial);
        trace!(path = path.0, pattern, allow_partial, matched, "matches_pattern");
        Ok(matched)
    }

    fn match_chain(&self, root: NodeIndex, parts: &[&str], allow_partial: bool) -> bool {
        let segment_matches = |i: usize, name: Option<&str>| {
            parts
                .get(i)
                .is_some_and(|&part| part == WILDCARD || Some(part) == name)
        };

        // Object before property at every level, so names come out left to
        // right.
        let mut search = VecDeque::from([root]);
        let mut i = 0;
        while let Some(index) = search.pop_front() {
            if allow_partial && i == parts.len() {
                return true;
            }
            let Some(node) = self.arena.get(index) else {
                return false;
            };
            match &node.kind {
                NodeKind::Identifier { name } => {
                    if !segment_matches(i, Some(name.as_str())) {
                        return false;
                    }
                }
                NodeKind::Literal { value } => {
                    if !segment_matches(i, value.as_str()) {
                        return false;
                    }
                }
                NodeKind::MemberExpression {
                    object,
                    property,
                    computed,
                } => {
                    let property_is_literal = matches!(
                        self.arena.get(*property).map(|n| &n.kind),
                        Some(NodeKind::Literal { .. })
                    );
                    if *computed && !property_is_literal {
                        return false;
                    }
                    search.push_front(*property);
                    search.push_front(*object);
                    continue;
                }
                _ => return false,
            }

            i += 1;
        }

        allow_partial || i == parts.len()
    }
}
