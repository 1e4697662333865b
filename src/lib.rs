//! estrav: path-based traversal and queries over ECMAScript syntax trees.
//!
//! The work is split across the workspace crates, re-exported here:
//! - [`common`]: source positions and traversal limits
//! - [`ast`]: the node arena, node variants, type-tag aliases, shape checks
//! - [`traverse`]: paths, predicates, pattern matching, scopes, the walk
//!
//! ```
//! use estrav::prelude::*;
//!
//! let mut arena = NodeArena::new();
//! let callee = arena.member_chain("React.createClass");
//! let call = arena.call(callee, vec![]);
//! let stmt = arena.expression_statement(call);
//! let program = arena.program(vec![stmt], SourceType::Module);
//!
//! let mut state = TraverseState::new(arena, program).unwrap();
//! let callee = state.get(ROOT_PATH, "body.0.expression.callee").unwrap().unwrap();
//! assert!(state.matches_pattern(callee, "React.createClass", false).unwrap());
//! ```

pub use estrav_ast as ast;
pub use estrav_common as common;
pub use estrav_traverse as traverse;

// Subscriber setup for ESTRAV_LOG / RUST_LOG
pub mod tracing_config;

/// The types most transforms need.
pub mod prelude {
    pub use estrav_ast::{Alias, NodeArena, NodeIndex, NodeKind, NodeType, SourceType, VariableKind};
    pub use estrav_traverse::{
        BindingKind, PathId, PathKey, ROOT_PATH, ScopeId, TraverseError, TraverseOptions,
        TraverseState, VisitResult, Visitor, traverse, traverse_from,
    };
}
