//! Path-based traversal and queries over an estrav syntax tree.
//!
//! This crate provides:
//! - Path identity and navigation (`TraverseState`, `PathId`)
//! - Structural predicates (`has`, `equals`, `is_node_type`)
//! - Member-chain pattern matching (`matches_pattern`)
//! - Positional classifiers (`is_completion_record`, `is_statement_or_block`)
//! - Lazily crawled scopes, bindings and import resolution
//! - Tree edits through paths (`replace_with`, `remove`, `insert_before`)
//! - A depth-first walk with enter/exit callbacks (`traverse`)

pub mod error;
pub use error::{Result, TraverseError};

pub mod options;
pub use options::TraverseOptions;

pub mod path;
pub use path::{Container, PathData, PathId, PathKey};

pub mod scope;
pub use scope::{Binding, BindingCollision, BindingId, BindingKind, Scope, ScopeId, ScopeKind};

// Core state: navigation and path bookkeeping
pub mod state;
pub use state::{ROOT_PATH, TraverseState};

// TraverseState extensions, split by concern
mod state_context;
mod state_mutation;
mod state_predicates;
mod state_scope;

pub mod state_import;
pub use state_import::{DEFAULT_IMPORT, NAMESPACE_IMPORT};

pub mod state_pattern;
pub use state_pattern::WILDCARD;

pub mod visitor;
pub use visitor::{VisitResult, Visitor, traverse, traverse_from};
