//! Traversal configuration.

use estrav_ast::SourceType;
use estrav_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use serde::{Deserialize, Serialize};

/// Configuration options for a traversal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraverseOptions {
    /// Overrides the Program's own `source_type` when set.
    pub source_type: Option<SourceType>,
    /// Record reference and constant-violation paths on bindings when crawling.
    pub track_references: bool,
    /// Check shape contracts for nodes placed by mutations.
    pub validate_shapes: bool,
    /// Upper bound on scope-chain walks.
    pub max_scope_depth: usize,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        TraverseOptions {
            source_type: None,
            track_references: true,
            validate_shapes: true,
            max_scope_depth: MAX_SCOPE_WALK_ITERATIONS,
        }
    }
}

impl TraverseOptions {
    /// Parse options from a JSON document. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<TraverseOptions> {
        serde_json::from_str(json)
    }
}
