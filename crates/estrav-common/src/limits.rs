//! Centralized limits and thresholds for estrav.
//!
//! Parent links in the path and scope arenas are plain indices, so a corrupted
//! arena could in principle form a cycle. Every upward walk is bounded by one
//! of these limits instead of trusting the links blindly.

/// Maximum number of steps when walking up a scope chain.
///
/// Binding lookups walk from the innermost scope to the program scope. Real
/// programs nest a few dozen scopes at most; hitting this limit means the
/// scope arena is corrupted and the lookup gives up with "not found".
///
/// # JavaScript example
///
/// ```javascript
/// import React from "react";
/// function outer() {
///   function inner() {
///     { { { React.createElement("div"); } } } // walks 5 scopes up to Program
///   }
/// }
/// ```
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

/// Maximum number of steps when walking up the path parent chain.
///
/// Used by ancestor queries (`find_parent`, completion-record detection).
pub const MAX_ANCESTOR_WALK_ITERATIONS: usize = 100_000;

/// Maximum number of segments accepted in a dotted match pattern.
///
/// Longer patterns are rejected as "no match" without walking the chain.
pub const MAX_PATTERN_SEGMENTS: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_are_ordered() {
        assert!(MAX_PATTERN_SEGMENTS < MAX_SCOPE_WALK_ITERATIONS);
        assert!(MAX_SCOPE_WALK_ITERATIONS <= MAX_ANCESTOR_WALK_ITERATIONS);
    }
}
