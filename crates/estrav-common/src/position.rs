//! Line/column positions for nodes that originated in the input text.
//!
//! A node carrying a [`SourceLocation`] was produced by the parser; a node
//! without one was synthesized by a transform.

use serde::{Deserialize, Serialize};

/// A 1-based line and 0-based column, matching ESTree `loc` conventions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Source span of a user-authored node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
    /// File the node was parsed from, when the parser recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SourceLocation {
    pub const fn new(start: Position, end: Position) -> Self {
        SourceLocation {
            start,
            end,
            source: None,
        }
    }

    /// A location covering `len` columns of a single line.
    pub const fn on_line(line: u32, column: u32, len: u32) -> Self {
        SourceLocation::new(Position::new(line, column), Position::new(line, column + len))
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether `other` lies entirely within this location.
    pub fn contains(&self, other: &SourceLocation) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}
