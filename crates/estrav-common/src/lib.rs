//! Common types and utilities for estrav.
//!
//! This crate provides the foundational types used across the estrav crates:
//! - Source positions (`Position`, `SourceLocation`)
//! - Traversal limits and thresholds

// Position/location types attached to user-authored nodes
pub mod position;
pub use position::{Position, SourceLocation};

// Centralized limits and thresholds
pub mod limits;
