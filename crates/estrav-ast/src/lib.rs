//! ECMAScript syntax tree model for estrav.
//!
//! This crate provides:
//! - Arena storage for nodes (`NodeArena`, `NodeIndex`, `NodeList`)
//! - The closed set of node variants (`NodeKind`, `NodeType`)
//! - Alias supertags and type-tag queries (`Alias`, `TypeTag`, `is_type`)
//! - Name-based field reflection (`Slot`, `Value`)
//! - Per-tag shape contracts (`shape::validate_node`)

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod value;
pub use value::{
    LiteralValue, MethodKind, PropertyKind, Slot, SlotMut, SourceType, Value, VariableKind,
};

pub mod node;
pub use node::{Node, NodeKind, NodeType};

// Supertag table
pub mod alias;
pub use alias::{Alias, TypeTag, is_type, is_type_name};

pub mod arena;
pub use arena::NodeArena;

// Synthesis helpers on NodeArena
pub mod builders;

pub mod shape;
pub use shape::{ShapeError, validate_node, validate_tree};
