//! Field reflection: reading any node attribute by name.
//!
//! Transforms query nodes generically (`has("alternate")`,
//! `equals("computed", true)`) without matching on every variant. Child
//! positions are exposed as [`Slot`]s, scalar attributes and children alike
//! as [`Value`]s.

use crate::base::{NodeIndex, NodeList};
use serde::{Deserialize, Serialize};

/// A child position inside a node: one optional child or an ordered list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot<'a> {
    Single(NodeIndex),
    List(&'a NodeList),
}

/// Mutable access to a child position.
#[derive(Debug)]
pub enum SlotMut<'a> {
    Single(&'a mut NodeIndex),
    List(&'a mut NodeList),
}

/// The value of a named node attribute.
#[derive(Clone, Copy, Debug)]
pub enum Value<'a> {
    Node(NodeIndex),
    List(&'a [NodeIndex]),
    Str(&'a str),
    Number(f64),
    Bool(bool),
    Null,
}

impl Value<'_> {
    /// JavaScript truthiness, with the list rule applied: an empty list is
    /// falsy and a non-empty one truthy.
    pub fn is_truthy(&self) -> bool {
        match *self {
            Value::Node(index) => index.is_some(),
            Value::List(nodes) => !nodes.is_empty(),
            Value::Str(s) => !s.is_empty(),
            Value::Number(n) => n != 0.0 && !n.is_nan(),
            Value::Bool(b) => b,
            Value::Null => false,
        }
    }

    /// Strict (`===`) equality. Lists compare by identity, numbers by IEEE
    /// equality (so `NaN` never equals itself).
    pub fn strict_eq(&self, other: &Value<'_>) -> bool {
        match (*self, *other) {
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::List(a), Value::List(b)) => std::ptr::eq(a, b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(s)
    }
}

impl From<NodeIndex> for Value<'_> {
    fn from(index: NodeIndex) -> Self {
        if index.is_none() {
            Value::Null
        } else {
            Value::Node(index)
        }
    }
}

/// Field types that occupy a child position.
pub trait AsSlot {
    fn as_slot(&self) -> Slot<'_>;
    fn as_slot_mut(&mut self) -> SlotMut<'_>;
}

impl AsSlot for NodeIndex {
    fn as_slot(&self) -> Slot<'_> {
        Slot::Single(*self)
    }

    fn as_slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::Single(self)
    }
}

impl AsSlot for NodeList {
    fn as_slot(&self) -> Slot<'_> {
        Slot::List(self)
    }

    fn as_slot_mut(&mut self) -> SlotMut<'_> {
        SlotMut::List(self)
    }
}

/// Field types that are scalar attributes.
pub trait AsValue {
    fn as_value(&self) -> Value<'_>;
}

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::Str(self)
    }
}

/// Value carried by a `Literal` node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    RegExp { pattern: String, flags: String },
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl AsValue for LiteralValue {
    fn as_value(&self) -> Value<'_> {
        match self {
            LiteralValue::String(s) => Value::Str(s),
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::Boolean(b) => Value::Bool(*b),
            LiteralValue::Null => Value::Null,
            LiteralValue::RegExp { pattern, .. } => Value::Str(pattern),
        }
    }
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl AsValue for $name {
            fn as_value(&self) -> Value<'_> {
                Value::Str(self.as_str())
            }
        }
    };
}

keyword_enum! {
    /// Whether the Program is parsed as a classic script or an ES module.
    SourceType { Script => "script", Module => "module" }
}

keyword_enum! {
    /// Declaration keyword of a `VariableDeclaration`.
    VariableKind { Var => "var", Let => "let", Const => "const" }
}

keyword_enum! {
    PropertyKind { Init => "init", Get => "get", Set => "set" }
}

keyword_enum! {
    MethodKind { Constructor => "constructor", Method => "method", Get => "get", Set => "set" }
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::Script
    }
}
