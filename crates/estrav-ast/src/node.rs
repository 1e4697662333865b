//! Node variants.
//!
//! `NodeKind` is a closed sum type over the supported ESTree node kinds. Each
//! variant lists its child positions (in visiting order) inside the braces and
//! its scalar attributes inside the trailing brackets. The `define_nodes!`
//! macro derives from that single table:
//!
//! - the `NodeKind` enum itself,
//! - the field-less `NodeType` tag enum,
//! - `NodeType::visitor_keys()` / `NodeType::attribute_keys()`,
//! - name-based reflection (`NodeKind::slot`, `slot_mut`, `attr`).

use crate::base::{NodeIndex, NodeList};
use crate::value::{
    AsSlot, AsValue, LiteralValue, MethodKind, PropertyKind, Slot, SlotMut, SourceType, Value,
    VariableKind,
};
use estrav_common::SourceLocation;
use serde::{Deserialize, Serialize};

macro_rules! define_nodes {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident {
                $( $field:ident : $slot:ty ),* $(,)?
            }
            $( [ $( $attr:ident : $aty:ty ),* $(,)? ] )?
        ),* $(,)?
    ) => {
        /// Payload of a syntax tree node. The variant is the node's tag.
        #[derive(Clone, Debug, PartialEq, Serialize)]
        #[serde(tag = "type")]
        pub enum NodeKind {
            $(
                $(#[$meta])*
                $variant {
                    $( $field: $slot, )*
                    $( $( $attr: $aty, )* )?
                },
            )*
        }

        /// Type tag of a node, without its payload.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeType {
            $( $variant, )*
        }

        impl NodeType {
            pub const ALL: &'static [NodeType] = &[ $( NodeType::$variant, )* ];

            pub const fn name(self) -> &'static str {
                match self {
                    $( NodeType::$variant => stringify!($variant), )*
                }
            }

            pub fn from_name(name: &str) -> Option<NodeType> {
                match name {
                    $( stringify!($variant) => Some(NodeType::$variant), )*
                    _ => None,
                }
            }

            /// Child fields in the order a depth-first walk visits them.
            pub const fn visitor_keys(self) -> &'static [&'static str] {
                match self {
                    $( NodeType::$variant => &[ $( stringify!($field) ),* ], )*
                }
            }

            /// Scalar (non-child) attribute names.
            pub const fn attribute_keys(self) -> &'static [&'static str] {
                match self {
                    $( NodeType::$variant => &[ $( $( stringify!($attr) ),* )? ], )*
                }
            }
        }

        impl NodeKind {
            pub const fn node_type(&self) -> NodeType {
                match self {
                    $( NodeKind::$variant { .. } => NodeType::$variant, )*
                }
            }

            /// The child position named `key`, if this variant has one.
            pub fn slot(&self, key: &str) -> Option<Slot<'_>> {
                match self {
                    $(
                        NodeKind::$variant { $( $field, )* .. } => match key {
                            $( stringify!($field) => Some(AsSlot::as_slot($field)), )*
                            _ => None,
                        },
                    )*
                }
            }

            pub fn slot_mut(&mut self, key: &str) -> Option<SlotMut<'_>> {
                match self {
                    $(
                        NodeKind::$variant { $( $field, )* .. } => match key {
                            $( stringify!($field) => Some(AsSlot::as_slot_mut($field)), )*
                            _ => None,
                        },
                    )*
                }
            }

            /// The scalar attribute named `key`, if this variant has one.
            pub fn attr(&self, key: &str) -> Option<Value<'_>> {
                match self {
                    $(
                        NodeKind::$variant { $( $( $attr, )* )? .. } => match key {
                            $( $( stringify!($attr) => Some(AsValue::as_value($attr)), )* )?
                            _ => None,
                        },
                    )*
                }
            }
        }
    };
}

define_nodes! {
    Program { body: NodeList } [source_type: SourceType],
    ExpressionStatement { expression: NodeIndex },
    BlockStatement { body: NodeList },
    EmptyStatement {},
    DebuggerStatement {},
    WithStatement { object: NodeIndex, body: NodeIndex },
    ReturnStatement { argument: NodeIndex },
    LabeledStatement { label: NodeIndex, body: NodeIndex },
    BreakStatement { label: NodeIndex },
    ContinueStatement { label: NodeIndex },
    IfStatement { test: NodeIndex, consequent: NodeIndex, alternate: NodeIndex },
    SwitchStatement { discriminant: NodeIndex, cases: NodeList },
    SwitchCase { test: NodeIndex, consequent: NodeList },
    ThrowStatement { argument: NodeIndex },
    TryStatement { block: NodeIndex, handler: NodeIndex, finalizer: NodeIndex },
    CatchClause { param: NodeIndex, body: NodeIndex },
    WhileStatement { test: NodeIndex, body: NodeIndex },
    DoWhileStatement { body: NodeIndex, test: NodeIndex },
    ForStatement { init: NodeIndex, test: NodeIndex, update: NodeIndex, body: NodeIndex },
    ForInStatement { left: NodeIndex, right: NodeIndex, body: NodeIndex },
    ForOfStatement { left: NodeIndex, right: NodeIndex, body: NodeIndex },
    FunctionDeclaration { id: NodeIndex, params: NodeList, body: NodeIndex }
        [generator: bool, is_async: bool],
    VariableDeclaration { declarations: NodeList } [kind: VariableKind],
    VariableDeclarator { id: NodeIndex, init: NodeIndex },
    ClassDeclaration { id: NodeIndex, super_class: NodeIndex, body: NodeIndex },
    ClassExpression { id: NodeIndex, super_class: NodeIndex, body: NodeIndex },
    ClassBody { body: NodeList },
    MethodDefinition { key: NodeIndex, value: NodeIndex }
        [kind: MethodKind, computed: bool, is_static: bool],
    Identifier {} [name: String],
    Literal {} [value: LiteralValue],
    ThisExpression {},
    ArrayExpression { elements: NodeList },
    ObjectExpression { properties: NodeList },
    Property { key: NodeIndex, value: NodeIndex }
        [kind: PropertyKind, computed: bool, shorthand: bool, method: bool],
    FunctionExpression { id: NodeIndex, params: NodeList, body: NodeIndex }
        [generator: bool, is_async: bool],
    ArrowFunctionExpression { params: NodeList, body: NodeIndex }
        [expression: bool, is_async: bool],
    UnaryExpression { argument: NodeIndex } [operator: String, prefix: bool],
    UpdateExpression { argument: NodeIndex } [operator: String, prefix: bool],
    BinaryExpression { left: NodeIndex, right: NodeIndex } [operator: String],
    AssignmentExpression { left: NodeIndex, right: NodeIndex } [operator: String],
    LogicalExpression { left: NodeIndex, right: NodeIndex } [operator: String],
    MemberExpression { object: NodeIndex, property: NodeIndex } [computed: bool],
    ConditionalExpression { test: NodeIndex, consequent: NodeIndex, alternate: NodeIndex },
    CallExpression { callee: NodeIndex, arguments: NodeList },
    NewExpression { callee: NodeIndex, arguments: NodeList },
    SequenceExpression { expressions: NodeList },
    ObjectPattern { properties: NodeList },
    ArrayPattern { elements: NodeList },
    RestElement { argument: NodeIndex },
    AssignmentPattern { left: NodeIndex, right: NodeIndex },
    ImportDeclaration { specifiers: NodeList, source: NodeIndex },
    ImportSpecifier { local: NodeIndex, imported: NodeIndex },
    ImportDefaultSpecifier { local: NodeIndex },
    ImportNamespaceSpecifier { local: NodeIndex },
    ExportNamedDeclaration { declaration: NodeIndex, specifiers: NodeList, source: NodeIndex },
    ExportDefaultDeclaration { declaration: NodeIndex },
    ExportSpecifier { local: NodeIndex, exported: NodeIndex },
}

/// One syntax tree element.
///
/// The tag (`kind`'s variant) never changes after creation; giving a position
/// a different meaning means storing a new node there.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Present on nodes produced by the parser, absent on synthesized ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Node {
        Node { kind, loc: None }
    }

    pub fn with_loc(kind: NodeKind, loc: SourceLocation) -> Node {
        Node {
            kind,
            loc: Some(loc),
        }
    }

    #[inline]
    pub const fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Read any field, child position or scalar, by name.
    ///
    /// An absent optional child reads as `Value::Null`.
    pub fn get(&self, key: &str) -> Option<Value<'_>> {
        match self.kind.slot(key) {
            Some(Slot::Single(index)) => Some(Value::from(index)),
            Some(Slot::List(list)) => Some(Value::List(&list.nodes)),
            None => self.kind.attr(key),
        }
    }

    /// Identifier name, when this is an `Identifier`.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Literal value, when this is a `Literal`.
    pub fn literal_value(&self) -> Option<&LiteralValue> {
        match &self.kind {
            NodeKind::Literal { value } => Some(value),
            _ => None,
        }
    }

    /// String literal text, when this is a string `Literal`.
    pub fn string_value(&self) -> Option<&str> {
        self.literal_value().and_then(LiteralValue::as_str)
    }

    /// Children in visiting order, skipping absent optionals and list holes.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut children = Vec::new();
        for key in self.node_type().visitor_keys() {
            match self.kind.slot(key) {
                Some(Slot::Single(index)) if index.is_some() => children.push(index),
                Some(Slot::List(list)) => {
                    children.extend(list.iter().filter(|index| index.is_some()))
                }
                _ => {}
            }
        }
        children
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::from_name(s).ok_or_else(|| format!("unknown node type `{s}`"))
    }
}
