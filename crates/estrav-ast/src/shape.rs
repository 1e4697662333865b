//! Per-tag shape contracts.
//!
//! Each node type constrains which tags may appear in each of its child
//! fields and which fields are mandatory. Contracts are checked one level
//! deep: [`validate_node`] looks at a node and its immediate children only.

use crate::alias::{Alias, TypeTag};
use crate::arena::NodeArena;
use crate::base::NodeIndex;
use crate::node::{NodeKind, NodeType};
use crate::value::{LiteralValue, Slot};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("node {0:?} does not exist in the arena")]
    MissingNode(NodeIndex),
    #[error("{node_type}.{field} is required")]
    MissingField {
        node_type: NodeType,
        field: &'static str,
    },
    #[error("{node_type}.{field} cannot hold a {found} (expected one of: {expected})")]
    UnexpectedChild {
        node_type: NodeType,
        field: &'static str,
        found: NodeType,
        expected: String,
    },
    #[error("{node_type}.{field}: {reason}")]
    InvalidAttribute {
        node_type: NodeType,
        field: &'static str,
        reason: &'static str,
    },
}

/// Constraint on one child field.
#[derive(Clone, Copy, Debug)]
pub struct FieldContract {
    pub field: &'static str,
    /// Single fields only: the child must be present.
    pub required: bool,
    /// Accepted tags; empty accepts anything.
    pub accepts: &'static [TypeTag],
    /// List fields only: `NodeIndex::NONE` elements (array holes) allowed.
    pub holes: bool,
}

const fn req(field: &'static str, accepts: &'static [TypeTag]) -> FieldContract {
    FieldContract {
        field,
        required: true,
        accepts,
        holes: false,
    }
}

const fn opt(field: &'static str, accepts: &'static [TypeTag]) -> FieldContract {
    FieldContract {
        field,
        required: false,
        accepts,
        holes: false,
    }
}

const fn holes(field: &'static str, accepts: &'static [TypeTag]) -> FieldContract {
    FieldContract {
        field,
        required: false,
        accepts,
        holes: true,
    }
}

const EXPRESSION: &[TypeTag] = &[TypeTag::Alias(Alias::Expression)];
const STATEMENT: &[TypeTag] = &[TypeTag::Alias(Alias::Statement)];
const LVAL: &[TypeTag] = &[TypeTag::Alias(Alias::LVal)];
const IDENTIFIER: &[TypeTag] = &[TypeTag::Node(NodeType::Identifier)];
const BLOCK: &[TypeTag] = &[TypeTag::Node(NodeType::BlockStatement)];
const LITERAL: &[TypeTag] = &[TypeTag::Node(NodeType::Literal)];
const FOR_INIT: &[TypeTag] = &[
    TypeTag::Node(NodeType::VariableDeclaration),
    TypeTag::Alias(Alias::Expression),
];
const FOR_LEFT: &[TypeTag] = &[
    TypeTag::Node(NodeType::VariableDeclaration),
    TypeTag::Alias(Alias::LVal),
];
const BINDING_TARGET: &[TypeTag] = &[
    TypeTag::Node(NodeType::Identifier),
    TypeTag::Alias(Alias::Pattern),
];
const ARROW_BODY: &[TypeTag] = &[
    TypeTag::Node(NodeType::BlockStatement),
    TypeTag::Alias(Alias::Expression),
];
const PROPERTY_VALUE: &[TypeTag] = &[
    TypeTag::Alias(Alias::Expression),
    TypeTag::Alias(Alias::Pattern),
];
const OBJECT_PATTERN_MEMBER: &[TypeTag] = &[
    TypeTag::Node(NodeType::Property),
    TypeTag::Node(NodeType::RestElement),
];
const EXPORT_DEFAULT: &[TypeTag] = &[
    TypeTag::Alias(Alias::Declaration),
    TypeTag::Alias(Alias::Expression),
];

/// Contracts for the child fields of `ty`.
pub fn contracts(ty: NodeType) -> &'static [FieldContract] {
    match ty {
        NodeType::Program | NodeType::BlockStatement => const { &[opt("body", STATEMENT)] },
        NodeType::ExpressionStatement => const { &[req("expression", EXPRESSION)] },
        NodeType::WithStatement => const { &[req("object", EXPRESSION), req("body", STATEMENT)] },
        NodeType::ReturnStatement => const { &[opt("argument", EXPRESSION)] },
        NodeType::ThrowStatement => const { &[req("argument", EXPRESSION)] },
        NodeType::LabeledStatement => const { &[req("label", IDENTIFIER), req("body", STATEMENT)] },
        NodeType::BreakStatement | NodeType::ContinueStatement => {
            const { &[opt("label", IDENTIFIER)] }
        }
        NodeType::IfStatement => const { &[
            req("test", EXPRESSION),
            req("consequent", STATEMENT),
            opt("alternate", STATEMENT),
        ] },
        NodeType::SwitchStatement => const { &[
            req("discriminant", EXPRESSION),
            opt("cases", &[TypeTag::Node(NodeType::SwitchCase)]),
        ] },
        NodeType::SwitchCase => const { &[opt("test", EXPRESSION), opt("consequent", STATEMENT)] },
        NodeType::TryStatement => const { &[
            req("block", BLOCK),
            opt("handler", &[TypeTag::Node(NodeType::CatchClause)]),
            opt("finalizer", BLOCK),
        ] },
        NodeType::CatchClause => const { &[opt("param", BINDING_TARGET), req("body", BLOCK)] },
        NodeType::WhileStatement => const { &[req("test", EXPRESSION), req("body", STATEMENT)] },
        NodeType::DoWhileStatement => const { &[req("body", STATEMENT), req("test", EXPRESSION)] },
        NodeType::ForStatement => const { &[
            opt("init", FOR_INIT),
            opt("test", EXPRESSION),
            opt("update", EXPRESSION),
            req("body", STATEMENT),
        ] },
        NodeType::ForInStatement | NodeType::ForOfStatement => const { &[
            req("left", FOR_LEFT),
            req("right", EXPRESSION),
            req("body", STATEMENT),
        ] },
        NodeType::FunctionDeclaration | NodeType::FunctionExpression => const { &[
            opt("id", IDENTIFIER),
            opt("params", LVAL),
            req("body", BLOCK),
        ] },
        NodeType::ArrowFunctionExpression => {
            const { &[opt("params", LVAL), req("body", ARROW_BODY)] }
        }
        NodeType::VariableDeclaration => const { &[opt(
            "declarations",
            &[TypeTag::Node(NodeType::VariableDeclarator)],
        )] },
        NodeType::VariableDeclarator => {
            const { &[req("id", BINDING_TARGET), opt("init", EXPRESSION)] }
        }
        NodeType::ClassDeclaration | NodeType::ClassExpression => const { &[
            opt("id", IDENTIFIER),
            opt("super_class", EXPRESSION),
            req("body", &[TypeTag::Node(NodeType::ClassBody)]),
        ] },
        NodeType::ClassBody => {
            const { &[opt("body", &[TypeTag::Node(NodeType::MethodDefinition)])] }
        }
        NodeType::MethodDefinition => const { &[
            req("key", EXPRESSION),
            req("value", &[TypeTag::Node(NodeType::FunctionExpression)]),
        ] },
        NodeType::ArrayExpression => const { &[holes("elements", EXPRESSION)] },
        NodeType::ObjectExpression => {
            const { &[opt("properties", &[TypeTag::Node(NodeType::Property)])] }
        }
        NodeType::Property => const { &[req("key", EXPRESSION), req("value", PROPERTY_VALUE)] },
        NodeType::UnaryExpression | NodeType::UpdateExpression => {
            const { &[req("argument", EXPRESSION)] }
        }
        NodeType::BinaryExpression | NodeType::LogicalExpression => {
            const { &[req("left", EXPRESSION), req("right", EXPRESSION)] }
        }
        NodeType::AssignmentExpression => const { &[req("left", LVAL), req("right", EXPRESSION)] },
        NodeType::MemberExpression => {
            const { &[req("object", EXPRESSION), req("property", EXPRESSION)] }
        }
        NodeType::ConditionalExpression => const { &[
            req("test", EXPRESSION),
            req("consequent", EXPRESSION),
            req("alternate", EXPRESSION),
        ] },
        NodeType::CallExpression | NodeType::NewExpression => {
            const { &[req("callee", EXPRESSION), opt("arguments", EXPRESSION)] }
        }
        NodeType::SequenceExpression => const { &[opt("expressions", EXPRESSION)] },
        NodeType::ObjectPattern => const { &[opt("properties", OBJECT_PATTERN_MEMBER)] },
        NodeType::ArrayPattern => const { &[holes("elements", LVAL)] },
        NodeType::RestElement => const { &[req("argument", LVAL)] },
        NodeType::AssignmentPattern => const { &[req("left", LVAL), req("right", EXPRESSION)] },
        NodeType::ImportDeclaration => const { &[
            opt("specifiers", &[TypeTag::Alias(Alias::ModuleSpecifier)]),
            req("source", LITERAL),
        ] },
        NodeType::ImportSpecifier => {
            const { &[req("local", IDENTIFIER), req("imported", IDENTIFIER)] }
        }
        NodeType::ImportDefaultSpecifier | NodeType::ImportNamespaceSpecifier => {
            const { &[req("local", IDENTIFIER)] }
        }
        NodeType::ExportNamedDeclaration => const { &[
            opt("declaration", &[TypeTag::Alias(Alias::Declaration)]),
            opt("specifiers", &[TypeTag::Node(NodeType::ExportSpecifier)]),
            opt("source", LITERAL),
        ] },
        NodeType::ExportDefaultDeclaration => const { &[req("declaration", EXPORT_DEFAULT)] },
        NodeType::ExportSpecifier => {
            const { &[req("local", IDENTIFIER), req("exported", IDENTIFIER)] }
        }
        NodeType::EmptyStatement
        | NodeType::DebuggerStatement
        | NodeType::Identifier
        | NodeType::Literal
        | NodeType::ThisExpression => const { &[] },
    }
}

/// Check node `index` against its tag's contracts.
pub fn validate_node(arena: &NodeArena, index: NodeIndex) -> Result<(), ShapeError> {
    let node = arena.get(index).ok_or(ShapeError::MissingNode(index))?;
    let node_type = node.node_type();

    for contract in contracts(node_type) {
        match node.kind.slot(contract.field) {
            Some(Slot::Single(child)) => {
                if child.is_none() {
                    if contract.required {
                        return Err(ShapeError::MissingField {
                            node_type,
                            field: contract.field,
                        });
                    }
                    continue;
                }
                check_child(arena, node_type, contract, child)?;
            }
            Some(Slot::List(list)) => {
                for child in list.iter() {
                    if child.is_none() {
                        if contract.holes {
                            continue;
                        }
                        return Err(ShapeError::MissingField {
                            node_type,
                            field: contract.field,
                        });
                    }
                    check_child(arena, node_type, contract, child)?;
                }
            }
            None => {}
        }
    }

    check_attributes(arena, &node.kind, node_type)
}

/// Validate every node reachable from `root`.
pub fn validate_tree(arena: &NodeArena, root: NodeIndex) -> Result<(), ShapeError> {
    arena
        .descendants(root)
        .into_iter()
        .try_for_each(|index| validate_node(arena, index))
}

/// Whether a node of type `ty` may be stored at `parent_type.field`.
pub fn accepts(parent_type: NodeType, field: &str, ty: NodeType) -> bool {
    contracts(parent_type)
        .iter()
        .find(|c| c.field == field)
        .is_none_or(|c| c.accepts.is_empty() || c.accepts.iter().any(|&tag| ty.is(tag)))
}

/// Check that a node of type `found` may be stored at `parent_type.field`.
pub fn check_child_type(
    parent_type: NodeType,
    field: &'static str,
    found: NodeType,
) -> Result<(), ShapeError> {
    let Some(contract) = contracts(parent_type).iter().find(|c| c.field == field) else {
        return Ok(());
    };
    if contract.accepts.is_empty() || contract.accepts.iter().any(|&tag| found.is(tag)) {
        return Ok(());
    }
    Err(ShapeError::UnexpectedChild {
        node_type: parent_type,
        field,
        found,
        expected: contract
            .accepts
            .iter()
            .map(|tag| tag.name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn check_child(
    arena: &NodeArena,
    node_type: NodeType,
    contract: &FieldContract,
    child: NodeIndex,
) -> Result<(), ShapeError> {
    let found = arena.node_type(child).ok_or(ShapeError::MissingNode(child))?;
    check_child_type(node_type, contract.field, found)
}

fn check_attributes(
    arena: &NodeArena,
    kind: &NodeKind,
    node_type: NodeType,
) -> Result<(), ShapeError> {
    match kind {
        NodeKind::MemberExpression {
            property,
            computed: false,
            ..
        } if arena.node_type(*property) != Some(NodeType::Identifier) => {
            Err(ShapeError::InvalidAttribute {
                node_type,
                field: "property",
                reason: "a non-computed member property must be an Identifier",
            })
        }
        NodeKind::ImportDeclaration { source, .. } | NodeKind::ExportNamedDeclaration { source, .. }
            if source.is_some()
                && !matches!(
                    arena.get(*source).and_then(|n| n.literal_value()),
                    Some(LiteralValue::String(_))
                ) =>
        {
            Err(ShapeError::InvalidAttribute {
                node_type,
                field: "source",
                reason: "a module source must be a string literal",
            })
        }
        NodeKind::Identifier { name } if name.is_empty() => Err(ShapeError::InvalidAttribute {
            node_type,
            field: "name",
            reason: "an identifier name cannot be empty",
        }),
        _ => Ok(()),
    }
}
