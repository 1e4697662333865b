//! NodeArena creation helpers.
//!
//! One method per commonly synthesized node shape. Every builder produces a
//! generated node (no location); call [`NodeArena::set_loc`] or
//! [`NodeArena::user`] to mark it as coming from the input text.

use crate::arena::NodeArena;
use crate::base::{NodeIndex, NodeList};
use crate::node::{Node, NodeKind};
use crate::value::{LiteralValue, SourceType, VariableKind};
use estrav_common::SourceLocation;

impl NodeArena {
    /// Mark `index` as user-authored with a one-line location and return it.
    pub fn user(&mut self, index: NodeIndex, line: u32) -> NodeIndex {
        self.set_loc(index, SourceLocation::on_line(line, 0, 1));
        index
    }

    pub fn with_loc(&mut self, kind: NodeKind, loc: SourceLocation) -> NodeIndex {
        self.add(Node::with_loc(kind, loc))
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    pub fn identifier(&mut self, name: &str) -> NodeIndex {
        self.alloc(NodeKind::Identifier {
            name: name.to_string(),
        })
    }

    pub fn string_literal(&mut self, value: &str) -> NodeIndex {
        self.alloc(NodeKind::Literal {
            value: LiteralValue::String(value.to_string()),
        })
    }

    pub fn number_literal(&mut self, value: f64) -> NodeIndex {
        self.alloc(NodeKind::Literal {
            value: LiteralValue::Number(value),
        })
    }

    pub fn null_literal(&mut self) -> NodeIndex {
        self.alloc(NodeKind::Literal {
            value: LiteralValue::Null,
        })
    }

    pub fn this_expression(&mut self) -> NodeIndex {
        self.alloc(NodeKind::ThisExpression {})
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// `object.property`
    pub fn member(&mut self, object: NodeIndex, property: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::MemberExpression {
            object,
            property,
            computed: false,
        })
    }

    /// `object[property]`
    pub fn computed_member(&mut self, object: NodeIndex, property: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::MemberExpression {
            object,
            property,
            computed: true,
        })
    }

    /// Build `a.b.c` from a dotted path. A segment written as `[x]` becomes a
    /// computed access with identifier key `x`; `["x"]` a computed access with
    /// a string literal key.
    pub fn member_chain(&mut self, dotted: &str) -> NodeIndex {
        let mut segments = split_chain(dotted).into_iter();
        let Some(first) = segments.next() else {
            return NodeIndex::NONE;
        };
        let mut object = self.identifier(first.text);
        for segment in segments {
            object = match segment.access {
                Access::Dot => {
                    let property = self.identifier(segment.text);
                    self.member(object, property)
                }
                Access::ComputedIdentifier => {
                    let property = self.identifier(segment.text);
                    self.computed_member(object, property)
                }
                Access::ComputedString => {
                    let property = self.string_literal(segment.text);
                    self.computed_member(object, property)
                }
            };
        }
        object
    }

    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::CallExpression {
            callee,
            arguments: NodeList::from(arguments),
        })
    }

    pub fn assign(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::AssignmentExpression {
            left,
            right,
            operator: "=".to_string(),
        })
    }

    pub fn binary(&mut self, operator: &str, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::BinaryExpression {
            left,
            right,
            operator: operator.to_string(),
        })
    }

    pub fn update(&mut self, operator: &str, argument: NodeIndex, prefix: bool) -> NodeIndex {
        self.alloc(NodeKind::UpdateExpression {
            argument,
            operator: operator.to_string(),
            prefix,
        })
    }

    pub fn sequence(&mut self, expressions: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::SequenceExpression {
            expressions: NodeList::from(expressions),
        })
    }

    pub fn function_expression(
        &mut self,
        id: NodeIndex,
        params: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.alloc(NodeKind::FunctionExpression {
            id,
            params: NodeList::from(params),
            body,
            generator: false,
            is_async: false,
        })
    }

    pub fn arrow(&mut self, params: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        let expression = !matches!(
            self.get(body).map(|n| &n.kind),
            Some(NodeKind::BlockStatement { .. })
        );
        self.alloc(NodeKind::ArrowFunctionExpression {
            params: NodeList::from(params),
            body,
            expression,
            is_async: false,
        })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn program(&mut self, body: Vec<NodeIndex>, source_type: SourceType) -> NodeIndex {
        self.alloc(NodeKind::Program {
            body: NodeList::from(body),
            source_type,
        })
    }

    pub fn expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::ExpressionStatement { expression })
    }

    pub fn block(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        self.alloc(NodeKind::BlockStatement {
            body: NodeList::from(body),
        })
    }

    pub fn empty_statement(&mut self) -> NodeIndex {
        self.alloc(NodeKind::EmptyStatement {})
    }

    pub fn return_statement(&mut self, argument: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::ReturnStatement { argument })
    }

    pub fn if_statement(
        &mut self,
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    ) -> NodeIndex {
        self.alloc(NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        })
    }

    pub fn labeled(&mut self, label: &str, body: NodeIndex) -> NodeIndex {
        let label = self.identifier(label);
        self.alloc(NodeKind::LabeledStatement { label, body })
    }

    pub fn while_statement(&mut self, test: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::WhileStatement { test, body })
    }

    pub fn for_statement(
        &mut self,
        init: NodeIndex,
        test: NodeIndex,
        update: NodeIndex,
        body: NodeIndex,
    ) -> NodeIndex {
        self.alloc(NodeKind::ForStatement {
            init,
            test,
            update,
            body,
        })
    }

    pub fn for_in(&mut self, left: NodeIndex, right: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::ForInStatement { left, right, body })
    }

    pub fn for_of(&mut self, left: NodeIndex, right: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::ForOfStatement { left, right, body })
    }

    /// `try { block } catch (param) { handler_body }`
    pub fn try_catch(
        &mut self,
        block: NodeIndex,
        param: NodeIndex,
        handler_body: NodeIndex,
    ) -> NodeIndex {
        let handler = self.alloc(NodeKind::CatchClause {
            param,
            body: handler_body,
        });
        self.alloc(NodeKind::TryStatement {
            block,
            handler,
            finalizer: NodeIndex::NONE,
        })
    }

    pub fn declarator(&mut self, id: NodeIndex, init: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::VariableDeclarator { id, init })
    }

    pub fn variable_declaration(
        &mut self,
        kind: VariableKind,
        declarations: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.alloc(NodeKind::VariableDeclaration {
            declarations: NodeList::from(declarations),
            kind,
        })
    }

    /// `<kind> name = init;` with a single identifier declarator.
    pub fn var(&mut self, kind: VariableKind, name: &str, init: NodeIndex) -> NodeIndex {
        let id = self.identifier(name);
        let declarator = self.declarator(id, init);
        self.variable_declaration(kind, vec![declarator])
    }

    /// `function name(params) { body }`
    pub fn function_declaration(
        &mut self,
        name: &str,
        params: &[&str],
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let id = self.identifier(name);
        let params = params.iter().map(|p| self.identifier(p)).collect();
        let body = self.block(body);
        self.alloc(NodeKind::FunctionDeclaration {
            id,
            params,
            body,
            generator: false,
            is_async: false,
        })
    }

    pub fn class_declaration(&mut self, name: &str, super_class: NodeIndex) -> NodeIndex {
        let id = self.identifier(name);
        let body = self.alloc(NodeKind::ClassBody {
            body: NodeList::new(),
        });
        self.alloc(NodeKind::ClassDeclaration {
            id,
            super_class,
            body,
        })
    }

    // =========================================================================
    // Modules
    // =========================================================================

    pub fn import_declaration(&mut self, specifiers: Vec<NodeIndex>, source: &str) -> NodeIndex {
        let source = self.string_literal(source);
        self.alloc(NodeKind::ImportDeclaration {
            specifiers: NodeList::from(specifiers),
            source,
        })
    }

    /// The `local` part of `import local from "..."`.
    pub fn import_default_specifier(&mut self, local: &str) -> NodeIndex {
        let local = self.identifier(local);
        self.alloc(NodeKind::ImportDefaultSpecifier { local })
    }

    /// The `* as local` part of `import * as local from "..."`.
    pub fn import_namespace_specifier(&mut self, local: &str) -> NodeIndex {
        let local = self.identifier(local);
        self.alloc(NodeKind::ImportNamespaceSpecifier { local })
    }

    /// The `imported as local` part of `import { imported as local } from "..."`.
    pub fn import_specifier(&mut self, imported: &str, local: &str) -> NodeIndex {
        let local = self.identifier(local);
        let imported = self.identifier(imported);
        self.alloc(NodeKind::ImportSpecifier { local, imported })
    }

    pub fn export_named(&mut self, declaration: NodeIndex) -> NodeIndex {
        self.alloc(NodeKind::ExportNamedDeclaration {
            declaration,
            specifiers: NodeList::new(),
            source: NodeIndex::NONE,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    Dot,
    ComputedIdentifier,
    ComputedString,
}

struct ChainSegment<'a> {
    text: &'a str,
    access: Access,
}

fn split_chain(dotted: &str) -> Vec<ChainSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = dotted;
    let mut access = Access::Dot;
    while !rest.is_empty() {
        let end = rest.find(['.', '[']).unwrap_or(rest.len());
        if end > 0 {
            segments.push(ChainSegment {
                text: &rest[..end],
                access,
            });
        }
        rest = &rest[end..];
        if let Some(after) = rest.strip_prefix('.') {
            access = Access::Dot;
            rest = after;
        } else if let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']').unwrap_or(after.len());
            let inner = &after[..close];
            let quoted = inner
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'));
            segments.push(match quoted {
                Some(text) => ChainSegment {
                    text,
                    access: Access::ComputedString,
                },
                None => ChainSegment {
                    text: inner,
                    access: Access::ComputedIdentifier,
                },
            });
            rest = after.get(close + 1..).unwrap_or("");
            access = Access::Dot;
            if let Some(after) = rest.strip_prefix('.') {
                rest = after;
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    #[test]
    fn test_member_chain_shapes() {
        let mut arena = NodeArena::new();
        let chain = arena.member_chain("a[\"b\"].c");
        let Some(Node {
            kind: NodeKind::MemberExpression {
                object, computed, ..
            },
            ..
        }) = arena.get(chain)
        else {
            panic!("expected member expression");
        };
        assert!(!computed);
        let inner = *object;
        match &arena.get(inner).unwrap().kind {
            NodeKind::MemberExpression {
                property, computed, ..
            } => {
                assert!(*computed);
                assert_eq!(arena.string_value(*property), Some("b"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_member_chain_computed_identifier() {
        let mut arena = NodeArena::new();
        let chain = arena.member_chain("a[x].c");
        let inner = arena.child(chain, "object");
        assert_eq!(arena.node_type(inner), Some(NodeType::MemberExpression));
        let key = arena.child(inner, "property");
        assert_eq!(arena.identifier_name(key), Some("x"));
    }

    #[test]
    fn test_single_segment_chain_is_identifier() {
        let mut arena = NodeArena::new();
        let chain = arena.member_chain("React");
        assert_eq!(arena.identifier_name(chain), Some("React"));
    }
}
