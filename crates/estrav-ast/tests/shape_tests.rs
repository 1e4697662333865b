//! Tests for per-tag shape contracts.

use estrav_ast::shape::{accepts, contracts};
use estrav_ast::{
    NodeArena, NodeIndex, NodeKind, NodeList, NodeType, ShapeError, SourceType, VariableKind,
    validate_node, validate_tree,
};

#[test]
fn test_well_formed_program_validates() {
    let mut arena = NodeArena::new();
    let init = arena.number_literal(1.0);
    let decl = arena.var(VariableKind::Let, "x", init);
    let callee = arena.member_chain("console.log");
    let arg = arena.identifier("x");
    let call = arena.call(callee, vec![arg]);
    let stmt = arena.expression_statement(call);
    let program = arena.program(vec![decl, stmt], SourceType::Script);

    assert_eq!(validate_tree(&arena, program), Ok(()));
}

#[test]
fn test_missing_required_child() {
    let mut arena = NodeArena::new();
    let stmt = arena.expression_statement(NodeIndex::NONE);
    assert_eq!(
        validate_node(&arena, stmt),
        Err(ShapeError::MissingField {
            node_type: NodeType::ExpressionStatement,
            field: "expression",
        })
    );
}

#[test]
fn test_statement_in_expression_position() {
    let mut arena = NodeArena::new();
    let inner = arena.empty_statement();
    let stmt = arena.expression_statement(inner);
    let err = validate_node(&arena, stmt).unwrap_err();
    assert!(matches!(
        err,
        ShapeError::UnexpectedChild {
            found: NodeType::EmptyStatement,
            field: "expression",
            ..
        }
    ));
    assert!(err.to_string().contains("Expression"));
}

#[test]
fn test_expression_in_statement_list() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let block = arena.block(vec![a]);
    assert!(matches!(
        validate_node(&arena, block),
        Err(ShapeError::UnexpectedChild {
            node_type: NodeType::BlockStatement,
            found: NodeType::Identifier,
            ..
        })
    ));
}

#[test]
fn test_array_holes_allowed_only_where_declared() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let array = arena.alloc(NodeKind::ArrayExpression {
        elements: NodeList::from(vec![a, NodeIndex::NONE]),
    });
    assert_eq!(validate_node(&arena, array), Ok(()));

    let call = arena.alloc(NodeKind::CallExpression {
        callee: a,
        arguments: NodeList::from(vec![NodeIndex::NONE]),
    });
    assert!(validate_node(&arena, call).is_err());
}

#[test]
fn test_non_computed_property_must_be_identifier() {
    let mut arena = NodeArena::new();
    let object = arena.identifier("a");
    let key = arena.string_literal("b");
    let dotted = arena.member(object, key);
    let computed = arena.computed_member(object, key);

    assert!(matches!(
        validate_node(&arena, dotted),
        Err(ShapeError::InvalidAttribute {
            field: "property",
            ..
        })
    ));
    assert_eq!(validate_node(&arena, computed), Ok(()));
}

#[test]
fn test_import_source_must_be_string() {
    let mut arena = NodeArena::new();
    let spec = arena.import_default_specifier("React");
    let good = arena.import_declaration(vec![spec], "react");
    assert_eq!(validate_node(&arena, good), Ok(()));

    let number = arena.number_literal(3.0);
    let bad = arena.alloc(NodeKind::ImportDeclaration {
        specifiers: NodeList::new(),
        source: number,
    });
    assert!(matches!(
        validate_node(&arena, bad),
        Err(ShapeError::InvalidAttribute { field: "source", .. })
    ));
}

#[test]
fn test_dangling_child_index() {
    let mut arena = NodeArena::new();
    let stmt = arena.expression_statement(NodeIndex(999));
    assert_eq!(
        validate_node(&arena, stmt),
        Err(ShapeError::MissingNode(NodeIndex(999)))
    );
    assert_eq!(
        validate_node(&arena, NodeIndex(500)),
        Err(ShapeError::MissingNode(NodeIndex(500)))
    );
}

#[test]
fn test_for_init_accepts_declaration_or_expression() {
    assert!(accepts(NodeType::ForStatement, "init", NodeType::VariableDeclaration));
    assert!(accepts(NodeType::ForStatement, "init", NodeType::AssignmentExpression));
    assert!(!accepts(NodeType::ForStatement, "init", NodeType::IfStatement));
    assert!(accepts(NodeType::ForInStatement, "left", NodeType::MemberExpression));
    assert!(accepts(NodeType::IfStatement, "consequent", NodeType::BlockStatement));
    assert!(!accepts(NodeType::IfStatement, "consequent", NodeType::Identifier));
}

#[test]
fn test_contract_fields_are_visitor_keys() {
    for &ty in NodeType::ALL {
        for contract in contracts(ty) {
            assert!(
                ty.visitor_keys().contains(&contract.field),
                "{ty}.{} is not a child position",
                contract.field
            );
        }
    }
}

#[test]
fn test_contract_tables_are_static() {
    fn fields(ty: NodeType) -> Vec<(&'static str, bool)> {
        let table: &'static [estrav_ast::shape::FieldContract] = contracts(ty);
        table.iter().map(|c| (c.field, c.required)).collect()
    }

    assert_eq!(
        fields(NodeType::IfStatement),
        [("test", true), ("consequent", true), ("alternate", false)]
    );
    assert_eq!(fields(NodeType::ImportDefaultSpecifier), [("local", true)]);
    assert!(fields(NodeType::Identifier).is_empty());
}
