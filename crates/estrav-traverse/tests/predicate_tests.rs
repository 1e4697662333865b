//! Tests for attribute and type predicates.

use estrav_ast::{Alias, NodeArena, NodeIndex, NodeKind, NodeType, SourceType, VariableKind};
use estrav_common::SourceLocation;
use estrav_traverse::{ROOT_PATH, TraverseError, TraverseState};

#[test]
fn test_has_on_lists() {
    let mut arena = NodeArena::new();
    let empty = arena.block(vec![]);
    let inner = arena.empty_statement();
    let full = arena.block(vec![inner]);
    let program = arena.program(vec![empty, full], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let empty = state.child_at(ROOT_PATH, "body", 0).unwrap().unwrap();
    let full = state.child_at(ROOT_PATH, "body", 1).unwrap().unwrap();
    assert!(!state.has(empty, "body").unwrap());
    assert!(state.has(full, "body").unwrap());
    assert!(state.isnt(empty, "body").unwrap());
    assert!(state.is(full, "body").unwrap());
}

#[test]
fn test_has_on_falsy_scalars() {
    let mut arena = NodeArena::new();
    let zero = arena.number_literal(0.0);
    let empty_string = arena.string_literal("");
    let one = arena.number_literal(1.0);
    let elements = vec![zero, empty_string, one];
    let array = arena.alloc(NodeKind::ArrayExpression {
        elements: elements.into(),
    });
    let stmt = arena.expression_statement(array);
    let ret = arena.return_statement(NodeIndex::NONE);
    let program = arena.program(vec![stmt, ret], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let zero = state.get(ROOT_PATH, "body.0.expression.elements.0").unwrap().unwrap();
    let empty_string = state.get(ROOT_PATH, "body.0.expression.elements.1").unwrap().unwrap();
    let one = state.get(ROOT_PATH, "body.0.expression.elements.2").unwrap().unwrap();
    let ret = state.get(ROOT_PATH, "body.1").unwrap().unwrap();

    assert!(!state.has(zero, "value").unwrap());
    assert!(!state.has(empty_string, "value").unwrap());
    assert!(state.has(one, "value").unwrap());
    // Absent child and unknown attribute.
    assert!(!state.has(ret, "argument").unwrap());
    assert!(!state.has(ret, "nonexistent").unwrap());
}

#[test]
fn test_equals_is_strict() {
    let mut arena = NodeArena::new();
    let init = arena.number_literal(1.0);
    let decl = arena.var(VariableKind::Const, "answer", init);
    let program = arena.program(vec![decl], SourceType::Module);
    let mut state = TraverseState::new(arena, program).unwrap();

    let decl = state.child_at(ROOT_PATH, "body", 0).unwrap().unwrap();
    let id = state.get(decl, "declarations.0.id").unwrap().unwrap();
    let init = state.get(decl, "declarations.0.init").unwrap().unwrap();

    assert!(state.equals(decl, "kind", "const").unwrap());
    assert!(!state.equals(decl, "kind", "let").unwrap());
    assert!(state.equals(id, "name", "answer").unwrap());
    assert!(state.equals(init, "value", 1.0).unwrap());
    // No coercion between kinds.
    assert!(!state.equals(init, "value", "1").unwrap());
    assert!(!state.equals(id, "missing", "answer").unwrap());
    assert!(state.equals(ROOT_PATH, "source_type", "module").unwrap());
}

#[test]
fn test_is_node_type_with_aliases() {
    let mut arena = NodeArena::new();
    let member = arena.member_chain("a.b");
    let stmt = arena.expression_statement(member);
    let program = arena.program(vec![stmt], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let stmt = state.child_at(ROOT_PATH, "body", 0).unwrap().unwrap();
    let member = state.child(stmt, "expression").unwrap().unwrap();

    assert!(state.is_node_type(member, NodeType::MemberExpression));
    assert!(state.is_node_type(member, Alias::Expression));
    assert!(state.is_node_type(member, Alias::LVal));
    assert!(!state.is_node_type(member, Alias::Statement));
    assert!(state.is_node_type(stmt, Alias::Statement));
    assert!(state.is_node_type_name(member, "Expression"));
    assert!(state.is_node_type_name(member, "MemberExpression"));
    assert!(!state.is_node_type_name(member, "NotAType"));
}

#[test]
fn test_is_node_type_after_removal() {
    let mut arena = NodeArena::new();
    let member = arena.member_chain("a.b");
    let stmt = arena.expression_statement(member);
    let program = arena.program(vec![stmt], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let stmt = state.child_at(ROOT_PATH, "body", 0).unwrap().unwrap();
    let member = state.child(stmt, "expression").unwrap().unwrap();
    state.remove(stmt).unwrap();

    assert!(state.is_node_type(stmt, NodeType::ExpressionStatement));
    assert!(state.is_node_type(member, Alias::Expression));
    assert_eq!(state.has(member, "object"), Err(TraverseError::Removed(member)));
}

#[test]
fn test_user_and_generated() {
    let mut arena = NodeArena::new();
    let parsed = arena.identifier("parsed");
    let parsed = arena.user(parsed, 1);
    let synthesized = arena.identifier("synthesized");
    let parsed_stmt = arena.expression_statement(parsed);
    let synthesized_stmt = arena.expression_statement(synthesized);
    let program = arena.program(vec![parsed_stmt, synthesized_stmt], SourceType::Script);
    arena.set_loc(program, SourceLocation::on_line(1, 0, 20));
    let mut state = TraverseState::new(arena, program).unwrap();

    let parsed = state.get(ROOT_PATH, "body.0.expression").unwrap().unwrap();
    let synthesized = state.get(ROOT_PATH, "body.1.expression").unwrap().unwrap();

    assert!(state.is_user(parsed).unwrap());
    assert!(!state.is_generated(parsed).unwrap());
    assert!(!state.is_user(synthesized).unwrap());
    assert!(state.is_generated(synthesized).unwrap());
    assert!(state.is_user(ROOT_PATH).unwrap());
}

#[test]
fn test_queries_do_not_change_answers() {
    let mut arena = NodeArena::new();
    let member = arena.member_chain("a.b");
    let stmt = arena.expression_statement(member);
    let program = arena.program(vec![stmt], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();
    let member = state.get(ROOT_PATH, "body.0.expression").unwrap().unwrap();
    let paths_before = state.path_count();

    for _ in 0..2 {
        assert!(state.has(member, "object").unwrap());
        assert!(!state.has(member, "computed").unwrap());
        assert!(state.equals(member, "computed", false).unwrap());
        assert!(state.is_node_type(member, Alias::Expression));
        assert!(state.is_generated(member).unwrap());
        assert!(state.matches_pattern(member, "a.b", false).unwrap());
        assert!(state.is_completion_record(member, false).unwrap());
        assert!(!state.is_statement_or_block(member).unwrap());
    }
    assert_eq!(state.path_count(), paths_before);
}
